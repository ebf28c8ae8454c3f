//! Session-scoped suggestion dismissals.

use std::collections::HashSet;

use super::Suggestion;

/// Dismissed (workflow id, suggestion id) pairs. A dismissed suggestion stays
/// hidden for that workflow for the lifetime of the value.
#[derive(Debug, Clone, Default)]
pub struct Dismissals {
    dismissed: HashSet<(String, String)>,
}

impl Dismissals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if it was already dismissed. Workflows without an id
    /// cannot be told apart, so dismissing for them does nothing.
    pub fn dismiss(&mut self, workflow_id: &str, suggestion_id: &str) -> bool {
        if workflow_id.trim().is_empty() {
            return false;
        }
        self.dismissed
            .insert((workflow_id.to_string(), suggestion_id.to_string()))
    }

    pub fn is_dismissed(&self, workflow_id: &str, suggestion_id: &str) -> bool {
        self.dismissed
            .contains(&(workflow_id.to_string(), suggestion_id.to_string()))
    }

    pub fn retain_active(&self, workflow_id: &str, suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
        suggestions
            .into_iter()
            .filter(|s| !self.is_dismissed(workflow_id, &s.id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.dismissed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dismissed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::Priority;

    fn suggestion(id: &str) -> Suggestion {
        Suggestion::new(id, Priority::Low, "t", "m")
    }

    #[test]
    fn dismissal_is_per_workflow() {
        let mut dismissals = Dismissals::new();
        assert!(dismissals.dismiss("wf-1", "use-templates"));
        assert!(!dismissals.dismiss("wf-1", "use-templates"));

        let kept = dismissals.retain_active("wf-1", vec![suggestion("use-templates"), suggestion("add-trigger")]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "add-trigger");

        let other = dismissals.retain_active("wf-2", vec![suggestion("use-templates")]);
        assert_eq!(other.len(), 1);
        assert_eq!(dismissals.len(), 1);
    }

    #[test]
    fn unnamed_workflows_are_never_filtered() {
        let mut dismissals = Dismissals::new();
        assert!(!dismissals.dismiss("", "connect-nodes"));
        assert!(dismissals.is_empty());
        let kept = dismissals.retain_active("", vec![suggestion("connect-nodes")]);
        assert_eq!(kept.len(), 1);
    }
}
