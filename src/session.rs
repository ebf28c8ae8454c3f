//! UI-boundary timing for validation requests.
//!
//! Validation itself is synchronous. The editor still shows a "validating"
//! indicator for a minimum time and only applies the result of the newest
//! request. This module models both without timers: callers pass the current
//! `Instant` in and schedule delivery themselves.

use std::time::{Duration, Instant};

use crate::config::ValidatorConfig;

/// Handle for one issued validation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    issued_at: Instant,
}

impl Ticket {
    pub fn issued_at(&self) -> Instant {
        self.issued_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery<T> {
    /// Show `result` no earlier than `deliver_at`.
    Ready { deliver_at: Instant, result: T },
    /// A newer request was issued (or the session cancelled); drop the result.
    Stale,
}

#[derive(Debug, Clone)]
pub struct ValidationSession {
    generation: u64,
    min_display: Duration,
}

impl ValidationSession {
    pub fn new(min_display: Duration) -> Self {
        ValidationSession {
            generation: 0,
            min_display,
        }
    }

    pub fn from_config(config: &ValidatorConfig) -> Self {
        Self::new(Duration::from_millis(config.min_display_ms))
    }

    /// Issue a new request. Any earlier ticket becomes stale.
    pub fn begin(&mut self, now: Instant) -> Ticket {
        self.generation += 1;
        Ticket {
            generation: self.generation,
            issued_at: now,
        }
    }

    /// Invalidate every pending ticket.
    pub fn cancel(&mut self) {
        self.generation += 1;
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Pair a computed result with its delivery time. Callers should check
    /// [`ValidationSession::is_current`] again when `deliver_at` arrives.
    pub fn complete<T>(&self, ticket: Ticket, result: T, now: Instant) -> Delivery<T> {
        if !self.is_current(&ticket) {
            return Delivery::Stale;
        }
        let earliest = ticket.issued_at + self.min_display;
        Delivery::Ready {
            deliver_at: earliest.max(now),
            result,
        }
    }

    /// Issue a request and compute its result right away.
    pub fn run<T>(&mut self, now: Instant, validate: impl FnOnce() -> T) -> (Ticket, T) {
        let ticket = self.begin(now);
        (ticket, validate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ValidationSession {
        ValidationSession::new(Duration::from_millis(400))
    }

    #[test]
    fn fast_results_wait_for_minimum_display() {
        let mut s = session();
        let t0 = Instant::now();
        let (ticket, result) = s.run(t0, || 42);
        match s.complete(ticket, result, t0 + Duration::from_millis(5)) {
            Delivery::Ready { deliver_at, result } => {
                assert_eq!(deliver_at, t0 + Duration::from_millis(400));
                assert_eq!(result, 42);
            }
            Delivery::Stale => panic!("current ticket reported stale"),
        }
    }

    #[test]
    fn slow_results_are_delivered_immediately() {
        let mut s = session();
        let t0 = Instant::now();
        let ticket = s.begin(t0);
        let late = t0 + Duration::from_secs(2);
        assert_eq!(
            s.complete(ticket, "done", late),
            Delivery::Ready {
                deliver_at: late,
                result: "done"
            }
        );
    }

    #[test]
    fn last_request_wins() {
        let mut s = session();
        let t0 = Instant::now();
        let first = s.begin(t0);
        let second = s.begin(t0 + Duration::from_millis(10));
        assert_eq!(s.complete(first, 1, t0), Delivery::Stale);
        assert!(matches!(s.complete(second, 2, t0), Delivery::Ready { result: 2, .. }));
    }

    #[test]
    fn cancel_discards_pending() {
        let mut s = ValidationSession::from_config(&ValidatorConfig::default());
        let ticket = s.begin(Instant::now());
        s.cancel();
        assert!(!s.is_current(&ticket));
        assert_eq!(s.complete(ticket, (), Instant::now()), Delivery::Stale);
    }
}
