//! WASM entry points for the browser editor.
//!
//! Inputs are JSON strings in the editor's camelCase shape. Every method
//! returns `{status: "ok", result}` or `{status: "error", error}` so the
//! editor never has to catch exceptions.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::ValidatorConfig;
use crate::error::Error;
use crate::parse;
use crate::parse::types::Category;
use crate::rules::RuleTable;
use crate::schema::NodeTypeRegistry;
use crate::suggest::Dismissals;
use crate::validate::{self, Validator};

/// Registry, config and session dismissals, kept alive across calls.
#[wasm_bindgen]
pub struct Engine {
    registry: NodeTypeRegistry,
    config: ValidatorConfig,
    dismissals: Dismissals,
}

#[wasm_bindgen]
impl Engine {
    /// `registry_json`: array of node-type specs. `config_json`: validator
    /// config object (`"{}"` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(registry_json: &str, config_json: &str) -> Result<Engine, JsValue> {
        Engine::load(registry_json, config_json).map_err(|e| to_js(&ErrorDto::from(e)))
    }

    #[wasm_bindgen(js_name = validateGraph)]
    pub fn validate_graph(&self, workflow_json: &str) -> JsValue {
        respond(self.validate_graph_inner(workflow_json))
    }

    #[wasm_bindgen(js_name = validateConnection)]
    pub fn validate_connection(
        &self,
        workflow_json: &str,
        source_id: &str,
        target_id: &str,
        source_handle: Option<String>,
        target_handle: Option<String>,
    ) -> JsValue {
        respond(self.validate_connection_inner(
            workflow_json,
            source_id,
            target_id,
            source_handle.as_deref(),
            target_handle.as_deref(),
        ))
    }

    #[wasm_bindgen(js_name = validateNodeConfig)]
    pub fn validate_node_config(&self, node_json: &str) -> JsValue {
        respond(self.validate_node_config_inner(node_json))
    }

    #[wasm_bindgen(js_name = validateStep)]
    pub fn validate_step(&self, node_type: &str, step_id: &str, values_json: &str) -> JsValue {
        respond(self.validate_step_inner(node_type, step_id, values_json))
    }

    #[wasm_bindgen(js_name = analyzeGraph)]
    pub fn analyze_graph(&self, workflow_json: &str) -> JsValue {
        respond(self.analyze_graph_inner(workflow_json))
    }

    #[wasm_bindgen(js_name = dismissSuggestion)]
    pub fn dismiss_suggestion(&mut self, workflow_id: &str, suggestion_id: &str) {
        self.dismissals.dismiss(workflow_id, suggestion_id);
    }

    #[wasm_bindgen(js_name = suggestConnections)]
    pub fn suggest_connections(&self, workflow_json: &str, node_id: &str) -> JsValue {
        respond(self.suggest_connections_inner(workflow_json, node_id))
    }

    #[wasm_bindgen(js_name = minDisplayMs)]
    pub fn min_display_ms(&self) -> f64 {
        self.config.min_display_ms as f64
    }
}

/// Score and rationale for a category pair from the built-in table.
#[wasm_bindgen(js_name = lookupCompatibility)]
pub fn lookup_compatibility(source_category: &str, target_category: &str) -> JsValue {
    let rule = RuleTable::builtin().lookup(
        &Category::from(source_category),
        &Category::from(target_category),
    );
    to_js(&Response::Ok { result: rule })
}

impl Engine {
    fn load(registry_json: &str, config_json: &str) -> Result<Engine, Error> {
        Ok(Engine {
            registry: NodeTypeRegistry::from_json(registry_json)?,
            config: ValidatorConfig::from_json(config_json)?,
            dismissals: Dismissals::new(),
        })
    }

    fn validator(&self) -> Validator<'_> {
        Validator::builtin(&self.registry, &self.config)
    }

    fn validate_graph_inner(&self, workflow_json: &str) -> Result<validate::GraphReport, Error> {
        let workflow = parse::parse(workflow_json)?;
        Ok(self.validator().validate_graph(&workflow))
    }

    fn validate_connection_inner(
        &self,
        workflow_json: &str,
        source_id: &str,
        target_id: &str,
        source_handle: Option<&str>,
        target_handle: Option<&str>,
    ) -> Result<validate::ConnectionVerdict, Error> {
        let workflow = parse::parse(workflow_json)?;
        Ok(self.validator().validate_connection(
            workflow.node(source_id),
            workflow.node(target_id),
            source_handle,
            target_handle,
        ))
    }

    fn validate_node_config_inner(&self, node_json: &str) -> Result<Vec<validate::FieldError>, Error> {
        let node = parse::parse_node(node_json)?;
        self.validator().validate_node_config(&node)
    }

    fn validate_step_inner(
        &self,
        node_type: &str,
        step_id: &str,
        values_json: &str,
    ) -> Result<Vec<validate::FieldError>, Error> {
        let values: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(values_json).map_err(|e| Error::parse("config values", e))?;
        let spec = self.registry.lookup(node_type)?;
        validate::validate_step(spec, step_id, &values)
    }

    fn analyze_graph_inner(&self, workflow_json: &str) -> Result<Vec<crate::suggest::Suggestion>, Error> {
        let workflow = parse::parse(workflow_json)?;
        let suggestions = self.validator().analyze_graph(&workflow);
        Ok(self.dismissals.retain_active(&workflow.id, suggestions))
    }

    fn suggest_connections_inner(
        &self,
        workflow_json: &str,
        node_id: &str,
    ) -> Result<Vec<crate::suggest::ConnectionSuggestion>, Error> {
        let workflow = parse::parse(workflow_json)?;
        Ok(self.validator().suggest_connections_for(node_id, &workflow))
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize)]
struct ErrorDto {
    code: &'static str,
    message: String,
}

impl From<Error> for ErrorDto {
    fn from(e: Error) -> Self {
        ErrorDto {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Response<T> {
    Ok { result: T },
    Error { error: ErrorDto },
}

impl<T> From<Result<T, Error>> for Response<T> {
    fn from(result: Result<T, Error>) -> Self {
        match result {
            Ok(result) => Response::Ok { result },
            Err(e) => Response::Error { error: e.into() },
        }
    }
}

fn respond<T: Serialize>(result: Result<T, Error>) -> JsValue {
    to_js(&Response::from(result))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"[
        {"id": "webhook", "category": "trigger",
         "ports": [{"id": "out", "direction": "output", "dataType": "object"}]},
        {"id": "sendEmail", "category": "action",
         "ports": [{"id": "in", "direction": "input", "dataType": "object", "required": true}],
         "fields": [{"name": "to", "type": "string", "required": true}],
         "steps": [{"id": "recipient", "fields": ["to"]}]}
    ]"#;

    const WORKFLOW: &str = r#"{
        "id": "wf-1",
        "nodes": [
            {"id": "t1", "category": "trigger", "type": "webhook"},
            {"id": "a1", "category": "action", "type": "sendEmail"}
        ],
        "edges": []
    }"#;

    fn engine() -> Engine {
        Engine::load(REGISTRY, "{}").unwrap()
    }

    #[test]
    fn bad_registry_is_an_error_not_a_panic() {
        let err = Engine::load("[{]", "{}").err().unwrap();
        assert_eq!(ErrorDto::from(err).code, "P001");
    }

    #[test]
    fn connection_through_registry_ports() {
        let verdict = engine()
            .validate_connection_inner(WORKFLOW, "t1", "a1", None, None)
            .unwrap();
        assert!(verdict.is_valid, "{verdict:?}");
        assert_eq!(verdict.score, Some(95));
    }

    #[test]
    fn analysis_respects_dismissals() {
        let mut engine = engine();
        let before = engine.analyze_graph_inner(WORKFLOW).unwrap();
        assert_eq!(before[0].id, "connect-nodes");

        engine.dismiss_suggestion("wf-1", "connect-nodes");
        let after = engine.analyze_graph_inner(WORKFLOW).unwrap();
        assert!(after.iter().all(|s| s.id != "connect-nodes"));
    }

    #[test]
    fn step_validation_and_unknown_types() {
        let engine = engine();
        let errors = engine.validate_step_inner("sendEmail", "recipient", "{}").unwrap();
        assert_eq!(errors[0].message, "to is required");

        let err = engine.validate_step_inner("sendSms", "recipient", "{}").unwrap_err();
        assert_eq!(err.code(), "R001");
        let err = engine.validate_step_inner("sendEmail", "nope", "{}").unwrap_err();
        assert_eq!(err.code(), "R002");
    }

    #[test]
    fn response_shape() {
        let ok: Response<u8> = Ok(3).into();
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({"status": "ok", "result": 3})
        );
        let err: Response<u8> = Err(Error::UnknownNodeType("x".into())).into();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"]["code"], "R001");
    }
}
