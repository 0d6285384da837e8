//! # Generated Blocks
//!
//! Request context for a form-generation collaborator and the merge of its
//! answer into a tree.
//!
//! The collaborator answers with
//!
//! ```json
//! { "actionType": "addQuestions", "blocks": [ ... ] }
//! ```
//!
//! Nothing in that answer is trusted: every block is checked against the
//! registry, completed from the factory defaults, checked against its
//! schema and given fresh ids before it touches the tree. A response that
//! fails any of these checks is rejected as a whole.

use crate::errors::EditorError;
use crate::mutations::assign_fresh_ids;
use formcraft_blocks::{
    Attributes, BlockId, BlockInstance, BlockType, FormDocument, IdGenerator, Registry,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::str::FromStr;
use tracing::debug;

/// What the collaborator wants done with its blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    /// Append to the existing top-level sequence
    AddQuestions,
    /// Replace the whole top-level sequence
    CreateForm,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::AddQuestions => "addQuestions",
            ActionType::CreateForm => "createForm",
        }
    }
}

impl FromStr for ActionType {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addQuestions" => Ok(ActionType::AddQuestions),
            "createForm" => Ok(ActionType::CreateForm),
            other => Err(EditorError::Generation(format!(
                "unhandled actionType: {other}"
            ))),
        }
    }
}

/// Everything the collaborator is told about the form
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub user_request: String,
    pub form_name: String,
    pub form_description: String,
    pub blocks: FormDocument,
}

impl GenerationRequest {
    pub fn new(
        user_request: impl Into<String>,
        form_name: impl Into<String>,
        form_description: impl Into<String>,
        blocks: FormDocument,
    ) -> Self {
        Self {
            user_request: user_request.into(),
            form_name: form_name.into(),
            form_description: form_description.into(),
            blocks,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    action_type: String,
    #[serde(default)]
    blocks: Vec<Value>,
}

/// Parsed collaborator answer; blocks are still untrusted JSON
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    pub action_type: ActionType,
    pub blocks: Vec<Value>,
}

impl GenerationResponse {
    /// Parse the collaborator's text. A surrounding markdown code fence is
    /// tolerated.
    pub fn parse(text: &str) -> Result<Self, EditorError> {
        let raw: RawResponse = serde_json::from_str(strip_fence(text))
            .map_err(|err| EditorError::Generation(format!("unreadable response: {err}")))?;

        Ok(Self {
            action_type: raw.action_type.parse()?,
            blocks: raw.blocks,
        })
    }
}

fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

/// Turn untrusted blocks into tree-ready instances with ids fresh for `doc`
pub fn prepare_blocks(
    raw: &[Value],
    doc: &FormDocument,
    registry: &Registry,
    ids: &mut IdGenerator,
) -> Result<Vec<BlockInstance>, EditorError> {
    let mut reserved = HashSet::new();
    let mut blocks = Vec::with_capacity(raw.len());

    for value in raw {
        let mut block = prepare_block(value, registry, true)?;
        assign_fresh_ids(&mut block, doc, ids, &mut reserved);
        blocks.push(block);
    }

    Ok(blocks)
}

fn prepare_block(
    value: &Value,
    registry: &Registry,
    top_level: bool,
) -> Result<BlockInstance, EditorError> {
    let reject = |reason: String| EditorError::Generation(reason);

    let object = value
        .as_object()
        .ok_or_else(|| reject("generated block is not an object".into()))?;
    let type_name = object
        .get("blockType")
        .and_then(Value::as_str)
        .ok_or_else(|| reject("generated block has no blockType".into()))?;
    let block_type =
        BlockType::from_str(type_name).map_err(|err| reject(err.to_string()))?;
    let definition = registry
        .lookup(block_type)
        .map_err(|err| reject(err.to_string()))?;

    // Ids are replaced later; the placeholder never reaches a tree
    let mut block = definition.create_instance(BlockId::new());
    let schema = definition.schema();

    if let Some(Value::Object(given)) = object.get("attributes") {
        let mut accepted = Attributes::new();
        for (name, value) in given {
            if schema.field(name).is_some() {
                accepted.insert(name.clone(), value.clone());
            } else {
                debug!(block_type = %block_type, field = %name, "dropping unknown generated attribute");
            }
        }
        block.attributes.extend(accepted);
    }

    schema
        .check_shape(&block.attributes)
        .map_err(|err| reject(format!("generated {block_type}: {err}")))?;

    let children = match object.get("childblocks") {
        Some(Value::Array(children)) => children.as_slice(),
        _ => &[],
    };
    if !children.is_empty() {
        if !top_level || !definition.accepts_children() {
            return Err(reject(format!(
                "generated {block_type} cannot hold child blocks"
            )));
        }
        let prepared = children
            .iter()
            .map(|child| prepare_block(child, registry, false))
            .collect::<Result<Vec<_>, _>>()?;
        if prepared.iter().any(|child| registry.is_layout(child.block_type)) {
            return Err(reject(format!(
                "generated {block_type} holds a nested layout"
            )));
        }
        block.childblocks = Some(prepared);
    }

    block.is_locked = false;
    Ok(block)
}

/// The tree after merging prepared blocks
pub fn merge(doc: &FormDocument, action: ActionType, blocks: Vec<BlockInstance>) -> FormDocument {
    match action {
        ActionType::AddQuestions => {
            let mut merged = doc.clone();
            merged.blocks.extend(blocks);
            merged
        }
        ActionType::CreateForm => FormDocument::from_blocks(blocks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_fenced_response() {
        let text = "```json\n{\"actionType\": \"createForm\", \"blocks\": []}\n```";
        let response = GenerationResponse::parse(text).unwrap();
        assert_eq!(response.action_type, ActionType::CreateForm);
        assert!(response.blocks.is_empty());
    }

    #[test]
    fn test_unknown_action_rejected() {
        let err = GenerationResponse::parse(r#"{"actionType": "rewrite", "blocks": []}"#)
            .unwrap_err();
        assert!(err.to_string().contains("rewrite"));
    }

    #[test]
    fn test_missing_attributes_completed_from_defaults() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::from_seed("g");
        let raw = vec![json!({
            "id": "x1",
            "blockType": "RadioSelect",
            "attributes": {"label": "Favourite colour", "bogus": 1},
            "isLocked": true
        })];

        let blocks = prepare_blocks(&raw, &FormDocument::new(), registry, &mut ids).unwrap();

        let radio = &blocks[0];
        assert_eq!(radio.id, "g-1");
        assert!(!radio.is_locked);
        assert_eq!(radio.label(), Some("Favourite colour"));
        assert_eq!(radio.attr_list("options"), vec!["Option 1", "Option 2"]);
        assert!(radio.attr("bogus").is_none());
    }

    #[test]
    fn test_children_get_fresh_ids() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::from_seed("g");
        let doc = FormDocument::from_blocks(vec![BlockInstance::new("g-1", BlockType::Heading)]);
        let raw = vec![json!({
            "id": "row",
            "blockType": "RowLayout",
            "childblocks": [
                {"id": "row", "blockType": "TextField"},
                {"id": "row", "blockType": "Calendar"}
            ]
        })];

        let blocks = prepare_blocks(&raw, &doc, registry, &mut ids).unwrap();
        let merged = merge(&doc, ActionType::AddQuestions, blocks);

        assert_eq!(merged.ids(), vec!["g-1", "g-2", "g-3", "g-4"]);
        assert!(merged.duplicate_ids().is_empty());
    }

    #[test]
    fn test_invalid_generated_blocks_rejected() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::from_seed("g");

        for raw in [
            json!({"blockType": "Slider"}),
            json!({"blockType": "TextField", "childblocks": [{"blockType": "Heading"}]}),
            json!({"blockType": "RowLayout", "childblocks": [{"blockType": "RowLayout"}]}),
            json!({"blockType": "StarRating", "attributes": {"maxStars": "five"}}),
            json!("TextField"),
        ] {
            let result = prepare_blocks(&[raw.clone()], &FormDocument::new(), registry, &mut ids);
            assert!(
                matches!(result, Err(EditorError::Generation(_))),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn test_create_form_replaces_sequence() {
        let doc = FormDocument::from_blocks(vec![BlockInstance::new("old", BlockType::Heading)]);
        let merged = merge(
            &doc,
            ActionType::CreateForm,
            vec![BlockInstance::new("new", BlockType::TextField)],
        );
        assert_eq!(merged.ids(), vec!["new"]);
    }

    #[test]
    fn test_request_is_camel_case() {
        let request = GenerationRequest::new("add an email field", "Signup", "", FormDocument::new());
        let json = request.to_json().unwrap();
        assert!(json.contains("\"userRequest\":\"add an email field\""));
        assert!(json.contains("\"formName\":\"Signup\""));
        assert!(json.contains("\"blocks\":[]"));
    }

    #[test]
    fn test_request_blocks_match_persisted_form() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::from_seed("r");
        let form = FormDocument::seed("Signup", "Join us", registry, &mut ids);
        let persisted: Value =
            serde_json::from_str(&formcraft_blocks::serialize(&form).unwrap()).unwrap();

        let request = GenerationRequest::new("add a rating", "Signup", "Join us", form);
        let sent: Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();

        assert_eq!(sent["blocks"], persisted);
    }
}
