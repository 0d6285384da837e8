//! Submitted responses: question labelling and required-field checks.

use formcraft_blocks::visitor::walk_block;
use formcraft_blocks::{BlockCategory, BlockInstance, FormDocument, Registry, Visitor};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub use formcraft_blocks::render::live::REQUIRED_MESSAGE;

/// Submitted values keyed by block id, in submission order
pub type Submission = Map<String, Value>;

const UNKNOWN_QUESTION: &str = "Unknown Question";

/// Render a submission as `Question: …` / `Answer: …` pairs separated by a
/// blank line
pub fn describe_response(doc: &FormDocument, values: &Submission) -> String {
    let labels = doc.question_labels();
    values
        .iter()
        .map(|(id, value)| {
            let question = labels.get(id).map(String::as_str).unwrap_or(UNKNOWN_QUESTION);
            format!("Question: {}\nAnswer: {}", question, answer_text(value))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn answer_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(answer_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Errors keyed by block id for every required field left blank
pub fn validate_submission(
    doc: &FormDocument,
    registry: &Registry,
    values: &Submission,
) -> BTreeMap<String, String> {
    let mut check = RequiredFields {
        registry,
        values,
        errors: BTreeMap::new(),
    };
    check.visit_document(doc);
    check.errors
}

struct RequiredFields<'a> {
    registry: &'a Registry,
    values: &'a Submission,
    errors: BTreeMap<String, String>,
}

impl Visitor for RequiredFields<'_> {
    fn visit_block(&mut self, block: &BlockInstance, _parent: Option<&BlockInstance>) {
        let is_field = self
            .registry
            .lookup(block.block_type)
            .map(|definition| definition.category() == BlockCategory::Field)
            .unwrap_or(false);

        if is_field && block.is_required() && is_blank(self.values.get(&block.id)) {
            self.errors
                .insert(block.id.clone(), REQUIRED_MESSAGE.to_string());
        }

        walk_block(self, block);
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_blocks::BlockType;
    use serde_json::json;

    fn submission(value: Value) -> Submission {
        match value {
            Value::Object(map) => map,
            _ => Submission::new(),
        }
    }

    fn form() -> FormDocument {
        FormDocument::from_blocks(vec![
            BlockInstance::new("row", BlockType::RowLayout).with_children(vec![
                BlockInstance::new("name", BlockType::TextField)
                    .with_attr("label", "Your name")
                    .with_attr("required", true),
                BlockInstance::new("intro", BlockType::Paragraph).with_attr("label", "Intro"),
            ]),
            BlockInstance::new("when", BlockType::Calendar)
                .with_attr("label", "Date")
                .with_attr("required", true),
        ])
    }

    #[test]
    fn test_describe_response_in_submitted_order() {
        let values = submission(json!({"stray": "x", "name": "Ada"}));
        assert_eq!(
            describe_response(&form(), &values),
            "Question: Unknown Question\nAnswer: x\n\nQuestion: Your name\nAnswer: Ada"
        );
    }

    #[test]
    fn test_required_fields_reported() {
        let values = submission(json!({"name": "   "}));
        let errors = validate_submission(&form(), Registry::builtin(), &values);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name").map(String::as_str), Some(REQUIRED_MESSAGE));
        assert!(errors.contains_key("when"));
    }

    #[test]
    fn test_complete_submission_passes() {
        let values = submission(json!({"name": "Ada", "when": "2024-05-01"}));
        assert!(validate_submission(&form(), Registry::builtin(), &values).is_empty());
    }
}
