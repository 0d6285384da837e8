//! Integration tests for the block model, registry and views

use formcraft_blocks::render::html::{render_html, HtmlOptions};
use formcraft_blocks::render::{property_editor, render_canvas};
use formcraft_blocks::{
    deserialize, serialize, BlockCategory, BlockInstance, BlockType, FormDocument, IdGenerator,
    LiveForm, Registry,
};
use serde_json::json;
use std::collections::BTreeMap;

fn survey() -> anyhow::Result<FormDocument> {
    let registry = Registry::builtin();
    let mut ids = IdGenerator::from_seed("sv");
    let mut doc = FormDocument::seed("Customer survey", "Two minutes, promise.", registry, &mut ids);

    let row = doc.blocks[0]
        .children_mut()
        .ok_or_else(|| anyhow::anyhow!("seed row has no children"))?;
    row.push(registry.create(BlockType::RadioSelect, ids.new_id())?);
    row.push(registry.create(BlockType::StarRating, ids.new_id())?);
    row.push(
        registry
            .create(BlockType::TextField, ids.new_id())?
            .with_attr("required", true)
            .with_attr("label", "Your name"),
    );
    Ok(doc)
}

#[test]
fn test_palette_lists_every_type_once() {
    let registry = Registry::builtin();
    let mut seen = Vec::new();
    for category in [BlockCategory::Field, BlockCategory::Content, BlockCategory::Layout] {
        for definition in registry.list_by_category(category) {
            assert_eq!(definition.category(), category);
            assert!(!definition.palette().label.is_empty());
            seen.push(definition.block_type());
        }
    }
    seen.sort();
    assert_eq!(seen, BlockType::ALL.to_vec());
}

#[test]
fn test_radio_factory_defaults() -> anyhow::Result<()> {
    let block = Registry::builtin().create(BlockType::RadioSelect, "r".into())?;
    assert_eq!(
        serde_json::Value::Object(block.attributes),
        json!({
            "label": "Select an option",
            "options": ["Option 1", "Option 2"],
            "required": false,
            "allowMultiple": false
        })
    );
    Ok(())
}

#[test]
fn test_document_survives_persistence() -> anyhow::Result<()> {
    let doc = survey()?;
    let loaded = deserialize(&serialize(&doc)?, Registry::builtin())?;
    assert_eq!(loaded, doc);
    assert_eq!(loaded.block_count(), 6);
    Ok(())
}

#[test]
fn test_three_views_of_one_document() -> anyhow::Result<()> {
    let registry = Registry::builtin();
    let doc = survey()?;

    let canvas = render_canvas(&doc, registry, None);
    let html = render_html(&canvas, &HtmlOptions::default());
    assert!(html.contains("Customer survey"));
    assert!(html.contains("Option 2"));

    let mut form = LiveForm::build(&doc, registry);
    let mut submitted = BTreeMap::new();
    let mut report = |id: &str, value: &str| {
        submitted.insert(id.to_string(), value.to_string());
    };
    assert!(form.input("sv-4", "Option 2", &mut report));
    assert!(form.input("sv-5", "3", &mut report));
    assert_eq!(submitted.get("sv-4").map(String::as_str), Some("Option 2"));
    assert_eq!(submitted.get("sv-5").map(String::as_str), Some("3"));
    assert_eq!(form.fields().len(), 3);

    let mut editor = property_editor(&doc, registry, "sv-6")
        .ok_or_else(|| anyhow::anyhow!("no editor for sv-6"))?;
    assert_eq!(editor.title(), "Text Field 5");
    let attrs = editor
        .set("placeholder", json!("Ada Lovelace"))
        .ok_or_else(|| anyhow::anyhow!("placeholder rejected"))?;
    assert_eq!(attrs["label"], json!("Your name"));
    assert_eq!(attrs["required"], json!(true));
    Ok(())
}

#[test]
fn test_question_labels_for_responses() -> anyhow::Result<()> {
    let doc = survey()?;
    let labels = doc.question_labels();

    assert_eq!(labels.len(), 5);
    assert_eq!(labels["sv-2"], "Customer survey");
    assert_eq!(labels["sv-6"], "Your name");
    Ok(())
}

#[test]
fn test_loaded_document_without_children_list() -> anyhow::Result<()> {
    let input = json!([{"id": "row", "blockType": "RowLayout"}]).to_string();
    let doc = deserialize(&input, Registry::builtin())?;

    assert_eq!(doc.blocks[0], BlockInstance::new("row", BlockType::RowLayout));
    assert_eq!(
        serialize(&doc)?,
        json!([{"id": "row", "blockType": "RowLayout", "attributes": {}}]).to_string()
    );
    Ok(())
}
