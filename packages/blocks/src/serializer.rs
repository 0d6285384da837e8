//! # Persisted Document Format
//!
//! A form is stored as one JSON array of blocks (`jsonBlocks`):
//!
//! ```json
//! [{"id": "a-1", "blockType": "RowLayout", "attributes": {},
//!   "isLocked": true, "childblocks": [...]}]
//! ```
//!
//! Loading checks everything the editor relies on: block types are
//! registered, only layouts carry children, nesting stays within
//! [`MAX_DEPTH`], attributes have the shape their schema declares and ids
//! are unique. A legacy document with duplicate ids can be brought back
//! with [`migrate_duplicate_ids`].

use crate::block::{Attributes, BlockInstance, BlockType};
use crate::document::{FormDocument, MAX_DEPTH};
use crate::error::DeserializeError;
use crate::id_generator::IdGenerator;
use crate::registry::Registry;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    id: String,
    block_type: String,
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    childblocks: Option<Vec<RawBlock>>,
    #[serde(default)]
    is_locked: bool,
}

pub fn serialize(doc: &FormDocument) -> serde_json::Result<String> {
    serde_json::to_string(doc)
}

pub fn serialize_pretty(doc: &FormDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(doc)
}

pub fn deserialize(input: &str, registry: &Registry) -> Result<FormDocument, DeserializeError> {
    let doc = parse(input, registry)?;

    if let Some(id) = doc.duplicate_ids().into_iter().next() {
        warn!(id = %id, "document has duplicate block ids");
        return Err(DeserializeError::DuplicateId(id));
    }

    debug!(blocks = doc.block_count(), "document loaded");
    Ok(doc)
}

/// Load a document written by a writer that could repeat ids, giving every
/// repeated block a fresh id. Returns the document and how many blocks were
/// renamed.
pub fn migrate_duplicate_ids(
    input: &str,
    registry: &Registry,
    ids: &mut IdGenerator,
) -> Result<(FormDocument, usize), DeserializeError> {
    let mut doc = parse(input, registry)?;
    let repaired = doc.repair_duplicate_ids(ids);
    if repaired > 0 {
        warn!(repaired, "renamed blocks with duplicate ids");
    }
    Ok((doc, repaired))
}

fn parse(input: &str, registry: &Registry) -> Result<FormDocument, DeserializeError> {
    let raw: Vec<RawBlock> =
        serde_json::from_str(input).map_err(|e| DeserializeError::Malformed(e.to_string()))?;

    let blocks = raw
        .into_iter()
        .map(|block| convert(block, 1, registry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FormDocument::from_blocks(blocks))
}

fn convert(
    raw: RawBlock,
    depth: usize,
    registry: &Registry,
) -> Result<BlockInstance, DeserializeError> {
    let unknown = || DeserializeError::UnknownBlockType {
        id: raw.id.clone(),
        block_type: raw.block_type.clone(),
    };
    let block_type: BlockType = raw.block_type.parse().map_err(|_| unknown())?;
    let definition = registry.lookup(block_type).map_err(|_| unknown())?;

    definition
        .schema()
        .check_shape(&raw.attributes)
        .map_err(|source| DeserializeError::NonConformingAttributes {
            id: raw.id.clone(),
            source,
        })?;

    // Layouts only live at top level, whatever they hold
    if definition.accepts_children() && depth >= MAX_DEPTH {
        return Err(DeserializeError::NestingTooDeep(raw.id));
    }

    let childblocks = match raw.childblocks {
        None => None,
        Some(children) if children.is_empty() => Some(Vec::new()),
        Some(children) => {
            if !definition.accepts_children() {
                return Err(DeserializeError::ChildrenOnNonLayout(raw.id));
            }
            if depth >= MAX_DEPTH {
                return Err(DeserializeError::NestingTooDeep(children[0].id.clone()));
            }
            Some(
                children
                    .into_iter()
                    .map(|child| convert(child, depth + 1, registry))
                    .collect::<Result<Vec<_>, _>>()?,
            )
        }
    };

    Ok(BlockInstance {
        id: raw.id,
        block_type,
        attributes: raw.attributes,
        childblocks,
        is_locked: raw.is_locked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load(value: serde_json::Value) -> Result<FormDocument, DeserializeError> {
        deserialize(&value.to_string(), Registry::builtin())
    }

    #[test]
    fn test_round_trip_of_seed_document() {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::from_seed("rt");
        let mut doc = FormDocument::seed("Survey", "", registry, &mut ids);
        doc.blocks
            .push(registry.create(BlockType::Media, ids.new_id()).unwrap());

        let text = serialize(&doc).unwrap();
        assert_eq!(deserialize(&text, registry).unwrap(), doc);
        assert_eq!(deserialize(&serialize_pretty(&doc).unwrap(), registry).unwrap(), doc);
    }

    #[test]
    fn test_malformed_input() {
        let err = deserialize("{not json", Registry::builtin()).unwrap_err();
        assert!(matches!(err, DeserializeError::Malformed(_)));

        let err = load(json!([{"blockType": "Heading"}])).unwrap_err();
        assert!(matches!(err, DeserializeError::Malformed(_)));
    }

    #[test]
    fn test_unknown_block_type() {
        let err = load(json!([{"id": "a", "blockType": "Slider"}])).unwrap_err();
        assert_eq!(
            err,
            DeserializeError::UnknownBlockType {
                id: "a".into(),
                block_type: "Slider".into()
            }
        );
    }

    #[test]
    fn test_duplicate_ids_fail_hard() {
        let err = load(json!([
            {"id": "a", "blockType": "RowLayout", "childblocks": [
                {"id": "a", "blockType": "Heading", "attributes": {"label": "Hi"}}
            ]}
        ]))
        .unwrap_err();
        assert_eq!(err, DeserializeError::DuplicateId("a".into()));
    }

    #[test]
    fn test_structure_rules() {
        let err = load(json!([
            {"id": "t", "blockType": "TextField",
             "attributes": {"label": "Name", "required": false},
             "childblocks": [{"id": "c", "blockType": "RowLayout"}]}
        ]))
        .unwrap_err();
        assert_eq!(err, DeserializeError::ChildrenOnNonLayout("t".into()));

        let err = load(json!([
            {"id": "r1", "blockType": "RowLayout", "childblocks": [
                {"id": "r2", "blockType": "RowLayout", "childblocks": [
                    {"id": "h", "blockType": "Heading", "attributes": {"label": "Deep"}}
                ]}
            ]}
        ]))
        .unwrap_err();
        assert_eq!(err, DeserializeError::NestingTooDeep("r2".into()));

        // An empty layout is still a layout
        for nested in [json!([]), json!(null)] {
            let err = load(json!([
                {"id": "r1", "blockType": "RowLayout", "childblocks": [
                    {"id": "r2", "blockType": "RowLayout", "childblocks": nested}
                ]}
            ]))
            .unwrap_err();
            assert_eq!(err, DeserializeError::NestingTooDeep("r2".into()));
        }
    }

    #[test]
    fn test_attribute_shape_is_checked() {
        let err = load(json!([
            {"id": "s", "blockType": "Select", "attributes": {"label": "Pick", "required": "yes", "options": []}}
        ]))
        .unwrap_err();
        match err {
            DeserializeError::NonConformingAttributes { id, source } => {
                assert_eq!(id, "s");
                assert_eq!(source.field_names(), vec!["required"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_migration_renames_duplicates() {
        let input = json!([
            {"id": "a", "blockType": "Heading", "attributes": {"label": "One"}},
            {"id": "a", "blockType": "Heading", "attributes": {"label": "Two"}}
        ])
        .to_string();
        let mut ids = IdGenerator::from_seed("m");

        let (doc, repaired) = migrate_duplicate_ids(&input, Registry::builtin(), &mut ids).unwrap();
        assert_eq!(repaired, 1);
        assert_eq!(doc.ids(), vec!["a", "m-1"]);
    }
}
