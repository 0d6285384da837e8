//! Tree invariants under sequences of mutations

use formcraft_blocks::{
    deserialize, serialize, BlockInstance, BlockType, FormDocument, IdGenerator, Registry,
};
use formcraft_editor::{Mutation, MutationContext, MutationError, MutationOutcome};

fn seeded(seed: &str) -> (FormDocument, IdGenerator) {
    let mut ids = IdGenerator::from_seed(seed);
    let doc = FormDocument::seed("", "", Registry::builtin(), &mut ids);
    (doc, ids)
}

fn apply(
    mutation: &Mutation,
    doc: &mut FormDocument,
    ids: &mut IdGenerator,
) -> Result<MutationOutcome, MutationError> {
    let mut ctx = MutationContext::new(Registry::builtin(), ids);
    mutation.apply(doc, &mut ctx)
}

/// Deterministic mix of every mutation kind, driven by a small LCG
fn scripted_mutations(doc: &FormDocument, step: u64) -> Mutation {
    let state = step
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    let pick = |n: usize| (state >> 33) as usize % n.max(1);
    let top = doc.blocks.len();
    let row = doc
        .blocks
        .iter()
        .find(|b| b.block_type == BlockType::RowLayout)
        .map(|b| b.id.clone())
        .unwrap_or_default();
    let any_id = doc.ids().get(pick(doc.block_count())).cloned().unwrap_or_default();
    let block_type = BlockType::ALL[pick(BlockType::ALL.len())];

    match step % 7 {
        0 => Mutation::InsertTopLevel {
            block_type,
            index: pick(top + 2),
        },
        1 => Mutation::InsertChild {
            parent_id: row,
            block_type,
            index: pick(4),
        },
        2 => Mutation::Duplicate { block_id: any_id },
        3 => Mutation::MoveTopLevel {
            from_index: pick(top),
            to_index: pick(top + 1),
        },
        4 => Mutation::ReparentToChild {
            block_id: doc.blocks.last().map(|b| b.id.clone()).unwrap_or_default(),
            from_index: top.saturating_sub(1),
            parent_id: row,
            index: pick(3),
        },
        5 => Mutation::MoveChild {
            parent_id: row,
            from_index: 0,
            to_index: pick(4),
        },
        _ => Mutation::Remove { block_id: any_id },
    }
}

#[test]
fn test_ids_stay_unique_under_any_sequence() {
    let (mut doc, mut ids) = seeded("p");

    for step in 0..300 {
        let mutation = scripted_mutations(&doc, step);
        let before = doc.clone();
        if apply(&mutation, &mut doc, &mut ids).is_err() {
            assert_eq!(doc, before, "failed {mutation:?} changed the tree");
        }
        assert!(
            doc.duplicate_ids().is_empty(),
            "duplicate ids after {mutation:?}"
        );
        for block in &doc.blocks {
            for child in block.children() {
                assert!(child.children().is_empty(), "nested too deep after {mutation:?}");
            }
        }
    }
}

#[test]
fn test_duplicate_then_remove_is_identity() {
    let (mut doc, mut ids) = seeded("d");
    apply(
        &Mutation::InsertTopLevel {
            block_type: BlockType::RowLayout,
            index: 1,
        },
        &mut doc,
        &mut ids,
    )
    .unwrap();
    let row = doc.blocks[1].id.clone();
    for block_type in [BlockType::Select, BlockType::Calendar] {
        apply(
            &Mutation::InsertChild {
                parent_id: row.clone(),
                block_type,
                index: 9,
            },
            &mut doc,
            &mut ids,
        )
        .unwrap();
    }

    for target in doc.ids().into_iter().skip(1) {
        let before = doc.clone();
        let copy = match apply(&Mutation::Duplicate { block_id: target.clone() }, &mut doc, &mut ids) {
            Ok(outcome) => outcome.block_id().map(str::to_string).unwrap(),
            Err(MutationError::BlockLocked(_)) => continue,
            Err(err) => panic!("duplicate {target}: {err}"),
        };
        assert_ne!(copy, target);

        apply(&Mutation::Remove { block_id: copy }, &mut doc, &mut ids).unwrap();
        assert_eq!(doc, before, "duplicate + remove of {target}");
    }
}

#[test]
fn test_layout_holding_locked_child_is_not_duplicated() {
    let mut doc = FormDocument::from_blocks(vec![BlockInstance::new("row", BlockType::RowLayout)
        .with_children(vec![
            BlockInstance::new("title", BlockType::Heading).locked(),
            BlockInstance::new("name", BlockType::TextField),
        ])]);
    let mut ids = IdGenerator::from_seed("p");
    let before = serialize(&doc).unwrap();

    let err = apply(&Mutation::Duplicate { block_id: "row".into() }, &mut doc, &mut ids)
        .unwrap_err();
    assert_eq!(err, MutationError::BlockLocked("row".into()));
    assert_eq!(serialize(&doc).unwrap(), before);

    // Unlocked children of the same layout still duplicate and remove cleanly
    let copy = apply(&Mutation::Duplicate { block_id: "name".into() }, &mut doc, &mut ids)
        .unwrap()
        .block_id()
        .map(str::to_string)
        .unwrap();
    apply(&Mutation::Remove { block_id: copy }, &mut doc, &mut ids).unwrap();
    assert_eq!(serialize(&doc).unwrap(), before);
}

#[test]
fn test_duplicate_layout_renames_descendants() {
    let mut doc = FormDocument::from_blocks(vec![BlockInstance::new("row", BlockType::RowLayout)
        .with_children(vec![
            BlockInstance::new("a", BlockType::TextField),
            BlockInstance::new("b", BlockType::TextArea),
        ])]);
    let mut ids = IdGenerator::from_seed("n");

    apply(&Mutation::Duplicate { block_id: "row".into() }, &mut doc, &mut ids).unwrap();

    assert_eq!(doc.ids(), vec!["row", "a", "b", "n-1", "n-2", "n-3"]);
}

#[test]
fn test_locked_blocks_cannot_be_removed_or_duplicated() {
    let (mut doc, mut ids) = seeded("l");
    let locked = doc.blocks[0].id.clone();
    let before = serialize(&doc).unwrap();

    for mutation in [
        Mutation::Remove {
            block_id: locked.clone(),
        },
        Mutation::Duplicate {
            block_id: locked.clone(),
        },
    ] {
        let err = apply(&mutation, &mut doc, &mut ids).unwrap_err();
        assert_eq!(err, MutationError::BlockLocked(locked.clone()));
        assert_eq!(serialize(&doc).unwrap(), before);
    }
}

#[test]
fn test_insert_child_into_field_fails() {
    let (mut doc, mut ids) = seeded("i");
    apply(
        &Mutation::InsertTopLevel {
            block_type: BlockType::TextField,
            index: 1,
        },
        &mut doc,
        &mut ids,
    )
    .unwrap();
    let field = doc.blocks[1].id.clone();
    let before = doc.clone();

    let err = apply(
        &Mutation::InsertChild {
            parent_id: field.clone(),
            block_type: BlockType::Heading,
            index: 0,
        },
        &mut doc,
        &mut ids,
    )
    .unwrap_err();

    assert_eq!(err, MutationError::NotALayoutBlock(field));
    assert_eq!(doc, before);
}

#[test]
fn test_move_child_first_to_last() {
    let mut doc = FormDocument::from_blocks(vec![BlockInstance::new("row", BlockType::RowLayout)
        .with_children(vec![
            BlockInstance::new("a", BlockType::Heading),
            BlockInstance::new("b", BlockType::Paragraph),
            BlockInstance::new("c", BlockType::TextField),
        ])]);
    let mut ids = IdGenerator::from_seed("m");

    let outcome = apply(
        &Mutation::MoveChild {
            parent_id: "row".into(),
            from_index: 0,
            to_index: 2,
        },
        &mut doc,
        &mut ids,
    )
    .unwrap();

    assert_eq!(outcome.block_id(), Some("a"));
    assert_eq!(doc.ids(), vec!["row", "b", "c", "a"]);
}

#[test]
fn test_out_of_range_targets_are_clamped() {
    let (mut doc, mut ids) = seeded("c");
    let row = doc.blocks[0].id.clone();

    apply(
        &Mutation::MoveChild {
            parent_id: row.clone(),
            from_index: 0,
            to_index: 50,
        },
        &mut doc,
        &mut ids,
    )
    .unwrap();

    let children: Vec<_> = doc.blocks[0].children().iter().map(|c| c.id.clone()).collect();
    assert_eq!(children, vec!["c-3", "c-2"]);
}

#[test]
fn test_round_trip_after_mutations() {
    let (mut doc, mut ids) = seeded("r");
    for step in 0..60 {
        let _ = apply(&scripted_mutations(&doc, step), &mut doc, &mut ids);
    }

    let restored = deserialize(&serialize(&doc).unwrap(), Registry::builtin()).unwrap();
    assert_eq!(restored, doc);
}
