//! The prompt index must name exactly the prompts in the sequence, and each
//! name must resolve to the stored prompt itself, after every operation.

use aiconfig_core::AIConfig;
use aiconfig_test_utils::{assert_index_consistent, sample_document, text_prompt};
use proptest::prelude::*;

const NAMES: [&str; 5] = ["a", "b", "c", "d", "e"];

#[derive(Debug, Clone)]
enum Op {
    Add { name: usize, position: Option<usize> },
    Update { name: usize, new_name: usize },
    Delete { name: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..NAMES.len(), proptest::option::of(0..8usize))
            .prop_map(|(name, position)| Op::Add { name, position }),
        (0..NAMES.len(), 0..NAMES.len()).prop_map(|(name, new_name)| Op::Update { name, new_name }),
        (0..NAMES.len()).prop_map(|name| Op::Delete { name }),
    ]
}

/// Apply `op` to both the document and a plain list of names, returning
/// whether the document accepted it
fn apply(config: &mut AIConfig, model: &mut Vec<String>, op: &Op) -> bool {
    match *op {
        Op::Add { name, position } => {
            let name = NAMES[name];
            let accepted = config.add_prompt(name, text_prompt(name, "x"), position).is_ok();
            assert_eq!(accepted, !model.iter().any(|n| n == name));
            if accepted {
                let at = position.map_or(model.len(), |p| p.min(model.len()));
                model.insert(at, name.to_string());
            }
            accepted
        }
        Op::Update { name, new_name } => {
            let (old, new) = (NAMES[name], NAMES[new_name]);
            let accepted = config.update_prompt(old, text_prompt(new, "y")).is_ok();
            let exists = model.iter().position(|n| n == old);
            let clash = old != new && model.iter().any(|n| n == new);
            assert_eq!(accepted, exists.is_some() && !clash);
            if let (true, Some(pos)) = (accepted, exists) {
                model[pos] = new.to_string();
            }
            accepted
        }
        Op::Delete { name } => {
            let name = NAMES[name];
            let accepted = config.delete_prompt(name).is_ok();
            let exists = model.iter().position(|n| n == name);
            assert_eq!(accepted, exists.is_some());
            if let Some(pos) = exists {
                model.remove(pos);
            }
            accepted
        }
    }
}

proptest! {
    #[test]
    fn prop_index_tracks_sequence(ops in proptest::collection::vec(op(), 0..40)) {
        let mut config = AIConfig::new("prop");
        let mut model = Vec::new();

        for op in &ops {
            apply(&mut config, &mut model, op);
            assert_index_consistent(&config);
            prop_assert_eq!(config.prompt_names().collect::<Vec<_>>(), model.clone());
        }
    }

    #[test]
    fn prop_rejected_operations_leave_document_unchanged(ops in proptest::collection::vec(op(), 1..20)) {
        let mut config = AIConfig::new("prop");
        let mut model = Vec::new();

        for op in &ops {
            let before = config.clone();
            if !apply(&mut config, &mut model, op) {
                prop_assert_eq!(&config, &before);
            }
        }
    }
}

#[test]
fn rename_frees_old_key() {
    let mut config = AIConfig::new("doc");
    config.add_prompt("a", text_prompt("a", "first"), None).unwrap();

    config.update_prompt("a", text_prompt("b", "renamed")).unwrap();
    assert!(!config.contains_prompt("a"));
    assert_eq!(config.get_prompt("b").unwrap().raw_prompt_text(), Some("renamed"));

    config.add_prompt("a", text_prompt("a", "second"), None).unwrap();
    assert_eq!(config.prompt_names().collect::<Vec<_>>(), ["b", "a"]);
    assert_index_consistent(&config);
}

#[test]
fn rename_chain_keeps_positions() {
    let mut config = AIConfig::new("doc");
    for name in ["a", "b", "c"] {
        config.add_prompt(name, text_prompt(name, name), None).unwrap();
    }

    config.update_prompt("b", text_prompt("x", "b2")).unwrap();
    config.update_prompt("x", text_prompt("b", "b3")).unwrap();
    config.update_prompt("c", text_prompt("x", "c2")).unwrap();

    assert_eq!(config.prompt_names().collect::<Vec<_>>(), ["a", "b", "x"]);
    assert_eq!(config.get_prompt("x").unwrap().raw_prompt_text(), Some("c2"));
    assert_index_consistent(&config);
}

#[test]
fn loaded_document_index_is_consistent() {
    let mut config = sample_document();
    assert_index_consistent(&config);

    config.delete_prompt("get_activities").unwrap();
    assert_index_consistent(&config);
    assert_eq!(config.get_prompt("gen_itinerary").unwrap().name, "gen_itinerary");
}
