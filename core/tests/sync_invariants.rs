// core/tests/sync_invariants.rs
//
// End-to-end tests for the edit bridge against the scripted engine.
//
// Tests cover:
// - Keystroke sequences that replace provisional fragments (sokuon, n)
// - Host and engine text/cursor agreement after every operation
// - Mid-buffer edits after pointer repositioning
// - Engines that report an explicit deletion direction
// - Memory growth and scratch relocation between calls

use jaime_core::testing::{EngineCall, ScriptedEngine};
use jaime_core::{Config, DeletionDirection, Direction, EditBridge, EditResult, Error};
use pretty_assertions::assert_eq;

fn ready_bridge() -> EditBridge<ScriptedEngine> {
    let mut bridge = EditBridge::new(&Config::default());
    let loader = || -> anyhow::Result<ScriptedEngine> { Ok(ScriptedEngine::new()) };
    bridge.load(&loader).expect("scripted engine loads");
    bridge
}

fn engine(bridge: &mut EditBridge<ScriptedEngine>) -> &mut ScriptedEngine {
    bridge.engine_mut().expect("engine attached")
}

fn assert_in_sync(bridge: &EditBridge<ScriptedEngine>) {
    let engine = bridge.engine().expect("engine attached");
    assert_eq!(bridge.text(), engine.text(), "host text diverged from engine");
    assert_eq!(bridge.cursor(), engine.cursor(), "host cursor diverged from engine");
}

#[test]
fn sokuon_sequence_leaves_only_composed_text() {
    let mut bridge = ready_bridge();
    engine(&mut bridge)
        .script_insert(EditResult::new(0, "t"))
        .script_insert(EditResult::new(1, "っt"))
        .script_insert_with_matches(EditResult::new(2, "って"), ["って", "ッテ"]);

    for key in ["t", "t", "e"] {
        bridge.insert(key).unwrap();
        assert_in_sync(&bridge);
    }

    assert_eq!(bridge.text(), "って");
    assert_eq!(bridge.cursor(), 2);
    assert_eq!(bridge.candidates().candidates(), ["って", "ッテ"]);
    assert_eq!(engine(&mut bridge).received(), ["t", "t", "e"]);
}

#[test]
fn typing_then_committing_a_phrase() {
    let mut bridge = ready_bridge();
    engine(&mut bridge)
        .script_insert_with_matches(EditResult::new(0, "n"), ["ん"])
        .script_insert_with_matches(EditResult::new(1, "に"), ["に", "二"])
        .script_insert_with_matches(EditResult::new(0, "h"), ["に"])
        .script_insert_with_matches(EditResult::new(1, "ほ"), ["日本", "にほ"])
        .script_insert_with_matches(EditResult::new(0, "n"), ["日本"])
        .script_insert_with_matches(EditResult::new(1, "ん"), ["日本", "二本"])
        .script_apply(EditResult::new(3, "日本"));

    for key in "nihonn".chars() {
        bridge.insert(&key.to_string()).unwrap();
        assert_in_sync(&bridge);
    }
    assert_eq!(bridge.text(), "にほん");
    assert_eq!(bridge.candidates().best(), Some("日本"));

    let committed = bridge.commit().unwrap().expect("candidates were pending");
    assert_eq!(committed.inserted, "日本");
    assert_eq!(bridge.text(), "日本");
    assert_eq!(bridge.cursor(), 2);
    assert!(bridge.candidates().is_empty());
    assert_in_sync(&bridge);

    // Nothing pending any more: a second accept does nothing.
    assert_eq!(bridge.commit().unwrap(), None);
    assert_eq!(bridge.text(), "日本");
}

#[test]
fn editing_in_the_middle_after_a_click() {
    let mut bridge = ready_bridge();
    bridge.insert("あいうえお").unwrap();
    bridge.reposition(2).unwrap();
    assert_in_sync(&bridge);

    engine(&mut bridge)
        .script_insert(EditResult::new(0, "k"))
        .script_insert(EditResult::new(1, "か"));
    bridge.insert("k").unwrap();
    bridge.insert("a").unwrap();
    assert_eq!(bridge.text(), "あいかうえお");
    assert_eq!(bridge.cursor(), 3);
    assert_in_sync(&bridge);

    bridge.move_cursor(Direction::Forward).unwrap();
    bridge.delete_back().unwrap();
    assert_eq!(bridge.text(), "あいかえお");
    assert_eq!(bridge.cursor(), 3);
    assert_in_sync(&bridge);
}

#[test]
fn keyboard_moves_clamp_on_both_edges() {
    let mut bridge = ready_bridge();
    bridge.insert("ab").unwrap();
    engine(&mut bridge).clear_calls();

    bridge.move_cursor(Direction::Forward).unwrap();
    assert_eq!(bridge.cursor(), 2);
    for _ in 0..3 {
        bridge.move_cursor(Direction::Backward).unwrap();
    }
    assert_eq!(bridge.cursor(), 0);
    assert_in_sync(&bridge);
    assert_eq!(
        engine(&mut bridge).calls(),
        [
            EngineCall::MoveForward(1),
            EngineCall::MoveBack(1),
            EngineCall::MoveBack(1),
            EngineCall::MoveBack(1),
        ]
    );
}

#[test]
fn click_resync_from_middle_to_start() {
    let mut bridge = ready_bridge();
    bridge.insert("abcde").unwrap();
    bridge.reposition(3).unwrap();
    engine(&mut bridge).clear_calls();

    bridge.reposition(0).unwrap();
    assert_eq!(engine(&mut bridge).calls(), [EngineCall::MoveBack(3)]);
    assert_eq!(bridge.cursor(), 0);

    bridge.reposition(5).unwrap();
    assert_eq!(
        engine(&mut bridge).calls(),
        [EngineCall::MoveBack(3), EngineCall::MoveForward(5)]
    );
    assert_in_sync(&bridge);
}

#[test]
fn explicit_forward_deletion_from_engine() {
    let mut bridge = ready_bridge();
    engine(&mut bridge).report_direction(true);
    bridge.insert("nあ").unwrap();
    bridge.reposition(0).unwrap();

    engine(&mut bridge)
        .script_insert(EditResult::new(1, "ん").with_direction(DeletionDirection::Forward));
    let result = bridge.insert("x").unwrap();
    assert_eq!(result.direction, DeletionDirection::Forward);
    assert_eq!(bridge.text(), "んあ");
    assert_eq!(bridge.cursor(), 1);
    assert_in_sync(&bridge);
}

#[test]
fn survives_memory_growth_and_scratch_relocation() {
    let mut bridge = ready_bridge();
    bridge.insert("か").unwrap();

    engine(&mut bridge)
        .grow_memory(64 * 1024)
        .relocate_input_buffer(60_000);
    bridge.insert("な").unwrap();
    assert_eq!(bridge.text(), "かな");
    assert_in_sync(&bridge);
}

#[test]
fn scratch_too_small_for_payload() {
    let mut bridge = EditBridge::new(&Config {
        scratch_capacity: 4,
        ..Config::default()
    });
    bridge.attach(ScriptedEngine::new()).unwrap();

    // Three bytes of UTF-8 plus the terminator fit exactly.
    bridge.insert("か").unwrap();
    assert!(matches!(
        bridge.insert("かな"),
        Err(Error::BufferOverrun { needed: 7, capacity: 4 })
    ));
    assert_eq!(bridge.text(), "か");
    assert_in_sync(&bridge);
}

#[test]
fn exports_are_listed_after_load() {
    let bridge = ready_bridge();
    let exports = bridge.exports().unwrap();
    assert!(exports.iter().any(|e| e.name == "getInputBufferPointer"));
    assert!(exports.iter().any(|e| e.name == "memory"));
}
