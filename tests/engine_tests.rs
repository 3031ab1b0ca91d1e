/// Engine integration tests — playthroughs, choice dispatch, and failure policy.

use chapter_engine::core::engine::GameEngine;
use chapter_engine::core::resolver::{ContentError, ContentResolver};
use chapter_engine::{EngineConfig, PlayerStats};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

fn chapter(manifest: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("c1");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("manifest.json"), manifest).unwrap();
    dir
}

fn engine(dir: &TempDir) -> GameEngine {
    GameEngine::builder("c1")
        .content_root(dir.path())
        .build()
        .unwrap()
}

const SIMPLE: &str = r#"{
    "scenes": {
        "a": {
            "text": "A",
            "actions": [ { "key": "x", "label": "Go", "goto": "b", "effects": { "stress": 5 } } ]
        },
        "b": { "text": "B" }
    }
}"#;

#[test]
fn bundled_chapter_playthrough() {
    let config = EngineConfig::default();
    let mut engine = GameEngine::from_config(&config).unwrap();

    let state = engine.start().unwrap();
    assert_eq!(state.chapter_id, "chapter_01");
    assert_eq!(state.scene_id, "alarm");
    assert_eq!(state.choices.len(), 2);
    assert_eq!(state.choices[0].hint, "Ten more minutes can't hurt.");

    let state = engine.choose("get_up").unwrap();
    assert_eq!(state.scene_id, "kitchen");
    assert_eq!(state.stats.sleep, 60);
    assert_eq!(state.stats.energy, 50);

    let state = engine.choose("breakfast").unwrap();
    assert_eq!(state.scene_id, "campus");
    assert_eq!(state.stats.energy, 70);
    assert_eq!(state.stats.stress, 25);
    assert!(state.choices.is_empty());
    assert!(state.image_path.is_empty());
}

#[test]
fn choice_adds_effects_and_follows_goto() {
    let dir = chapter(SIMPLE);
    let mut engine = engine(&dir);
    assert_eq!(engine.stats().stress, 30);

    let state = engine.choose("x").unwrap();
    assert_eq!(state.stats.stress, 35);
    assert_eq!(state.scene_id, "b");
    assert_eq!(state.text, "B");
}

#[test]
fn unknown_key_keeps_scene_and_stats() {
    let dir = chapter(SIMPLE);
    let mut engine = engine(&dir);
    let before = engine.start().unwrap();

    let state = engine.choose("y").unwrap();
    assert_eq!(state.scene_id, "a");
    assert_eq!(state.stats, before.stats);
    assert_eq!(state, before);
    assert_eq!(engine.scene_id(), "a");
}

#[test]
fn dead_end_scene_ignores_every_key() {
    let dir = chapter(SIMPLE);
    let mut engine = engine(&dir);
    engine.choose("x").unwrap();

    let state = engine.choose("x").unwrap();
    assert_eq!(state.scene_id, "b");
    assert_eq!(state.stats.stress, 35);
}

#[test]
fn dangling_goto_raises_scene_not_found() {
    let dir = chapter(
        r#"{ "scenes": {
            "a": { "actions": [ { "key": "x", "label": "Into the void", "goto": "ghost",
                                  "effects": { "focus": -10 } } ] }
        } }"#,
    );
    let mut engine = engine(&dir);

    let err = engine.choose("x").unwrap_err();
    assert!(matches!(err, ContentError::SceneNotFound { ref scene, .. } if scene == "ghost"));
    assert!(err.to_string().contains("ghost"));

    // No rollback: the position and effects stay applied.
    assert_eq!(engine.scene_id(), "ghost");
    assert_eq!(engine.stats().focus, 60);
    assert!(matches!(engine.start(), Err(ContentError::SceneNotFound { .. })));
}

#[test]
fn dangling_entry_scene_surfaces_on_start() {
    let dir = chapter(r#"{ "entry_scene": "missing", "scenes": { "a": {} } }"#);
    let engine = engine(&dir);
    assert_eq!(engine.scene_id(), "missing");
    assert!(matches!(engine.start(), Err(ContentError::SceneNotFound { .. })));
}

#[test]
fn broken_manifest_fails_construction() {
    let dir = chapter(r#"{ "scenes": {} }"#);
    let err = GameEngine::builder("c1")
        .content_root(dir.path())
        .build()
        .unwrap_err();
    assert!(matches!(err, ContentError::ManifestInvalid { .. }));

    let dir = chapter("not json");
    let err = GameEngine::builder("c1")
        .content_root(dir.path())
        .build()
        .unwrap_err();
    assert!(matches!(err, ContentError::ManifestInvalid { .. }));
}

#[test]
fn invalid_scene_propagates_from_choose() {
    let dir = chapter(
        r#"{ "scenes": {
            "a": { "actions": [ { "key": "x", "label": "Go", "goto": "b" } ] },
            "b": { "actions": [ { "key": "y", "label": "Broken", "goto": "a", "effects": { "sleep": "lots" } } ] }
        } }"#,
    );
    let mut engine = engine(&dir);
    let err = engine.choose("x").unwrap_err();
    assert!(matches!(err, ContentError::ManifestInvalid { ref scene, .. } if scene.as_deref() == Some("b")));
}

#[test]
fn cached_engine_plays_the_same() {
    let dir = chapter(SIMPLE);
    let mut engine = GameEngine::builder("c1")
        .with_resolver(ContentResolver::cached(dir.path()))
        .build()
        .unwrap();
    assert!(engine.resolver().is_caching());
    assert_eq!(engine.start().unwrap().scene_id, "a");
    assert_eq!(engine.choose("x").unwrap().stats.stress, 35);
}

fn delta_chapter(sleep: i64, energy: i64, focus: i64, stress: i64) -> TempDir {
    chapter(&format!(
        r#"{{ "scenes": {{
            "a": {{ "actions": [ {{ "key": "go", "label": "Go", "goto": "a",
                "effects": {{ "sleep": {}, "energy": {}, "focus": {}, "stress": {} }} }} ] }}
        }} }}"#,
        sleep, energy, focus, stress
    ))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn matching_choice_adds_exact_deltas(
        sleep in -1000i64..1000,
        energy in -1000i64..1000,
        focus in -1000i64..1000,
        stress in -1000i64..1000,
    ) {
        let dir = delta_chapter(sleep, energy, focus, stress);
        let mut engine = engine(&dir);
        let before = engine.stats();

        let state = engine.choose("go").unwrap();
        prop_assert_eq!(state.scene_id.as_str(), "a");
        prop_assert_eq!(
            state.stats,
            PlayerStats {
                sleep: before.sleep + sleep,
                energy: before.energy + energy,
                focus: before.focus + focus,
                stress: before.stress + stress,
            }
        );
    }

    #[test]
    fn unmatched_key_is_a_no_op(key in "[a-z]{1,8}") {
        prop_assume!(key != "x");
        let dir = chapter(SIMPLE);
        let mut engine = engine(&dir);
        let before = engine.start().unwrap();

        let state = engine.choose(&key).unwrap();
        prop_assert_eq!(state.scene_id, before.scene_id);
        prop_assert_eq!(state.stats, before.stats);
    }
}
