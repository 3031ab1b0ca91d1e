use serde::Serialize;

use super::scene::{Action, Scene};
use super::stats::PlayerStats;

/// View of one action as offered to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub key: String,
    pub label: String,
    pub hint: String,
    pub enabled: bool,
}

impl From<&Action> for Choice {
    fn from(action: &Action) -> Self {
        Self {
            key: action.key.clone(),
            label: action.label.clone(),
            hint: action.hint.clone(),
            // The core never disables a choice on its own.
            enabled: true,
        }
    }
}

/// Per-turn snapshot handed to a presentation layer.
///
/// Every value is owned, so nothing here aliases engine internals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub chapter_id: String,
    pub scene_id: String,
    pub text: String,
    /// Absolute path, or empty when the scene has no image.
    pub image_path: String,
    pub choices: Vec<Choice>,
    pub stats: PlayerStats,
}

impl GameState {
    pub fn from_scene(chapter_id: &str, scene: &Scene, stats: PlayerStats) -> Self {
        Self {
            chapter_id: chapter_id.to_string(),
            scene_id: scene.id.clone(),
            text: scene.text.clone(),
            image_path: scene.image.clone(),
            choices: scene.actions.iter().map(Choice::from).collect(),
            stats,
        }
    }

    pub fn choice(&self, key: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.key == key)
    }
}
