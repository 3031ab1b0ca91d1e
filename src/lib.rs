//! Chapter Engine — narrative state for branching story games.
//!
//! Resolves a chapter's declarative scene graph (a JSON manifest plus
//! optional text files) into immutable scenes, and plays it: the engine
//! holds the current scene and a small stat vector, applies choice
//! effects, and hands back a [`GameState`] snapshot per turn.

pub mod core;
pub mod schema;

pub use crate::core::config::EngineConfig;
pub use crate::core::engine::GameEngine;
pub use crate::core::resolver::{ContentError, ContentResolver};
pub use crate::schema::scene::{Action, Effects, Scene};
pub use crate::schema::state::{Choice, GameState};
pub use crate::schema::stats::PlayerStats;
