/// Engine configuration, loaded from RON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema::stats::PlayerStats;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Where content lives and how a playthrough starts.
///
/// Every field is optional in the file:
///
/// ```ron
/// (
///     content_root: "chapters",
///     default_chapter: "chapter_01",
///     initial_stats: (stress: 40),
///     cache_scenes: false,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub content_root: PathBuf,
    pub default_chapter: String,
    pub initial_stats: PlayerStats,
    /// Memoize resolved scenes. Leave off while editing content.
    pub cache_scenes: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("chapters"),
            default_chapter: "chapter_01".to_string(),
            initial_stats: PlayerStats::default(),
            cache_scenes: false,
        }
    }
}

impl EngineConfig {
    pub fn load_from_ron(path: &Path) -> Result<EngineConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<EngineConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }
}
