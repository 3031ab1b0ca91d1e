/// The game engine: current scene, player stats, and choice dispatch.

use std::path::PathBuf;
use tracing::{info, warn};

use crate::core::config::EngineConfig;
use crate::core::resolver::{ContentError, ContentResolver};
use crate::schema::scene::Scene;
use crate::schema::state::GameState;
use crate::schema::stats::PlayerStats;

/// Everything that changes during a playthrough.
#[derive(Debug, Clone)]
struct EngineState {
    scene_id: String,
    stats: PlayerStats,
}

/// Plays one chapter. Built via `GameEngine::builder()` or
/// [`GameEngine::from_config`].
///
/// The only mutation surface is [`GameEngine::choose`]. Every
/// [`GameState`] returned is an owned snapshot.
#[derive(Debug)]
pub struct GameEngine {
    resolver: ContentResolver,
    chapter_id: String,
    state: EngineState,
}

/// Builder for constructing a `GameEngine`.
pub struct GameEngineBuilder {
    chapter_id: String,
    content_root: PathBuf,
    stats: PlayerStats,
    cache_scenes: bool,
    /// Directly provided resolver, overriding `content_root`/`cache_scenes`.
    resolver: Option<ContentResolver>,
}

impl GameEngine {
    pub fn builder(chapter_id: &str) -> GameEngineBuilder {
        let defaults = EngineConfig::default();
        GameEngineBuilder {
            chapter_id: chapter_id.to_string(),
            content_root: defaults.content_root,
            stats: defaults.initial_stats,
            cache_scenes: defaults.cache_scenes,
            resolver: None,
        }
    }

    /// Start the configured default chapter.
    pub fn from_config(config: &EngineConfig) -> Result<GameEngine, ContentError> {
        GameEngine::builder(&config.default_chapter)
            .content_root(config.content_root.clone())
            .stats(config.initial_stats)
            .cache_scenes(config.cache_scenes)
            .build()
    }

    pub fn chapter_id(&self) -> &str {
        &self.chapter_id
    }

    pub fn scene_id(&self) -> &str {
        &self.state.scene_id
    }

    pub fn stats(&self) -> PlayerStats {
        self.state.stats
    }

    pub fn resolver(&self) -> &ContentResolver {
        &self.resolver
    }

    /// Snapshot of the current scene. Mutates nothing.
    pub fn start(&self) -> Result<GameState, ContentError> {
        self.build_state(&self.state.scene_id)
    }

    /// Apply the current scene's action `action_key` and move to its target.
    ///
    /// An unknown key is ignored and the current scene is returned again.
    /// A `goto` naming a missing scene is only detected here, after the
    /// effects have been applied and the position moved, and surfaces as
    /// [`ContentError::SceneNotFound`].
    pub fn choose(&mut self, action_key: &str) -> Result<GameState, ContentError> {
        let scene = self
            .resolver
            .resolve_scene(&self.chapter_id, &self.state.scene_id)?;

        let Some(action) = scene.action(action_key) else {
            warn!(
                chapter = %self.chapter_id,
                scene = %scene.id,
                key = action_key,
                "ignoring unknown action key"
            );
            return Ok(self.snapshot(&scene));
        };

        self.state.stats.apply(&action.effects);
        self.state.scene_id = action.goto.clone();
        info!(
            chapter = %self.chapter_id,
            from = %scene.id,
            to = %self.state.scene_id,
            key = action_key,
            "scene transition"
        );

        self.build_state(&self.state.scene_id)
    }

    fn build_state(&self, scene_id: &str) -> Result<GameState, ContentError> {
        let scene = self.resolver.resolve_scene(&self.chapter_id, scene_id)?;
        Ok(self.snapshot(&scene))
    }

    fn snapshot(&self, scene: &Scene) -> GameState {
        GameState::from_scene(&self.chapter_id, scene, self.state.stats)
    }
}

impl GameEngineBuilder {
    pub fn content_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.content_root = path.into();
        self
    }

    pub fn stats(mut self, stats: PlayerStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn cache_scenes(mut self, enabled: bool) -> Self {
        self.cache_scenes = enabled;
        self
    }

    /// Provide a resolver directly.
    pub fn with_resolver(mut self, resolver: ContentResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Resolve the chapter's entry scene and build the engine.
    ///
    /// Fails if the chapter or its manifest is broken.
    pub fn build(self) -> Result<GameEngine, ContentError> {
        let resolver = match self.resolver {
            Some(resolver) => resolver,
            None if self.cache_scenes => ContentResolver::cached(self.content_root),
            None => ContentResolver::new(self.content_root),
        };

        let entry = resolver.entry_scene(&self.chapter_id)?;
        info!(chapter = %self.chapter_id, entry = %entry, "engine ready");

        Ok(GameEngine {
            resolver,
            chapter_id: self.chapter_id,
            state: EngineState {
                scene_id: entry,
                stats: self.stats,
            },
        })
    }
}
