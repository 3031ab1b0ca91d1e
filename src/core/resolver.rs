/// Content resolver: chapter manifests and scene normalization.
///
/// A content root holds one directory per chapter. Each chapter directory
/// carries a `manifest.json` plus any text and image files it references by
/// relative path.

use rustc_hash::FxHashSet;
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::debug;

use crate::core::cache::SceneCache;
use crate::schema::manifest::Manifest;
use crate::schema::scene::{Action, Effects, Scene};

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("chapter '{chapter}' not found at {}", .path.display())]
    ChapterNotFound { chapter: String, path: PathBuf },
    #[error("invalid manifest for chapter '{chapter}'{}: {reason}", scene_suffix(.scene))]
    ManifestInvalid {
        chapter: String,
        scene: Option<String>,
        reason: String,
    },
    #[error("scene '{scene}' does not exist in chapter '{chapter}'")]
    SceneNotFound { chapter: String, scene: String },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn scene_suffix(scene: &Option<String>) -> String {
    match scene {
        Some(id) => format!(" (scene '{}')", id),
        None => String::new(),
    }
}

impl ContentError {
    fn manifest(chapter: &str, reason: impl Into<String>) -> Self {
        Self::ManifestInvalid {
            chapter: chapter.to_string(),
            scene: None,
            reason: reason.into(),
        }
    }
}

/// Location of a scene being resolved, used to label validation errors.
#[derive(Clone, Copy)]
struct SceneCtx<'a> {
    chapter: &'a str,
    scene: &'a str,
}

impl SceneCtx<'_> {
    fn invalid(&self, reason: impl Into<String>) -> ContentError {
        ContentError::ManifestInvalid {
            chapter: self.chapter.to_string(),
            scene: Some(self.scene.to_string()),
            reason: reason.into(),
        }
    }

    fn invalid_action(&self, index: usize, reason: impl std::fmt::Display) -> ContentError {
        self.invalid(format!("action {}: {}", index, reason))
    }
}

/// Resolves chapters under a content root into immutable [`Scene`]s.
///
/// Without a cache every call goes back to disk, so edits to content are
/// picked up immediately. Caching is opt-in via [`ContentResolver::cached`].
#[derive(Debug)]
pub struct ContentResolver {
    root: PathBuf,
    cache: Option<Mutex<SceneCache>>,
}

impl ContentResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: None,
        }
    }

    /// A resolver that memoizes resolved scenes by `(chapter, scene)`.
    ///
    /// Only safe while content files do not change; call
    /// [`invalidate_chapter`](Self::invalidate_chapter) after edits.
    pub fn cached(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Some(Mutex::new(SceneCache::default())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_caching(&self) -> bool {
        self.cache.is_some()
    }

    /// Locate a chapter's directory as an absolute path.
    pub fn chapter_root(&self, chapter_id: &str) -> Result<PathBuf, ContentError> {
        let dir = self.root.join(chapter_id);
        if !dir.is_dir() {
            return Err(ContentError::ChapterNotFound {
                chapter: chapter_id.to_string(),
                path: dir,
            });
        }
        dir.canonicalize()
            .map_err(|source| ContentError::Io { path: dir, source })
    }

    /// Read and shallowly validate a chapter's manifest.
    ///
    /// Only the top-level shape is checked here. Individual scenes are
    /// validated when resolved.
    pub fn load_manifest(&self, chapter_id: &str) -> Result<Manifest, ContentError> {
        let chapter_dir = self.chapter_root(chapter_id)?;
        self.load_manifest_in(chapter_id, &chapter_dir)
    }

    fn load_manifest_in(
        &self,
        chapter_id: &str,
        chapter_dir: &Path,
    ) -> Result<Manifest, ContentError> {
        let path = chapter_dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(ContentError::ChapterNotFound {
                chapter: chapter_id.to_string(),
                path,
            });
        }
        let contents = std::fs::read_to_string(&path).map_err(|source| ContentError::Io {
            path: path.clone(),
            source,
        })?;
        let manifest = parse_manifest(chapter_id, &contents).map_err(|e| match e {
            ContentError::ManifestInvalid { chapter, scene, reason } => {
                ContentError::ManifestInvalid {
                    chapter,
                    scene,
                    reason: format!("{} ({})", reason, path.display()),
                }
            }
            other => other,
        })?;
        debug!(
            chapter = chapter_id,
            scenes = manifest.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// The id of the scene a playthrough of this chapter starts on.
    pub fn entry_scene(&self, chapter_id: &str) -> Result<String, ContentError> {
        let manifest = self.load_manifest(chapter_id)?;
        manifest
            .entry_scene()
            .map(str::to_string)
            .ok_or_else(|| ContentError::manifest(chapter_id, "no scenes defined in 'scenes'"))
    }

    /// Resolve one scene: load its text, resolve its image path, and
    /// normalize its actions.
    pub fn resolve_scene(&self, chapter_id: &str, scene_id: &str) -> Result<Scene, ContentError> {
        if let Some(cache) = &self.cache {
            let cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(scene) = cache.get(chapter_id, scene_id) {
                debug!(chapter = chapter_id, scene = scene_id, "scene cache hit");
                return Ok(scene.clone());
            }
        }

        let chapter_dir = self.chapter_root(chapter_id)?;
        let manifest = self.load_manifest_in(chapter_id, &chapter_dir)?;
        let raw = manifest
            .raw_scene(scene_id)
            .ok_or_else(|| ContentError::SceneNotFound {
                chapter: chapter_id.to_string(),
                scene: scene_id.to_string(),
            })?;

        let ctx = SceneCtx {
            chapter: chapter_id,
            scene: scene_id,
        };
        let raw = raw
            .as_object()
            .ok_or_else(|| ctx.invalid("scene must be an object"))?;

        let scene = Scene {
            id: scene_id.to_string(),
            text: resolve_text(ctx, &chapter_dir, raw)?,
            image: resolve_image(ctx, &chapter_dir, raw)?,
            actions: resolve_actions(ctx, raw)?,
        };
        debug!(
            chapter = chapter_id,
            scene = scene_id,
            actions = scene.actions.len(),
            image = scene.has_image(),
            "resolved scene"
        );

        if let Some(cache) = &self.cache {
            let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
            cache.insert(chapter_id, scene.clone());
            debug!(cached = cache.len(), "scene cached");
        }
        Ok(scene)
    }

    /// Drop every cached scene of one chapter. No-op without a cache.
    pub fn invalidate_chapter(&self, chapter_id: &str) {
        if let Some(cache) = &self.cache {
            cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .invalidate_chapter(chapter_id);
        }
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
            if !cache.is_empty() {
                debug!(dropped = cache.len(), "clearing scene cache");
                cache.clear();
            }
        }
    }
}

/// Parse manifest text and check its top-level shape.
pub fn parse_manifest(chapter_id: &str, input: &str) -> Result<Manifest, ContentError> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| ContentError::manifest(chapter_id, format!("invalid JSON: {}", e)))?;

    let Value::Object(mut root) = value else {
        return Err(ContentError::manifest(
            chapter_id,
            "manifest must be a JSON object",
        ));
    };

    let scenes = match root.remove("scenes") {
        Some(Value::Object(scenes)) => scenes,
        _ => {
            return Err(ContentError::manifest(
                chapter_id,
                "manifest must contain 'scenes' as an object",
            ))
        }
    };

    let entry_scene = match root.remove("entry_scene") {
        None => None,
        Some(Value::String(entry)) => Some(entry),
        Some(_) => {
            return Err(ContentError::manifest(
                chapter_id,
                "'entry_scene' must be a string",
            ))
        }
    };

    Ok(Manifest::new(entry_scene, scenes))
}

/// A field's value, treating JSON `null` the same as a missing key.
fn field<'v>(obj: &'v Map<String, Value>, name: &str) -> Option<&'v Value> {
    obj.get(name).filter(|v| !v.is_null())
}

fn resolve_text(
    ctx: SceneCtx<'_>,
    chapter_dir: &Path,
    raw: &Map<String, Value>,
) -> Result<String, ContentError> {
    match (field(raw, "text"), field(raw, "text_file")) {
        (Some(_), Some(_)) => Err(ctx.invalid("'text' and 'text_file' cannot both be set")),
        (None, Some(file)) => {
            let rel = file
                .as_str()
                .ok_or_else(|| ctx.invalid("'text_file' must be a string"))?;
            let joined = chapter_dir.join(rel);
            let path = match joined.canonicalize() {
                Ok(path) => path,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(ctx.invalid(format!("text_file not found: {}", joined.display())));
                }
                Err(source) => return Err(ContentError::Io { path: joined, source }),
            };
            if !path.is_file() {
                return Err(ctx.invalid(format!("text_file is not a file: {}", path.display())));
            }
            std::fs::read_to_string(&path).map_err(|source| ContentError::Io { path, source })
        }
        (Some(text), None) => text
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ctx.invalid("'text' must be a string")),
        (None, None) => Ok(String::new()),
    }
}

fn resolve_image(
    ctx: SceneCtx<'_>,
    chapter_dir: &Path,
    raw: &Map<String, Value>,
) -> Result<String, ContentError> {
    let Some(image) = field(raw, "image") else {
        return Ok(String::new());
    };
    let rel = image
        .as_str()
        .ok_or_else(|| ctx.invalid("'image' must be a string"))?;
    if rel.trim().is_empty() {
        return Ok(String::new());
    }
    // The file itself may not exist yet.
    let path = normalize_path(&chapter_dir.join(rel));
    Ok(path.to_string_lossy().into_owned())
}

fn resolve_actions(
    ctx: SceneCtx<'_>,
    raw: &Map<String, Value>,
) -> Result<Vec<Action>, ContentError> {
    let Some(list) = field(raw, "actions") else {
        return Ok(Vec::new());
    };
    let items = list
        .as_array()
        .ok_or_else(|| ctx.invalid("'actions' must be a list"))?;

    let mut seen = FxHashSet::default();
    let mut actions = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let action = resolve_action(ctx, index, item)?;
        if !seen.insert(action.key.clone()) {
            return Err(ctx.invalid_action(
                index,
                format!("duplicate key '{}' in scene", action.key),
            ));
        }
        actions.push(action);
    }
    Ok(actions)
}

fn resolve_action(ctx: SceneCtx<'_>, index: usize, item: &Value) -> Result<Action, ContentError> {
    let obj = item
        .as_object()
        .ok_or_else(|| ctx.invalid_action(index, "must be an object"))?;

    let key = required_str(ctx, index, obj, "key")?;
    let label = required_str(ctx, index, obj, "label")?;
    let goto = required_str(ctx, index, obj, "goto")?;
    let effects = resolve_effects(ctx, index, obj)?;

    let hint = match field(obj, "hint") {
        None => String::new(),
        Some(Value::String(hint)) => hint.clone(),
        Some(_) => return Err(ctx.invalid_action(index, "'hint' must be a string")),
    };

    Ok(Action {
        key,
        label,
        goto,
        effects,
        hint,
    })
}

fn required_str(
    ctx: SceneCtx<'_>,
    index: usize,
    obj: &Map<String, Value>,
    name: &str,
) -> Result<String, ContentError> {
    match field(obj, name).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ctx.invalid_action(index, format!("'{}' must be a non-empty string", name))),
    }
}

fn resolve_effects(
    ctx: SceneCtx<'_>,
    index: usize,
    obj: &Map<String, Value>,
) -> Result<Effects, ContentError> {
    let Some(raw) = field(obj, "effects") else {
        return Ok(Effects::default());
    };
    let raw = raw
        .as_object()
        .ok_or_else(|| ctx.invalid_action(index, "'effects' must be an object"))?;

    // Unrecognized keys are ignored.
    let delta = |name: &str| -> Result<i64, ContentError> {
        match field(raw, name) {
            None => Ok(0),
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_i64() {
                    Ok(v)
                } else if is_out_of_range_integer(n) {
                    Err(ctx.invalid_action(
                        index,
                        format!("effects.{} must fit in a 64-bit integer", name),
                    ))
                } else {
                    Err(ctx.invalid_action(index, format!("effects.{} must be an integer", name)))
                }
            }
            Some(_) => Err(ctx.invalid_action(index, format!("effects.{} must be an integer", name))),
        }
    };

    Ok(Effects {
        sleep: delta("sleep")?,
        energy: delta("energy")?,
        focus: delta("focus")?,
        stress: delta("stress")?,
    })
}

/// An integer literal too large for `i64`. Beyond `u64` serde_json stores
/// it as a float, so a whole float past the `i64` bounds counts too.
fn is_out_of_range_integer(n: &serde_json::Number) -> bool {
    if n.is_u64() {
        return true;
    }
    match n.as_f64() {
        Some(f) => f.is_finite() && f.fract() == 0.0 && f.abs() >= 9_223_372_036_854_775_808.0,
        None => false,
    }
}

/// Fold `.` and `..` components without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
