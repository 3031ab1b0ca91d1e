use serde_json::{Map, Value};

/// A chapter's shallowly validated manifest.
///
/// Scenes are kept as raw JSON so that per-scene validation can be
/// deferred until a scene is actually resolved. Iteration order is the
/// declaration order in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub entry_scene: Option<String>,
    pub scenes: Map<String, Value>,
}

impl Manifest {
    pub fn new(entry_scene: Option<String>, scenes: Map<String, Value>) -> Self {
        Self {
            entry_scene,
            scenes,
        }
    }

    /// Scene ids in declaration order.
    pub fn scene_ids(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    pub fn raw_scene(&self, id: &str) -> Option<&Value> {
        self.scenes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// The scene a new playthrough starts on.
    ///
    /// A non-empty `entry_scene` wins. Otherwise the first declared scene is
    /// used. `None` only when there are no scenes at all.
    pub fn entry_scene(&self) -> Option<&str> {
        match self.entry_scene.as_deref() {
            Some(entry) if !entry.is_empty() => Some(entry),
            _ => self.scene_ids().next(),
        }
    }
}
