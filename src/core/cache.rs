/// Read-through cache of resolved scenes, keyed by chapter and scene id.

use rustc_hash::FxHashMap;

use crate::schema::scene::Scene;

#[derive(Debug, Clone, Default)]
pub struct SceneCache {
    chapters: FxHashMap<String, FxHashMap<String, Scene>>,
}

impl SceneCache {
    pub fn get(&self, chapter_id: &str, scene_id: &str) -> Option<&Scene> {
        self.chapters.get(chapter_id)?.get(scene_id)
    }

    pub fn insert(&mut self, chapter_id: &str, scene: Scene) {
        self.chapters
            .entry(chapter_id.to_string())
            .or_default()
            .insert(scene.id.clone(), scene);
    }

    pub fn invalidate_chapter(&mut self, chapter_id: &str) {
        self.chapters.remove(chapter_id);
    }

    pub fn clear(&mut self) {
        self.chapters.clear();
    }

    /// Total number of cached scenes across all chapters.
    pub fn len(&self) -> usize {
        self.chapters.values().map(|scenes| scenes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
