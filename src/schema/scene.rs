use serde::{Deserialize, Serialize};

/// Signed stat deltas carried by an action. Missing fields are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effects {
    pub sleep: i64,
    pub energy: i64,
    pub focus: i64,
    pub stress: i64,
}

impl Effects {
    /// Returns true if every delta is zero.
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

/// A resolved, player-facing choice inside a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Unique within the owning scene.
    pub key: String,
    pub label: String,
    /// Target scene id. Not checked against the manifest until traversed.
    pub goto: String,
    #[serde(default)]
    pub effects: Effects,
    #[serde(default)]
    pub hint: String,
}

/// A fully resolved narrative beat.
///
/// `text` is already loaded from its source, and `image` is either an
/// absolute path string or empty when the scene has no art.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub text: String,
    pub image: String,
    pub actions: Vec<Action>,
}

impl Scene {
    /// Find an action by key, first match in declared order.
    pub fn action(&self, key: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.key == key)
    }

    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }

    /// A scene with no actions. The UI has nothing to offer; the engine
    /// does not treat this as game over.
    pub fn is_dead_end(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scene() -> Scene {
        Scene {
            id: "hall".to_string(),
            text: "A long hall.".to_string(),
            image: String::new(),
            actions: vec![
                Action {
                    key: "left".to_string(),
                    label: "Go left".to_string(),
                    goto: "kitchen".to_string(),
                    effects: Effects::default(),
                    hint: String::new(),
                },
                Action {
                    key: "right".to_string(),
                    label: "Go right".to_string(),
                    goto: "garden".to_string(),
                    effects: Effects {
                        stress: -2,
                        ..Effects::default()
                    },
                    hint: "fresh air".to_string(),
                },
            ],
        }
    }

    #[test]
    fn action_lookup_by_key() {
        let scene = sample_scene();
        assert_eq!(scene.action("right").map(|a| a.goto.as_str()), Some("garden"));
        assert!(scene.action("up").is_none());
    }

    #[test]
    fn image_and_dead_end_flags() {
        let mut scene = sample_scene();
        assert!(!scene.has_image());
        assert!(!scene.is_dead_end());

        scene.actions.clear();
        scene.image = "/content/hall.png".to_string();
        assert!(scene.has_image());
        assert!(scene.is_dead_end());
    }

    #[test]
    fn effects_default_is_neutral() {
        assert!(Effects::default().is_neutral());
        let e = Effects {
            focus: 1,
            ..Effects::default()
        };
        assert!(!e.is_neutral());
    }
}
