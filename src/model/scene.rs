//! Derived Scene/Sequence grouping levels

use serde::{Deserialize, Serialize};

/// Sentinel scene id for shots the source never assigned to a scene.
pub const DEFAULT_SCENE_ID: &str = "default_scene";

/// Sentinel sequence id for shots the source never assigned to a sequence.
pub const DEFAULT_SEQUENCE_ID: &str = "default_sequence";

/// A scene, derived from the first shot that names its id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub time: String,
}

/// A sequence owning the scenes it introduces, by value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sequence {
    pub id: String,
    pub name: String,
    pub scenes: Vec<Scene>,
}

impl Sequence {
    /// A new, empty sequence with its derived display name.
    pub fn named(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: format!("Sequence {id}"),
            scenes: Vec::new(),
        }
    }
}
