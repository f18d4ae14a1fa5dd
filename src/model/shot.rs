//! Shot: the atomic unit of the storyboard breakdown

use crate::model::{DEFAULT_SCENE_ID, DEFAULT_SEQUENCE_ID};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Generate a unique shot id from a timestamp plus a random suffix.
pub fn generate_shot_id() -> String {
    format!(
        "shot_{}_{}",
        Utc::now().timestamp_millis(),
        rand::random::<u32>()
    )
}

/// A single shot in the breakdown.
///
/// Every field except the flattened `extra` map is optional in the wire
/// format; stage 4 normalization fills the identity and image-design
/// defaults (see [`Shot::fill_defaults`]). Scene-level fields
/// (`scene_name`, `scene_description`, `location`, `time`) are carried on
/// the shot in early stages and hoisted into derived [`Scene`] records by
/// stage 5.
///
/// [`Scene`]: crate::model::Scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Owning scene id; `default_scene` when the source never assigned one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<String>,

    /// Owning sequence id; `default_sequence` when unassigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_design: Option<ImageDesign>,

    /// Image prompts keyed by purpose, merged in by stage 6.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_prompts: Option<Map<String, Value>>,

    /// Video prompts keyed by purpose, merged in by stage 7.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_prompts: Option<Map<String, Value>>,

    /// Per-scene auxiliary detail record attached by stage 5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_details: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_images: Option<Vec<ImageEntry>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_images: Option<Vec<ImageEntry>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Shot {
    /// Fill identity and image-design defaults in place.
    ///
    /// Already-set fields are left untouched, so running this twice yields
    /// the same result as running it once.
    pub fn fill_defaults(&mut self) {
        if self.id.as_deref().is_none_or(str::is_empty) {
            self.id = Some(generate_shot_id());
        }
        if self.name.as_deref().is_none_or(str::is_empty) {
            // id was just filled above if it was missing
            let id = self.id.as_deref().unwrap_or_default();
            self.name = Some(format!("Shot {id}"));
        }
        if self.scene_id.as_deref().is_none_or(str::is_empty) {
            self.scene_id = Some(DEFAULT_SCENE_ID.to_string());
        }
        if self.sequence_id.as_deref().is_none_or(str::is_empty) {
            self.sequence_id = Some(DEFAULT_SEQUENCE_ID.to_string());
        }

        let design = self.image_design.get_or_insert_with(ImageDesign::with_defaults);
        if design.ai_generated_images.is_none() {
            design.ai_generated_images = Some(Map::new());
        }
    }

    /// Count main images that actually carry a URL.
    pub fn main_image_count(&self) -> usize {
        count_with_url(self.main_images.as_deref())
    }

    /// Count reference images that actually carry a URL.
    pub fn reference_image_count(&self) -> usize {
        count_with_url(self.reference_images.as_deref())
    }
}

fn count_with_url(entries: Option<&[ImageEntry]>) -> usize {
    entries
        .map(|e| e.iter().filter(|img| img.has_url()).count())
        .unwrap_or(0)
}

/// Per-shot image design settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDesign {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_plan: Option<String>,

    /// AI-generated image variants keyed by plan tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_generated_images: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageDesign {
    /// The design a shot gets when the source supplied none.
    pub fn with_defaults() -> Self {
        Self {
            aspect_ratio: Some("16:9".to_string()),
            selected_plan: Some("plan_a".to_string()),
            ai_generated_images: Some(Map::new()),
            extra: Map::new(),
        }
    }
}

/// One entry in a shot's main or reference image list.
///
/// Entries without a URL are empty placeholders left behind by the editor's
/// fixed-slot image grid; they are excluded from counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageEntry {
    /// Whether this entry holds a real image URL.
    pub fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}
