//! Root project document

use crate::error::{DataError, Result};
use crate::model::{Sequence, Shot};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fallback project name used when `project_info.name` is unset.
pub const DEFAULT_PROJECT_NAME: &str = "Film_Production_Manager";

/// The root entity of an editing session.
///
/// A document is valid only if both `project_info` and `breakdown_data` are
/// present in the source payload; [`ProjectDocument::validate_value`] is the
/// import-side gate for that invariant. The optional `stage*` fields are the
/// marker fields whose presence signals which pipeline stage's data is
/// embedded.
///
/// Unknown top-level keys are kept in `extra` so an import → export cycle
/// never drops data this crate does not model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub project_info: ProjectInfo,
    pub breakdown_data: BreakdownData,

    /// Explicit pipeline stage tag (4-7), when the exporter recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<u32>,

    /// Stage 4 marker payload (shot breakdown).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage4_data: Option<Value>,

    /// Stage 5 scene-detail records keyed by scene id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage5_scene_data: Option<Map<String, Value>>,

    /// Stage 6 image prompts keyed by shot id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage6_image_prompts: Option<Map<String, Value>>,

    /// Stage 7 video prompts keyed by shot id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage7_video_prompts: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectDocument {
    /// Check the top-level shape invariant on a freshly decoded value.
    ///
    /// # Returns
    /// `Ok(())` when both `project_info` and `breakdown_data` are present
    /// and are objects, otherwise a `Validation` error naming the offender.
    pub fn validate_value(raw: &Value) -> Result<()> {
        for field in ["project_info", "breakdown_data"] {
            match raw.get(field) {
                Some(v) if v.is_object() => {}
                Some(_) => {
                    return Err(DataError::Validation(format!(
                        "top-level field '{field}' must be an object"
                    )));
                }
                None => {
                    return Err(DataError::Validation(format!(
                        "missing required top-level field '{field}'"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Decode a raw value into a typed document, enforcing the top-level
    /// shape invariant first.
    pub fn from_value(raw: Value) -> Result<Self> {
        Self::validate_value(&raw)?;
        Ok(serde_json::from_value(raw)?)
    }
}

/// Project metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectInfo {
    /// Project name with the fixed fallback applied.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_PROJECT_NAME,
        }
    }

    /// Whether a usable name is set (non-blank).
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}

/// The production breakdown: an ordered list of shots, plus the derived
/// sequence grouping once stage 5 has run.
///
/// `shots` is `Option` rather than defaulting to empty because "absent" and
/// "empty" mean different things to stage 4 normalization (absent is a hard
/// error, empty is a valid document with no shots yet).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakdownData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shots: Option<Vec<Shot>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequences: Option<Vec<Sequence>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BreakdownData {
    /// Find a shot by id.
    pub fn find_shot_mut(&mut self, id: &str) -> Option<&mut Shot> {
        self.shots
            .as_mut()?
            .iter_mut()
            .find(|s| s.id.as_deref() == Some(id))
    }
}
