//! Stage payload classification

use crate::model::ProjectDocument;

/// Which pipeline stage's data a document carries.
///
/// Exactly one kind is chosen per document, by the first matching condition
/// in pipeline order (4 → 5 → 6 → 7). A document could in principle satisfy
/// several conditions at once, e.g. carry both a stage-4 marker and
/// leftover stage-6 prompts from an earlier partial export; pipeline order
/// is the least surprising tie-break because stage N+1 data presupposes
/// stage N has already run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Stage 4: raw shot breakdown needing default filling.
    ShotBreakdown,
    /// Stage 5: scene/sequence grouping and per-scene detail records.
    SceneGrouping,
    /// Stage 6: image prompts keyed by shot id.
    ImagePrompts,
    /// Stage 7: video prompts keyed by shot id.
    VideoPrompts,
}

impl StageKind {
    /// The pipeline stage number this kind corresponds to.
    pub fn number(self) -> u32 {
        match self {
            StageKind::ShotBreakdown => 4,
            StageKind::SceneGrouping => 5,
            StageKind::ImagePrompts => 6,
            StageKind::VideoPrompts => 7,
        }
    }
}

/// Classify a document by explicit stage tag or marker-field presence.
///
/// Returns `None` for documents carrying no recognizable stage data; those
/// pass through normalization unchanged.
pub fn detect_stage(doc: &ProjectDocument) -> Option<StageKind> {
    if doc.stage == Some(4) || doc.stage4_data.is_some() {
        return Some(StageKind::ShotBreakdown);
    }
    if doc.stage == Some(5) || doc.stage5_scene_data.is_some() {
        return Some(StageKind::SceneGrouping);
    }
    if doc.stage == Some(6) || doc.stage6_image_prompts.is_some() {
        return Some(StageKind::ImagePrompts);
    }
    if doc.stage == Some(7) || doc.stage7_video_prompts.is_some() {
        return Some(StageKind::VideoPrompts);
    }
    None
}
