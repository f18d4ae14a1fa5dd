//! Per-stage conversion and merge rules

use crate::error::{DataError, Result};
use crate::model::{
    DEFAULT_SCENE_ID, DEFAULT_SEQUENCE_ID, ProjectDocument, Scene, Sequence, Shot,
};
use crate::stage::{StageKind, detect_stage};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Which prompt collection a stage 6/7 merge targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Image,
    Video,
}

impl PromptKind {
    fn label(self) -> &'static str {
        match self {
            PromptKind::Image => "image",
            PromptKind::Video => "video",
        }
    }
}

/// Classify a document and apply the matching stage conversion in place.
///
/// Stage 4, 6 and 7 errors surface to the caller; stage 5 errors are
/// swallowed (logged, document kept as mutated so far). Documents with no
/// recognizable stage data pass through unchanged.
pub fn detect_and_process(doc: &mut ProjectDocument) -> Result<()> {
    match detect_stage(doc) {
        Some(StageKind::ShotBreakdown) => normalize_shot_breakdown(doc),
        Some(StageKind::SceneGrouping) => {
            apply_scene_grouping(doc);
            Ok(())
        }
        Some(StageKind::ImagePrompts) => {
            let prompts = doc.stage6_image_prompts.clone();
            merge_prompts(doc, PromptKind::Image, prompts.as_ref())
        }
        Some(StageKind::VideoPrompts) => {
            let prompts = doc.stage7_video_prompts.clone();
            merge_prompts(doc, PromptKind::Video, prompts.as_ref())
        }
        None => Ok(()),
    }
}

/// Stage 4: fill identity and image-design defaults on every shot.
///
/// # Returns
/// `StageData` error when `breakdown_data.shots` is absent entirely; an
/// empty shot list is fine.
pub fn normalize_shot_breakdown(doc: &mut ProjectDocument) -> Result<()> {
    let shots = doc.breakdown_data.shots.as_mut().ok_or_else(|| {
        DataError::StageData("shot breakdown requires breakdown_data.shots".to_string())
    })?;

    for shot in shots.iter_mut() {
        shot.fill_defaults();
    }
    debug!(shots = shots.len(), "normalized shot breakdown");
    Ok(())
}

/// Stage 5: derive the sequence/scene grouping, then attach per-scene
/// detail records to each shot.
///
/// This path prioritizes availability over strictness: a failure in the
/// detail-attach step is logged and swallowed, and the document is returned
/// as mutated so far. In particular a `sequences` field merged by the
/// derivation step is never dropped by a later failure.
pub fn apply_scene_grouping(doc: &mut ProjectDocument) {
    let derived = derive_sequences(doc.breakdown_data.shots.as_deref().unwrap_or(&[]));

    // Merge non-destructively: an existing grouping always wins.
    if doc.breakdown_data.sequences.is_none() {
        doc.breakdown_data.sequences = Some(derived);
    }

    if let Err(e) = attach_scene_details(doc) {
        warn!(error = %e, "scene detail merge failed; returning document as-is");
    }
}

/// Build the sequence list from a left-to-right scan of the shots.
///
/// The first shot naming a scene id determines that scene's attributes;
/// later shots referencing the same id do not overwrite it. A scene lands
/// in exactly the first sequence that introduces it.
fn derive_sequences(shots: &[Shot]) -> Vec<Sequence> {
    let mut sequences: Vec<Sequence> = Vec::new();
    // Index for O(1) lookup while the Vec keeps derivation order.
    let mut sequence_index: HashMap<String, usize> = HashMap::new();
    let mut seen_scenes: HashSet<String> = HashSet::new();

    for shot in shots {
        let scene_id = shot
            .scene_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SCENE_ID);
        let sequence_id = shot
            .sequence_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SEQUENCE_ID);

        let pos = match sequence_index.get(sequence_id) {
            Some(&pos) => pos,
            None => {
                sequences.push(Sequence::named(sequence_id));
                sequence_index.insert(sequence_id.to_string(), sequences.len() - 1);
                sequences.len() - 1
            }
        };

        if seen_scenes.insert(scene_id.to_string()) {
            sequences[pos].scenes.push(Scene {
                id: scene_id.to_string(),
                name: shot
                    .scene_name
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| format!("Scene {scene_id}")),
                description: shot.scene_description.clone().unwrap_or_default(),
                location: shot.location.clone().unwrap_or_default(),
                time: shot.time.clone().unwrap_or_default(),
            });
        }
    }

    sequences
}

/// Attach stage-5 detail records onto each shot's `scene_details`, keyed by
/// scene id. A record that is not an object is a `StageData` error; the
/// caller decides whether to surface or swallow it.
fn attach_scene_details(doc: &mut ProjectDocument) -> Result<()> {
    let Some(details) = doc.stage5_scene_data.clone() else {
        return Ok(());
    };
    let Some(shots) = doc.breakdown_data.shots.as_mut() else {
        return Ok(());
    };

    for shot in shots.iter_mut() {
        let Some(scene_id) = shot.scene_id.as_deref() else {
            continue;
        };
        if let Some(record) = details.get(scene_id) {
            if !record.is_object() {
                return Err(DataError::StageData(format!(
                    "scene detail record for '{scene_id}' is not an object"
                )));
            }
            shot.scene_details = Some(record.clone());
        }
    }
    Ok(())
}

/// Stage 6/7: merge a prompt map into the shots it addresses.
///
/// For every key in `prompts`, the shot with that id receives a shallow
/// key-wise union of the prompt fields into its image or video prompt map
/// (incoming wins, unrelated keys preserved). Keys naming no shot are
/// skipped.
///
/// # Returns
/// `MissingData` error when `prompts` is `None` (a stage tag with no
/// prompt map attached).
pub fn merge_prompts(
    doc: &mut ProjectDocument,
    kind: PromptKind,
    prompts: Option<&Map<String, Value>>,
) -> Result<()> {
    let prompts = prompts.ok_or_else(|| {
        DataError::MissingData(format!("{} prompt map is absent", kind.label()))
    })?;

    for (shot_id, fields) in prompts {
        let Some(fields) = fields.as_object() else {
            warn!(%shot_id, "skipping non-object {} prompt record", kind.label());
            continue;
        };
        let Some(shot) = doc.breakdown_data.find_shot_mut(shot_id) else {
            continue;
        };

        let target = match kind {
            PromptKind::Image => &mut shot.image_prompts,
            PromptKind::Video => &mut shot.video_prompts,
        };
        let map = target.get_or_insert_with(Map::new);
        for (key, value) in fields {
            map.insert(key.clone(), value.clone());
        }
    }
    Ok(())
}
