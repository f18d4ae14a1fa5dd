//! Stage schema normalization
//!
//! A project document arrives in one of four pipeline-stage shapes
//! (Stage 4: shot breakdown, Stage 5: scene/sequence grouping, Stage 6:
//! image prompts, Stage 7: video prompts), or in no recognizable stage
//! shape at all. This module classifies the document up front into a
//! tagged [`StageKind`] and applies the matching conversion, producing the
//! canonical in-memory form the rest of the crate works with.
//!
//! ## Conversion strategy
//!
//! When a new stage shape is introduced:
//! 1. Add a marker field on `ProjectDocument` and a `StageKind` variant
//! 2. Extend `detect_stage` keeping pipeline order as the tie-break
//! 3. Add the conversion to `detect_and_process` and tests for it

mod convert;
mod payload;

pub use convert::{
    apply_scene_grouping, detect_and_process, merge_prompts, normalize_shot_breakdown,
    PromptKind,
};
pub use payload::{StageKind, detect_stage};
