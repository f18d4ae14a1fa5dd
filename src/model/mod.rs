//! Project document data model
//!
//! Core data structures for a production breakdown. Split into submodules:
//! - `document`: root `ProjectDocument` with project info and breakdown data
//! - `shot`: the atomic storyboard unit and its image design sub-record
//! - `scene`: derived Scene/Sequence grouping levels

mod document;
mod scene;
mod shot;

pub use document::{BreakdownData, DEFAULT_PROJECT_NAME, ProjectDocument, ProjectInfo};
pub use scene::{DEFAULT_SCENE_ID, DEFAULT_SEQUENCE_ID, Scene, Sequence};
pub use shot::{ImageDesign, ImageEntry, Shot, generate_shot_id};
