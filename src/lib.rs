//! Storyboard Production Data Core
//!
//! This library implements the data core of a storyboard / film-production
//! breakdown editor: JSON project-document import/export, normalization
//! between the four "stage" schema variants of the production pipeline
//! (shot breakdown, scene grouping, image prompts, video prompts), CSV
//! prompt-sheet export, and the session state holding the single mutable
//! document for the lifetime of an editing session.
//!
//! # Architecture
//!
//! The crate follows a 3-layer architecture:
//! - **Session Layer**: [`Session`] — the shared document slot, dirty
//!   tracking, autosave/backup timers and injected collaborators
//! - **Conversion Layer**: `stage` and `transfer` modules — stage
//!   classification/normalization and import/export orchestration
//! - **Data Layer**: `model` and `codec` modules — the typed document
//!   tree and its textual JSON/CSV representations
//!
//! # Example
//!
//! ```no_run
//! use storyboard_data::{Session, import_document};
//!
//! #[tokio::main]
//! async fn main() -> storyboard_data::Result<()> {
//!     let doc = import_document("noir_short.json").await?;
//!     let session = Session::new();
//!     session.replace(doc);
//!     let artifact = session.export_current(None)?;
//!     println!("{} ({} bytes)", artifact.filename, artifact.contents.len());
//!     Ok(())
//! }
//! ```

mod codec;
mod error;
mod integrity;
mod model;
mod session;
mod stage;
mod transfer;

// Re-export the public surface, one component at a time.
pub use codec::{decode, encode, to_csv};
pub use error::{DataError, Result};
pub use integrity::{ImageTally, tally_images, verify_export_integrity};
pub use model::{
    BreakdownData, DEFAULT_PROJECT_NAME, DEFAULT_SCENE_ID, DEFAULT_SEQUENCE_ID, ImageDesign,
    ImageEntry, ProjectDocument, ProjectInfo, Scene, Sequence, Shot, generate_shot_id,
};
pub use session::{ContentView, DownloadSink, NotifyLevel, Notifier, Persistence, Session};
pub use stage::{
    PromptKind, StageKind, apply_scene_grouping, detect_and_process, detect_stage, merge_prompts,
    normalize_shot_breakdown,
};
pub use transfer::{
    Artifact, ExportFormat, create_backup, default_export_filename, export_document,
    export_stage_artifact, import_document,
};
