//! Import/export orchestration
//!
//! Reads an externally supplied file into a canonical [`ProjectDocument`]
//! and packages an in-memory document back into a downloadable [`Artifact`]
//! with a derived filename. The codec does the text work, the stage module
//! does the shape work; this module only sequences them and owns the
//! filename rules.

use crate::codec;
use crate::error::Result;
use crate::model::ProjectDocument;
use crate::stage;
use chrono::{Local, NaiveDate, SecondsFormat, Utc};
use std::path::Path;
use tracing::info;

/// A downloadable payload handed to the host environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub contents: String,
}

/// Export format selector for stage artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

/// Read, decode, validate and normalize a project file.
///
/// On success the returned document is canonical (stage conversion already
/// applied) and carries a project name derived from the file stem when its
/// own name was blank. A failed import has no side effects.
///
/// # Errors
/// * `Io` when the underlying read fails
/// * `Parse` when the text is not well-formed JSON
/// * `Validation` when `project_info` or `breakdown_data` is missing
/// * stage errors per [`stage::detect_and_process`]
pub async fn import_document(path: impl AsRef<Path>) -> Result<ProjectDocument> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await?;

    let raw = codec::decode(&text)?;
    let mut doc = ProjectDocument::from_value(raw)?;

    if !doc.project_info.has_name()
        && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
    {
        doc.project_info.name = Some(stem.to_string());
    }

    stage::detect_and_process(&mut doc)?;
    info!(path = %path.display(), "imported project document");
    Ok(doc)
}

/// Package a document as a JSON download artifact.
///
/// Without a filename hint the name is `{projectName}_{YYYY-MM-DD}.json`,
/// with the project name falling back to the fixed default when unset.
pub fn export_document(doc: &ProjectDocument, filename_hint: Option<&str>) -> Result<Artifact> {
    let filename = match filename_hint {
        Some(hint) => hint.to_string(),
        None => default_export_filename(doc, Local::now().date_naive()),
    };
    Ok(Artifact {
        filename,
        mime_type: "application/json",
        contents: codec::encode(doc)?,
    })
}

/// The dated default export filename. Split out from [`export_document`] so
/// the date can be pinned in tests.
pub fn default_export_filename(doc: &ProjectDocument, date: NaiveDate) -> String {
    format!(
        "{}_{}.json",
        doc.project_info.display_name(),
        date.format("%Y-%m-%d")
    )
}

/// Stage-aware export. Stages 6 and 7 with CSV format route through the
/// tabular codec; every other stage number, and any non-CSV format, routes
/// through plain JSON encoding.
pub fn export_stage_artifact(
    stage_number: u32,
    data: &serde_json::Value,
    format: ExportFormat,
) -> Result<Artifact> {
    let as_csv = matches!(stage_number, 6 | 7) && format == ExportFormat::Csv;
    if as_csv {
        Ok(Artifact {
            filename: format!("stage{stage_number}_export.csv"),
            mime_type: "text/csv",
            contents: codec::to_csv(data),
        })
    } else {
        Ok(Artifact {
            filename: format!("stage{stage_number}_export.json"),
            mime_type: "application/json",
            contents: codec::encode(data)?,
        })
    }
}

/// Package a document as a timestamped backup artifact.
///
/// The timestamp has colons and periods replaced by hyphens so the filename
/// is filesystem-safe on every platform.
pub fn create_backup(doc: &ProjectDocument) -> Result<Artifact> {
    let stamp = Utc::now()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    export_document(doc, Some(&format!("backup_{stamp}.json")))
}
