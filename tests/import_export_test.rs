//! Integration tests for file import and artifact export

use serde_json::json;
use std::fs;
use storyboard_data::{
    DEFAULT_PROJECT_NAME, DataError, ExportFormat, ProjectDocument, create_backup,
    default_export_filename, export_document, export_stage_artifact, import_document,
};
use tempfile::TempDir;

fn write_project(dir: &TempDir, filename: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(filename);
    fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_import_normalizes_and_names_document() {
    let dir = TempDir::new().unwrap();
    let path = write_project(
        &dir,
        "Noir_Short.json",
        &json!({
            "project_info": {},
            "breakdown_data": {"shots": [{}]},
            "stage": 4
        })
        .to_string(),
    );

    let doc = import_document(&path).await.unwrap();

    // Name derived from the file stem because the document had none.
    assert_eq!(doc.project_info.name.as_deref(), Some("Noir_Short"));

    // Stage 4 normalization already ran.
    let shot = &doc.breakdown_data.shots.as_ref().unwrap()[0];
    assert!(shot.id.is_some());
    assert!(shot.image_design.is_some());
}

#[tokio::test]
async fn test_import_keeps_documents_own_name() {
    let dir = TempDir::new().unwrap();
    let path = write_project(
        &dir,
        "whatever.json",
        &json!({
            "project_info": {"name": "Authored Title"},
            "breakdown_data": {"shots": []}
        })
        .to_string(),
    );

    let doc = import_document(&path).await.unwrap();
    assert_eq!(doc.project_info.name.as_deref(), Some("Authored Title"));
}

#[tokio::test]
async fn test_import_missing_project_info_is_validation_error() {
    let dir = TempDir::new().unwrap();
    let path = write_project(&dir, "bad.json", r#"{"breakdown_data": {}}"#);

    match import_document(&path).await {
        Err(DataError::Validation(msg)) => assert!(msg.contains("project_info")),
        other => panic!("expected Validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_import_malformed_text_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_project(&dir, "broken.json", "{not json at all");

    assert!(matches!(
        import_document(&path).await,
        Err(DataError::Parse(_))
    ));
}

#[tokio::test]
async fn test_import_unreadable_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does_not_exist.json");

    assert!(matches!(
        import_document(&path).await,
        Err(DataError::Io(_))
    ));
}

#[tokio::test]
async fn test_import_export_cycle_preserves_content() {
    let dir = TempDir::new().unwrap();
    let path = write_project(
        &dir,
        "cycle.json",
        &json!({
            "project_info": {"name": "Cycle"},
            "breakdown_data": {"shots": [
                {"id": "a", "main_images": [{"url": "https://cdn/a.png", "caption": "wide"}]}
            ]},
            "editor_settings": {"theme": "dark"}
        })
        .to_string(),
    );

    let doc = import_document(&path).await.unwrap();
    let artifact = export_document(&doc, None).unwrap();
    let reparsed =
        ProjectDocument::from_value(storyboard_data::decode(&artifact.contents).unwrap()).unwrap();

    assert_eq!(reparsed, doc);
    // Unknown keys at every level survived the cycle.
    assert_eq!(
        reparsed.extra.get("editor_settings"),
        Some(&json!({"theme": "dark"}))
    );
    let image = &reparsed.breakdown_data.shots.as_ref().unwrap()[0]
        .main_images
        .as_ref()
        .unwrap()[0];
    assert_eq!(image.extra.get("caption"), Some(&json!("wide")));
}

#[test]
fn test_unnamed_export_filename_shape() {
    let doc = ProjectDocument::from_value(json!({
        "project_info": {},
        "breakdown_data": {"shots": []}
    }))
    .unwrap();
    let date = chrono::NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
    assert_eq!(
        default_export_filename(&doc, date),
        format!("{DEFAULT_PROJECT_NAME}_2026-08-30.json")
    );
}

#[test]
fn test_stage_artifact_routing_matrix() {
    let data = json!([{"shot": "a", "prompt": "p"}]);

    for stage in [4, 5] {
        let artifact = export_stage_artifact(stage, &data, ExportFormat::Csv).unwrap();
        assert_eq!(artifact.filename, format!("stage{stage}_export.json"));
    }
    for stage in [6, 7] {
        let csv = export_stage_artifact(stage, &data, ExportFormat::Csv).unwrap();
        assert_eq!(csv.filename, format!("stage{stage}_export.csv"));
        assert_eq!(csv.contents, "shot,prompt\na,p\n");

        let json_artifact = export_stage_artifact(stage, &data, ExportFormat::Json).unwrap();
        assert_eq!(json_artifact.filename, format!("stage{stage}_export.json"));
    }
}

#[test]
fn test_backup_artifact_round_trips() {
    let doc = ProjectDocument::from_value(json!({
        "project_info": {"name": "Noir"},
        "breakdown_data": {"shots": [{"id": "a"}]}
    }))
    .unwrap();

    let artifact = create_backup(&doc).unwrap();
    let restored =
        ProjectDocument::from_value(storyboard_data::decode(&artifact.contents).unwrap()).unwrap();
    assert_eq!(restored, doc);
}
