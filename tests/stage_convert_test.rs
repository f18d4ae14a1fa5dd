//! Integration tests for stage normalization
//!
//! These run whole documents through classification and conversion the way
//! an import does, verifying the canonical shapes each stage produces.

use serde_json::{Value, json};
use storyboard_data::{
    DEFAULT_SCENE_ID, DEFAULT_SEQUENCE_ID, DataError, ProjectDocument, StageKind,
    detect_and_process, detect_stage,
};

fn doc(value: Value) -> ProjectDocument {
    ProjectDocument::from_value(value).unwrap()
}

#[test]
fn test_stage4_document_becomes_canonical() {
    let mut doc = doc(json!({
        "project_info": {"name": "Noir"},
        "breakdown_data": {"shots": [
            {"notes": "handheld"},
            {"id": "S01.02", "scene_id": "s2"}
        ]},
        "stage": 4
    }));
    detect_and_process(&mut doc).unwrap();

    let shots = doc.breakdown_data.shots.as_ref().unwrap();

    // The anonymous shot got a full identity.
    let first = &shots[0];
    assert!(first.id.as_deref().unwrap().starts_with("shot_"));
    assert_eq!(first.scene_id.as_deref(), Some(DEFAULT_SCENE_ID));
    assert_eq!(first.sequence_id.as_deref(), Some(DEFAULT_SEQUENCE_ID));
    let design = first.image_design.as_ref().unwrap();
    assert_eq!(design.aspect_ratio.as_deref(), Some("16:9"));
    assert_eq!(design.selected_plan.as_deref(), Some("plan_a"));

    // Authored identity survived, and the unknown key survived too.
    assert_eq!(shots[1].id.as_deref(), Some("S01.02"));
    assert_eq!(shots[1].scene_id.as_deref(), Some("s2"));
    assert_eq!(shots[0].extra.get("notes"), Some(&json!("handheld")));
}

#[test]
fn test_stage4_twice_equals_once() {
    let mut first = doc(json!({
        "project_info": {},
        "breakdown_data": {"shots": [{"id": "a", "scene_id": "s1"}]},
        "stage4_data": {}
    }));
    detect_and_process(&mut first).unwrap();
    let mut second = first.clone();
    detect_and_process(&mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_stage5_derives_grouping_and_details() {
    let mut doc = doc(json!({
        "project_info": {},
        "breakdown_data": {"shots": [
            {"id": "a", "scene_id": "s1", "sequence_id": "seq1",
             "scene_name": "Alley", "location": "EXT alley", "time": "night"},
            {"id": "b", "scene_id": "s1", "sequence_id": "seq1", "scene_name": "Renamed"},
            {"id": "c", "scene_id": "s2", "sequence_id": "seq2"}
        ]},
        "stage5_scene_data": {"s2": {"weather": "rain"}}
    }));
    detect_and_process(&mut doc).unwrap();

    let sequences = doc.breakdown_data.sequences.as_ref().unwrap();
    assert_eq!(sequences.len(), 2);
    assert_eq!(sequences[0].id, "seq1");
    assert_eq!(sequences[0].name, "Sequence seq1");

    // First writer wins for scene attributes.
    let alley = &sequences[0].scenes[0];
    assert_eq!(alley.name, "Alley");
    assert_eq!(alley.location, "EXT alley");
    assert_eq!(alley.time, "night");

    // Details attached by scene id, only where a record exists.
    let shots = doc.breakdown_data.shots.as_ref().unwrap();
    assert_eq!(shots[0].scene_details, None);
    assert_eq!(shots[2].scene_details, Some(json!({"weather": "rain"})));
}

#[test]
fn test_stage5_without_shots_yields_empty_grouping() {
    let mut doc = doc(json!({
        "project_info": {},
        "breakdown_data": {},
        "stage": 5
    }));
    detect_and_process(&mut doc).unwrap();
    assert_eq!(doc.breakdown_data.sequences.as_deref(), Some(&[][..]));
}

#[test]
fn test_stage6_and_7_merge_into_separate_maps() {
    let base = json!({
        "project_info": {},
        "breakdown_data": {"shots": [{"id": "shotA"}]}
    });

    let mut with_images = base.clone();
    with_images["stage6_image_prompts"] = json!({"shotA": {"style": "noir"}});
    let mut doc6 = doc(with_images);
    detect_and_process(&mut doc6).unwrap();

    let mut with_videos = base.clone();
    with_videos["stage7_video_prompts"] = json!({"shotA": {"motion": "dolly in"}});
    let mut doc7 = doc(with_videos);
    detect_and_process(&mut doc7).unwrap();

    let shot6 = &doc6.breakdown_data.shots.as_ref().unwrap()[0];
    assert!(shot6.image_prompts.is_some());
    assert!(shot6.video_prompts.is_none());

    let shot7 = &doc7.breakdown_data.shots.as_ref().unwrap()[0];
    assert!(shot7.video_prompts.is_some());
    assert!(shot7.image_prompts.is_none());
}

#[test]
fn test_classification_matches_processing_priority() {
    // A document with every marker classifies as the earliest stage.
    let loaded = doc(json!({
        "project_info": {},
        "breakdown_data": {"shots": []},
        "stage4_data": {},
        "stage5_scene_data": {},
        "stage6_image_prompts": {},
        "stage7_video_prompts": {}
    }));
    assert_eq!(detect_stage(&loaded), Some(StageKind::ShotBreakdown));
    assert_eq!(detect_stage(&loaded).unwrap().number(), 4);
}

#[test]
fn test_stage4_marker_without_shots_surfaces_error() {
    let mut doc = doc(json!({
        "project_info": {},
        "breakdown_data": {"sequences": []},
        "stage4_data": {}
    }));
    match detect_and_process(&mut doc) {
        Err(DataError::StageData(msg)) => assert!(msg.contains("shots")),
        other => panic!("expected StageData error, got {other:?}"),
    }
}
