//! Backup integrity checks
//!
//! Regression tooling for a bug class the editor has hit before: image
//! attachments silently dropped between an in-memory document and its
//! exported backup. [`tally_images`] counts the real (URL-carrying) image
//! entries and [`verify_export_integrity`] asserts the counts survive an
//! encode/decode cycle.

use crate::codec;
use crate::error::Result;
use crate::model::ProjectDocument;

/// Image attachment counts for a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageTally {
    pub shots: usize,
    pub shots_with_main_images: usize,
    pub main_images: usize,
    pub shots_with_reference_images: usize,
    pub reference_images: usize,
}

/// Count main and reference images across all shots. Placeholder entries
/// without a URL are excluded.
pub fn tally_images(doc: &ProjectDocument) -> ImageTally {
    let mut tally = ImageTally::default();
    let Some(shots) = doc.breakdown_data.shots.as_ref() else {
        return tally;
    };

    tally.shots = shots.len();
    for shot in shots {
        let main = shot.main_image_count();
        if main > 0 {
            tally.shots_with_main_images += 1;
            tally.main_images += main;
        }
        let reference = shot.reference_image_count();
        if reference > 0 {
            tally.shots_with_reference_images += 1;
            tally.reference_images += reference;
        }
    }
    tally
}

/// Simulate an export/import cycle and check that no image data is lost.
///
/// # Returns
/// `true` when the re-decoded document tallies identically to the
/// original; errors bubble up from the codec.
pub fn verify_export_integrity(doc: &ProjectDocument) -> Result<bool> {
    let encoded = codec::encode(doc)?;
    let round = ProjectDocument::from_value(codec::decode(&encoded)?)?;
    Ok(tally_images(&round) == tally_images(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc_with_images() -> ProjectDocument {
        ProjectDocument::from_value(json!({
            "project_info": {"name": "Noir"},
            "breakdown_data": {"shots": [
                {
                    "id": "a",
                    "main_images": [{"url": "https://cdn/a1.png"}, {"url": ""}],
                    "reference_images": [
                        {"url": "https://cdn/r1.png"},
                        {"url": "https://cdn/r2.png"}
                    ]
                },
                {"id": "b", "main_images": [{}]},
                {"id": "c"}
            ]}
        }))
        .unwrap()
    }

    #[test]
    fn test_tally_excludes_placeholders() {
        let tally = tally_images(&doc_with_images());
        assert_eq!(
            tally,
            ImageTally {
                shots: 3,
                shots_with_main_images: 1,
                main_images: 1,
                shots_with_reference_images: 1,
                reference_images: 2,
            }
        );
    }

    #[test]
    fn test_tally_of_shotless_document_is_zero() {
        let doc = ProjectDocument::from_value(
            json!({"project_info": {}, "breakdown_data": {}}),
        )
        .unwrap();
        assert_eq!(tally_images(&doc), ImageTally::default());
    }

    #[test]
    fn test_export_cycle_preserves_image_counts() {
        assert!(verify_export_integrity(&doc_with_images()).unwrap());
    }
}
