//! Artifact document model.
//!
//! Two documents describe one processed image: the single-person record
//! (best candidate, person fields flattened to the top level) and the
//! multi-person record (every ranked, slotted person). Both carry the same
//! schema version, creation timestamp and source dimensions. People are
//! listed in rank order, so `people[0]` of the multi record is always the
//! person the single record flattens.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::detect::person::PersonDetection;
use crate::geometry::{bbox_from_points, normalize_box, normalize_point, NormBox, PixelBox};

/// Schema version tag carried by every artifact document.
pub const SCHEMA_VERSION: &str = "1.1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSize {
    pub w: u32,
    pub h: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelKeypoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormKeypoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

/// Per-person payload shared by both document kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub slot: usize,
    pub bbox_px: PixelBox,
    pub bbox: NormBox,
    pub keypoints_px: Vec<PixelKeypoint>,
    pub keypoints: Vec<NormKeypoint>,
    pub score: f64,
}

/// `<stem>.json` - the best-ranked person, flattened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SinglePersonRecord {
    pub version: String,
    pub created_at: String,
    pub source_size: SourceSize,
    #[serde(flatten)]
    pub person: PersonRecord,
}

/// `<stem>.multi.json` - all ranked, slotted persons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiPersonRecord {
    pub version: String,
    pub created_at: String,
    pub source_size: SourceSize,
    pub people: Vec<PersonRecord>,
}

/// Fold one detection into the per-person record shape.
pub fn person_record(person: &PersonDetection, width: u32, height: u32) -> PersonRecord {
    let points = person.points();
    let bbox_px = bbox_from_points(&points, width, height);
    let keypoints_px = person
        .keypoints
        .iter()
        .map(|kp| PixelKeypoint {
            name: kp.landmark.name().to_string(),
            x: kp.x as f64,
            y: kp.y as f64,
            score: kp.score as f64,
        })
        .collect();
    let keypoints = person
        .keypoints
        .iter()
        .map(|kp| {
            let (x, y) = normalize_point(kp.x, kp.y, width, height);
            NormKeypoint {
                name: kp.landmark.name().to_string(),
                x,
                y,
            }
        })
        .collect();

    PersonRecord {
        slot: person.slot,
        bbox_px,
        bbox: normalize_box(bbox_px, width, height),
        keypoints_px,
        keypoints,
        score: person.score as f64,
    }
}

/// Assemble the artifact pair for one image from its ranked detections.
///
/// Both documents share one creation timestamp. `people` must be in rank
/// order with slots already assigned and must not be empty.
pub fn build_records(
    people: &[PersonDetection],
    width: u32,
    height: u32,
) -> (SinglePersonRecord, MultiPersonRecord) {
    let created_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let source_size = SourceSize {
        w: width,
        h: height,
    };
    let records: Vec<PersonRecord> = people
        .iter()
        .map(|person| person_record(person, width, height))
        .collect();

    let single = SinglePersonRecord {
        version: SCHEMA_VERSION.to_string(),
        created_at: created_at.clone(),
        source_size,
        person: records[0].clone(),
    };
    let multi = MultiPersonRecord {
        version: SCHEMA_VERSION.to_string(),
        created_at,
        source_size,
        people: records,
    };
    (single, multi)
}
