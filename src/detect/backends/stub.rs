use anyhow::Result;
use image::RgbImage;

use crate::detect::backend::{Detections, PoseBackend, PoseCapability};
use crate::detect::person::{Keypoint, PersonDetection};
use crate::geometry::clamp_coord;

/// Stub backend for tests. Replays a preset detection list through the same
/// contract the real backends honor: keypoints with a score of zero or
/// below are excluded, coordinates are clamped into the image, and persons
/// left without keypoints or below the confidence threshold are dropped
/// (and counted).
pub struct StubPoseBackend {
    people: Vec<PersonDetection>,
    multi_person: bool,
}

impl StubPoseBackend {
    pub fn with_people(people: Vec<PersonDetection>) -> Self {
        Self {
            people,
            multi_person: true,
        }
    }

    /// Declare only the single-person capability.
    pub fn single_person_only(mut self) -> Self {
        self.multi_person = false;
        self
    }
}

impl PoseBackend for StubPoseBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn supports(&self, capability: PoseCapability) -> bool {
        match capability {
            PoseCapability::MultiPerson => self.multi_person,
            PoseCapability::SinglePerson => true,
        }
    }

    fn infer(&mut self, image: &RgbImage, min_confidence: f32) -> Result<Detections> {
        let mut result = Detections::default();
        for person in &self.people {
            if person.score < min_confidence {
                result.below_threshold += 1;
                continue;
            }
            let keypoints: Vec<_> = person
                .keypoints
                .iter()
                .filter(|kp| kp.score > 0.0)
                .map(|kp| {
                    Keypoint::new(
                        kp.landmark,
                        clamp_coord(kp.x, image.width()),
                        clamp_coord(kp.y, image.height()),
                        kp.score,
                    )
                })
                .collect();
            if keypoints.is_empty() {
                continue;
            }
            result
                .people
                .push(PersonDetection::new(keypoints, person.score));
        }
        Ok(result)
    }
}
