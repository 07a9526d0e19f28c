use anyhow::Result;
use image::RgbImage;

use crate::detect::person::PersonDetection;

/// Detection capabilities a pose backend can declare.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoseCapability {
    /// Detects 0..N people with the full canonical 17-point layout.
    MultiPerson,
    /// Detects at most one person; native landmarks are mapped onto the
    /// canonical name space through a fixed lookup table.
    SinglePerson,
}

/// Outcome of one inference call.
///
/// `people` holds only persons that passed the confidence filter and kept at
/// least one valid keypoint. `below_threshold` counts persons the filter
/// dropped, so an empty result can be classified as low-confidence rather
/// than no-person.
#[derive(Clone, Debug, Default)]
pub struct Detections {
    pub people: Vec<PersonDetection>,
    pub below_threshold: usize,
}

impl Detections {
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

/// Pose backend trait.
///
/// `infer` is a pure function of its inputs: no persistent side effects,
/// no filesystem or network access. Persons whose aggregate confidence is
/// below `min_confidence` are dropped before the result is returned, and a
/// landmark with an invalid score is excluded from the keypoint set rather
/// than emitted with a placeholder coordinate.
///
/// Backends are non-reentrant, externally-owned resources: they are built
/// once per run and invoked for one image at a time.
pub trait PoseBackend {
    /// Backend identifier for logs.
    fn name(&self) -> &'static str;

    /// Returns true when the backend supports a capability.
    fn supports(&self, capability: PoseCapability) -> bool;

    /// Run pose detection on an image.
    fn infer(&mut self, image: &RgbImage, min_confidence: f32) -> Result<Detections>;
}
