#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use tract_onnx::prelude::*;

use crate::detect::backend::{Detections, PoseBackend, PoseCapability};
use crate::detect::landmarks::SINGLE_PERSON_LANDMARK_MAP;
use crate::detect::person::{Keypoint, PersonDetection};
use crate::geometry::clamp_coord;

/// Model input edge length (square).
const INPUT_SIZE: u32 = 256;
/// Values per native landmark: x, y, z, visibility, presence.
const LANDMARK_STRIDE: usize = 5;
/// Native landmark count of the single-person model.
const NATIVE_LANDMARKS: usize = 33;
/// Landmarks with visibility below this floor are excluded from the
/// keypoint set.
const VISIBILITY_FLOOR: f32 = 0.1;

/// Single-person pose backend over a BlazePose-style ONNX model.
///
/// The model emits 33 native landmarks for at most one person; the fixed
/// lookup table in [`crate::detect::landmarks`] maps the canonical subset
/// onto the shared name space. The person score is the mean visibility of
/// the kept landmarks.
pub struct SinglePoseBackend {
    model: TypedSimplePlan<TypedModel>,
}

impl SinglePoseBackend {
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| {
                format!(
                    "failed to load single-person pose model from {}",
                    model_path.display()
                )
            })?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, INPUT_SIZE as usize, INPUT_SIZE as usize, 3),
                ),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize pose model")?
            .into_runnable()
            .context("failed to build runnable pose model")?;

        Ok(Self { model })
    }

    fn build_input(&self, image: &RgbImage) -> Tensor {
        let resized = image::imageops::resize(
            image,
            INPUT_SIZE,
            INPUT_SIZE,
            image::imageops::FilterType::Triangle,
        );
        let input = tract_ndarray::Array4::from_shape_fn(
            (1, INPUT_SIZE as usize, INPUT_SIZE as usize, 3),
            |(_, y, x, channel)| resized.get_pixel(x as u32, y as u32)[channel] as f32 / 255.0,
        );
        input.into_tensor()
    }

    fn decode(
        &self,
        outputs: &TVec<TValue>,
        width: u32,
        height: u32,
        min_confidence: f32,
    ) -> Result<Detections> {
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("pose model produced no outputs"))?;
        let view = output
            .to_array_view::<f32>()
            .context("pose model output tensor was not f32")?;
        let flat: Vec<f32> = view.iter().copied().collect();
        if flat.len() < NATIVE_LANDMARKS * LANDMARK_STRIDE {
            return Err(anyhow!(
                "unexpected landmark tensor length {}, expected at least {}",
                flat.len(),
                NATIVE_LANDMARKS * LANDMARK_STRIDE
            ));
        }

        let scale_x = width as f32 / INPUT_SIZE as f32;
        let scale_y = height as f32 / INPUT_SIZE as f32;

        let mut keypoints = Vec::with_capacity(SINGLE_PERSON_LANDMARK_MAP.len());
        for (native_idx, landmark) in SINGLE_PERSON_LANDMARK_MAP {
            let base = native_idx * LANDMARK_STRIDE;
            let visibility = sigmoid(flat[base + 3]);
            if visibility < VISIBILITY_FLOOR {
                continue;
            }
            keypoints.push(Keypoint::new(
                landmark,
                clamp_coord(flat[base] * scale_x, width),
                clamp_coord(flat[base + 1] * scale_y, height),
                visibility,
            ));
        }

        let mut result = Detections::default();
        if keypoints.is_empty() {
            return Ok(result);
        }

        let score = keypoints.iter().map(|kp| kp.score).sum::<f32>() / keypoints.len() as f32;
        if score < min_confidence {
            result.below_threshold = 1;
            return Ok(result);
        }

        result.people.push(PersonDetection::new(keypoints, score));
        Ok(result)
    }
}

fn sigmoid(value: f32) -> f32 {
    1.0 / (1.0 + (-value).exp())
}

impl PoseBackend for SinglePoseBackend {
    fn name(&self) -> &'static str {
        "tract-single"
    }

    fn supports(&self, capability: PoseCapability) -> bool {
        matches!(capability, PoseCapability::SinglePerson)
    }

    fn infer(&mut self, image: &RgbImage, min_confidence: f32) -> Result<Detections> {
        let input = self.build_input(image);
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("pose inference failed")?;
        self.decode(&outputs, image.width(), image.height(), min_confidence)
    }
}
