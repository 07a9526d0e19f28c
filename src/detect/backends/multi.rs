#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use tract_onnx::prelude::*;

use crate::detect::backend::{Detections, PoseBackend, PoseCapability};
use crate::detect::landmarks::Landmark;
use crate::detect::person::{Keypoint, PersonDetection};
use crate::geometry::clamp_coord;

/// Model input edge length (square).
const INPUT_SIZE: u32 = 640;
/// Channels per anchor column: cx, cy, w, h, person confidence, 17 * (x, y, score).
const ANCHOR_CHANNELS: usize = 5 + Landmark::COUNT * 3;
/// Raw candidates below this are discarded before NMS; candidates between
/// this floor and `min_confidence` are the ones reported as below-threshold.
const CANDIDATE_FLOOR: f32 = 0.05;
/// IoU above which two candidate boxes are considered the same person.
const NMS_IOU: f32 = 0.45;

#[derive(Clone, Debug)]
struct Candidate {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    confidence: f32,
    keypoints: Vec<Keypoint>,
}

/// Multi-person pose backend over a YOLO-pose-style ONNX model.
///
/// The model detects 0..N people, each with the full canonical 17-point
/// layout. Decoding follows the usual pose head: per-anchor box + person
/// confidence + 17 keypoint triples, reduced by IoU suppression.
pub struct MultiPoseBackend {
    model: TypedSimplePlan<TypedModel>,
}

impl MultiPoseBackend {
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| {
                format!(
                    "failed to load multi-person pose model from {}",
                    model_path.display()
                )
            })?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize),
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
            (1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize),
            |(_, channel, y, x)| resized.get_pixel(x as u32, y as u32)[channel] as f32 / 255.0,
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
        let shape = view.shape();
        if shape.len() != 3 || shape[1] != ANCHOR_CHANNELS {
            return Err(anyhow!(
                "unexpected pose output shape {:?}, expected [1, {}, N]",
                shape,
                ANCHOR_CHANNELS
            ));
        }

        let scale_x = width as f32 / INPUT_SIZE as f32;
        let scale_y = height as f32 / INPUT_SIZE as f32;

        let mut candidates = Vec::new();
        for anchor in 0..shape[2] {
            let confidence = view[[0, 4, anchor]];
            if confidence < CANDIDATE_FLOOR {
                continue;
            }

            let cx = view[[0, 0, anchor]] * scale_x;
            let cy = view[[0, 1, anchor]] * scale_y;
            let w = view[[0, 2, anchor]] * scale_x;
            let h = view[[0, 3, anchor]] * scale_y;

            let mut keypoints = Vec::with_capacity(Landmark::COUNT);
            for idx in 0..Landmark::COUNT {
                let base = 5 + idx * 3;
                let score = view[[0, base + 2, anchor]];
                if score <= 0.0 {
                    continue;
                }
                let landmark = match Landmark::from_index(idx) {
                    Some(landmark) => landmark,
                    None => continue,
                };
                keypoints.push(Keypoint::new(
                    landmark,
                    clamp_coord(view[[0, base, anchor]] * scale_x, width),
                    clamp_coord(view[[0, base + 1, anchor]] * scale_y, height),
                    score,
                ));
            }
            if keypoints.is_empty() {
                continue;
            }

            candidates.push(Candidate {
                x: cx - w / 2.0,
                y: cy - h / 2.0,
                w,
                h,
                confidence,
                keypoints,
            });
        }

        let mut result = Detections::default();
        for candidate in nms(candidates) {
            if candidate.confidence < min_confidence {
                result.below_threshold += 1;
                continue;
            }
            result.people.push(PersonDetection::new(
                candidate.keypoints,
                candidate.confidence,
            ));
        }
        Ok(result)
    }
}

fn iou(a: &Candidate, b: &Candidate) -> f32 {
    let x1 = a.x.max(b.x);
    let y1 = a.y.max(b.y);
    let x2 = (a.x + a.w).min(b.x + b.w);
    let y2 = (a.y + a.h).min(b.y + b.h);

    let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    let union = a.w * a.h + b.w * b.h - intersection;
    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

fn nms(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<Candidate> = Vec::new();
    while !candidates.is_empty() {
        let best = candidates.remove(0);
        candidates.retain(|other| iou(&best, other) < NMS_IOU);
        kept.push(best);
    }
    kept
}

impl PoseBackend for MultiPoseBackend {
    fn name(&self) -> &'static str {
        "tract-multi"
    }

    fn supports(&self, capability: PoseCapability) -> bool {
        matches!(capability, PoseCapability::MultiPerson)
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
