use crate::detect::landmarks::Landmark;

/// A named anatomical point in pixel coordinates with its detection score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    pub landmark: Landmark,
    pub x: f32,
    pub y: f32,
    pub score: f32,
}

impl Keypoint {
    pub fn new(landmark: Landmark, x: f32, y: f32, score: f32) -> Self {
        Self {
            landmark,
            x,
            y,
            score,
        }
    }
}

/// One detected person: the valid keypoints a backend kept, the person
/// confidence, and the left-to-right slot assigned during selection.
///
/// Invalid landmarks are excluded at detection time rather than carried
/// with placeholder coordinates, so `keypoints` holds valid points only.
#[derive(Clone, Debug, PartialEq)]
pub struct PersonDetection {
    pub keypoints: Vec<Keypoint>,
    pub score: f32,
    pub slot: usize,
}

impl PersonDetection {
    pub fn new(keypoints: Vec<Keypoint>, score: f32) -> Self {
        Self {
            keypoints,
            score,
            slot: 0,
        }
    }

    pub fn valid_count(&self) -> usize {
        self.keypoints.len()
    }

    pub fn mean_confidence(&self) -> f32 {
        if self.keypoints.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.keypoints.iter().map(|kp| kp.score).sum();
        sum / self.keypoints.len() as f32
    }

    /// Mean x over valid keypoints; drives slot ordering.
    pub fn mean_x(&self) -> f32 {
        if self.keypoints.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.keypoints.iter().map(|kp| kp.x).sum();
        sum / self.keypoints.len() as f32
    }

    /// Area of the raw keypoint extent, used as the last ranking tie-break.
    pub fn extent_area(&self) -> f32 {
        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for kp in &self.keypoints {
            min_x = min_x.min(kp.x);
            max_x = max_x.max(kp.x);
            min_y = min_y.min(kp.y);
            max_y = max_y.max(kp.y);
        }
        if self.keypoints.is_empty() {
            return 0.0;
        }
        (max_x - min_x) * (max_y - min_y)
    }

    /// Pixel coordinates of the valid keypoints.
    pub fn points(&self) -> Vec<(f32, f32)> {
        self.keypoints.iter().map(|kp| (kp.x, kp.y)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(points: &[(f32, f32, f32)]) -> PersonDetection {
        let keypoints = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y, score))| {
                Keypoint::new(Landmark::from_index(i).unwrap(), x, y, score)
            })
            .collect();
        PersonDetection::new(keypoints, 0.9)
    }

    #[test]
    fn mean_confidence_averages_keypoint_scores() {
        let p = person(&[(0.0, 0.0, 0.4), (10.0, 10.0, 0.8)]);
        assert!((p.mean_confidence() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn mean_x_ignores_y() {
        let p = person(&[(100.0, 5.0, 1.0), (300.0, 400.0, 1.0)]);
        assert!((p.mean_x() - 200.0).abs() < 1e-6);
    }

    #[test]
    fn empty_person_has_zero_metrics() {
        let p = PersonDetection::new(Vec::new(), 0.5);
        assert_eq!(p.valid_count(), 0);
        assert_eq!(p.mean_confidence(), 0.0);
        assert_eq!(p.extent_area(), 0.0);
    }
}
