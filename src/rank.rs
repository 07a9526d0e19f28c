//! Person ranking and slot assignment.
//!
//! Ranking and slotting are independent orderings over the same detections.
//! The composite ranking key decides which person is "best"; slots encode
//! the left-to-right position a matching game cares about.

use crate::detect::person::PersonDetection;

/// Rank detected persons and assign slot indices.
///
/// Persons without a single valid keypoint are excluded up front. The
/// returned vector is in rank order, descending by the composite key
/// (valid keypoint count, mean keypoint confidence, keypoint-extent area);
/// ties keep the original detection order. Slot indices are assigned
/// separately, ascending by mean x of the valid keypoints, so they are
/// independent of both detector emission order and rank.
pub fn rank_and_slot(people: Vec<PersonDetection>) -> Vec<PersonDetection> {
    let mut people: Vec<PersonDetection> = people
        .into_iter()
        .filter(|person| person.valid_count() > 0)
        .collect();

    let mut slot_order: Vec<usize> = (0..people.len()).collect();
    slot_order.sort_by(|&a, &b| people[a].mean_x().total_cmp(&people[b].mean_x()));
    for (slot, &idx) in slot_order.iter().enumerate() {
        people[idx].slot = slot;
    }

    people.sort_by(|a, b| {
        b.valid_count()
            .cmp(&a.valid_count())
            .then_with(|| b.mean_confidence().total_cmp(&a.mean_confidence()))
            .then_with(|| b.extent_area().total_cmp(&a.extent_area()))
    });

    people
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::landmarks::Landmark;
    use crate::detect::person::Keypoint;

    fn person_at(xs: &[f32], score: f32) -> PersonDetection {
        let keypoints = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                Keypoint::new(
                    Landmark::from_index(i).unwrap(),
                    x,
                    100.0 + 10.0 * i as f32,
                    score,
                )
            })
            .collect();
        PersonDetection::new(keypoints, score)
    }

    #[test]
    fn more_valid_keypoints_wins() {
        let a = person_at(&[10.0, 20.0], 0.5);
        let b = person_at(&[10.0, 20.0, 30.0], 0.4);
        let ranked = rank_and_slot(vec![a, b]);
        assert_eq!(ranked[0].valid_count(), 3);
    }

    #[test]
    fn mean_confidence_breaks_count_ties() {
        let a = person_at(&[10.0, 20.0], 0.5);
        let b = person_at(&[10.0, 20.0], 0.9);
        let ranked = rank_and_slot(vec![a, b]);
        assert!((ranked[0].mean_confidence() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn extent_area_breaks_confidence_ties() {
        let small = person_at(&[10.0, 20.0], 0.7);
        let wide = person_at(&[10.0, 500.0], 0.7);
        let ranked = rank_and_slot(vec![small.clone(), wide.clone()]);
        assert!(ranked[0].extent_area() > ranked[1].extent_area());

        // Stable under either emission order at the area level too.
        let ranked = rank_and_slot(vec![wide, small]);
        assert!(ranked[0].extent_area() > ranked[1].extent_area());
    }

    #[test]
    fn full_ties_keep_detection_order() {
        // Same keypoint count, same confidence, same extent area; only the
        // position differs, which the composite key does not inspect.
        let first = person_at(&[10.0, 20.0], 0.7);
        let second = person_at(&[400.0, 410.0], 0.7);

        let ranked = rank_and_slot(vec![first.clone(), second]);
        assert_eq!(ranked[0].keypoints[0].x, first.keypoints[0].x);
    }

    #[test]
    fn slots_run_left_to_right_regardless_of_emission_order() {
        let left = person_at(&[90.0, 110.0], 0.6); // mean x = 100
        let right = person_at(&[490.0, 510.0], 0.9); // mean x = 500

        let ranked = rank_and_slot(vec![right.clone(), left.clone()]);
        for person in &ranked {
            if person.mean_x() < 300.0 {
                assert_eq!(person.slot, 0);
            } else {
                assert_eq!(person.slot, 1);
            }
        }

        let ranked = rank_and_slot(vec![left, right]);
        for person in &ranked {
            if person.mean_x() < 300.0 {
                assert_eq!(person.slot, 0);
            } else {
                assert_eq!(person.slot, 1);
            }
        }
    }

    #[test]
    fn zero_keypoint_people_are_excluded() {
        let empty = PersonDetection::new(Vec::new(), 0.9);
        let real = person_at(&[50.0], 0.5);
        let ranked = rank_and_slot(vec![empty, real]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].slot, 0);
    }
}
