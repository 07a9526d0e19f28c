//! Canonical landmark name space.
//!
//! Every backend variant maps its native outputs onto this fixed set of 17
//! anatomical points (COCO ordering). Records never carry a name outside
//! this set.

/// The 17 canonical landmarks, in COCO keypoint order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Landmark {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl Landmark {
    pub const COUNT: usize = 17;

    /// Wire name used in artifact documents.
    pub fn name(self) -> &'static str {
        match self {
            Landmark::Nose => "nose",
            Landmark::LeftEye => "left_eye",
            Landmark::RightEye => "right_eye",
            Landmark::LeftEar => "left_ear",
            Landmark::RightEar => "right_ear",
            Landmark::LeftShoulder => "left_shoulder",
            Landmark::RightShoulder => "right_shoulder",
            Landmark::LeftElbow => "left_elbow",
            Landmark::RightElbow => "right_elbow",
            Landmark::LeftWrist => "left_wrist",
            Landmark::RightWrist => "right_wrist",
            Landmark::LeftHip => "left_hip",
            Landmark::RightHip => "right_hip",
            Landmark::LeftKnee => "left_knee",
            Landmark::RightKnee => "right_knee",
            Landmark::LeftAnkle => "left_ankle",
            Landmark::RightAnkle => "right_ankle",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEye),
            2 => Some(Self::RightEye),
            3 => Some(Self::LeftEar),
            4 => Some(Self::RightEar),
            5 => Some(Self::LeftShoulder),
            6 => Some(Self::RightShoulder),
            7 => Some(Self::LeftElbow),
            8 => Some(Self::RightElbow),
            9 => Some(Self::LeftWrist),
            10 => Some(Self::RightWrist),
            11 => Some(Self::LeftHip),
            12 => Some(Self::RightHip),
            13 => Some(Self::LeftKnee),
            14 => Some(Self::RightKnee),
            15 => Some(Self::LeftAnkle),
            16 => Some(Self::RightAnkle),
            _ => None,
        }
    }
}

/// Native landmark index of the single-person model mapped onto the
/// canonical set. The model emits 33 BlazePose landmarks; only the 17 that
/// exist in the canonical space are kept (inner/outer eye points, mouth,
/// fingers and foot points are dropped).
pub const SINGLE_PERSON_LANDMARK_MAP: [(usize, Landmark); Landmark::COUNT] = [
    (0, Landmark::Nose),
    (2, Landmark::LeftEye),
    (5, Landmark::RightEye),
    (7, Landmark::LeftEar),
    (8, Landmark::RightEar),
    (11, Landmark::LeftShoulder),
    (12, Landmark::RightShoulder),
    (13, Landmark::LeftElbow),
    (14, Landmark::RightElbow),
    (15, Landmark::LeftWrist),
    (16, Landmark::RightWrist),
    (23, Landmark::LeftHip),
    (24, Landmark::RightHip),
    (25, Landmark::LeftKnee),
    (26, Landmark::RightKnee),
    (27, Landmark::LeftAnkle),
    (28, Landmark::RightAnkle),
];
