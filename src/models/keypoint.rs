/// Keypoint models for pose detector output
///
/// The pose detector is an external collaborator: every detection tick it
/// hands back zero or more poses, each a list of up to 17 named 2D keypoints
/// with a confidence score. These types are the crate's view of that output.

use serde::{Deserialize, Serialize};

/// Confidence below which a keypoint is treated as absent for the tick
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

/// A detected anatomical landmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Keypoint name (e.g., "left_shoulder")
    pub name: String,
    /// X coordinate (normalized 0-1 or pixel coordinates)
    pub x: f32,
    /// Y coordinate, growing downwards as in image space
    pub y: f32,
    /// Detection confidence (0-1)
    #[serde(alias = "score")]
    pub confidence: f32,
}

impl Keypoint {
    /// Create a new keypoint
    pub fn new(name: impl Into<String>, x: f32, y: f32, confidence: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            confidence,
        }
    }

    /// Check if keypoint is usable (finite position and sufficient confidence)
    pub fn is_detected(&self, min_confidence: f32) -> bool {
        self.confidence >= min_confidence && self.x.is_finite() && self.y.is_finite()
    }
}

/// COCO keypoint indices, the layout used by the supported detectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CocoKeypoint {
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

impl CocoKeypoint {
    /// Get keypoint name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

/// One pose returned by the detector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedPose {
    /// Overall pose score, when the detector reports one
    pub score: Option<f32>,
    pub keypoints: Vec<Keypoint>,
}

impl DetectedPose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self {
            score: None,
            keypoints,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    /// Get keypoint by name
    pub fn get_keypoint(&self, name: &str) -> Option<&Keypoint> {
        self.keypoints.iter().find(|kp| kp.name == name)
    }

    /// Get a keypoint only if it is confidently detected
    pub fn detected(&self, keypoint: CocoKeypoint, min_confidence: f32) -> Option<&Keypoint> {
        self.get_keypoint(keypoint.name())
            .filter(|kp| kp.is_detected(min_confidence))
    }

    /// Pick the pose to analyse from a detector result: the highest scoring one,
    /// falling back to the first pose when no scores are reported.
    pub fn best(poses: &[DetectedPose]) -> Option<&DetectedPose> {
        poses.iter().reduce(|best, pose| {
            match (best.score, pose.score) {
                (Some(a), Some(b)) if b > a => pose,
                (None, Some(_)) => pose,
                _ => best,
            }
        })
    }
}

/// Frame handed from the camera stream to the detector
#[derive(Debug, Clone, Default)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    /// Capture time in milliseconds since the stream started
    pub captured_at_ms: u64,
    /// Raw RGB pixels; opaque to the analyzer
    pub pixels: Vec<u8>,
}
