/// External collaborators of the detection loop
///
/// The pose model and the camera are black boxes behind these traits. Both
/// are scoped resources: the guards below stop the camera stream and dispose
/// the detector exactly once, on explicit release or on drop.

use async_trait::async_trait;

use crate::config::{DetectionConfig, FacingMode};
use crate::errors::CoachError;
use crate::models::{DetectedPose, VideoFrame};

/// Pose estimation model
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoseDetector: Send {
    /// Detect zero or more poses in a frame
    async fn estimate_poses(&mut self, frame: &VideoFrame) -> Result<Vec<DetectedPose>, CoachError>;

    /// Release model resources
    fn dispose(&mut self);
}

/// Loads a pose detector
#[async_trait]
pub trait DetectorLoader: Send + Sync {
    async fn load(&self) -> Result<Box<dyn PoseDetector>, CoachError>;
}

/// Live video stream from a camera
pub trait CameraStream: Send {
    fn capture_frame(&mut self) -> Result<VideoFrame, CoachError>;

    /// Stop all tracks of the stream
    fn stop(&mut self);
}

/// Camera device that can be opened into a stream
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Open the camera. Permission denial is reported as
    /// [`CoachError::CameraPermissionDenied`].
    async fn open(&self, constraints: &CameraConstraints) -> Result<Box<dyn CameraStream>, CoachError>;
}

/// Requested camera settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraConstraints {
    pub width: u32,
    pub height: u32,
    pub facing_mode: FacingMode,
}

impl From<&DetectionConfig> for CameraConstraints {
    fn from(config: &DetectionConfig) -> Self {
        Self {
            width: config.camera_width,
            height: config.camera_height,
            facing_mode: config.facing_mode,
        }
    }
}

/// Owns a detector and disposes it when released or dropped
pub struct DetectorGuard {
    detector: Option<Box<dyn PoseDetector>>,
}

impl DetectorGuard {
    pub fn new(detector: Box<dyn PoseDetector>) -> Self {
        Self {
            detector: Some(detector),
        }
    }

    pub async fn estimate_poses(&mut self, frame: &VideoFrame) -> Result<Vec<DetectedPose>, CoachError> {
        match self.detector.as_mut() {
            Some(detector) => detector.estimate_poses(frame).await,
            None => Err(CoachError::Detection("detector already disposed".to_string())),
        }
    }

    pub fn release(&mut self) {
        if let Some(mut detector) = self.detector.take() {
            detector.dispose();
            tracing::debug!("Pose detector disposed");
        }
    }
}

impl Drop for DetectorGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Owns a camera stream and stops it when released or dropped
pub struct CameraGuard {
    stream: Option<Box<dyn CameraStream>>,
}

impl CameraGuard {
    pub fn new(stream: Box<dyn CameraStream>) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    pub fn capture_frame(&mut self) -> Result<VideoFrame, CoachError> {
        match self.stream.as_mut() {
            Some(stream) => stream.capture_frame(),
            None => Err(CoachError::FrameCapture("camera stream already stopped".to_string())),
        }
    }

    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::debug!("Camera stream stopped");
        }
    }
}

impl Drop for CameraGuard {
    fn drop(&mut self) {
        self.release();
    }
}
