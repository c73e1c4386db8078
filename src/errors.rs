use thiserror::Error;

use crate::services::detection_loop::SessionState;

/// Errors raised by the form-analysis session
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoachError {
    #[error("Camera permission denied")]
    CameraPermissionDenied,
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),
    #[error("Failed to load pose detection model: {0}")]
    ModelLoad(String),
    #[error("Pose detection failed: {0}")]
    Detection(String),
    #[error("Frame capture failed: {0}")]
    FrameCapture(String),
    #[error("Cannot {action} while session is {from}")]
    InvalidTransition {
        from: SessionState,
        action: &'static str,
    },
    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CoachError {
    /// Resource acquisition failures end the session until the user retries
    pub fn is_resource_failure(&self) -> bool {
        matches!(
            self,
            CoachError::CameraPermissionDenied
                | CoachError::CameraUnavailable(_)
                | CoachError::ModelLoad(_)
        )
    }
}
