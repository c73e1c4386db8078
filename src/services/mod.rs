// Form analysis, detection loop and plan services

pub mod detection_loop;
pub mod feedback;
pub mod form_analyzer;
pub mod joint_angle;
pub mod pose_detector;
pub mod smoothing;
pub mod workout_plan_service;

pub use detection_loop::{CoachSession, SessionCommand, SessionHandle, SessionState, TickOutcome};
pub use feedback::{band, classify, Band, Banding};
pub use form_analyzer::{measure_angle, FormAnalyzer};
pub use joint_angle::{angle_between, joint_angle, joint_angle_checked};
pub use pose_detector::{
    CameraConstraints, CameraDevice, CameraGuard, CameraStream, DetectorGuard, DetectorLoader,
    PoseDetector,
};
pub use smoothing::{RollingBuffer, TemporalSmoother};
pub use workout_plan_service::{PlanOutcome, PlanSource, WorkoutPlanService};
