// Data models for form analysis and workout plans

pub mod exercise;
pub mod keypoint;
pub mod metrics;
pub mod workout_plan;

pub use exercise::*;
pub use keypoint::*;
pub use metrics::*;
pub use workout_plan::*;
