pub mod app;

pub use app::{CoachConfig, DetectionConfig, FacingMode, LoggingConfig, PlanApiConfig, StorageConfig};
