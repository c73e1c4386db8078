// Real-time exercise form coaching
//
// Measures joint angles on detected poses, smooths them over a short
// window, and grades them against per-exercise ideals. Also resolves the
// user's workout plan from a generative plan service with a local cache
// and a default fallback.

pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;
pub mod telemetry;

pub use errors::CoachError;
