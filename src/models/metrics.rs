use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::exercise::{AngleKind, ExerciseProfile, ExerciseType};

/// Color tier used by the overlay to render a feedback bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTier {
    /// Within the excellent range
    Good,
    /// Off ideal but still on the bar
    Caution,
    /// Off-scale or not detected
    Hidden,
}

/// Normalized position of the current angle on the feedback bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedbackBar {
    /// 0.0 = ideal - display range, 1.0 = ideal + display range
    pub position: f32,
    pub ideal_position: f32,
}

/// Per-angle entry of a metrics snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleMetric {
    pub kind: AngleKind,
    /// Smoothed angle in degrees, `None` until the angle has been detected
    pub value: Option<f32>,
    pub feedback: String,
    pub bar: Option<FeedbackBar>,
    pub tier: ColorTier,
}

impl AngleMetric {
    pub fn undetected(kind: AngleKind) -> Self {
        Self {
            kind,
            value: None,
            feedback: String::new(),
            bar: None,
            tier: ColorTier::Hidden,
        }
    }
}

/// Output of one detection tick, republished for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub exercise: ExerciseType,
    /// Number of ticks that produced this snapshot since the last reset
    pub tick: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub angles: Vec<AngleMetric>,
}

impl MetricsSnapshot {
    /// Empty snapshot carrying every angle of the profile as undetected
    pub fn empty(profile: &ExerciseProfile) -> Self {
        Self {
            exercise: profile.exercise,
            tick: 0,
            updated_at: None,
            angles: profile.kinds().map(AngleMetric::undetected).collect(),
        }
    }

    pub fn angle(&self, kind: AngleKind) -> Option<&AngleMetric> {
        self.angles.iter().find(|metric| metric.kind == kind)
    }
}
