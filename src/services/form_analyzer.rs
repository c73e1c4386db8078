/// Exercise form analyzer
///
/// One call per detection tick: measures the active profile's angles on the
/// detected pose, feeds them through the temporal smoother and bands the
/// smoothed values into a metrics snapshot.

use chrono::Utc;

use crate::config::DetectionConfig;
use crate::models::{
    AngleMetric, AngleSpec, DetectedPose, ExerciseProfile, ExerciseType, JointRef,
    MetricsSnapshot, Side,
};
use crate::services::feedback::classify;
use crate::services::joint_angle::angle_between;
use crate::services::smoothing::TemporalSmoother;

/// Resolve one point of an angle triple on a given side of the body
fn resolve_point(
    joint: JointRef,
    side: Side,
    pose: &DetectedPose,
    min_confidence: f32,
) -> Option<(f32, f32)> {
    let kp = pose.detected(joint.anchor().on(side), min_confidence)?;
    match joint {
        JointRef::Body(_) => Some((kp.x, kp.y)),
        // Image y grows downwards
        JointRef::VerticalAbove(_) => Some((kp.x, kp.y - 1.0)),
    }
}

fn measure_side(
    spec: &AngleSpec,
    side: Side,
    pose: &DetectedPose,
    min_confidence: f32,
) -> Option<f32> {
    let (a, b, c) = spec.joints;
    angle_between(
        resolve_point(a, side, pose, min_confidence)?,
        resolve_point(b, side, pose, min_confidence)?,
        resolve_point(c, side, pose, min_confidence)?,
    )
}

/// Raw angle: mean of the detectable body sides
///
/// Each side is measured with its own limbs only. `None` when neither side
/// is detectable.
pub fn measure_angle(spec: &AngleSpec, pose: &DetectedPose, min_confidence: f32) -> Option<f32> {
    let sides: Vec<f32> = Side::BOTH
        .iter()
        .filter_map(|side| measure_side(spec, *side, pose, min_confidence))
        .collect();

    if sides.is_empty() {
        None
    } else {
        Some(sides.iter().sum::<f32>() / sides.len() as f32)
    }
}

/// Per-exercise analysis state
#[derive(Debug, Clone)]
pub struct FormAnalyzer {
    profile: ExerciseProfile,
    smoother: TemporalSmoother,
    min_confidence: f32,
    ticks: u64,
}

impl FormAnalyzer {
    pub fn new(exercise: ExerciseType, window_size: usize, min_confidence: f32) -> Self {
        Self {
            profile: ExerciseProfile::for_exercise(exercise),
            smoother: TemporalSmoother::new(window_size),
            min_confidence: min_confidence.clamp(0.0, 1.0),
            ticks: 0,
        }
    }

    pub fn from_config(exercise: ExerciseType, config: &DetectionConfig) -> Self {
        Self::new(exercise, config.smoothing_window, config.min_confidence)
    }

    pub fn profile(&self) -> &ExerciseProfile {
        &self.profile
    }

    pub fn exercise(&self) -> ExerciseType {
        self.profile.exercise
    }

    /// Switch exercise; angle history never carries over
    pub fn select_exercise(&mut self, exercise: ExerciseType) {
        self.profile = ExerciseProfile::for_exercise(exercise);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.smoother.reset();
        self.ticks = 0;
    }

    /// Snapshot with every angle undetected
    pub fn empty_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot::empty(&self.profile)
    }

    /// Analyse one pose and produce the snapshot for this tick
    pub fn analyze(&mut self, pose: &DetectedPose) -> MetricsSnapshot {
        for spec in self.profile.angles {
            match measure_angle(spec, pose, self.min_confidence) {
                Some(raw) => self.smoother.update(spec.kind, raw),
                None => tracing::trace!("{} angle not detected this tick", spec.kind),
            }
        }
        self.ticks += 1;

        let angles = self
            .profile
            .angles
            .iter()
            .map(|spec| self.metric(spec))
            .collect();

        MetricsSnapshot {
            exercise: self.profile.exercise,
            tick: self.ticks,
            updated_at: Some(Utc::now()),
            angles,
        }
    }

    fn metric(&self, spec: &AngleSpec) -> AngleMetric {
        if !self.smoother.has_samples(spec.kind) {
            return AngleMetric::undetected(spec.kind);
        }

        let value = self.smoother.average(spec.kind);
        let banding = classify(value, spec);
        AngleMetric {
            kind: spec.kind,
            value: Some(value),
            feedback: banding.feedback,
            bar: banding.bar,
            tier: banding.tier,
        }
    }
}
