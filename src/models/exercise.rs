/// Exercise pose model
///
/// Each supported exercise maps to a fixed set of joint angles that are most
/// diagnostic for its form, together with the ideal value, the display and
/// excellent ranges and the corrective messages for each angle. All of it is
/// static data selected by exercise; nothing is derived at runtime.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoachError;
use crate::models::keypoint::CocoKeypoint;

/// Exercise types supported by the form analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseType {
    Squat,
    PushUp,
    Lunge,
    Deadlift,
    Plank,
}

impl ExerciseType {
    pub fn all() -> [ExerciseType; 5] {
        [
            ExerciseType::Squat,
            ExerciseType::PushUp,
            ExerciseType::Lunge,
            ExerciseType::Deadlift,
            ExerciseType::Plank,
        ]
    }
}

impl std::fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExerciseType::Squat => write!(f, "squat"),
            ExerciseType::PushUp => write!(f, "push-up"),
            ExerciseType::Lunge => write!(f, "lunge"),
            ExerciseType::Deadlift => write!(f, "deadlift"),
            ExerciseType::Plank => write!(f, "plank"),
        }
    }
}

impl FromStr for ExerciseType {
    type Err = CoachError;

    /// Accepts the names used by the exercise picker ("Push-ups", "Squats", ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        match normalized.as_str() {
            "squat" | "squats" => Ok(ExerciseType::Squat),
            "push-up" | "push-ups" | "pushup" | "pushups" => Ok(ExerciseType::PushUp),
            "lunge" | "lunges" => Ok(ExerciseType::Lunge),
            "deadlift" | "deadlifts" => Ok(ExerciseType::Deadlift),
            "plank" | "planks" => Ok(ExerciseType::Plank),
            _ => Err(CoachError::UnknownExercise(s.to_string())),
        }
    }
}

/// Semantic name of a tracked angle, unique within a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleKind {
    Knee,
    Hip,
    Back,
    Elbow,
    Torso,
    BodyLine,
}

impl AngleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AngleKind::Knee => "knee",
            AngleKind::Hip => "hip",
            AngleKind::Back => "back",
            AngleKind::Elbow => "elbow",
            AngleKind::Torso => "torso",
            AngleKind::BodyLine => "body_line",
        }
    }
}

impl std::fmt::Display for AngleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body side used when resolving a side-agnostic joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

/// Side-agnostic joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    Ear,
    Shoulder,
    Elbow,
    Wrist,
    Hip,
    Knee,
    Ankle,
}

impl Joint {
    /// Resolve to the COCO keypoint on one side of the body
    pub fn on(self, side: Side) -> CocoKeypoint {
        use CocoKeypoint::*;
        match (self, side) {
            (Joint::Ear, Side::Left) => LeftEar,
            (Joint::Ear, Side::Right) => RightEar,
            (Joint::Shoulder, Side::Left) => LeftShoulder,
            (Joint::Shoulder, Side::Right) => RightShoulder,
            (Joint::Elbow, Side::Left) => LeftElbow,
            (Joint::Elbow, Side::Right) => RightElbow,
            (Joint::Wrist, Side::Left) => LeftWrist,
            (Joint::Wrist, Side::Right) => RightWrist,
            (Joint::Hip, Side::Left) => LeftHip,
            (Joint::Hip, Side::Right) => RightHip,
            (Joint::Knee, Side::Left) => LeftKnee,
            (Joint::Knee, Side::Right) => RightKnee,
            (Joint::Ankle, Side::Left) => LeftAnkle,
            (Joint::Ankle, Side::Right) => RightAnkle,
        }
    }
}

/// A point of an angle triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointRef {
    /// A detected joint
    Body(Joint),
    /// Synthetic point straight above a joint, for tilt-from-vertical angles
    VerticalAbove(Joint),
}

impl JointRef {
    /// The joint whose keypoint backs this reference
    pub fn anchor(&self) -> Joint {
        match self {
            JointRef::Body(joint) | JointRef::VerticalAbove(joint) => *joint,
        }
    }
}

/// A named angle of interest for one exercise
///
/// The angle is measured at `joints.1` between the rays towards `joints.0`
/// and `joints.2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSpec {
    pub kind: AngleKind,
    pub joints: (JointRef, JointRef, JointRef),
    pub ideal: f32,
    /// Maximum deviation from ideal still shown on the feedback bar
    pub display_range: f32,
    /// Deviation tolerated as correct form
    pub excellent_range: f32,
    /// Shown when the angle is above ideal by more than the excellent range
    pub over_message: &'static str,
    /// Shown when the angle is below ideal by more than the excellent range
    pub under_message: &'static str,
}

impl AngleSpec {
    pub fn validate(&self) -> Result<(), CoachError> {
        if !(self.excellent_range >= 0.0 && self.display_range >= self.excellent_range) {
            return Err(CoachError::InvalidConfig(format!(
                "{} angle: display range {} must be >= excellent range {}",
                self.kind, self.display_range, self.excellent_range
            )));
        }
        Ok(())
    }
}

/// The set of tracked angles for one exercise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseProfile {
    pub exercise: ExerciseType,
    pub angles: &'static [AngleSpec],
}

impl ExerciseProfile {
    /// Look up the profile of an exercise
    pub fn for_exercise(exercise: ExerciseType) -> Self {
        let angles = match exercise {
            ExerciseType::Squat => SQUAT,
            ExerciseType::PushUp => PUSH_UP,
            ExerciseType::Lunge => LUNGE,
            ExerciseType::Deadlift => DEADLIFT,
            ExerciseType::Plank => PLANK,
        };
        Self { exercise, angles }
    }

    pub fn angle(&self, kind: AngleKind) -> Option<&'static AngleSpec> {
        self.angles.iter().find(|spec| spec.kind == kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = AngleKind> + '_ {
        self.angles.iter().map(|spec| spec.kind)
    }
}

use Joint::*;
use JointRef::{Body, VerticalAbove};

const SQUAT: &[AngleSpec] = &[
    AngleSpec {
        kind: AngleKind::Knee,
        joints: (Body(Hip), Body(Knee), Body(Ankle)),
        ideal: 70.0,
        display_range: 100.0,
        excellent_range: 15.0,
        over_message: "Squat deeper",
        under_message: "Don't squat too deep",
    },
    AngleSpec {
        kind: AngleKind::Hip,
        joints: (Body(Shoulder), Body(Hip), Body(Knee)),
        ideal: 75.0,
        display_range: 90.0,
        excellent_range: 15.0,
        over_message: "Push your hips back",
        under_message: "Keep your chest up",
    },
    AngleSpec {
        kind: AngleKind::Back,
        joints: (Body(Shoulder), Body(Hip), VerticalAbove(Hip)),
        ideal: 30.0,
        display_range: 45.0,
        excellent_range: 10.0,
        over_message: "Don't lean forward so much",
        under_message: "Lean forward slightly",
    },
];

const PUSH_UP: &[AngleSpec] = &[
    AngleSpec {
        kind: AngleKind::Elbow,
        joints: (Body(Shoulder), Body(Elbow), Body(Wrist)),
        ideal: 90.0,
        display_range: 90.0,
        excellent_range: 15.0,
        over_message: "Lower your chest more",
        under_message: "Don't go too low",
    },
    AngleSpec {
        kind: AngleKind::Back,
        joints: (Body(Shoulder), Body(Hip), Body(Ankle)),
        ideal: 180.0,
        display_range: 30.0,
        excellent_range: 10.0,
        over_message: "Keep your body in a straight line",
        under_message: "Keep your body in a straight line",
    },
];

const LUNGE: &[AngleSpec] = &[
    AngleSpec {
        kind: AngleKind::Knee,
        joints: (Body(Hip), Body(Knee), Body(Ankle)),
        ideal: 90.0,
        display_range: 60.0,
        excellent_range: 10.0,
        over_message: "Lower your back knee",
        under_message: "Don't drop too low",
    },
    AngleSpec {
        kind: AngleKind::Torso,
        joints: (Body(Shoulder), Body(Hip), VerticalAbove(Hip)),
        ideal: 0.0,
        display_range: 40.0,
        excellent_range: 10.0,
        over_message: "Keep your torso upright",
        under_message: "Keep your torso upright",
    },
];

const DEADLIFT: &[AngleSpec] = &[
    AngleSpec {
        kind: AngleKind::Hip,
        joints: (Body(Shoulder), Body(Hip), Body(Knee)),
        ideal: 95.0,
        display_range: 85.0,
        excellent_range: 15.0,
        over_message: "Hinge further at the hips",
        under_message: "Don't fold over the bar",
    },
    AngleSpec {
        kind: AngleKind::Knee,
        joints: (Body(Hip), Body(Knee), Body(Ankle)),
        ideal: 150.0,
        display_range: 30.0,
        excellent_range: 15.0,
        over_message: "Soften your knees",
        under_message: "Don't squat the weight up",
    },
    AngleSpec {
        kind: AngleKind::Back,
        joints: (Body(Ear), Body(Shoulder), Body(Hip)),
        ideal: 175.0,
        display_range: 35.0,
        excellent_range: 10.0,
        over_message: "Keep your back flat and neck neutral",
        under_message: "Keep your back flat and neck neutral",
    },
];

const PLANK: &[AngleSpec] = &[
    AngleSpec {
        kind: AngleKind::BodyLine,
        joints: (Body(Shoulder), Body(Hip), Body(Ankle)),
        ideal: 180.0,
        display_range: 30.0,
        excellent_range: 8.0,
        over_message: "Keep your hips level",
        under_message: "Keep your hips level",
    },
    AngleSpec {
        kind: AngleKind::Elbow,
        joints: (Body(Shoulder), Body(Elbow), Body(Wrist)),
        ideal: 90.0,
        display_range: 45.0,
        excellent_range: 15.0,
        over_message: "Bring your elbows under your shoulders",
        under_message: "Move your elbows forward",
    },
];
