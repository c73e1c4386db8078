use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::PlanError;

/// Body stats collected by the intake form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Centimetres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_conditions: Option<String>,
}

impl HealthStats {
    pub fn is_empty(&self) -> bool {
        self == &HealthStats::default()
    }
}

/// Training goals collected by the intake form (every field optional)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub muscle_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_equipment: Option<String>,
}

impl Goals {
    pub fn is_empty(&self) -> bool {
        self == &Goals::default()
    }
}

/// Body of the plan generation request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest<'a> {
    pub health_stats: &'a HealthStats,
    pub goals: &'a Goals,
}

/// One day of a workout plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlanItem {
    pub day: String,
    pub focus: String,
    pub exercises: Vec<String>,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub difficulty: String,
}

impl WorkoutPlanItem {
    fn new(day: &str, focus: &str, exercises: &[&str], duration: &str, difficulty: &str) -> Self {
        Self {
            day: day.to_string(),
            focus: focus.to_string(),
            exercises: exercises.iter().map(|e| e.to_string()).collect(),
            duration: duration.to_string(),
            difficulty: difficulty.to_string(),
        }
    }
}

/// Ordered list of plan days
pub type WorkoutPlan = Vec<WorkoutPlanItem>;

/// Plan shown when there is no user data or generation failed
pub fn default_plan() -> WorkoutPlan {
    vec![
        WorkoutPlanItem::new(
            "Day 1",
            "Upper Body",
            &["Push-ups", "Pull-ups", "Shoulder Press", "Tricep Dips"],
            "45 min",
            "Intermediate",
        ),
        WorkoutPlanItem::new(
            "Day 2",
            "Lower Body",
            &["Squats", "Lunges", "Deadlifts", "Calf Raises"],
            "50 min",
            "Intermediate",
        ),
        WorkoutPlanItem::new(
            "Day 3",
            "Core & Cardio",
            &["Planks", "Russian Twists", "Mountain Climbers", "Burpees"],
            "40 min",
            "Beginner",
        ),
    ]
}

/// Validate a raw plan response and convert it into a plan
///
/// Every element must be an object with a non-empty `day`, a non-empty
/// `focus` and an `exercises` array.
pub fn parse_plan(value: Value) -> Result<WorkoutPlan, PlanError> {
    let items = value
        .as_array()
        .ok_or_else(|| PlanError::MalformedPlan("plan is not a JSON array".to_string()))?;

    for (index, item) in items.iter().enumerate() {
        let non_empty = |field: &str| {
            item.get(field)
                .and_then(Value::as_str)
                .map_or(false, |s| !s.is_empty())
        };
        if !non_empty("day") || !non_empty("focus") {
            return Err(PlanError::MalformedPlan(format!(
                "item {} is missing a day or focus",
                index
            )));
        }
        if !item.get("exercises").map_or(false, Value::is_array) {
            return Err(PlanError::MalformedPlan(format!(
                "item {} has no exercises array",
                index
            )));
        }
    }

    serde_json::from_value(value).map_err(|e| PlanError::MalformedPlan(e.to_string()))
}

/// Plan persisted in the local cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPlan {
    pub plan: WorkoutPlan,
    pub saved_at: DateTime<Utc>,
}
