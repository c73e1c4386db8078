/// Workout Plan Service
///
/// Resolves the plan shown to the user: a cached plan wins, users without
/// health data get the default plan, and everyone else gets a generated plan
/// that is cached on success. Generation failures never leave the user
/// without a plan: the default plan is returned with the error text.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{PlanClient, PlanError};
use crate::models::{default_plan, Goals, HealthStats, WorkoutPlan};
use crate::storage::PlanCache;

/// Where a plan came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    Cached,
    Generated,
    /// No user data to personalize with
    Default,
    /// Generation failed
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub plan: WorkoutPlan,
    pub source: PlanSource,
    /// User-facing error text when generation failed
    pub error: Option<String>,
}

impl PlanOutcome {
    fn new(plan: WorkoutPlan, source: PlanSource) -> Self {
        Self {
            plan,
            source,
            error: None,
        }
    }

    fn fallback(error: &PlanError) -> Self {
        Self {
            plan: default_plan(),
            source: PlanSource::Fallback,
            error: Some(error.user_message()),
        }
    }
}

pub struct WorkoutPlanService {
    client: PlanClient,
    cache: PlanCache,
}

impl WorkoutPlanService {
    pub fn new(client: PlanClient, cache: PlanCache) -> Self {
        Self { client, cache }
    }

    pub fn client(&self) -> &PlanClient {
        &self.client
    }

    /// Resolve the plan for a user
    pub async fn load_plan(
        &self,
        health_stats: Option<&HealthStats>,
        goals: Option<&Goals>,
    ) -> PlanOutcome {
        match self.cache.load_plan() {
            Ok(Some(cached)) => {
                debug!("Using workout plan cached at {}", cached.saved_at);
                return PlanOutcome::new(cached.plan, PlanSource::Cached);
            }
            Ok(None) => {}
            // An unreadable cache is treated as empty
            Err(e) => warn!("Failed to read cached plan: {:#}", e),
        }

        let (health_stats, goals) = match (health_stats, goals) {
            (Some(stats), Some(goals)) if !stats.is_empty() && !goals.is_empty() => (stats, goals),
            _ => {
                info!("No health data or goals, using default plan");
                return PlanOutcome::new(default_plan(), PlanSource::Default);
            }
        };

        let plan = match self.client.generate_plan(health_stats, goals).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!("Plan generation failed, falling back to default plan: {}", e);
                return PlanOutcome::fallback(&e);
            }
        };

        if let Err(e) = self.cache.save_plan(&plan) {
            warn!("Failed to cache workout plan: {:#}", e);
        }

        PlanOutcome::new(plan, PlanSource::Generated)
    }

    /// Forget the cached plan so the next load regenerates it
    pub fn clear_cached_plan(&self) -> Result<bool, PlanError> {
        self.cache
            .clear()
            .map_err(|e| PlanError::Cache(format!("{:#}", e)))
    }
}
