// Local plan cache on a sled embedded database

use anyhow::{Context, Result};
use chrono::Utc;
use sled::Db;
use std::path::Path;

use crate::config::CoachConfig;
use crate::models::{CachedPlan, WorkoutPlan};

const PLANS_TREE: &str = "plans";
const PLAN_KEY: &str = "workoutPlan";

/// Persistent store for the last generated workout plan
pub struct PlanCache {
    db: Db,
}

impl PlanCache {
    /// Open (or create) a cache at the given directory
    pub fn open(path: &Path) -> Result<Self> {
        tracing::info!("Opening plan cache at {:?}", path);

        let db = sled::open(path).context("Failed to open sled database")?;

        Ok(Self { db })
    }

    /// Open the cache at the configured location
    pub fn open_default(config: &CoachConfig) -> Result<Self> {
        let path = config.cache_path()?;
        Self::open(&path)
    }

    /// Load the cached plan, if any
    pub fn load_plan(&self) -> Result<Option<CachedPlan>> {
        let tree = self
            .db
            .open_tree(PLANS_TREE)
            .context("Failed to open plans tree")?;

        match tree.get(PLAN_KEY).context("Failed to read cached plan")? {
            Some(value) => {
                let cached: CachedPlan =
                    serde_json::from_slice(&value).context("Failed to deserialize cached plan")?;
                Ok(Some(cached))
            }
            None => Ok(None),
        }
    }

    /// Replace the cached plan
    pub fn save_plan(&self, plan: &WorkoutPlan) -> Result<CachedPlan> {
        let tree = self
            .db
            .open_tree(PLANS_TREE)
            .context("Failed to open plans tree")?;

        let cached = CachedPlan {
            plan: plan.clone(),
            saved_at: Utc::now(),
        };
        let value = serde_json::to_vec(&cached).context("Failed to serialize plan")?;

        tree.insert(PLAN_KEY, value)
            .context("Failed to insert plan")?;

        self.db.flush().context("Failed to flush database")?;

        tracing::debug!("Cached workout plan with {} days", plan.len());
        Ok(cached)
    }

    /// Remove the cached plan. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        let tree = self
            .db
            .open_tree(PLANS_TREE)
            .context("Failed to open plans tree")?;

        let removed = tree.remove(PLAN_KEY).context("Failed to remove plan")?;

        self.db.flush().context("Failed to flush database")?;

        Ok(removed.is_some())
    }
}
