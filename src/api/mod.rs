use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::PlanApiConfig;
use crate::models::{parse_plan, Goals, HealthStats, PlanRequest, WorkoutPlan};

pub mod error;

pub use error::PlanError;

/// Error body returned by the plan service
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    raw_response: Option<String>,
}

/// Health check response
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Client for the generative workout plan service
pub struct PlanClient {
    client: Client,
    base_url: String,
}

impl PlanClient {
    /// Create a new plan client
    pub fn new(config: &PlanApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request a personalized plan for the given stats and goals
    pub async fn generate_plan(
        &self,
        health_stats: &HealthStats,
        goals: &Goals,
    ) -> Result<WorkoutPlan, PlanError> {
        let url = format!("{}/generate-workout", self.base_url);

        tracing::debug!("Requesting workout plan from {}", url);

        let response = self
            .client
            .post(&url)
            .json(&PlanRequest {
                health_stats,
                goals,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error: ErrorResponse = serde_json::from_str(&body).unwrap_or_default();
            return Err(PlanError::from_status(
                status,
                error.message.unwrap_or_default(),
                error.raw_response,
            ));
        }

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| PlanError::MalformedPlan(format!("invalid JSON: {}", e)))?;
        let plan = parse_plan(value)?;

        tracing::info!("Received workout plan with {} days", plan.len());
        Ok(plan)
    }

    /// Check whether the plan service is reachable
    pub async fn health(&self) -> Result<HealthResponse, PlanError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(PlanError::from_status(status, String::new(), None));
        }

        Ok(response.json().await?)
    }
}
