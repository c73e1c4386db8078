mod common;

use anyhow::Result;
use assert_matches::assert_matches;
use common::init_test_logging;
use form_coach::api::{PlanClient, PlanError};
use form_coach::config::PlanApiConfig;
use form_coach::models::{default_plan, Goals, HealthStats};
use form_coach::services::{PlanSource, WorkoutPlanService};
use form_coach::storage::PlanCache;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Fixture {
    server: MockServer,
    service: WorkoutPlanService,
    _dir: TempDir,
}

async fn fixture() -> Result<Fixture> {
    init_test_logging();
    let server = MockServer::start().await;
    let client = PlanClient::new(&PlanApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    })?;

    let dir = tempdir()?;
    let cache = PlanCache::open(&dir.path().join("cache"))?;

    Ok(Fixture {
        server,
        service: WorkoutPlanService::new(client, cache),
        _dir: dir,
    })
}

fn user_data() -> (HealthStats, Goals) {
    let stats = HealthStats {
        age: Some(34),
        weight: Some(72.5),
        height: Some(178.0),
        fitness_level: Some("intermediate".to_string()),
        ..Default::default()
    };
    let goals = Goals {
        primary_goal: Some("Build strength".to_string()),
        workout_frequency: Some("3 times a week".to_string()),
        muscle_groups: vec!["legs".to_string(), "core".to_string()],
        ..Default::default()
    };
    (stats, goals)
}

fn generated_plan() -> serde_json::Value {
    json!([
        {
            "day": "Day 1",
            "focus": "Legs",
            "exercises": ["Goblet Squats 3x12", "Walking Lunges 3x10"],
            "duration": "50 min",
            "difficulty": "Intermediate"
        },
        {
            "day": "Day 2",
            "focus": "Core",
            "exercises": ["Planks 3x45s"]
        }
    ])
}

#[tokio::test]
async fn test_server_error_falls_back_to_default_plan() -> Result<()> {
    let fx = fixture().await?;
    Mock::given(method("POST"))
        .and(path("/generate-workout"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "AI error" })))
        .expect(1)
        .mount(&fx.server)
        .await;

    let (stats, goals) = user_data();
    let outcome = fx.service.load_plan(Some(&stats), Some(&goals)).await;

    assert_eq!(outcome.source, PlanSource::Fallback);
    assert_eq!(outcome.plan, default_plan());
    assert_eq!(outcome.plan.len(), 3);
    assert_eq!(outcome.error.as_deref(), Some("AI error"));
    Ok(())
}

#[tokio::test]
async fn test_raw_response_is_previewed_in_error() -> Result<()> {
    let fx = fixture().await?;
    let raw = "Here is your plan: ".repeat(20);
    Mock::given(method("POST"))
        .and(path("/generate-workout"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Failed to parse AI response",
            "rawResponse": raw,
        })))
        .mount(&fx.server)
        .await;

    let (stats, goals) = user_data();
    let outcome = fx.service.load_plan(Some(&stats), Some(&goals)).await;

    let expected = format!(
        "Failed to parse AI response Raw: {}...",
        raw.chars().take(100).collect::<String>()
    );
    assert_eq!(outcome.error, Some(expected));
    assert_eq!(outcome.source, PlanSource::Fallback);
    Ok(())
}

#[tokio::test]
async fn test_rate_limit_has_its_own_message() -> Result<()> {
    let fx = fixture().await?;
    Mock::given(method("POST"))
        .and(path("/generate-workout"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({ "message": "quota" })))
        .mount(&fx.server)
        .await;

    let (stats, goals) = user_data();
    let outcome = fx.service.load_plan(Some(&stats), Some(&goals)).await;

    assert_eq!(outcome.source, PlanSource::Fallback);
    assert_eq!(
        outcome.error.as_deref(),
        Some("The AI service is receiving too many requests. Please wait a moment and try again.")
    );
    Ok(())
}

#[tokio::test]
async fn test_relayed_rate_limit_gets_rate_limit_message() -> Result<()> {
    let fx = fixture().await?;
    Mock::given(method("POST"))
        .and(path("/generate-workout"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Gemini API Rate Limit Exceeded. Please wait and try again."
        })))
        .mount(&fx.server)
        .await;

    let (stats, goals) = user_data();
    let outcome = fx.service.load_plan(Some(&stats), Some(&goals)).await;

    assert_eq!(outcome.source, PlanSource::Fallback);
    assert_eq!(
        outcome.error.as_deref(),
        Some("The AI service is receiving too many requests. Please wait a moment and try again.")
    );
    Ok(())
}

#[tokio::test]
async fn test_malformed_plan_falls_back() -> Result<()> {
    let fx = fixture().await?;
    Mock::given(method("POST"))
        .and(path("/generate-workout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "day": "Day 1" }])))
        .mount(&fx.server)
        .await;

    let (stats, goals) = user_data();
    let outcome = fx.service.load_plan(Some(&stats), Some(&goals)).await;

    assert_eq!(outcome.source, PlanSource::Fallback);
    assert_eq!(outcome.plan.len(), 3);
    assert_eq!(
        outcome.error.as_deref(),
        Some("AI response was not in the expected format. Please try again.")
    );
    Ok(())
}

#[tokio::test]
async fn test_generated_plan_is_cached() -> Result<()> {
    let fx = fixture().await?;
    Mock::given(method("POST"))
        .and(path("/generate-workout"))
        .and(body_partial_json(json!({
            "healthStats": { "age": 34, "fitnessLevel": "intermediate" },
            "goals": { "primaryGoal": "Build strength" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(generated_plan()))
        .expect(1)
        .mount(&fx.server)
        .await;

    let (stats, goals) = user_data();
    let first = fx.service.load_plan(Some(&stats), Some(&goals)).await;
    assert_eq!(first.source, PlanSource::Generated);
    assert_eq!(first.plan.len(), 2);
    assert_eq!(first.plan[0].focus, "Legs");
    assert!(first.error.is_none());

    let second = fx.service.load_plan(Some(&stats), Some(&goals)).await;
    assert_eq!(second.source, PlanSource::Cached);
    assert_eq!(second.plan, first.plan);
    Ok(())
}

#[tokio::test]
async fn test_clearing_cache_regenerates() -> Result<()> {
    let fx = fixture().await?;
    Mock::given(method("POST"))
        .and(path("/generate-workout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generated_plan()))
        .expect(2)
        .mount(&fx.server)
        .await;

    let (stats, goals) = user_data();
    fx.service.load_plan(Some(&stats), Some(&goals)).await;
    assert!(fx.service.clear_cached_plan()?);

    let outcome = fx.service.load_plan(Some(&stats), Some(&goals)).await;
    assert_eq!(outcome.source, PlanSource::Generated);
    Ok(())
}

#[tokio::test]
async fn test_missing_user_data_uses_default_without_network() -> Result<()> {
    let fx = fixture().await?;
    Mock::given(method("POST"))
        .and(path("/generate-workout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generated_plan()))
        .expect(0)
        .mount(&fx.server)
        .await;

    let (stats, _) = user_data();
    let outcome = fx.service.load_plan(Some(&stats), None).await;
    assert_eq!(outcome.source, PlanSource::Default);
    assert_eq!(outcome.plan, default_plan());
    assert!(outcome.error.is_none());

    let empty = fx
        .service
        .load_plan(Some(&HealthStats::default()), Some(&Goals::default()))
        .await;
    assert_eq!(empty.source, PlanSource::Default);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_service_falls_back() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    // Nothing listens on port 9 locally
    let client = PlanClient::new(&PlanApiConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_seconds: 2,
    })?;
    let service = WorkoutPlanService::new(client, PlanCache::open(&dir.path().join("cache"))?);

    let (stats, goals) = user_data();
    let outcome = service.load_plan(Some(&stats), Some(&goals)).await;

    assert_eq!(outcome.source, PlanSource::Fallback);
    assert_eq!(outcome.error.as_deref(), Some("Failed to fetch workout plan"));
    Ok(())
}

#[tokio::test]
async fn test_client_maps_upstream_errors() -> Result<()> {
    let fx = fixture().await?;
    Mock::given(method("POST"))
        .and(path("/generate-workout"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&fx.server)
        .await;

    let (stats, goals) = user_data();
    let result = fx.service.client().generate_plan(&stats, &goals).await;

    assert_matches!(
        result,
        Err(PlanError::Upstream { status: 503, ref message, raw_response: None })
            if message == "Service Unavailable"
    );
    Ok(())
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let fx = fixture().await?;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "message": "Server is running"
        })))
        .mount(&fx.server)
        .await;

    let health = fx.service.client().health().await?;
    assert_eq!(health.status, "ok");
    assert_eq!(health.message.as_deref(), Some("Server is running"));
    Ok(())
}
