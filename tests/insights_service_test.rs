// ABOUTME: Integration tests for insight generation and the regeneration gate
// ABOUTME: Covers data preconditions, cooldown enforcement, and persistence
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use common::{create_test_database, insights_response, seed_sessions, MockExtractor};
use trainlog::database_plugins::StorageProvider;
use trainlog::errors::ErrorCode;
use trainlog::insights::{InsightService, NOT_ENOUGH_DATA_MESSAGE};

#[tokio::test]
async fn test_generate_requires_minimum_sessions() {
    let database = create_test_database().await;
    let extractor = MockExtractor::with_responses(vec![Ok(insights_response())]);
    let service = InsightService::new(extractor.clone(), database.clone());
    let user_id = Uuid::new_v4();
    seed_sessions(&database, user_id, 2).await;

    let error = service.generate(user_id).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::InsufficientData);
    assert_eq!(error.message, NOT_ENOUGH_DATA_MESSAGE);
    assert_eq!(extractor.call_count(), 0);
}

#[tokio::test]
async fn test_fetch_below_minimum_reports_not_enough_data() {
    let database = create_test_database().await;
    let extractor = MockExtractor::with_responses(vec![]);
    let service = InsightService::new(extractor, database.clone());
    let user_id = Uuid::new_v4();
    seed_sessions(&database, user_id, 1).await;

    let report = service.fetch(user_id).await.unwrap();

    assert_eq!(report.message, NOT_ENOUGH_DATA_MESSAGE);
    assert!(report.insights.is_none());
    assert!(!report.can_regenerate);
}

#[tokio::test]
async fn test_fetch_with_enough_data_but_no_insight_invites_generation() {
    let database = create_test_database().await;
    let extractor = MockExtractor::with_responses(vec![]);
    let service = InsightService::new(extractor, database.clone());
    let user_id = Uuid::new_v4();
    seed_sessions(&database, user_id, 3).await;

    let report = service.fetch(user_id).await.unwrap();

    assert_eq!(report.message, "No insights yet. Generate your first insights!");
    assert!(report.insights.is_none());
    assert!(report.can_regenerate);
}

#[tokio::test]
async fn test_generate_persists_and_sets_cooldown() {
    let database = create_test_database().await;
    let extractor = MockExtractor::with_responses(vec![Ok(insights_response())]);
    let service = InsightService::new(extractor, database.clone());
    let user_id = Uuid::new_v4();
    seed_sessions(&database, user_id, 3).await;
    let now = Utc::now();

    let report = service.generate_at(user_id, now).await.expect("generation");

    let insight = report.insights.expect("insight should be returned");
    assert_eq!(insight.achievements.len(), 3);
    assert_eq!(insight.can_regenerate_after, now + Duration::hours(24));
    assert!(!report.can_regenerate);
    assert_eq!(report.can_regenerate_at, Some(insight.can_regenerate_after));

    // The stored record round-trips through fetch
    let fetched = service.fetch_at(user_id, now).await.unwrap();
    assert_eq!(fetched.insights, Some(insight));
    assert!(!fetched.can_regenerate);
}

#[tokio::test]
async fn test_second_generation_within_cooldown_is_rate_limited() {
    let database = create_test_database().await;
    let extractor =
        MockExtractor::with_responses(vec![Ok(insights_response()), Ok(insights_response())]);
    let service = InsightService::new(extractor.clone(), database.clone());
    let user_id = Uuid::new_v4();
    seed_sessions(&database, user_id, 3).await;
    let now = Utc::now();

    let first = service.generate_at(user_id, now).await.unwrap();
    let unlock_at = first.can_regenerate_at.unwrap();

    let error = service.generate_at(user_id, now + Duration::hours(1)).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::RateLimitExceeded);
    assert_eq!(error.message, "Please wait 23 hour(s) before generating new insights.");
    let reported: DateTime<Utc> = error.context.details["canRegenerateAt"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(reported, unlock_at);
    // The previous insight rides along so callers can fall back to it
    assert!(error.context.details["insights"]["summary"].as_str().is_some());
    assert_eq!(extractor.call_count(), 1);
}

#[tokio::test]
async fn test_generation_allowed_again_after_cooldown() {
    let database = create_test_database().await;
    let extractor =
        MockExtractor::with_responses(vec![Ok(insights_response()), Ok(insights_response())]);
    let service = InsightService::new(extractor, database.clone());
    let user_id = Uuid::new_v4();
    seed_sessions(&database, user_id, 3).await;
    let now = Utc::now();

    service.generate_at(user_id, now).await.unwrap();
    let later = now + Duration::hours(25);
    let report = service.generate_at(user_id, later).await.expect("regeneration");

    let insight = report.insights.unwrap();
    assert_eq!(insight.can_regenerate_after, later + Duration::hours(24));

    // The fresh insight is now the latest one
    let latest = database.latest_insight(user_id).await.unwrap().unwrap();
    assert_eq!(latest.id, insight.id);
}

#[tokio::test]
async fn test_invalid_model_response_fails_without_persisting() {
    let database = create_test_database().await;
    let mut bad = insights_response();
    bad["achievements"] = serde_json::json!(["only one"]);
    let extractor = MockExtractor::with_responses(vec![Ok(bad)]);
    let service = InsightService::new(extractor, database.clone());
    let user_id = Uuid::new_v4();
    seed_sessions(&database, user_id, 3).await;

    let error = service.generate(user_id).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::SchemaValidation);
    assert!(database.latest_insight(user_id).await.unwrap().is_none());
}
