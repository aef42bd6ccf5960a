// ABOUTME: Integration tests for the unified voice-log interpreter
// ABOUTME: Covers dual persistence, unclear input, and partial storage failures
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use common::{
    create_test_database, unified_response_both, unified_response_empty, FlakyStorage,
    MockExtractor,
};
use trainlog::database_plugins::StorageProvider;
use trainlog::errors::ErrorCode;
use trainlog::voice::VoiceLogInterpreter;

#[tokio::test]
async fn test_transcript_with_both_entities_persists_both() {
    let database = create_test_database().await;
    let extractor = MockExtractor::with_responses(vec![Ok(unified_response_both())]);
    let interpreter = VoiceLogInterpreter::new(extractor.clone(), database.clone());
    let user_id = Uuid::new_v4();

    let outcome = interpreter
        .interpret(user_id, "bench press 3x8 at 80kg, and I weigh 81.2 kilos")
        .await
        .expect("interpretation should succeed");

    assert!(outcome.success);
    assert_eq!(outcome.message, "Workout and body metrics logged successfully");
    assert!(outcome.errors.is_empty());

    let session = outcome.session.expect("session should be persisted");
    assert_eq!(session.exercises[0].name, "bench press");
    assert!(session.exercises[0].ai_tagged);
    assert_eq!(outcome.metric.expect("metric should be persisted").weight, Some(81.2));

    assert_eq!(database.count_workout_sessions(user_id).await.unwrap(), 1);
    let since = Utc::now() - Duration::days(1);
    assert_eq!(database.body_metrics_since(user_id, since).await.unwrap().len(), 1);
    assert_eq!(extractor.call_count(), 1);
}

#[tokio::test]
async fn test_workout_only_transcript_skips_metric() {
    let database = create_test_database().await;
    let mut response = unified_response_both();
    response["bodyMetrics"] = json!(null);
    let extractor = MockExtractor::with_responses(vec![Ok(response)]);
    let interpreter = VoiceLogInterpreter::new(extractor, database.clone());
    let user_id = Uuid::new_v4();

    let outcome = interpreter.interpret(user_id, "just benching today").await.unwrap();

    assert_eq!(outcome.message, "Workout logged successfully");
    assert!(outcome.session.is_some());
    assert!(outcome.metric.is_none());
    let since = Utc::now() - Duration::days(1);
    assert!(database.body_metrics_since(user_id, since).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_extraction_is_unclear_input_and_persists_nothing() {
    let database = create_test_database().await;
    let extractor = MockExtractor::with_responses(vec![Ok(unified_response_empty())]);
    let interpreter = VoiceLogInterpreter::new(extractor, database.clone());
    let user_id = Uuid::new_v4();

    let error = interpreter
        .interpret(user_id, "what's the weather like")
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::UnclearInput);
    assert!(error.context.details["suggestion"]
        .as_str()
        .is_some_and(|s| s.contains("bench press")));
    assert_eq!(database.count_workout_sessions(user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_blank_transcript_never_reaches_the_model() {
    let database = create_test_database().await;
    let extractor = MockExtractor::with_responses(vec![Ok(unified_response_both())]);
    let interpreter = VoiceLogInterpreter::new(extractor.clone(), database);

    let error = interpreter.interpret(Uuid::new_v4(), "   ").await.unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert_eq!(extractor.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_response_fails_schema_validation() {
    let database = create_test_database().await;
    let extractor = MockExtractor::with_responses(vec![Ok(json!({"workout": "not an object"}))]);
    let interpreter = VoiceLogInterpreter::new(extractor, database.clone());
    let user_id = Uuid::new_v4();

    let error = interpreter.interpret(user_id, "bench press 3x8").await.unwrap_err();

    assert_eq!(error.code, ErrorCode::SchemaValidation);
    assert_eq!(database.count_workout_sessions(user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_metric_write_failure_still_saves_the_workout() {
    let database = create_test_database().await;
    let storage = FlakyStorage::new(database.clone(), false, true);
    let extractor = MockExtractor::with_responses(vec![Ok(unified_response_both())]);
    let interpreter = VoiceLogInterpreter::new(extractor, storage);
    let user_id = Uuid::new_v4();

    let outcome = interpreter
        .interpret(user_id, "benched and weighed in")
        .await
        .expect("partial failure should still succeed");

    assert!(outcome.success);
    assert!(outcome.session.is_some());
    assert!(outcome.metric.is_none());
    assert_eq!(outcome.errors, vec!["Failed to create body metric".to_string()]);
    assert_eq!(database.count_workout_sessions(user_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_all_writes_failing_is_a_database_error() {
    let database = create_test_database().await;
    let storage = FlakyStorage::new(database, true, true);
    let extractor = MockExtractor::with_responses(vec![Ok(unified_response_both())]);
    let interpreter = VoiceLogInterpreter::new(extractor, storage);

    let error = interpreter
        .interpret(Uuid::new_v4(), "benched and weighed in")
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::DatabaseError);
    let errors = error.context.details["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
}

#[tokio::test]
async fn test_provider_failure_propagates() {
    let database = create_test_database().await;
    let extractor = MockExtractor::with_responses(vec![Err(
        trainlog::errors::AppError::extraction("model unavailable"),
    )]);
    let interpreter = VoiceLogInterpreter::new(extractor, database);

    let error = interpreter
        .interpret(Uuid::new_v4(), "bench press 3x8")
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ExtractionFailed);
}
