// ABOUTME: Unified voice-log interpreter orchestrating extraction and persistence
// ABOUTME: One model call maps a transcript to workout and body-metric entities
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # Voice Log Interpreter
//!
//! Turns one raw transcript into persisted entities with a single
//! extraction call. The response schema's two nullable branches decide
//! what the transcript was: a workout, a measurement, both, or neither.
//!
//! Persistence of the two entities is independent: a storage failure on
//! one never rolls back or blocks the other. The overall call only fails
//! when *every* attempted write failed; partial failures surface in the
//! outcome's `errors` list alongside the saved entity.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::database_plugins::StorageProvider;
use crate::errors::{AppError, AppResult};
use crate::llm::{prompts, schemas, ExtractionProvider, StructuredRequest};
use crate::models::{BodyMetric, Exercise, ExerciseSet, WorkoutSession};
use crate::validation::{self, BodyMetricsPayload, WorkoutPayload};

/// Example utterance returned with unclear-input errors
pub const SUGGESTED_UTTERANCE: &str = "Try saying something like: 'I did bench press, 3 sets of 8 reps at 185 pounds' or 'I weigh 175 pounds today'";

/// Result of interpreting one transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceLogOutcome {
    /// Whether at least one entity was persisted
    pub success: bool,
    /// Human-readable summary of what was logged
    pub message: String,
    /// Persisted workout session, when the transcript described one
    pub session: Option<WorkoutSession>,
    /// Persisted body metric, when the transcript described one
    pub metric: Option<BodyMetric>,
    /// Per-entity persistence failures (partial failure is not fatal)
    pub errors: Vec<String>,
}

/// Orchestrates extraction, validation, and independent persistence
pub struct VoiceLogInterpreter {
    provider: Arc<dyn ExtractionProvider>,
    storage: Arc<dyn StorageProvider>,
}

impl VoiceLogInterpreter {
    /// Create an interpreter from a provider and storage backend
    #[must_use]
    pub fn new(provider: Arc<dyn ExtractionProvider>, storage: Arc<dyn StorageProvider>) -> Self {
        Self { provider, storage }
    }

    /// Interpret a transcript and persist whatever it contained
    ///
    /// # Errors
    ///
    /// - invalid input when the transcript is blank (no model call is made)
    /// - unclear input when the model maps the transcript to neither entity
    /// - schema validation when the model response has the wrong shape
    /// - database error only when every attempted write failed
    #[instrument(skip(self, transcript), fields(user_id = %user_id))]
    pub async fn interpret(&self, user_id: Uuid, transcript: &str) -> AppResult<VoiceLogOutcome> {
        if transcript.trim().is_empty() {
            return Err(AppError::invalid_input("No transcript provided").with_user_id(user_id));
        }

        let request = StructuredRequest::new(
            prompts::unified_voice_prompt(transcript),
            schemas::unified_voice_log(),
        );
        let value = self.provider.extract(&request).await?;
        let parsed = validation::validate_unified_voice_log(&value)?;

        let now = Utc::now();
        let session = parsed
            .workout
            .and_then(|workout| build_session(user_id, now, workout));
        let metric = parsed
            .body_metrics
            .and_then(|metrics| build_metric(user_id, now, metrics));

        if session.is_none() && metric.is_none() {
            return Err(AppError::unclear_input(
                "Could not understand the input. Please try again.",
                SUGGESTED_UTTERANCE,
            )
            .with_user_id(user_id));
        }

        debug!(
            has_workout = session.is_some(),
            has_metric = metric.is_some(),
            "Persisting extracted entities"
        );

        let (session_write, metric_write) = tokio::join!(
            async {
                match &session {
                    Some(entity) => Some(self.storage.create_workout_session(entity).await),
                    None => None,
                }
            },
            async {
                match &metric {
                    Some(entity) => Some(self.storage.create_body_metric(entity).await),
                    None => None,
                }
            }
        );

        let mut errors = Vec::new();
        let saved_session = match session_write {
            Some(Ok(_)) => session,
            Some(Err(cause)) => {
                error!(error = %cause, "Workout session persistence failed");
                errors.push("Failed to create workout log".to_string());
                None
            }
            None => None,
        };
        let saved_metric = match metric_write {
            Some(Ok(_)) => metric,
            Some(Err(cause)) => {
                error!(error = %cause, "Body metric persistence failed");
                errors.push("Failed to create body metric".to_string());
                None
            }
            None => None,
        };

        if saved_session.is_none() && saved_metric.is_none() {
            return Err(AppError::database("Failed to save extracted data")
                .with_user_id(user_id)
                .with_details(serde_json::json!({ "errors": errors })));
        }

        Ok(VoiceLogOutcome {
            success: true,
            message: outcome_message(saved_session.as_ref(), saved_metric.as_ref()),
            session: saved_session,
            metric: saved_metric,
            errors,
        })
    }
}

/// Build a session from the workout branch; a branch without exercises
/// does not count as a workout
fn build_session(
    user_id: Uuid,
    now: DateTime<Utc>,
    workout: WorkoutPayload,
) -> Option<WorkoutSession> {
    let exercises = workout.exercises.filter(|list| !list.is_empty())?;
    let exercises = exercises
        .into_iter()
        .map(|payload| Exercise {
            name: payload.name,
            category: payload.category,
            is_custom: payload.is_custom,
            ai_tagged: true,
            sets: payload
                .sets
                .into_iter()
                .map(|set| ExerciseSet {
                    reps: set.reps.map(|reps| reps.round() as i32),
                    weight: set.weight,
                    distance: set.distance,
                    duration: set.duration,
                    intensity: set.intensity,
                    note: set.note,
                })
                .collect(),
        })
        .collect();
    Some(WorkoutSession::new(
        user_id,
        now,
        workout.duration,
        workout.note,
        exercises,
    ))
}

/// Build a metric from the body-metrics branch; a branch with no
/// measurement values does not count
fn build_metric(
    user_id: Uuid,
    now: DateTime<Utc>,
    payload: BodyMetricsPayload,
) -> Option<BodyMetric> {
    let metric = BodyMetric::new(
        user_id,
        parse_metric_date(payload.date.as_deref(), now),
        payload.weight,
        payload.body_fat,
        payload.muscle_mass,
    );
    metric.has_any_value().then_some(metric)
}

/// Parse a model-reported measurement date, falling back to `now`
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (interpreted
/// as midnight UTC).
fn parse_metric_date(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(text) = raw else { return now };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Utc.from_utc_datetime(&midnight);
        }
    }
    now
}

fn outcome_message(session: Option<&WorkoutSession>, metric: Option<&BodyMetric>) -> String {
    match (session, metric) {
        (Some(_), Some(_)) => "Workout and body metrics logged successfully".to_string(),
        (Some(_), None) => "Workout logged successfully".to_string(),
        _ => "Body metrics logged successfully".to_string(),
    }
}
