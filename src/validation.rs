// ABOUTME: Schema validation for structured model responses
// ABOUTME: Parses raw JSON into typed payloads and enforces cardinality bounds
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # Schema Validation
//!
//! The extraction provider guarantees "valid JSON", nothing more. This
//! module turns that JSON into typed payloads and rejects anything that
//! violates the contract the schema asked for: wrong field types, unknown
//! enum variants, empty exercise names, exercises without sets, and
//! out-of-bounds list cardinalities in the insights shape.
//!
//! Every rejection is an [`ErrorCode::SchemaValidation`] error carrying the
//! schema name, a human-readable reason, and the offending payload, so
//! prompt or schema drift shows up in logs with enough context to diagnose.
//!
//! [`ErrorCode::SchemaValidation`]: crate::errors::ErrorCode::SchemaValidation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::errors::{AppError, AppResult};
use crate::models::{ExerciseCategory, InsightTrends, Recommendation, SetIntensity};

/// Top-level unified voice-log payload: two independently-nullable branches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedVoiceLogResponse {
    /// Workout branch; `None` when the transcript described no training
    pub workout: Option<WorkoutPayload>,
    /// Body-metric branch; `None` when no measurements were mentioned
    pub body_metrics: Option<BodyMetricsPayload>,
}

/// Extracted workout data as the model reports it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPayload {
    /// Exercises performed; the branch counts as empty when absent
    pub exercises: Option<Vec<ExercisePayload>>,
    /// Session duration in hours, only when stated for the whole session
    pub duration: Option<f64>,
    /// Free-form session note
    pub note: Option<String>,
}

/// One extracted exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePayload {
    /// Exercise name as spoken, normalized by the model
    pub name: String,
    /// Exercise category
    pub category: ExerciseCategory,
    /// Whether the model considers this a user-invented exercise
    pub is_custom: bool,
    /// At least one set is required per exercise
    pub sets: Vec<SetPayload>,
}

/// One extracted set
///
/// Reps arrive as a JSON number; the model occasionally emits `8.0` for
/// eight reps, so the field is kept as `f64` here and rounded at
/// persistence time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPayload {
    /// Repetition count
    pub reps: Option<f64>,
    /// Weight in kilograms
    pub weight: Option<f64>,
    /// Distance in kilometers
    pub distance: Option<f64>,
    /// Duration in hours
    pub duration: Option<f64>,
    /// Perceived intensity
    pub intensity: Option<SetIntensity>,
    /// Free-form set note
    pub note: Option<String>,
}

/// Extracted body measurements
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMetricsPayload {
    /// Body weight in kilograms
    pub weight: Option<f64>,
    /// Body fat percentage
    pub body_fat: Option<f64>,
    /// Muscle mass in kilograms
    pub muscle_mass: Option<f64>,
    /// Measurement date as reported ("2026-08-21" or RFC 3339)
    pub date: Option<String>,
    /// Measurement note
    pub note: Option<String>,
}

/// Generated insights payload before it becomes a persisted record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    /// Overall narrative, 2-3 sentences
    pub summary: String,
    /// Concrete wins, at least three
    pub achievements: Vec<String>,
    /// Volume / frequency / body-composition narratives
    pub trends: InsightTrends,
    /// Prioritized actionable changes
    pub recommendations: Vec<Recommendation>,
    /// Cautions; may be empty
    pub warnings: Vec<String>,
    /// Concrete actions for the coming weeks
    pub next_steps: Vec<String>,
}

/// Parse and verify a raw model response against a named schema
///
/// `verify` runs semantic checks serde cannot express (cardinalities,
/// non-empty strings) and returns a reason string on failure.
fn validate_schema<T, F>(schema_name: &str, value: &Value, verify: F) -> AppResult<T>
where
    T: for<'de> Deserialize<'de>,
    F: FnOnce(&T) -> Result<(), String>,
{
    let parsed: T = serde_json::from_value(value.clone()).map_err(|error| {
        warn!(schema = schema_name, error = %error, "Model response failed schema parse");
        AppError::schema_validation(schema_name, error.to_string(), value)
    })?;
    verify(&parsed).map_err(|reason| {
        warn!(schema = schema_name, reason = %reason, "Model response failed schema checks");
        AppError::schema_validation(schema_name, reason, value)
    })?;
    Ok(parsed)
}

/// Validate a unified voice-log response
///
/// A response with both branches `null` is *valid* here; deciding what an
/// all-null extraction means (unclear input) belongs to the interpreter,
/// not the validator.
pub fn validate_unified_voice_log(value: &Value) -> AppResult<UnifiedVoiceLogResponse> {
    validate_schema("unified voice log", value, |response: &UnifiedVoiceLogResponse| {
        if let Some(workout) = &response.workout {
            if let Some(exercises) = &workout.exercises {
                for (index, exercise) in exercises.iter().enumerate() {
                    if exercise.name.trim().is_empty() {
                        return Err(format!("exercise {index} has an empty name"));
                    }
                    if exercise.sets.is_empty() {
                        return Err(format!("exercise '{}' has no sets", exercise.name));
                    }
                }
            }
        }
        Ok(())
    })
}

/// Validate an insights response, enforcing the list cardinality bounds
/// the schema requested (achievements >= 3, recommendations 2-5,
/// warnings <= 5, nextSteps 3-6)
pub fn validate_insights(value: &Value) -> AppResult<InsightsResponse> {
    validate_schema("insights", value, |response: &InsightsResponse| {
        if response.summary.trim().is_empty() {
            return Err("summary is empty".into());
        }
        check_bounds("achievements", response.achievements.len(), 3, usize::MAX)?;
        check_bounds("recommendations", response.recommendations.len(), 2, 5)?;
        check_bounds("warnings", response.warnings.len(), 0, 5)?;
        check_bounds("nextSteps", response.next_steps.len(), 3, 6)?;
        Ok(())
    })
}

fn check_bounds(field: &str, len: usize, min: usize, max: usize) -> Result<(), String> {
    if len < min {
        return Err(format!("{field} has {len} items, expected at least {min}"));
    }
    if len > max {
        return Err(format!("{field} has {len} items, expected at most {max}"));
    }
    Ok(())
}
