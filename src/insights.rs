// ABOUTME: Insight service with the regeneration cooldown gate
// ABOUTME: Aggregates the training window, calls the model, and persists results
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # Insight Service
//!
//! Generates and fetches coaching insights. Generation is expensive (one
//! model call per insight), so two preconditions guard it:
//!
//! - at least [`MIN_SESSIONS_FOR_INSIGHTS`] logged sessions exist, and
//! - the previous insight's cooldown of
//!   [`REGENERATION_COOLDOWN_HOURS`](crate::config::REGENERATION_COOLDOWN_HOURS)
//!   has elapsed.
//!
//! The gate itself is a pure function over the latest stored insight and a
//! clock, so it is testable without storage or time mocking; the service
//! methods take an explicit `now` in their `_at` variants for the same
//! reason.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::{AGGREGATION_WINDOW_DAYS, MIN_SESSIONS_FOR_INSIGHTS};
use crate::database_plugins::StorageProvider;
use crate::errors::{AppError, AppResult};
use crate::intelligence::aggregation;
use crate::llm::{prompts, schemas, ExtractionProvider, StructuredRequest};
use crate::models::UserInsight;
use crate::validation;

/// Message returned when the session-count precondition fails
pub const NOT_ENOUGH_DATA_MESSAGE: &str =
    "Not enough workout data to generate insights. Please log at least a few workouts first.";

/// Regeneration gate verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateStatus {
    /// Whether a new insight may be generated now
    pub can_regenerate: bool,
    /// When the gate unlocks; `None` when it is already open
    pub unlock_at: Option<DateTime<Utc>>,
}

/// Evaluate the regeneration gate against the latest stored insight
///
/// No stored insight means the gate is open.
#[must_use]
pub fn evaluate_gate(latest: Option<&UserInsight>, now: DateTime<Utc>) -> GateStatus {
    match latest {
        Some(insight) if now < insight.can_regenerate_after => GateStatus {
            can_regenerate: false,
            unlock_at: Some(insight.can_regenerate_after),
        },
        _ => GateStatus {
            can_regenerate: true,
            unlock_at: None,
        },
    }
}

/// Whole hours until `unlock_at`, rounded up, minimum 1
fn hours_until(now: DateTime<Utc>, unlock_at: DateTime<Utc>) -> i64 {
    let seconds = (unlock_at - now).num_seconds().max(0);
    ((seconds + 3599) / 3600).max(1)
}

/// Insight fetch/generation result returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    /// Human-readable status line
    pub message: String,
    /// The insight, when one exists
    pub insights: Option<UserInsight>,
    /// Whether generation is currently allowed
    pub can_regenerate: bool,
    /// When the gate unlocks, if it is closed
    pub can_regenerate_at: Option<DateTime<Utc>>,
}

/// Orchestrates aggregation, generation, and the cooldown gate
pub struct InsightService {
    provider: Arc<dyn ExtractionProvider>,
    storage: Arc<dyn StorageProvider>,
}

impl InsightService {
    /// Create a service from a provider and storage backend
    #[must_use]
    pub fn new(provider: Arc<dyn ExtractionProvider>, storage: Arc<dyn StorageProvider>) -> Self {
        Self { provider, storage }
    }

    /// Fetch the latest insight and the current gate state
    pub async fn fetch(&self, user_id: Uuid) -> AppResult<InsightReport> {
        self.fetch_at(user_id, Utc::now()).await
    }

    /// [`fetch`](Self::fetch) with an explicit clock
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn fetch_at(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<InsightReport> {
        let count = self
            .storage
            .count_workout_sessions(user_id)
            .await
            .map_err(|error| AppError::database(error.to_string()).with_user_id(user_id))?;
        if count < MIN_SESSIONS_FOR_INSIGHTS {
            return Ok(InsightReport {
                message: NOT_ENOUGH_DATA_MESSAGE.to_string(),
                insights: None,
                can_regenerate: false,
                can_regenerate_at: None,
            });
        }

        let latest = self
            .storage
            .latest_insight(user_id)
            .await
            .map_err(|error| AppError::database(error.to_string()).with_user_id(user_id))?;
        let Some(insight) = latest else {
            return Ok(InsightReport {
                message: "No insights yet. Generate your first insights!".to_string(),
                insights: None,
                can_regenerate: true,
                can_regenerate_at: None,
            });
        };

        let gate = evaluate_gate(Some(&insight), now);
        Ok(InsightReport {
            message: "Insights retrieved".to_string(),
            insights: Some(insight),
            can_regenerate: gate.can_regenerate,
            can_regenerate_at: gate.unlock_at,
        })
    }

    /// Generate, persist, and return a fresh insight
    pub async fn generate(&self, user_id: Uuid) -> AppResult<InsightReport> {
        self.generate_at(user_id, Utc::now()).await
    }

    /// [`generate`](Self::generate) with an explicit clock
    ///
    /// # Errors
    ///
    /// - insufficient data below the minimum session count
    /// - rate limited while the cooldown gate is closed; the error details
    ///   carry the unlock time and the still-valid previous insight
    /// - extraction/schema errors from the model call
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn generate_at(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<InsightReport> {
        let count = self
            .storage
            .count_workout_sessions(user_id)
            .await
            .map_err(|error| AppError::database(error.to_string()).with_user_id(user_id))?;
        if count < MIN_SESSIONS_FOR_INSIGHTS {
            return Err(
                AppError::insufficient_data(NOT_ENOUGH_DATA_MESSAGE).with_user_id(user_id)
            );
        }

        let latest = self
            .storage
            .latest_insight(user_id)
            .await
            .map_err(|error| AppError::database(error.to_string()).with_user_id(user_id))?;
        let gate = evaluate_gate(latest.as_ref(), now);
        if let Some(unlock_at) = gate.unlock_at {
            let hours = hours_until(now, unlock_at);
            debug!(%unlock_at, hours, "Regeneration gate closed");
            return Err(AppError::rate_limited(
                format!("Please wait {hours} hour(s) before generating new insights."),
                unlock_at,
                serde_json::to_value(&latest)?,
            )
            .with_user_id(user_id));
        }

        let since = now - Duration::days(AGGREGATION_WINDOW_DAYS);
        let (sessions, metrics) = tokio::try_join!(
            self.storage.workout_sessions_since(user_id, since),
            self.storage.body_metrics_since(user_id, since),
        )
        .map_err(|error| AppError::database(error.to_string()).with_user_id(user_id))?;

        let digest = aggregation::aggregate(&sessions, &metrics, now)?;
        let request = StructuredRequest::new(prompts::insights_prompt(&digest), schemas::insights());
        let value = self.provider.extract(&request).await?;
        let parsed = validation::validate_insights(&value)?;

        let insight = UserInsight::new(
            user_id,
            parsed.summary,
            parsed.achievements,
            parsed.trends,
            parsed.recommendations,
            parsed.warnings,
            parsed.next_steps,
            now,
        );
        self.storage
            .store_insight(&insight)
            .await
            .map_err(|error| AppError::database(error.to_string()).with_user_id(user_id))?;

        info!(
            insight_id = %insight.id,
            sessions = digest.total_sessions,
            "Generated insights"
        );
        Ok(InsightReport {
            message: "Insights generated successfully".to_string(),
            insights: Some(insight.clone()),
            can_regenerate: false,
            can_regenerate_at: Some(insight.can_regenerate_after),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::models::InsightTrends;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn insight_generated_at(generated_at: DateTime<Utc>) -> UserInsight {
        UserInsight::new(
            Uuid::new_v4(),
            "summary".into(),
            vec!["a".into(), "b".into(), "c".into()],
            InsightTrends::default(),
            vec![],
            vec![],
            vec!["x".into(), "y".into(), "z".into()],
            generated_at,
        )
    }

    #[test]
    fn test_gate_open_without_previous_insight() {
        let gate = evaluate_gate(None, now());
        assert!(gate.can_regenerate);
        assert!(gate.unlock_at.is_none());
    }

    #[test]
    fn test_gate_closed_within_cooldown() {
        let insight = insight_generated_at(now() - Duration::hours(2));
        let gate = evaluate_gate(Some(&insight), now());
        assert!(!gate.can_regenerate);
        assert_eq!(gate.unlock_at, Some(insight.can_regenerate_after));
    }

    #[test]
    fn test_gate_reopens_after_cooldown() {
        let insight = insight_generated_at(now() - Duration::hours(25));
        let gate = evaluate_gate(Some(&insight), now());
        assert!(gate.can_regenerate);
    }

    #[test]
    fn test_gate_open_at_exact_unlock_instant() {
        let insight = insight_generated_at(now() - Duration::hours(24));
        assert!(evaluate_gate(Some(&insight), now()).can_regenerate);
    }

    #[test]
    fn test_hours_until_rounds_up() {
        let unlock = now() + Duration::hours(2) + Duration::minutes(1);
        assert_eq!(hours_until(now(), unlock), 3);
        assert_eq!(hours_until(now(), now() + Duration::hours(2)), 2);
        // Gate checks happen strictly before the unlock instant, so the
        // message never claims zero hours
        assert_eq!(hours_until(now(), now() + Duration::seconds(30)), 1);
    }
}
