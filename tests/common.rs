// ABOUTME: Shared test fixtures: mock extraction provider and storage helpers
// ABOUTME: Provides in-memory databases, canned model responses, and seed data
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use trainlog::database_plugins::factory::Database;
use trainlog::database_plugins::StorageProvider;
use trainlog::errors::{AppError, AppResult};
use trainlog::llm::{ExtractionProvider, StructuredRequest};
use trainlog::models::{
    BodyMetric, Exercise, ExerciseCategory, ExerciseSet, UserInsight, WorkoutSession,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging once per binary
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("trainlog=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Create a fresh in-memory database with migrations applied
pub async fn create_test_database() -> Arc<Database> {
    init_test_logging();
    Arc::new(
        Database::new("sqlite::memory:")
            .await
            .expect("Failed to create test database"),
    )
}

/// Extraction provider returning canned responses in order
pub struct MockExtractor {
    responses: Mutex<VecDeque<AppResult<Value>>>,
    calls: AtomicUsize,
}

impl MockExtractor {
    pub fn with_responses(responses: Vec<AppResult<Value>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExtractionProvider for MockExtractor {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn display_name(&self) -> &'static str {
        "Mock Provider"
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn extract(&self, _request: &StructuredRequest) -> AppResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::extraction("MockExtractor ran out of responses")))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Storage wrapper that fails selected write operations
pub struct FlakyStorage {
    inner: Arc<Database>,
    pub fail_workouts: bool,
    pub fail_metrics: bool,
}

impl FlakyStorage {
    pub fn new(inner: Arc<Database>, fail_workouts: bool, fail_metrics: bool) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fail_workouts,
            fail_metrics,
        })
    }
}

#[async_trait]
impl StorageProvider for FlakyStorage {
    async fn migrate(&self) -> anyhow::Result<()> {
        self.inner.migrate().await
    }

    async fn create_workout_session(&self, session: &WorkoutSession) -> anyhow::Result<Uuid> {
        if self.fail_workouts {
            anyhow::bail!("simulated workout write failure");
        }
        self.inner.create_workout_session(session).await
    }

    async fn workout_sessions_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<WorkoutSession>> {
        self.inner.workout_sessions_since(user_id, since).await
    }

    async fn count_workout_sessions(&self, user_id: Uuid) -> anyhow::Result<i64> {
        self.inner.count_workout_sessions(user_id).await
    }

    async fn create_body_metric(&self, metric: &BodyMetric) -> anyhow::Result<Uuid> {
        if self.fail_metrics {
            anyhow::bail!("simulated metric write failure");
        }
        self.inner.create_body_metric(metric).await
    }

    async fn body_metrics_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<BodyMetric>> {
        self.inner.body_metrics_since(user_id, since).await
    }

    async fn store_insight(&self, insight: &UserInsight) -> anyhow::Result<Uuid> {
        self.inner.store_insight(insight).await
    }

    async fn latest_insight(&self, user_id: Uuid) -> anyhow::Result<Option<UserInsight>> {
        self.inner.latest_insight(user_id).await
    }
}

/// Seed `count` simple strength sessions spread one day apart
pub async fn seed_sessions(storage: &Database, user_id: Uuid, count: usize) {
    for days_ago in 0..count {
        let session = WorkoutSession::new(
            user_id,
            Utc::now() - Duration::days(days_ago as i64),
            Some(1.0),
            None,
            vec![Exercise {
                name: "bench press".into(),
                category: ExerciseCategory::Strength,
                is_custom: false,
                ai_tagged: true,
                sets: vec![ExerciseSet {
                    reps: Some(8),
                    weight: Some(80.0),
                    ..ExerciseSet::default()
                }],
            }],
        );
        storage
            .create_workout_session(&session)
            .await
            .expect("Failed to seed session");
    }
}

/// Canned unified voice-log response with both branches populated
pub fn unified_response_both() -> Value {
    json!({
        "workout": {
            "exercises": [{
                "name": "bench press",
                "category": "strength",
                "isCustom": false,
                "sets": [
                    {"reps": 8, "weight": 80.0, "distance": null, "duration": null, "intensity": "moderate", "note": null}
                ]
            }],
            "duration": 1.0,
            "note": null
        },
        "bodyMetrics": {
            "weight": 81.2, "bodyFat": null, "muscleMass": null, "date": null, "note": null
        }
    })
}

/// Canned unified voice-log response with both branches null
pub fn unified_response_empty() -> Value {
    json!({"workout": null, "bodyMetrics": null})
}

/// Canned insights response that passes validation
pub fn insights_response() -> Value {
    json!({
        "summary": "Consistent strength block with steady pressing volume.",
        "achievements": [
            "Logged every planned session this window",
            "Bench press volume held at 640kg per session",
            "No missed weeks in the whole period"
        ],
        "trends": {
            "volume": "Stable week over week",
            "frequency": "Right at target frequency",
            "bodyComposition": null
        },
        "recommendations": [
            {"priority": "high", "action": "Add a pulling movement", "reasoning": "Sessions are press-dominant"},
            {"priority": "medium", "action": "Progress load by 2.5kg", "reasoning": "Reps have been steady at 8"}
        ],
        "warnings": [],
        "nextSteps": [
            "Add rows to the next session",
            "Increase bench to 82.5kg",
            "Log a body weight this week"
        ]
    })
}
