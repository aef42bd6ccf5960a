// ABOUTME: Database abstraction layer supporting pluggable storage backends
// ABOUTME: Defines the provider trait implemented by each database backend
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # Database Plugins
//!
//! Storage abstraction for the pipeline. Backends implement
//! [`StorageProvider`]; callers hold the [`factory::Database`] enum (or an
//! `Arc<dyn StorageProvider>` in tests) and never see backend-specific
//! types. SQLite is the only backend today, but the seam exists so a
//! server deployment can add one without touching the orchestrators.

pub mod factory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{BodyMetric, UserInsight, WorkoutSession};

/// Storage operations required by the voice-log and insight pipelines
///
/// Implementations return `anyhow::Result`; the orchestrating layer maps
/// failures onto the pipeline error taxonomy.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Run schema migrations for this backend
    async fn migrate(&self) -> anyhow::Result<()>;

    /// Persist a workout session, returning its ID
    async fn create_workout_session(&self, session: &WorkoutSession) -> anyhow::Result<Uuid>;

    /// Sessions for a user since `since`, newest first
    async fn workout_sessions_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<WorkoutSession>>;

    /// Total session count for a user
    async fn count_workout_sessions(&self, user_id: Uuid) -> anyhow::Result<i64>;

    /// Persist a body-metric record, returning its ID
    async fn create_body_metric(&self, metric: &BodyMetric) -> anyhow::Result<Uuid>;

    /// Body metrics for a user since `since`, newest first
    async fn body_metrics_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<BodyMetric>>;

    /// Persist a generated insight, returning its ID
    async fn store_insight(&self, insight: &UserInsight) -> anyhow::Result<Uuid>;

    /// Most recently generated insight for a user, if any
    async fn latest_insight(&self, user_id: Uuid) -> anyhow::Result<Option<UserInsight>>;
}
