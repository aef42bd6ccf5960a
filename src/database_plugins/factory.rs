// ABOUTME: Database factory that selects the storage backend from the URL
// ABOUTME: Provides a unified enum delegating to the concrete implementation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # Database Factory
//!
//! Selects and constructs the storage backend based on the database URL
//! scheme. The [`Database`] enum implements [`StorageProvider`] by
//! delegation, so callers are backend-agnostic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::sqlite::SqliteStorage;
use super::StorageProvider;
use crate::models::{BodyMetric, UserInsight, WorkoutSession};

/// Database abstraction over the supported backends
#[derive(Clone)]
pub enum Database {
    /// SQLite database (local files and in-memory test databases)
    Sqlite(SqliteStorage),
}

impl Database {
    /// Create a database connection based on the URL scheme and run
    /// migrations
    ///
    /// # Errors
    ///
    /// Returns an error when the URL scheme is unsupported or the
    /// connection/migration fails.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        if database_url.starts_with("sqlite:") {
            info!("Connecting to SQLite database");
            let storage = SqliteStorage::connect(database_url).await?;
            let database = Self::Sqlite(storage);
            database.migrate().await?;
            info!(backend = database.backend_info().0, "Database ready");
            Ok(database)
        } else {
            Err(anyhow::anyhow!(
                "Unsupported database URL scheme: {database_url}. Expected sqlite:"
            ))
        }
    }

    /// Backend identifier and description for logging
    #[must_use]
    pub const fn backend_info(&self) -> (&'static str, &'static str) {
        match self {
            Self::Sqlite(_) => ("sqlite", "SQLite (local file or in-memory)"),
        }
    }
}

#[async_trait]
impl StorageProvider for Database {
    async fn migrate(&self) -> anyhow::Result<()> {
        match self {
            Self::Sqlite(storage) => storage.migrate().await,
        }
    }

    async fn create_workout_session(&self, session: &WorkoutSession) -> anyhow::Result<Uuid> {
        match self {
            Self::Sqlite(storage) => storage.create_workout_session(session).await,
        }
    }

    async fn workout_sessions_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<WorkoutSession>> {
        match self {
            Self::Sqlite(storage) => storage.workout_sessions_since(user_id, since).await,
        }
    }

    async fn count_workout_sessions(&self, user_id: Uuid) -> anyhow::Result<i64> {
        match self {
            Self::Sqlite(storage) => storage.count_workout_sessions(user_id).await,
        }
    }

    async fn create_body_metric(&self, metric: &BodyMetric) -> anyhow::Result<Uuid> {
        match self {
            Self::Sqlite(storage) => storage.create_body_metric(metric).await,
        }
    }

    async fn body_metrics_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<BodyMetric>> {
        match self {
            Self::Sqlite(storage) => storage.body_metrics_since(user_id, since).await,
        }
    }

    async fn store_insight(&self, insight: &UserInsight) -> anyhow::Result<Uuid> {
        match self {
            Self::Sqlite(storage) => storage.store_insight(insight).await,
        }
    }

    async fn latest_insight(&self, user_id: Uuid) -> anyhow::Result<Option<UserInsight>> {
        match self {
            Self::Sqlite(storage) => storage.latest_insight(user_id).await,
        }
    }
}
