// ABOUTME: SQLite storage backend for workout sessions, body metrics, and insights
// ABOUTME: Uses runtime queries with JSON columns for nested structures
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # SQLite Storage
//!
//! SQLite-backed [`StorageProvider`]. Nested structures (exercise lists,
//! insight sections) are stored as JSON text columns; IDs are stored as
//! hyphenated UUID text. Works against local files and `sqlite::memory:`
//! for tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::StorageProvider;
use crate::models::{BodyMetric, UserInsight, WorkoutSession};

/// SQLite implementation of the storage provider
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Connect to the given SQLite URL
    ///
    /// # Errors
    ///
    /// Returns an error when the connection cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self> {
        // An in-memory database exists per connection, so the pool must
        // not hand out a second one
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to SQLite database: {database_url}"))?;
        Ok(Self { pool })
    }

    /// Access the underlying pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn row_to_workout_session(row: &sqlx::sqlite::SqliteRow) -> Result<WorkoutSession> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let exercises: String = row.try_get("exercises")?;
        Ok(WorkoutSession {
            id: Uuid::parse_str(&id).context("Invalid session ID in database")?,
            user_id: Uuid::parse_str(&user_id).context("Invalid user ID in database")?,
            date: row.try_get("date")?,
            duration: row.try_get("duration")?,
            note: row.try_get("note")?,
            exercises: serde_json::from_str(&exercises)
                .context("Invalid exercises JSON in database")?,
        })
    }

    fn row_to_body_metric(row: &sqlx::sqlite::SqliteRow) -> Result<BodyMetric> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        Ok(BodyMetric {
            id: Uuid::parse_str(&id).context("Invalid metric ID in database")?,
            user_id: Uuid::parse_str(&user_id).context("Invalid user ID in database")?,
            date: row.try_get("date")?,
            weight: row.try_get("weight")?,
            body_fat: row.try_get("body_fat")?,
            muscle_mass: row.try_get("muscle_mass")?,
        })
    }

    fn row_to_insight(row: &sqlx::sqlite::SqliteRow) -> Result<UserInsight> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let achievements: String = row.try_get("achievements")?;
        let trends: String = row.try_get("trends")?;
        let recommendations: String = row.try_get("recommendations")?;
        let warnings: String = row.try_get("warnings")?;
        let next_steps: String = row.try_get("next_steps")?;
        Ok(UserInsight {
            id: Uuid::parse_str(&id).context("Invalid insight ID in database")?,
            user_id: Uuid::parse_str(&user_id).context("Invalid user ID in database")?,
            summary: row.try_get("summary")?,
            achievements: serde_json::from_str(&achievements)
                .context("Invalid achievements JSON in database")?,
            trends: serde_json::from_str(&trends).context("Invalid trends JSON in database")?,
            recommendations: serde_json::from_str(&recommendations)
                .context("Invalid recommendations JSON in database")?,
            warnings: serde_json::from_str(&warnings)
                .context("Invalid warnings JSON in database")?,
            next_steps: serde_json::from_str(&next_steps)
                .context("Invalid next steps JSON in database")?,
            generated_at: row.try_get("generated_at")?,
            can_regenerate_after: row.try_get("can_regenerate_after")?,
        })
    }
}

#[async_trait]
impl StorageProvider for SqliteStorage {
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                duration REAL,
                note TEXT,
                exercises TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create workout_sessions table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workout_sessions_user_date
             ON workout_sessions(user_id, date)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS body_metrics (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                weight REAL,
                body_fat REAL,
                muscle_mass REAL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create body_metrics table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_body_metrics_user_date
             ON body_metrics(user_id, date)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_insights (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                summary TEXT NOT NULL,
                achievements TEXT NOT NULL,
                trends TEXT NOT NULL,
                recommendations TEXT NOT NULL,
                warnings TEXT NOT NULL,
                next_steps TEXT NOT NULL,
                generated_at TEXT NOT NULL,
                can_regenerate_after TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create user_insights table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_user_insights_user_generated
             ON user_insights(user_id, generated_at)",
        )
        .execute(&self.pool)
        .await?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    async fn create_workout_session(&self, session: &WorkoutSession) -> Result<Uuid> {
        let exercises = serde_json::to_string(&session.exercises)
            .context("Failed to serialize exercises")?;
        sqlx::query(
            r"
            INSERT INTO workout_sessions (id, user_id, date, duration, note, exercises)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(session.date)
        .bind(session.duration)
        .bind(&session.note)
        .bind(exercises)
        .execute(&self.pool)
        .await
        .context("Failed to insert workout session")?;
        Ok(session.id)
    }

    async fn workout_sessions_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<WorkoutSession>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, date, duration, note, exercises
            FROM workout_sessions
            WHERE user_id = ? AND date >= ?
            ORDER BY date DESC
            ",
        )
        .bind(user_id.to_string())
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch workout sessions")?;

        rows.iter().map(Self::row_to_workout_session).collect()
    }

    async fn count_workout_sessions(&self, user_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM workout_sessions WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .context("Failed to count workout sessions")?;
        Ok(row.try_get("count")?)
    }

    async fn create_body_metric(&self, metric: &BodyMetric) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO body_metrics (id, user_id, date, weight, body_fat, muscle_mass)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(metric.id.to_string())
        .bind(metric.user_id.to_string())
        .bind(metric.date)
        .bind(metric.weight)
        .bind(metric.body_fat)
        .bind(metric.muscle_mass)
        .execute(&self.pool)
        .await
        .context("Failed to insert body metric")?;
        Ok(metric.id)
    }

    async fn body_metrics_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<BodyMetric>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, date, weight, body_fat, muscle_mass
            FROM body_metrics
            WHERE user_id = ? AND date >= ?
            ORDER BY date DESC
            ",
        )
        .bind(user_id.to_string())
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch body metrics")?;

        rows.iter().map(Self::row_to_body_metric).collect()
    }

    async fn store_insight(&self, insight: &UserInsight) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO user_insights (
                id, user_id, summary, achievements, trends, recommendations,
                warnings, next_steps, generated_at, can_regenerate_after
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(insight.id.to_string())
        .bind(insight.user_id.to_string())
        .bind(&insight.summary)
        .bind(serde_json::to_string(&insight.achievements)?)
        .bind(serde_json::to_string(&insight.trends)?)
        .bind(serde_json::to_string(&insight.recommendations)?)
        .bind(serde_json::to_string(&insight.warnings)?)
        .bind(serde_json::to_string(&insight.next_steps)?)
        .bind(insight.generated_at)
        .bind(insight.can_regenerate_after)
        .execute(&self.pool)
        .await
        .context("Failed to insert insight")?;
        Ok(insight.id)
    }

    async fn latest_insight(&self, user_id: Uuid) -> Result<Option<UserInsight>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, summary, achievements, trends, recommendations,
                   warnings, next_steps, generated_at, can_regenerate_after
            FROM user_insights
            WHERE user_id = ?
            ORDER BY generated_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch latest insight")?;

        row.as_ref().map(Self::row_to_insight).transpose()
    }
}
