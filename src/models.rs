// ABOUTME: Core domain models for the trainlog fitness pipeline
// ABOUTME: Defines WorkoutSession, Exercise, BodyMetric, UserInsight and related enums
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # Data Models
//!
//! Core data structures for the ingestion and insight pipeline.
//!
//! ## Design Principles
//!
//! - **Serializable**: all models round-trip through JSON with the wire
//!   field names (`bodyFat`, `isCustom`, `nextSteps`, ...) the upstream
//!   clients and the extraction schema use
//! - **Append-only where it matters**: sessions are immutable once created
//!   and insights are history, never updated in place
//! - **Optional by default**: a set may carry any subset of reps, weight,
//!   distance, duration; callers decide what makes a set meaningful

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::REGENERATION_COOLDOWN_HOURS;

/// Category of a logged exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCategory {
    /// Resistance training (weight x reps volume applies)
    Strength,
    /// Endurance work (set durations count toward cardio totals)
    Cardio,
    /// Stretching, yoga, mobility drills
    Mobility,
    /// Anything the model could not fit into the canonical categories
    Custom,
}

impl ExerciseCategory {
    /// String representation used on the wire and in prompts
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Cardio => "cardio",
            Self::Mobility => "mobility",
            Self::Custom => "custom",
        }
    }
}

impl Display for ExerciseCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExerciseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strength" => Ok(Self::Strength),
            "cardio" => Ok(Self::Cardio),
            "mobility" => Ok(Self::Mobility),
            "custom" => Ok(Self::Custom),
            other => Err(format!("Unknown exercise category: {other}")),
        }
    }
}

/// Perceived intensity of a single set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetIntensity {
    /// Conversational pace, warm-up effort
    Easy,
    /// Working effort with reps in reserve
    Moderate,
    /// Near-limit effort
    Hard,
    /// All-out effort
    Max,
}

impl Display for SetIntensity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Hard => "hard",
            Self::Max => "max",
        };
        write!(f, "{s}")
    }
}

/// A single set within an exercise
///
/// Every field is optional; the pipeline never rejects a set for being
/// sparse. Weight is kilograms, duration is hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    /// Repetitions performed
    pub reps: Option<i32>,
    /// Load in kilograms
    pub weight: Option<f64>,
    /// Distance covered (kilometers)
    pub distance: Option<f64>,
    /// Time spent, in hours
    pub duration: Option<f64>,
    /// Perceived intensity
    pub intensity: Option<SetIntensity>,
    /// Free-text note
    pub note: Option<String>,
}

/// A named exercise and its ordered sets, owned by one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Exercise name; matched case-insensitively across sessions
    pub name: String,
    /// Category used for distribution and volume rules
    pub category: ExerciseCategory,
    /// True when the name is outside the built-in exercise catalog
    pub is_custom: bool,
    /// True when this exercise was produced by the voice pipeline
    pub ai_tagged: bool,
    /// Ordered sets
    pub sets: Vec<ExerciseSet>,
}

/// A logged workout session
///
/// Immutable once created; the voice pipeline creates sessions with
/// `date = now` and AI-tagged exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    /// Unique session ID
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// When the workout happened
    pub date: DateTime<Utc>,
    /// Total session duration in hours, if stated for the whole workout
    pub duration: Option<f64>,
    /// Free-text session note
    pub note: Option<String>,
    /// Ordered exercises
    pub exercises: Vec<Exercise>,
}

impl WorkoutSession {
    /// Create a new session owned by `user_id`
    #[must_use]
    pub fn new(
        user_id: Uuid,
        date: DateTime<Utc>,
        duration: Option<f64>,
        note: Option<String>,
        exercises: Vec<Exercise>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            duration,
            note,
            exercises,
        }
    }
}

/// A body measurement record, independent of any workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMetric {
    /// Unique record ID
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Measurement date
    pub date: DateTime<Utc>,
    /// Body weight in kilograms
    pub weight: Option<f64>,
    /// Body fat percentage
    pub body_fat: Option<f64>,
    /// Muscle mass in kilograms
    pub muscle_mass: Option<f64>,
}

impl BodyMetric {
    /// Create a new metric record owned by `user_id`
    #[must_use]
    pub fn new(
        user_id: Uuid,
        date: DateTime<Utc>,
        weight: Option<f64>,
        body_fat: Option<f64>,
        muscle_mass: Option<f64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            weight,
            body_fat,
            muscle_mass,
        }
    }

    /// Whether at least one measurement field is populated
    #[must_use]
    pub const fn has_any_value(&self) -> bool {
        self.weight.is_some() || self.body_fat.is_some() || self.muscle_mass.is_some()
    }
}

/// Priority level attached to an insight recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    /// Address first
    High,
    /// Worth doing soon
    Medium,
    /// Nice to have
    Low,
}

impl Display for RecommendationPriority {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        write!(f, "{s}")
    }
}

/// A single actionable recommendation inside an insight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// How urgently the user should act
    pub priority: RecommendationPriority,
    /// What to do
    pub action: String,
    /// Why it matters, grounded in the aggregated data
    pub reasoning: String,
}

/// Narrative trend strings, one per tracked dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightTrends {
    /// Training volume trend
    pub volume: Option<String>,
    /// Session frequency trend
    pub frequency: Option<String>,
    /// Body composition trend
    pub body_composition: Option<String>,
}

/// An AI-generated training insight
///
/// Insights are append-only history; the most recent `generated_at` per
/// user is authoritative for gate checks and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInsight {
    /// Unique insight ID
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Narrative summary of the training period
    pub summary: String,
    /// At least three celebrated achievements
    pub achievements: Vec<String>,
    /// Per-dimension trend narratives
    pub trends: InsightTrends,
    /// Two to five prioritized recommendations
    pub recommendations: Vec<Recommendation>,
    /// Up to five cautionary notes
    pub warnings: Vec<String>,
    /// Three to six concrete next steps
    pub next_steps: Vec<String>,
    /// When this insight was generated
    pub generated_at: DateTime<Utc>,
    /// Earliest time a new insight may be generated; always
    /// `generated_at` plus the 24h cooldown
    pub can_regenerate_after: DateTime<Utc>,
}

impl UserInsight {
    /// Create a new insight generated at `generated_at`
    ///
    /// The regeneration deadline is derived, never supplied, so the
    /// cooldown invariant holds by construction.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Uuid,
        summary: String,
        achievements: Vec<String>,
        trends: InsightTrends,
        recommendations: Vec<Recommendation>,
        warnings: Vec<String>,
        next_steps: Vec<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            summary,
            achievements,
            trends,
            recommendations,
            warnings,
            next_steps,
            generated_at,
            can_regenerate_after: generated_at + Duration::hours(REGENERATION_COOLDOWN_HOURS),
        }
    }
}
