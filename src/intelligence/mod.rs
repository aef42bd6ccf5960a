// ABOUTME: Training-data intelligence layer with digest types and aggregation
// ABOUTME: Condenses raw sessions and metrics into the digest fed to insight generation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # Intelligence Layer
//!
//! Deterministic analysis of logged training data. The single entry point
//! is [`aggregation::aggregate`], which folds a window of sessions and
//! body metrics into a [`TrainingDigest`] — the compact, numeric summary
//! the insight prompt is rendered from. Nothing in this module calls a
//! model; everything here is pure and unit-testable.

pub mod aggregation;

use serde::{Deserialize, Serialize};

use crate::models::ExerciseCategory;

/// Aggregated summary of one user's training window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDigest {
    /// Days between the oldest session in the window and now, partial
    /// days rounded up, minimum 1
    pub training_period_days: i64,
    /// Number of sessions in the window
    pub total_sessions: usize,
    /// Average sessions per week over the training period
    pub avg_sessions_per_week: f64,
    /// Total volume lifted in kg (sum of weight x reps over all sets)
    pub total_volume: f64,
    /// Total cardio duration in hours (cardio-category sets only)
    pub total_cardio_duration: f64,
    /// Exercise occurrence counts per category
    pub exercise_distribution: ExerciseDistribution,
    /// Up to five most frequent exercises, by occurrence count
    pub top_exercises: Vec<TopExercise>,
    /// Session counts for the last 14 days vs the 14 days before
    pub recent_weeks_comparison: WeeksComparison,
    /// Body-composition changes; `None` when fewer than two records exist
    pub body_metrics: Option<BodyMetricsDigest>,
}

/// Exercise occurrence counts per category
///
/// Counts occurrences, not unique names: benching in ten sessions counts
/// ten. Custom-category exercises are excluded.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExerciseDistribution {
    /// Strength exercise occurrences
    pub strength: usize,
    /// Cardio exercise occurrences
    pub cardio: usize,
    /// Mobility exercise occurrences
    pub mobility: usize,
}

/// One entry in the most-frequent-exercises list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopExercise {
    /// Lowercased exercise name
    pub name: String,
    /// Occurrence count across the window
    pub count: usize,
    /// Category of the most recent occurrence
    pub category: ExerciseCategory,
}

/// Session counts for the two most recent 14-day stretches
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WeeksComparison {
    /// Sessions in the last 14 days
    pub current: usize,
    /// Sessions in the 14 days before that
    pub previous: usize,
}

/// Pre-formatted body-composition change lines
///
/// Each line reads like `81.2kg (-1.4kg)`: the latest value followed by
/// the signed delta from the oldest record in the window. A field is
/// `None` when either endpoint lacks that measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMetricsDigest {
    /// Latest weight and change, e.g. "81.2kg (-1.4kg)"
    pub weight_change: Option<String>,
    /// Latest body fat and change, e.g. "17.5% (+0.3%)"
    pub body_fat_change: Option<String>,
    /// Latest muscle mass and change, e.g. "38.1kg (+0.6kg)"
    pub muscle_mass_change: Option<String>,
}
