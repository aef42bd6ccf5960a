// ABOUTME: Aggregation engine folding sessions and metrics into a training digest
// ABOUTME: Computes volume, cardio time, distribution, top exercises, and deltas
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # Aggregation Engine
//!
//! Folds a window of [`WorkoutSession`]s and [`BodyMetric`]s into a
//! [`TrainingDigest`]. All math happens here, before any model is
//! involved, so the insight prompt only ever sees already-computed
//! numbers.
//!
//! ## Conventions
//!
//! - Volume counts every set with both a weight and a rep count,
//!   regardless of category.
//! - Cardio duration counts set durations of cardio-category exercises
//!   only.
//! - The distribution and top-exercise lists count *occurrences*: the same
//!   exercise in ten sessions contributes ten.
//! - Top-exercise names are lowercased so "Bench Press" and "bench press"
//!   merge; ties keep first-seen order.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::debug;

use super::{
    BodyMetricsDigest, ExerciseDistribution, TopExercise, TrainingDigest, WeeksComparison,
};
use crate::errors::{AppError, AppResult};
use crate::models::{BodyMetric, ExerciseCategory, WorkoutSession};

/// Maximum entries in the top-exercises list
const TOP_EXERCISES_LIMIT: usize = 5;

/// Aggregate a training window into a digest
///
/// `now` is the end of the window; sessions and metrics are expected to
/// already be filtered to the window by the caller. Fails with an
/// insufficient-data error when `sessions` is empty, since every other
/// digest field is meaningless without at least one session.
pub fn aggregate(
    sessions: &[WorkoutSession],
    metrics: &[BodyMetric],
    now: DateTime<Utc>,
) -> AppResult<TrainingDigest> {
    if sessions.is_empty() {
        return Err(AppError::insufficient_data(
            "No workout sessions in the aggregation window",
        ));
    }

    let oldest = sessions
        .iter()
        .map(|session| session.date)
        .min()
        .unwrap_or(now);
    // Partial days round up; same-day logging still counts as one day
    let elapsed_seconds = (now - oldest).num_seconds().max(0);
    let training_period_days = ((elapsed_seconds + 86_399) / 86_400).max(1);
    let total_sessions = sessions.len();
    let avg_sessions_per_week = total_sessions as f64 * 7.0 / training_period_days as f64;

    let mut total_volume = 0.0;
    let mut total_cardio_duration = 0.0;
    let mut distribution = ExerciseDistribution::default();
    // Insertion-ordered so ties in the frequency sort stay first-seen
    let mut exercise_order: Vec<String> = Vec::new();
    let mut exercise_counts: HashMap<String, (usize, ExerciseCategory, DateTime<Utc>)> =
        HashMap::new();

    for session in sessions {
        for exercise in &session.exercises {
            match exercise.category {
                ExerciseCategory::Strength => distribution.strength += 1,
                ExerciseCategory::Cardio => distribution.cardio += 1,
                ExerciseCategory::Mobility => distribution.mobility += 1,
                ExerciseCategory::Custom => {}
            }

            let key = exercise.name.to_lowercase();
            match exercise_counts.get_mut(&key) {
                Some((count, category, seen_at)) => {
                    *count += 1;
                    // The tag follows the most recent occurrence whatever
                    // order the sessions arrive in
                    if session.date > *seen_at {
                        *category = exercise.category;
                        *seen_at = session.date;
                    }
                }
                None => {
                    exercise_order.push(key.clone());
                    exercise_counts.insert(key, (1, exercise.category, session.date));
                }
            }

            for set in &exercise.sets {
                if let (Some(weight), Some(reps)) = (set.weight, set.reps) {
                    total_volume += weight * f64::from(reps);
                }
                if exercise.category == ExerciseCategory::Cardio {
                    if let Some(duration) = set.duration {
                        total_cardio_duration += duration;
                    }
                }
            }
        }
    }

    let mut top_exercises: Vec<TopExercise> = exercise_order
        .into_iter()
        .filter_map(|name| {
            exercise_counts
                .get(&name)
                .map(|&(count, category, _)| TopExercise { name, count, category })
        })
        .collect();
    top_exercises.sort_by(|a, b| b.count.cmp(&a.count));
    top_exercises.truncate(TOP_EXERCISES_LIMIT);

    let digest = TrainingDigest {
        training_period_days,
        total_sessions,
        avg_sessions_per_week,
        total_volume,
        total_cardio_duration,
        exercise_distribution: distribution,
        top_exercises,
        recent_weeks_comparison: compare_recent_weeks(sessions, now),
        body_metrics: summarize_body_metrics(metrics),
    };

    debug!(
        sessions = digest.total_sessions,
        period_days = digest.training_period_days,
        volume = digest.total_volume,
        "Aggregated training window"
    );
    Ok(digest)
}

/// Count sessions in the last 14 days vs the 14 days before
fn compare_recent_weeks(sessions: &[WorkoutSession], now: DateTime<Utc>) -> WeeksComparison {
    let two_weeks_ago = now - Duration::days(14);
    let four_weeks_ago = now - Duration::days(28);
    let mut comparison = WeeksComparison::default();
    for session in sessions {
        if session.date >= two_weeks_ago {
            comparison.current += 1;
        } else if session.date >= four_weeks_ago {
            comparison.previous += 1;
        }
    }
    comparison
}

/// Compute per-field change lines from the oldest and newest records
///
/// Requires at least two records; a field is included only when both
/// endpoints carry it.
fn summarize_body_metrics(metrics: &[BodyMetric]) -> Option<BodyMetricsDigest> {
    if metrics.len() < 2 {
        return None;
    }
    let oldest = metrics.iter().min_by_key(|metric| metric.date)?;
    let latest = metrics.iter().max_by_key(|metric| metric.date)?;

    Some(BodyMetricsDigest {
        weight_change: change_line(oldest.weight, latest.weight, "kg"),
        body_fat_change: change_line(oldest.body_fat, latest.body_fat, "%"),
        muscle_mass_change: change_line(oldest.muscle_mass, latest.muscle_mass, "kg"),
    })
}

fn change_line(oldest: Option<f64>, latest: Option<f64>, unit: &str) -> Option<String> {
    let (oldest, latest) = (oldest?, latest?);
    let delta = latest - oldest;
    Some(format!("{latest:.1}{unit} ({delta:+.1}{unit})"))
}
