// ABOUTME: Prompt builders for the structured extraction calls
// ABOUTME: Renders the unified voice-log prompt and the insights analysis prompt
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # Prompts
//!
//! One prompt per extraction call. The voice prompt covers workout and
//! body-metric extraction in a single pass; the insights prompt renders an
//! aggregated digest into an analyst briefing.

use std::fmt::Write as _;

use crate::intelligence::TrainingDigest;

/// Build the unified voice-log extraction prompt
///
/// A single combined prompt handles workout-only, metric-only, mixed, and
/// unintelligible transcripts; the schema's nullable branches carry the
/// outcome.
#[must_use]
pub fn unified_voice_prompt(transcript: &str) -> String {
    format!(
        r#"Analyze this voice input and extract both workout and body metric information:

Input: "{transcript}"

For WORKOUT data, extract:
- Exercise names (be intelligent about variations: bench press = bench, pull-ups = pullups)
- Sets, reps, weights, distances, durations
- Categories (strength, cardio, mobility, custom)
- Units: convert weight to kg, duration to hours (for example: 30 mins = 0.5 hrs)

IMPORTANT - Duration handling:
- If duration is mentioned for a specific exercise (like "running for 30 mins"), put it in that exercise's set duration field
- Only put duration in the workout-level duration field if explicitly mentioned for the entire workout session (like "my whole workout took 2 hours")
- Exercise-specific durations should NOT be added to workout-level duration

For BODY METRIC data, extract:
- Weight, body fat percentage, muscle mass
- Units: convert weight to kg, body fat as percentage
- Date context ("yesterday", "this morning")
- Any measurement notes

If the input contains only workout data, set bodyMetrics to null.
If the input contains only body metrics, set workout to null.
If unclear or invalid input, set both to null.

Provide structured data for whatever you can extract from the input.
"#
    )
}

/// Build the insights generation prompt from an aggregated digest
#[must_use]
pub fn insights_prompt(digest: &TrainingDigest) -> String {
    let mut data = String::new();

    let _ = writeln!(
        data,
        "- Training period: {} days, {} sessions total ({:.1} sessions/week on average)",
        digest.training_period_days, digest.total_sessions, digest.avg_sessions_per_week
    );
    let _ = writeln!(
        data,
        "- Total volume lifted: {:.1} kg; total cardio duration: {:.1} hours",
        digest.total_volume, digest.total_cardio_duration
    );
    let _ = writeln!(
        data,
        "- Exercise distribution: {} strength, {} cardio, {} mobility",
        digest.exercise_distribution.strength,
        digest.exercise_distribution.cardio,
        digest.exercise_distribution.mobility
    );

    if !digest.top_exercises.is_empty() {
        let top = digest
            .top_exercises
            .iter()
            .map(|e| format!("{} ({}x, {})", e.name, e.count, e.category))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(data, "- Most frequent exercises: {top}");
    }

    let _ = writeln!(
        data,
        "- Consistency: {} sessions in the last 14 days vs {} in the 14 days before",
        digest.recent_weeks_comparison.current, digest.recent_weeks_comparison.previous
    );

    if let Some(metrics) = &digest.body_metrics {
        if let Some(weight) = &metrics.weight_change {
            let _ = writeln!(data, "- Body weight: {weight}");
        }
        if let Some(body_fat) = &metrics.body_fat_change {
            let _ = writeln!(data, "- Body fat: {body_fat}");
        }
        if let Some(muscle) = &metrics.muscle_mass_change {
            let _ = writeln!(data, "- Muscle mass: {muscle}");
        }
    } else {
        let _ = writeln!(data, "- No body composition data recorded in this period");
    }

    format!(
        r"You are an experienced strength and conditioning coach reviewing a client's training log.

Training data for the analysis window:
{data}
Write an encouraging, specific analysis of this training history:
- summary: 2-3 sentences capturing the overall picture
- achievements: at least 3 concrete wins grounded in the numbers above
- trends: short narratives for volume, frequency, and body composition (omit a field if there is no data for it)
- recommendations: 2 to 5 prioritized, actionable changes with reasoning
- warnings: up to 5 cautions (overtraining signals, imbalances); leave empty if none apply
- nextSteps: 3 to 6 concrete actions for the coming weeks

Be specific: cite the numbers from the data rather than generic advice.
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::{
        BodyMetricsDigest, ExerciseDistribution, TopExercise, TrainingDigest, WeeksComparison,
    };
    use crate::models::ExerciseCategory;

    fn sample_digest() -> TrainingDigest {
        TrainingDigest {
            training_period_days: 60,
            total_sessions: 24,
            avg_sessions_per_week: 2.8,
            total_volume: 18240.0,
            total_cardio_duration: 6.5,
            exercise_distribution: ExerciseDistribution {
                strength: 40,
                cardio: 12,
                mobility: 4,
            },
            top_exercises: vec![TopExercise {
                name: "bench press".into(),
                count: 14,
                category: ExerciseCategory::Strength,
            }],
            recent_weeks_comparison: WeeksComparison {
                current: 5,
                previous: 3,
            },
            body_metrics: Some(BodyMetricsDigest {
                weight_change: Some("81.2kg (-1.4kg)".into()),
                body_fat_change: None,
                muscle_mass_change: None,
            }),
        }
    }

    #[test]
    fn test_voice_prompt_embeds_transcript() {
        let prompt = unified_voice_prompt("I benched 3x8 at 80kg");
        assert!(prompt.contains("I benched 3x8 at 80kg"));
        assert!(prompt.contains("set bodyMetrics to null"));
    }

    #[test]
    fn test_insights_prompt_renders_digest() {
        let prompt = insights_prompt(&sample_digest());
        assert!(prompt.contains("60 days"));
        assert!(prompt.contains("18240.0 kg"));
        assert!(prompt.contains("bench press (14x, strength)"));
        assert!(prompt.contains("81.2kg (-1.4kg)"));
        assert!(prompt.contains("5 sessions in the last 14 days vs 3"));
    }

    #[test]
    fn test_insights_prompt_without_body_metrics() {
        let digest = TrainingDigest {
            body_metrics: None,
            ..sample_digest()
        };
        let prompt = insights_prompt(&digest);
        assert!(prompt.contains("No body composition data"));
    }
}
