// ABOUTME: Gemini response-schema descriptors for the extraction calls
// ABOUTME: Describes the unified voice-log shape and the insights shape
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # Response Schemas
//!
//! Schema descriptors sent with every structured extraction call. The
//! unified voice-log schema has two independently-nullable top-level
//! branches (`workout`, `bodyMetrics`) so a single call covers transcripts
//! that describe a workout, a measurement, both, or neither — no separate
//! classification round trip.
//!
//! These describe what we *ask* the model for. The schema validator
//! re-checks what actually comes back; a requested schema is a hint the
//! model can and occasionally does violate.

use serde_json::json;

use super::SchemaDescriptor;

/// Schema for one exercise set: all fields nullable
fn exercise_set_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "reps": { "type": "NUMBER", "nullable": true },
            "weight": { "type": "NUMBER", "nullable": true },
            "distance": { "type": "NUMBER", "nullable": true },
            "duration": { "type": "NUMBER", "nullable": true },
            "intensity": {
                "type": "STRING",
                "enum": ["easy", "moderate", "hard", "max"],
                "nullable": true
            },
            "note": { "type": "STRING", "nullable": true }
        },
        "propertyOrdering": ["reps", "weight", "distance", "duration", "intensity", "note"]
    })
}

/// Schema for one exercise with its sets
fn exercise_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "category": {
                "type": "STRING",
                "enum": ["strength", "cardio", "mobility", "custom"]
            },
            "isCustom": { "type": "BOOLEAN" },
            "sets": {
                "type": "ARRAY",
                "items": exercise_set_schema(),
                "minItems": 1
            }
        },
        "required": ["name", "category", "isCustom", "sets"],
        "propertyOrdering": ["name", "category", "isCustom", "sets"]
    })
}

/// Unified voice-log response schema: nullable `workout` and `bodyMetrics`
#[must_use]
pub fn unified_voice_log() -> SchemaDescriptor {
    SchemaDescriptor::new(
        "unified voice log",
        json!({
            "type": "OBJECT",
            "properties": {
                "workout": {
                    "type": "OBJECT",
                    "properties": {
                        "exercises": {
                            "type": "ARRAY",
                            "items": exercise_schema(),
                            "nullable": true
                        },
                        "duration": { "type": "NUMBER", "nullable": true },
                        "note": { "type": "STRING", "nullable": true }
                    },
                    "nullable": true,
                    "propertyOrdering": ["exercises", "duration", "note"]
                },
                "bodyMetrics": {
                    "type": "OBJECT",
                    "properties": {
                        "weight": { "type": "NUMBER", "nullable": true },
                        "bodyFat": { "type": "NUMBER", "nullable": true },
                        "muscleMass": { "type": "NUMBER", "nullable": true },
                        "date": { "type": "STRING", "format": "date", "nullable": true },
                        "note": { "type": "STRING", "nullable": true }
                    },
                    "nullable": true,
                    "propertyOrdering": ["weight", "bodyFat", "muscleMass", "date", "note"]
                }
            },
            "propertyOrdering": ["workout", "bodyMetrics"]
        }),
    )
}

/// Insights response schema with the cardinality bounds the validator
/// enforces (achievements >= 3, recommendations 2-5, warnings <= 5,
/// nextSteps 3-6)
#[must_use]
pub fn insights() -> SchemaDescriptor {
    SchemaDescriptor::new(
        "insights",
        json!({
            "type": "OBJECT",
            "properties": {
                "summary": { "type": "STRING" },
                "achievements": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "minItems": 3
                },
                "trends": {
                    "type": "OBJECT",
                    "properties": {
                        "volume": { "type": "STRING", "nullable": true },
                        "frequency": { "type": "STRING", "nullable": true },
                        "bodyComposition": { "type": "STRING", "nullable": true }
                    },
                    "propertyOrdering": ["volume", "frequency", "bodyComposition"]
                },
                "recommendations": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "priority": {
                                "type": "STRING",
                                "enum": ["high", "medium", "low"]
                            },
                            "action": { "type": "STRING" },
                            "reasoning": { "type": "STRING" }
                        },
                        "required": ["priority", "action", "reasoning"],
                        "propertyOrdering": ["priority", "action", "reasoning"]
                    },
                    "minItems": 2,
                    "maxItems": 5
                },
                "warnings": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "maxItems": 5
                },
                "nextSteps": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "minItems": 3,
                    "maxItems": 6
                }
            },
            "required": ["summary", "achievements", "trends", "recommendations", "warnings", "nextSteps"],
            "propertyOrdering": ["summary", "achievements", "trends", "recommendations", "warnings", "nextSteps"]
        }),
    )
}
