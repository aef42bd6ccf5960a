// ABOUTME: Unified error handling for the trainlog core pipeline
// ABOUTME: Defines error codes, HTTP status mapping, and response formatting
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # Unified Error Handling
//!
//! Central error types for the ingestion and insight pipeline. Every
//! component failure maps onto an [`ErrorCode`] so the orchestrating layer
//! can distinguish "expected" outcomes (bad input, cooldown, not enough
//! data) from genuine server faults without string matching.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Standard error codes used throughout the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Empty or malformed caller input (e.g. blank transcript)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// Input the extraction model could not map to workout or metric data
    #[serde(rename = "UNCLEAR_INPUT")]
    UnclearInput,
    /// Well-formed JSON from the model that fails the expected shape
    #[serde(rename = "SCHEMA_VALIDATION_FAILED")]
    SchemaValidation,
    /// Too few persisted sessions to aggregate or generate insights
    #[serde(rename = "INSUFFICIENT_DATA")]
    InsufficientData,
    /// Insight regeneration gate is still locked
    #[serde(rename = "RATE_LIMIT_EXCEEDED")]
    RateLimitExceeded,
    /// Model call failed: transport, empty response, or unparseable JSON
    #[serde(rename = "EXTRACTION_FAILED")]
    ExtractionFailed,
    /// The model provider itself rejected the call for quota reasons
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited,
    /// Storage failure for one of the persisted entities
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    /// Data serialization/deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError,
    /// Missing or invalid environment configuration
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            // 400 Bad Request: user-correctable outcomes
            Self::InvalidInput
            | Self::UnclearInput
            | Self::SchemaValidation
            | Self::InsufficientData => 400,

            // 429 Too Many Requests
            Self::RateLimitExceeded => 429,

            // 502 Bad Gateway
            Self::ExtractionFailed => 502,

            // 503 Service Unavailable
            Self::ExternalRateLimited => 503,

            // 500 Internal Server Error
            Self::DatabaseError
            | Self::SerializationError
            | Self::ConfigError
            | Self::InternalError => 500,
        }
    }

    /// Whether this code represents an expected, caller-correctable outcome
    ///
    /// Expected outcomes are returned to the caller verbatim; unexpected
    /// ones are additionally logged with full context.
    #[must_use]
    pub const fn is_expected(self) -> bool {
        matches!(
            self,
            Self::InvalidInput
                | Self::UnclearInput
                | Self::SchemaValidation
                | Self::InsufficientData
                | Self::RateLimitExceeded
                | Self::ExternalRateLimited
        )
    }

    /// Get a user-facing description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::UnclearInput => "Could not understand the input",
            Self::SchemaValidation => "The model response did not match the expected shape",
            Self::InsufficientData => "Not enough logged data for this operation",
            Self::RateLimitExceeded => "Regeneration is still on cooldown",
            Self::ExtractionFailed => "The extraction model call failed",
            Self::ExternalRateLimited => "The model provider rate limit was hit",
            Self::DatabaseError => "Database operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal error occurred",
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// User ID if available
    pub user_id: Option<Uuid>,
    /// Additional key-value context (offending payloads, suggestions,
    /// unlock timestamps, per-entity failure lists)
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            user_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Unified error type for the pipeline
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Attach a user ID to the error context
    #[must_use]
    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.context.user_id = Some(user_id);
        self
    }

    /// Attach details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Attach a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of an [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Structured context (suggestion strings, unlock times, payloads)
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                details: error.context.details,
            },
        }
    }
}

/// Convenience constructors for the pipeline's error taxonomy
impl AppError {
    /// Invalid caller input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Input the model could not map to any known entity, with a
    /// suggested example utterance for the user
    pub fn unclear_input(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnclearInput, message).with_details(serde_json::json!({
            "suggestion": suggestion.into(),
        }))
    }

    /// Model response with the wrong shape; carries the raw payload so
    /// prompt/schema drift can be diagnosed from logs
    pub fn schema_validation(
        schema_name: &str,
        reason: impl Into<String>,
        payload: &serde_json::Value,
    ) -> Self {
        Self::new(
            ErrorCode::SchemaValidation,
            format!("Response does not match {schema_name} schema"),
        )
        .with_details(serde_json::json!({
            "schema": schema_name,
            "reason": reason.into(),
            "received": payload,
        }))
    }

    /// Precondition failure: too little logged data
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientData, message)
    }

    /// Regeneration gate still locked; `fallback` carries the still-valid
    /// previous payload so callers can serve it instead
    pub fn rate_limited(
        message: impl Into<String>,
        can_regenerate_at: chrono::DateTime<chrono::Utc>,
        fallback: serde_json::Value,
    ) -> Self {
        Self::new(ErrorCode::RateLimitExceeded, message).with_details(serde_json::json!({
            "canRegenerateAt": can_regenerate_at.to_rfc3339(),
            "insights": fallback,
        }))
    }

    /// Extraction model call failure (transport, empty body, bad JSON)
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExtractionFailed, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.source() {
            Some(source) => {
                Self::new(ErrorCode::InternalError, error.to_string()).with_details(
                    serde_json::json!({
                        "source": source.to_string(),
                    }),
                )
            }
            None => Self::new(ErrorCode::InternalError, error.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::UnclearInput.http_status(), 400);
        assert_eq!(ErrorCode::RateLimitExceeded.http_status(), 429);
        assert_eq!(ErrorCode::ExtractionFailed.http_status(), 502);
        assert_eq!(ErrorCode::DatabaseError.http_status(), 500);
    }

    #[test]
    fn test_expected_vs_unexpected() {
        assert!(ErrorCode::SchemaValidation.is_expected());
        assert!(ErrorCode::InsufficientData.is_expected());
        assert!(ErrorCode::ExternalRateLimited.is_expected());
        assert!(!ErrorCode::ExtractionFailed.is_expected());
        assert!(!ErrorCode::DatabaseError.is_expected());
    }

    #[test]
    fn test_unclear_input_carries_suggestion() {
        let error = AppError::unclear_input(
            "Could not understand the input. Please try again.",
            "Try saying something like: 'I did bench press'",
        );
        assert_eq!(error.code, ErrorCode::UnclearInput);
        assert!(error.context.details["suggestion"]
            .as_str()
            .is_some_and(|s| s.contains("bench press")));
    }

    #[test]
    fn test_rate_limited_carries_unlock_time_and_fallback() {
        let unlock_at = chrono::Utc::now() + chrono::Duration::hours(3);
        let error = AppError::rate_limited(
            "Please wait 3 hour(s) before generating new insights.",
            unlock_at,
            serde_json::json!({"summary": "previous insight"}),
        );
        assert_eq!(error.code, ErrorCode::RateLimitExceeded);
        assert_eq!(error.http_status(), 429);
        assert_eq!(
            error.context.details["canRegenerateAt"],
            unlock_at.to_rfc3339()
        );
        assert_eq!(error.context.details["insights"]["summary"], "previous insight");
    }

    #[test]
    fn test_schema_validation_keeps_payload() {
        let payload = serde_json::json!({"workout": 42});
        let error = AppError::schema_validation("unified voice log", "workout is not an object", &payload);
        assert_eq!(error.context.details["received"]["workout"], 42);
        let json = serde_json::to_string(&ErrorResponse::from(error)).unwrap();
        assert!(json.contains("SCHEMA_VALIDATION_FAILED"));
    }
}
