// ABOUTME: Environment-driven configuration for the trainlog core
// ABOUTME: Resolves model selection, request timeouts, and storage URLs from env vars
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # Configuration
//!
//! Environment-only configuration, no config files. The extraction provider
//! reads its own API key (`GEMINI_API_KEY`); everything else lives here.

use std::env;
use std::time::Duration;

use crate::errors::{AppError, AppResult};

/// Trailing window, in days, of sessions and metrics fed to aggregation
pub const AGGREGATION_WINDOW_DAYS: i64 = 90;

/// Minimum number of logged sessions before insights can be generated
pub const MIN_SESSIONS_FOR_INSIGHTS: i64 = 3;

/// Cooldown, in hours, between insight generations for one user
pub const REGENERATION_COOLDOWN_HOURS: i64 = 24;

/// Core service configuration
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Database connection string (`DATABASE_URL`)
    pub database_url: String,
    /// Model identifier for structured extraction (`TRAINLOG_LLM_MODEL`)
    pub llm_model: Option<String>,
    /// Overall outbound request timeout (`TRAINLOG_REQUEST_TIMEOUT_SECS`)
    pub request_timeout: Duration,
}

impl CoreConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error if `TRAINLOG_REQUEST_TIMEOUT_SECS` is set but
    /// not a positive integer.
    pub fn from_env() -> AppResult<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:trainlog.db".to_owned());

        let llm_model = env::var("TRAINLOG_LLM_MODEL").ok();

        let request_timeout = match env::var("TRAINLOG_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    AppError::config(format!(
                        "TRAINLOG_REQUEST_TIMEOUT_SECS must be a positive integer, got {raw:?}"
                    ))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(30),
        };

        Ok(Self {
            database_url,
            llm_model,
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_constants() {
        assert_eq!(AGGREGATION_WINDOW_DAYS, 90);
        assert_eq!(MIN_SESSIONS_FOR_INSIGHTS, 3);
        assert_eq!(REGENERATION_COOLDOWN_HOURS, 24);
    }
}
