// ABOUTME: Voice-driven fitness logging core library
// ABOUTME: Structured extraction, training aggregation, and gated insight generation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # Trainlog
//!
//! Core pipeline for a voice-driven fitness log. One spoken transcript
//! becomes structured training data through a single schema-constrained
//! model call, and accumulated data becomes coaching insights through a
//! deterministic aggregation step plus one more model call.
//!
//! ## Architecture
//!
//! - [`llm`] — structured extraction: provider trait, Gemini client,
//!   response schemas, and prompts
//! - [`validation`] — re-checks model responses against the requested
//!   shape before anything is persisted
//! - [`voice`] — the unified voice-log interpreter: transcript in,
//!   workout session and/or body metric out, persisted independently
//! - [`intelligence`] — pure aggregation of the training window into the
//!   digest the insight prompt is built from
//! - [`insights`] — insight generation behind a 24-hour regeneration gate
//!   and a minimum-data precondition
//! - [`database_plugins`] — storage trait with a SQLite backend
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trainlog::database_plugins::factory::Database;
//! use trainlog::llm::GeminiProvider;
//! use trainlog::voice::VoiceLogInterpreter;
//! use uuid::Uuid;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let database = Arc::new(Database::new("sqlite:trainlog.db").await?);
//! let provider = Arc::new(GeminiProvider::from_env()?);
//! let interpreter = VoiceLogInterpreter::new(provider, database);
//!
//! let outcome = interpreter
//!     .interpret(Uuid::new_v4(), "bench press, 3 sets of 8 at 80 kilos")
//!     .await?;
//! println!("{}", outcome.message);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database_plugins;
pub mod errors;
pub mod insights;
pub mod intelligence;
pub mod llm;
pub mod logging;
pub mod models;
pub mod validation;
pub mod voice;

pub use errors::{AppError, AppResult, ErrorCode};
