// ABOUTME: Structured extraction provider abstraction for generative model integration
// ABOUTME: Defines the contract for schema-constrained JSON extraction calls
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Trainlog Contributors

//! # Structured Extraction Client
//!
//! Contract for asking a generative model to produce JSON that conforms to
//! a requested schema. A provider is responsible for exactly three things:
//! making the call, confirming the response body is non-empty, and parsing
//! it as JSON. Whether the JSON is *the JSON we need* is the schema
//! validator's job ([`crate::validation`]) — keeping "is this JSON" and
//! "is this the right JSON" separate keeps both sides independently
//! testable with mocked responses.
//!
//! ## Example
//!
//! ```rust,no_run
//! use trainlog::llm::{schemas, prompts, ExtractionProvider, GeminiProvider, StructuredRequest};
//!
//! # async fn example() -> Result<(), trainlog::errors::AppError> {
//! let provider = GeminiProvider::from_env()?;
//! let request = StructuredRequest::new(
//!     prompts::unified_voice_prompt("bench press 3x8 at 80 kilos"),
//!     schemas::unified_voice_log(),
//! );
//! let value = provider.extract(&request).await?;
//! # Ok(())
//! # }
//! ```

mod gemini;
pub mod prompts;
pub mod schemas;

pub use gemini::GeminiProvider;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppResult;

/// A response schema in the Gemini structured-output dialect
///
/// Wraps the JSON description (`type`, `properties`, `enum`, `nullable`,
/// `minItems`/`maxItems`, `propertyOrdering`, ...) together with a name
/// used in diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDescriptor {
    /// Diagnostic name, e.g. "unified voice log"
    pub name: &'static str,
    /// Schema body sent verbatim as `responseSchema`
    pub schema: Value,
}

impl SchemaDescriptor {
    /// Create a descriptor from a name and schema body
    #[must_use]
    pub const fn new(name: &'static str, schema: Value) -> Self {
        Self { name, schema }
    }
}

/// Configuration for one structured extraction call
#[derive(Debug, Clone, Serialize)]
pub struct StructuredRequest {
    /// Full prompt text
    pub prompt: String,
    /// Required output schema
    pub schema: SchemaDescriptor,
    /// Model identifier (provider-specific); provider default when `None`
    pub model: Option<String>,
    /// Temperature for response randomness
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_output_tokens: Option<u32>,
}

impl StructuredRequest {
    /// Create a request with a prompt and schema
    #[must_use]
    pub const fn new(prompt: String, schema: SchemaDescriptor) -> Self {
        Self {
            prompt,
            schema,
            model: None,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum output tokens
    #[must_use]
    pub const fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }
}

/// Structured extraction provider trait
///
/// Implement this to plug a different model backend into the pipeline.
/// The trait is object-safe so orchestrators hold `Arc<dyn
/// ExtractionProvider>` and tests substitute canned responses.
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    /// Unique provider identifier (e.g. "gemini")
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default model used when the request does not specify one
    fn default_model(&self) -> &str;

    /// Perform one schema-constrained extraction call
    ///
    /// Returns the parsed JSON value. Fails with an extraction error when
    /// the call itself fails, the response is empty, or the response body
    /// is not parseable JSON. Performs no semantic validation.
    async fn extract(&self, request: &StructuredRequest) -> AppResult<Value>;

    /// Check that the provider is reachable and its credentials are valid
    async fn health_check(&self) -> AppResult<bool>;
}
