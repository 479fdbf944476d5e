//! Error types for didact.
//!
//! Epistemic taxonomy:
//! - B_i falsified: Expected failures (bad config, missing API key)
//! - I^B materialized: Infrastructure failures (network, timeout, quota)
//! - K_i violated: Internal invariant violations (bugs)
//!
//! Malformed model output is deliberately NOT an error value: extraction
//! routes it straight into a default record (see `FallbackReason`), so it
//! never travels through `Result` at all.

use thiserror::Error;

/// Top-level error type for didact.
#[derive(Debug, Error)]
pub enum DidactError {
    // ═══════════════════════════════════════════════════════════════════
    // B_i FALSIFIED — Belief proven wrong (expected failures)
    // ═══════════════════════════════════════════════════════════════════

    #[error("Configuration error: {0}")]
    Config(#[from] super::ConfigError),

    // ═══════════════════════════════════════════════════════════════════
    // I^B MATERIALIZED — Bounded ignorance became known-bad
    // ═══════════════════════════════════════════════════════════════════

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Model returned an empty completion")]
    EmptyCompletion,

    #[error("Generation failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    // ═══════════════════════════════════════════════════════════════════
    // K_i VIOLATED — Invariant broken (bug, should not happen)
    // ═══════════════════════════════════════════════════════════════════

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Chat-completions API specific errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Rate limited{}", retry_after_secs.map(|s| format!(": retry after {s}s")).unwrap_or_default())]
    RateLimited { retry_after_secs: Option<f64> },

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for didact.
pub type Result<T> = std::result::Result<T, DidactError>;
