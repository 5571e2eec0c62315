//! Error types for Swarmchat
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Swarmchat operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, gateway interactions, response streaming,
/// and attachment ingestion.
#[derive(Error, Debug)]
pub enum SwarmchatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Gateway-related errors (API calls, malformed responses, etc.)
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Missing credential for the gateway
    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredentials(String),

    /// Authentication errors (e.g., 401 Unauthorized)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Rate limit rejection from the gateway
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Response stream ended abnormally mid-turn
    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    /// Attachment ingestion errors (read failure, unreadable path)
    #[error("Attachment error: {0}")]
    Attachment(String),

    /// Session lookup errors (unknown session id)
    #[error("Session error: {0}")]
    Session(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Swarmchat operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
