//! Error types for GuardVision.
//!
//! Errors are organized by layer: configuration, vendor calls made by the
//! server, and the HTTP client used by the front end. Vendor error messages
//! are surfaced verbatim in the `{error}` envelope, so their `Display`
//! output is part of the wire contract.

use std::fmt;
use thiserror::Error;

/// Top-level error type for GuardVision operations.
#[derive(Error, Debug)]
pub enum GuardError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Vendor adapter errors
    #[error("Vendor error: {0}")]
    Vendor(#[from] VendorError),

    /// API client errors
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// Building the outbound HTTP client failed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Which of the two vendor operations failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ocr,
    Analyze,
}

impl Stage {
    /// Noun used in "... returned empty response".
    pub fn noun(self) -> &'static str {
        match self {
            Stage::Ocr => "OCR",
            Stage::Analyze => "Analysis",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ocr => write!(f, "OCR"),
            Stage::Analyze => write!(f, "analyze"),
        }
    }
}

/// Failures raised by OCR and analysis vendor adapters.
#[derive(Error, Debug)]
pub enum VendorError {
    /// The vendor answered with a non-success HTTP status
    #[error("{vendor} {stage} failed: {status}")]
    Status {
        vendor: &'static str,
        stage: Stage,
        status: String,
        status_code: u16,
    },

    /// The request never produced an HTTP response (DNS, connect, timeout)
    #[error("{vendor} {stage} request failed: {message}")]
    Transport {
        vendor: &'static str,
        stage: Stage,
        message: String,
    },

    /// The expected result field was missing or empty
    #[error("{} returned empty response", .stage.noun())]
    EmptyResponse { stage: Stage },

    /// A free-text reply contained no `{...}` block
    #[error("No valid JSON found in response")]
    NoJson,

    /// The vendor body (or the JSON it embeds) did not deserialize
    #[error("Failed to parse {vendor} response: {message}")]
    Decode {
        vendor: &'static str,
        message: String,
    },

    /// Credential exchange succeeded at HTTP level but returned no token
    #[error("{vendor} authentication failed: {message}")]
    Auth {
        vendor: &'static str,
        message: String,
    },

    /// Provider identifier outside the closed set
    #[error("Unsupported {kind} provider: {id}")]
    UnsupportedProvider { kind: &'static str, id: String },
}

impl VendorError {
    /// Build a `Status` error from a reqwest status code.
    pub fn status(vendor: &'static str, stage: Stage, status: reqwest::StatusCode) -> Self {
        VendorError::Status {
            vendor,
            stage,
            status: status
                .canonical_reason()
                .map(String::from)
                .unwrap_or_else(|| status.as_str().to_string()),
            status_code: status.as_u16(),
        }
    }

    /// HTTP status code reported by the vendor, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            VendorError::Status { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Errors raised by [`crate::client::ApiClient`].
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with an `{error}` envelope (or a bare failure)
    #[error("{0}")]
    Api(String),

    /// The server could not be reached
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Reading a local file failed
    #[error("Failed to read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Input rejected before any request was made
    #[error("{0}")]
    InvalidInput(String),
}

/// Convenience type alias for GuardVision results.
pub type Result<T> = std::result::Result<T, GuardError>;

/// Convenience type alias for vendor adapter results.
pub type VendorResult<T> = std::result::Result<T, VendorError>;
