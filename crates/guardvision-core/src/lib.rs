//! GuardVision Core - OCR and copy-review orchestration.
//!
//! GuardVision proof-reads posters and marketing copy for a
//! security-equipment vendor. It does no language analysis itself: it picks
//! a third-party OCR or LLM vendor, marshals the request, and reshapes the
//! vendor's answer into a [`DetectionResult`].
//!
//! # Architecture
//!
//! ```text
//! BatchController → ApiClient → HTTP API (server) → VendorFactory → adapter → vendor
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use guardvision_core::{Config, server};
//!
//! #[tokio::main]
//! async fn main() -> guardvision_core::Result<()> {
//!     let config = Config::load()?;
//!     server::serve(config).await
//! }
//! ```

// Module declarations
pub mod analysis;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod factory;
pub mod ocr;
pub mod server;
pub mod terminology;
pub mod types;
pub mod vendor;

// Re-exports for convenient access
pub use client::{file_to_base64, ApiClient};
pub use config::Config;
pub use controller::{BatchController, ImageStatus, PipelineBackend, ProcessedImage, RunSummary};
pub use error::{ClientError, ConfigError, GuardError, Result, VendorError, VendorResult};
pub use factory::{ConfiguredVendors, VendorFactory};
pub use types::{
    AnalysisMode, AnalysisProvider, DetectionError, DetectionResult, IssueKind, OcrProvider,
    StatusReport, TerminologyEntry,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
