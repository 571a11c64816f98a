//! Command implementations and helpers shared between them.

pub mod check;
pub mod config;
pub mod render;
pub mod scan;
pub mod serve;
pub mod status;

use guardvision_core::{AnalysisProvider, Config, OcrProvider, TerminologyEntry, VendorError};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Parse an OCR provider id, ignoring case.
pub fn parse_ocr_provider(value: &str) -> Result<OcrProvider, VendorError> {
    value.to_ascii_uppercase().parse()
}

/// Parse an analysis provider id, ignoring case.
pub fn parse_llm_provider(value: &str) -> Result<AnalysisProvider, VendorError> {
    value.to_ascii_uppercase().parse()
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).into_owned()),
    }
}

/// Terminology from `--terminology`, else the configured file, else built-in.
pub fn load_terminology(
    override_path: Option<&str>,
    config: &Config,
) -> anyhow::Result<Vec<TerminologyEntry>> {
    let path = override_path.map(expand_path).or_else(|| config.terminology_path());
    let entries = guardvision_core::terminology::load(path.as_deref())?;
    tracing::debug!("Using {} terminology entries", entries.len());
    Ok(entries)
}

/// Spinner on stderr that mirrors a controller's status line.
pub struct StatusSpinner {
    bar: ProgressBar,
    task: JoinHandle<()>,
}

impl StatusSpinner {
    pub fn start(mut status: watch::Receiver<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        bar.set_message("starting...");

        let mirror = bar.clone();
        let task = tokio::spawn(async move {
            while status.changed().await.is_ok() {
                let message = status.borrow_and_update().clone();
                if !message.is_empty() {
                    mirror.set_message(message);
                }
            }
        });

        Self { bar, task }
    }

    pub fn finish(self) {
        self.task.abort();
        self.bar.finish_and_clear();
    }
}
