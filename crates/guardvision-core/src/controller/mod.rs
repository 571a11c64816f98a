//! Batch controller behind the terminal front end.
//!
//! Holds the ordered queue of images and walks it one item at a time:
//! encode → OCR → analyse. A failed item is marked and the queue moves on.
//! While a run is active a [`ScanTicker`] rotates the status line.

mod ticker;

pub use ticker::{ScanTicker, SCAN_MESSAGES, TICK_INTERVAL};

use crate::client::{file_to_base64, ApiClient};
use crate::error::ClientError;
use crate::types::{AnalysisProvider, DetectionResult, OcrProvider, TerminologyEntry};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const STEP_OCR: &str = "Running OCR...";
const STEP_ANALYZE: &str = "Running AI analysis...";

/// The calls the controller makes; [`ApiClient`] in production.
#[async_trait]
pub trait PipelineBackend: Send + Sync {
    async fn perform_ocr(
        &self,
        image: &str,
        provider: OcrProvider,
        language: Option<&str>,
    ) -> Result<String, ClientError>;

    async fn analyze_image(
        &self,
        text: &str,
        image: &str,
        provider: AnalysisProvider,
        terminology: &[TerminologyEntry],
    ) -> Result<DetectionResult, ClientError>;

    async fn analyze_text(
        &self,
        text: &str,
        provider: AnalysisProvider,
        terminology: &[TerminologyEntry],
    ) -> Result<DetectionResult, ClientError>;
}

#[async_trait]
impl PipelineBackend for ApiClient {
    async fn perform_ocr(
        &self,
        image: &str,
        provider: OcrProvider,
        language: Option<&str>,
    ) -> Result<String, ClientError> {
        ApiClient::perform_ocr(self, image, provider, language).await
    }

    async fn analyze_image(
        &self,
        text: &str,
        image: &str,
        provider: AnalysisProvider,
        terminology: &[TerminologyEntry],
    ) -> Result<DetectionResult, ClientError> {
        ApiClient::analyze_image(self, text, image, provider, terminology).await
    }

    async fn analyze_text(
        &self,
        text: &str,
        provider: AnalysisProvider,
        terminology: &[TerminologyEntry],
    ) -> Result<DetectionResult, ClientError> {
        ApiClient::analyze_text(self, text, provider, terminology).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

/// One queued image and everything learned about it so far.
///
/// Fields change only through the `mark_*` methods, which keep `result` and
/// `error_message` mutually exclusive: both are empty until the item is
/// terminal, then exactly one is set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedImage {
    id: String,
    path: PathBuf,
    preview: String,
    status: ImageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ocr_provider: Option<OcrProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_ocr_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<DetectionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl ProcessedImage {
    pub fn new(id: String, path: PathBuf) -> Self {
        let preview = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            id,
            path,
            preview,
            status: ImageStatus::Pending,
            current_step: None,
            ocr_provider: None,
            raw_ocr_text: None,
            result: None,
            error_message: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Short display label (the file name).
    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn status(&self) -> ImageStatus {
        self.status
    }

    pub fn current_step(&self) -> Option<&str> {
        self.current_step.as_deref()
    }

    pub fn ocr_provider(&self) -> Option<OcrProvider> {
        self.ocr_provider
    }

    pub fn raw_ocr_text(&self) -> Option<&str> {
        self.raw_ocr_text.as_deref()
    }

    pub fn result(&self) -> Option<&DetectionResult> {
        self.result.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn mark_processing(&mut self, provider: OcrProvider) {
        self.status = ImageStatus::Processing;
        self.ocr_provider = Some(provider);
        self.result = None;
        self.error_message = None;
    }

    pub fn set_step(&mut self, step: &str) {
        self.current_step = Some(step.to_string());
    }

    pub fn record_ocr_text(&mut self, text: String) {
        self.raw_ocr_text = Some(text);
    }

    pub fn mark_completed(&mut self, result: DetectionResult) {
        self.status = ImageStatus::Completed;
        self.current_step = None;
        self.result = Some(result);
        self.error_message = None;
    }

    pub fn mark_failed(&mut self, message: String) {
        self.status = ImageStatus::Error;
        self.current_step = None;
        self.result = None;
        self.error_message = Some(message);
    }
}

/// Outcome counts for one [`BatchController::run_pending`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub failed: usize,
}

pub struct BatchController<B> {
    backend: B,
    images: Vec<ProcessedImage>,
    terminology: Vec<TerminologyEntry>,
    ocr_provider: OcrProvider,
    ocr_language: Option<String>,
    llm_provider: AnalysisProvider,
    status_line: Arc<watch::Sender<String>>,
    tick_interval: Duration,
    next_id: u64,
}

impl<B: PipelineBackend> BatchController<B> {
    pub fn new(
        backend: B,
        terminology: Vec<TerminologyEntry>,
        ocr_provider: OcrProvider,
        llm_provider: AnalysisProvider,
    ) -> Self {
        Self {
            backend,
            images: Vec::new(),
            terminology,
            ocr_provider,
            ocr_language: None,
            llm_provider,
            status_line: Arc::new(watch::channel(String::new()).0),
            tick_interval: TICK_INTERVAL,
            next_id: 0,
        }
    }

    /// Override the ticker period.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Language hint forwarded with every OCR request.
    pub fn with_ocr_language(mut self, language: Option<String>) -> Self {
        self.ocr_language = language;
        self
    }

    /// Subscribe to the status line (ticker messages and step names).
    pub fn status_line(&self) -> watch::Receiver<String> {
        self.status_line.subscribe()
    }

    pub fn images(&self) -> &[ProcessedImage] {
        &self.images
    }

    pub fn set_providers(&mut self, ocr: OcrProvider, llm: AnalysisProvider) {
        self.ocr_provider = ocr;
        self.llm_provider = llm;
    }

    /// Queue files as pending items, in order.
    pub fn add_files<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let stamp = chrono::Utc::now().timestamp_millis();
        for path in paths {
            self.next_id += 1;
            let id = format!("{stamp}-{}", self.next_id);
            self.images.push(ProcessedImage::new(id, path));
        }
    }

    /// Process every pending item sequentially.
    pub async fn run_pending(&mut self) -> RunSummary {
        self.run_pending_with(|_| {}).await
    }

    /// Like [`run_pending`](Self::run_pending), reporting each state change.
    pub async fn run_pending_with<F>(&mut self, mut on_update: F) -> RunSummary
    where
        F: FnMut(&ProcessedImage) + Send,
    {
        let ticker = ScanTicker::start(self.status_line.clone(), self.tick_interval);
        let mut summary = RunSummary::default();

        for index in 0..self.images.len() {
            if self.images[index].status() != ImageStatus::Pending {
                continue;
            }
            self.images[index].mark_processing(self.ocr_provider);
            on_update(&self.images[index]);

            match self.process_one(index, &mut on_update).await {
                Ok(result) => {
                    summary.completed += 1;
                    self.images[index].mark_completed(result);
                }
                Err(e) => {
                    tracing::warn!(file = %self.images[index].path.display(), error = %e, "Image failed");
                    summary.failed += 1;
                    self.images[index].mark_failed(e.to_string());
                }
            }
            on_update(&self.images[index]);
        }

        ticker.stop();
        self.status_line.send_replace(String::new());
        summary
    }

    async fn process_one<F>(
        &mut self,
        index: usize,
        on_update: &mut F,
    ) -> Result<DetectionResult, ClientError>
    where
        F: FnMut(&ProcessedImage) + Send,
    {
        let image = file_to_base64(&self.images[index].path).await?;

        self.step(index, STEP_OCR, on_update);
        let text = self
            .backend
            .perform_ocr(&image, self.ocr_provider, self.ocr_language.as_deref())
            .await?;
        self.images[index].record_ocr_text(text.clone());

        self.step(index, STEP_ANALYZE, on_update);
        self.backend
            .analyze_image(&text, &image, self.llm_provider, &self.terminology)
            .await
    }

    fn step<F>(&mut self, index: usize, step: &str, on_update: &mut F)
    where
        F: FnMut(&ProcessedImage),
    {
        self.status_line.send_replace(step.to_string());
        self.images[index].set_step(step);
        on_update(&self.images[index]);
    }

    /// Analyse typed-in copy. Blank input is rejected without a request.
    pub async fn analyze_text(&self, text: &str) -> Result<DetectionResult, ClientError> {
        if text.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "Enter some text to analyse".to_string(),
            ));
        }

        let ticker = ScanTicker::start(self.status_line.clone(), self.tick_interval);
        let result = self
            .backend
            .analyze_text(text, self.llm_provider, &self.terminology)
            .await;
        ticker.stop();
        self.status_line.send_replace(String::new());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::{build_router, AppState};
    use axum::{body::Bytes, http::Uri, Json, Router};
    use base64::Engine;
    use serde_json::json;
    use std::sync::Mutex;
    use tokio::net::TcpListener;

    fn detection(text: &str, score: f64) -> DetectionResult {
        DetectionResult {
            original_text: text.to_string(),
            errors: Vec::new(),
            is_professional: true,
            score,
        }
    }

    /// Backend that fails OCR for any image whose base64 is in `fail_ocr`.
    #[derive(Default)]
    struct ScriptedBackend {
        fail_ocr: Vec<String>,
        calls: Mutex<Vec<String>>,
        languages: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl PipelineBackend for ScriptedBackend {
        async fn perform_ocr(
            &self,
            image: &str,
            provider: OcrProvider,
            language: Option<&str>,
        ) -> Result<String, ClientError> {
            self.calls.lock().unwrap().push(format!("ocr:{provider}"));
            self.languages.lock().unwrap().push(language.map(String::from));
            if self.fail_ocr.iter().any(|f| f == image) {
                return Err(ClientError::Api("Gemini OCR failed: Bad Request".into()));
            }
            Ok("IP67".into())
        }

        async fn analyze_image(
            &self,
            text: &str,
            _image: &str,
            provider: AnalysisProvider,
            _terminology: &[TerminologyEntry],
        ) -> Result<DetectionResult, ClientError> {
            self.calls.lock().unwrap().push(format!("analyze_image:{provider}"));
            Ok(detection(text, 90.0))
        }

        async fn analyze_text(
            &self,
            text: &str,
            provider: AnalysisProvider,
            _terminology: &[TerminologyEntry],
        ) -> Result<DetectionResult, ClientError> {
            self.calls.lock().unwrap().push(format!("analyze_text:{provider}"));
            Ok(detection(text, 75.0))
        }
    }

    fn encode(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn test_transitions_keep_result_and_error_exclusive() {
        let mut item = ProcessedImage::new("1".into(), PathBuf::from("/tmp/poster.png"));
        assert_eq!(item.preview(), "poster.png");
        assert_eq!(item.status(), ImageStatus::Pending);

        item.mark_processing(OcrProvider::Baidu);
        item.set_step(STEP_OCR);
        assert!(item.result().is_none() && item.error_message().is_none());

        item.mark_failed("boom".into());
        assert_eq!(item.status(), ImageStatus::Error);
        assert!(item.result().is_none());
        assert!(item.current_step().is_none());

        item.mark_processing(OcrProvider::Baidu);
        assert!(item.error_message().is_none());
        item.mark_completed(detection("x", 80.0));
        assert_eq!(item.status(), ImageStatus::Completed);
        assert!(item.error_message().is_none());
        assert_eq!(item.result().unwrap().score, 80.0);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_the_queue() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = ["a.png", "b.png", "c.png"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                std::fs::write(&path, name.as_bytes()).unwrap();
                path
            })
            .collect();

        let backend = ScriptedBackend {
            fail_ocr: vec![encode(b"a.png")],
            ..Default::default()
        };
        let mut controller = BatchController::new(
            backend,
            Vec::new(),
            OcrProvider::Gemini,
            AnalysisProvider::Qwen,
        );
        controller.add_files(paths);
        controller.add_files([dir.path().join("missing.png")]);

        let mut updates = Vec::new();
        let summary = controller
            .run_pending_with(|img| updates.push((img.preview().to_string(), img.status())))
            .await;

        assert_eq!(summary, RunSummary { completed: 2, failed: 2 });
        let statuses: Vec<ImageStatus> = controller.images().iter().map(|i| i.status()).collect();
        assert_eq!(
            statuses,
            vec![
                ImageStatus::Error,
                ImageStatus::Completed,
                ImageStatus::Completed,
                ImageStatus::Error
            ]
        );
        assert_eq!(
            controller.images()[0].error_message(),
            Some("Gemini OCR failed: Bad Request")
        );
        assert!(controller.images()[3]
            .error_message()
            .unwrap()
            .starts_with("Failed to read"));
        assert_eq!(controller.images()[1].raw_ocr_text(), Some("IP67"));
        assert_eq!(updates.first(), Some(&("a.png".to_string(), ImageStatus::Processing)));
        assert_eq!(updates.last(), Some(&("missing.png".to_string(), ImageStatus::Error)));
    }

    #[tokio::test]
    async fn test_only_pending_items_are_processed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, b"a").unwrap();

        let mut controller = BatchController::new(
            ScriptedBackend::default(),
            Vec::new(),
            OcrProvider::Doubao,
            AnalysisProvider::Doubao,
        );
        controller.add_files([path.clone()]);
        controller.run_pending().await;
        controller.add_files([path]);
        let summary = controller.run_pending().await;

        assert_eq!(summary, RunSummary { completed: 1, failed: 0 });
        assert_eq!(controller.backend.calls.lock().unwrap().len(), 4);
        assert_ne!(controller.images()[0].id(), controller.images()[1].id());
    }

    #[tokio::test]
    async fn test_ocr_language_reaches_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, b"a").unwrap();

        let mut controller = BatchController::new(
            ScriptedBackend::default(),
            Vec::new(),
            OcrProvider::Baidu,
            AnalysisProvider::Gemini,
        )
        .with_ocr_language(Some("CHN_ENG".into()));
        controller.add_files([path]);
        controller.run_pending().await;

        assert_eq!(
            *controller.backend.languages.lock().unwrap(),
            vec![Some("CHN_ENG".to_string())]
        );
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected_without_a_call() {
        let controller = BatchController::new(
            ScriptedBackend::default(),
            Vec::new(),
            OcrProvider::Gemini,
            AnalysisProvider::OpenAi,
        );
        let err = controller.analyze_text("  \n\t").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
        assert!(controller.backend.calls.lock().unwrap().is_empty());

        let result = controller.analyze_text("4K dome camera").await.unwrap();
        assert_eq!(result.score, 75.0);
        assert_eq!(
            *controller.backend.calls.lock().unwrap(),
            vec!["analyze_text:OPENAI"]
        );
    }

    /// Gemini stand-in: OCR answers "IP67" unless the image is `slow`, in
    /// which case it stalls past the client timeout.
    async fn start_gemini(slow: String) -> String {
        let verdict = json!({
            "originalText": "IP67", "errors": [], "isProfessional": true, "score": 90
        })
        .to_string();
        let app = Router::new().fallback(move |uri: Uri, body: Bytes| {
            let slow = slow.clone();
            let verdict = verdict.clone();
            async move {
                let body = String::from_utf8_lossy(&body).into_owned();
                let text = if uri.path().contains("gemini-1.5-flash") {
                    if body.contains(&slow) {
                        tokio::time::sleep(Duration::from_secs(3)).await;
                    }
                    "IP67".to_string()
                } else {
                    verdict
                };
                Json(json!({"candidates": [{"content": {"parts": [{"text": text}]}}]}))
            }
        });
        spawn_app(app).await
    }

    async fn spawn_app(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_end_to_end_one_success_one_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let fast = dir.path().join("fast.png");
        let slow = dir.path().join("slow.png");
        std::fs::write(&fast, b"fast poster bytes").unwrap();
        std::fs::write(&slow, b"slow poster bytes!").unwrap();

        let vendor_url = start_gemini(encode(b"slow poster bytes!")).await;
        let mut config = Config::default();
        config.http.timeout_ms = 300;
        config.vendors.gemini.api_key = "test-key".into();
        config.vendors.gemini.endpoint = vendor_url;
        let state = AppState::from_config(Arc::new(config)).unwrap();
        let api_url = spawn_app(build_router(state)).await;

        let mut controller = BatchController::new(
            ApiClient::new(&api_url),
            crate::terminology::builtin(),
            OcrProvider::Gemini,
            AnalysisProvider::Gemini,
        );
        controller.add_files([fast, slow]);
        let summary = controller.run_pending().await;
        assert_eq!(summary, RunSummary { completed: 1, failed: 1 });

        let first = &controller.images()[0];
        assert_eq!(first.status(), ImageStatus::Completed);
        assert_eq!(first.raw_ocr_text(), Some("IP67"));
        let result = first.result().unwrap();
        assert_eq!(result.score, 90.0);
        assert!(result.errors.is_empty());
        assert!(first.error_message().is_none());

        let second = &controller.images()[1];
        assert_eq!(second.status(), ImageStatus::Error);
        assert!(second.result().is_none());
        assert!(second.raw_ocr_text().is_none());
        assert!(second
            .error_message()
            .unwrap()
            .starts_with("Gemini OCR request failed"));
    }
}
