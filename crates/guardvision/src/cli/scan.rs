//! The `guardvision scan` command: OCR and review poster images.

use super::{
    expand_path, load_terminology, parse_llm_provider, parse_ocr_provider, render, StatusSpinner,
};
use clap::Args;
use guardvision_core::{ApiClient, BatchController, Config};
use std::time::Instant;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Image files to scan, processed in the order given
    #[arg(required = true)]
    pub files: Vec<String>,

    /// OCR vendor: gemini, doubao, baidu, alibaba, openai
    #[arg(long, default_value = "gemini")]
    pub ocr: String,

    /// OCR language hint, for vendors that take one (e.g. Baidu `CHN_ENG`)
    #[arg(long)]
    pub language: Option<String>,

    /// Analysis vendor: gemini, doubao, openai, anthropic, qwen, deepseek
    #[arg(long, default_value = "gemini")]
    pub llm: String,

    /// GuardVision API base URL (defaults to `client.base_url`)
    #[arg(long, env = "GUARDVISION_SERVER")]
    pub server: Option<String>,

    /// Terminology JSON file (defaults to `terminology.path`)
    #[arg(long)]
    pub terminology: Option<String>,

    /// Print the processed items as JSON instead of a report
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: ScanArgs, config: Config) -> anyhow::Result<()> {
    let ocr = parse_ocr_provider(&args.ocr)?;
    let llm = parse_llm_provider(&args.llm)?;
    let terminology = load_terminology(args.terminology.as_deref(), &config)?;
    let base_url = args.server.unwrap_or_else(|| config.client.base_url.clone());

    tracing::info!("Scanning {} image(s) via {base_url}: OCR {ocr}, LLM {llm}", args.files.len());

    let mut controller = BatchController::new(ApiClient::new(&base_url), terminology, ocr, llm)
        .with_ocr_language(args.language);
    controller.add_files(args.files.iter().map(|f| expand_path(f)));

    let start = Instant::now();
    let spinner = StatusSpinner::start(controller.status_line());
    let summary = controller.run_pending().await;
    spinner.finish();

    if args.json {
        println!("{}", serde_json::to_string_pretty(controller.images())?);
    } else {
        print!("{}", render::scan_report(controller.images()));
    }

    eprintln!(
        "{} completed, {} failed in {:.1}s",
        summary.completed,
        summary.failed,
        start.elapsed().as_secs_f64()
    );

    if summary.completed == 0 && summary.failed > 0 {
        anyhow::bail!("No images could be processed");
    }
    Ok(())
}
