//! The `guardvision check` command: review typed-in copy.

use super::{expand_path, load_terminology, parse_llm_provider, render, StatusSpinner};
use clap::Args;
use guardvision_core::{ApiClient, BatchController, Config, OcrProvider};
use std::io::Read;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Text to review; read from stdin when neither this nor --file is given
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short, long)]
    pub file: Option<String>,

    /// Analysis vendor: gemini, doubao, openai, anthropic, qwen, deepseek
    #[arg(long, default_value = "gemini")]
    pub llm: String,

    /// GuardVision API base URL (defaults to `client.base_url`)
    #[arg(long, env = "GUARDVISION_SERVER")]
    pub server: Option<String>,

    /// Terminology JSON file (defaults to `terminology.path`)
    #[arg(long)]
    pub terminology: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: CheckArgs, config: Config) -> anyhow::Result<()> {
    let llm = parse_llm_provider(&args.llm)?;
    let text = read_input(args.text, args.file.as_deref())?;
    let terminology = load_terminology(args.terminology.as_deref(), &config)?;
    let base_url = args.server.unwrap_or_else(|| config.client.base_url.clone());

    // OCR provider is unused in text mode
    let controller =
        BatchController::new(ApiClient::new(&base_url), terminology, OcrProvider::Gemini, llm);

    let spinner = StatusSpinner::start(controller.status_line());
    let outcome = controller.analyze_text(&text).await;
    spinner.finish();

    let result = outcome.map_err(|e| anyhow::anyhow!("Analysis failed: {e}"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::result_block(&result));
    }
    Ok(())
}

fn read_input(text: Option<String>, file: Option<&str>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(file) = file {
        let path = expand_path(file);
        return std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
