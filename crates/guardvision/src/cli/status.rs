//! The `guardvision status` command.

use super::{parse_ocr_provider, render};
use clap::Args;
use console::Style;
use guardvision_core::{ApiClient, Config};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// GuardVision API base URL (defaults to `client.base_url`)
    #[arg(long, env = "GUARDVISION_SERVER")]
    pub server: Option<String>,

    /// Also push a test image through this OCR vendor
    #[arg(long)]
    pub ocr: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: StatusArgs, config: Config) -> anyhow::Result<()> {
    let base_url = args.server.unwrap_or_else(|| config.client.base_url.clone());
    let client = ApiClient::new(&base_url);

    let report = client
        .service_status()
        .await
        .map_err(|e| anyhow::anyhow!("Could not reach {base_url}: {e}"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::status_table(&report));
    }

    if let Some(ocr) = args.ocr.as_deref() {
        let provider = parse_ocr_provider(ocr)?;
        let ok = client.test_connection(provider).await;
        let line = if ok {
            Style::new().green().apply_to(format!("OCR test via {provider}: ok"))
        } else {
            Style::new().red().apply_to(format!("OCR test via {provider}: failed"))
        };
        eprintln!("{line}");
    }
    Ok(())
}
