//! The `guardvision config` command.

use clap::{Args, Subcommand};
use guardvision_core::Config;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration (API keys masked)
    Show {
        /// Print API keys in full
        #[arg(long)]
        reveal: bool,
    },

    /// Print the config file location
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// `path_override` is the global `--config` flag.
pub async fn execute(
    args: ConfigArgs,
    config: Config,
    path_override: Option<PathBuf>,
) -> anyhow::Result<()> {
    let path = path_override.unwrap_or_else(Config::default_path);

    match args.command {
        ConfigCommand::Show { reveal } => {
            let shown = if reveal { config } else { masked(config) };
            println!("{}", shown.to_toml()?);
        }
        ConfigCommand::Path => println!("{}", path.display()),
        ConfigCommand::Init { force } => {
            init_at(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn init_at(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

/// `${VAR}` references are left readable; literal keys keep only their tail.
fn mask(secret: &mut String) {
    if secret.is_empty() || secret.starts_with("${") {
        return;
    }
    let tail: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    *secret = if secret.chars().count() > 8 {
        format!("****{tail}")
    } else {
        "****".to_string()
    };
}

fn masked(mut config: Config) -> Config {
    let vendors = &mut config.vendors;
    for secret in [
        &mut vendors.gemini.api_key,
        &mut vendors.doubao.api_key,
        &mut vendors.baidu.api_key,
        &mut vendors.baidu.secret_key,
        &mut vendors.alibaba.api_key,
        &mut vendors.alibaba.secret_key,
        &mut vendors.openai.api_key,
        &mut vendors.anthropic.api_key,
        &mut vendors.qwen.api_key,
        &mut vendors.deepseek.api_key,
    ] {
        mask(secret);
    }
    config
}
