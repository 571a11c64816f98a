//! The `guardvision serve` command.

use clap::Args;
use guardvision_core::Config;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides `server.bind`)
    #[arg(short, long, env = "GUARDVISION_BIND")]
    pub bind: Option<String>,
}

pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    guardvision_core::server::serve(config).await?;
    Ok(())
}
