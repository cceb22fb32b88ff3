use anyhow::Result;
use clap::Parser;
use tracing::info;

use backend_bootstrap::logging::{init_logging, init_startup_logging};
use backend_infrastructure::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "arena-backend")]
#[command(about = "Arena battle and ledger server", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var("ARENA_CONFIG", config);
    }

    let config = {
        let _startup = init_startup_logging();
        AppConfig::load().await?
    };
    let _log_guard = init_logging(config.log_dir.as_deref());
    info!("config loaded: roster_path={:?}, battle_log={:?}", config.roster_path, config.battle_log_backend);

    backend_bootstrap::run_standalone(config).await
}
