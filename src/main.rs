//! hook-proxy
//!
//! Transparent reverse proxy that posts chat notifications for selected
//! routes.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                    HOOK PROXY                    │
//!                         │                                                  │
//!     Client Request      │  ┌────────┐    ┌──────────┐    ┌─────────────┐   │
//!     ────────────────────┼─▶│  http  │───▶│ routing  │───▶│  intercept  │───┼───▶ Upstream
//!                         │  │ server │    │  table   │    │   forward   │   │
//!                         │  └────────┘    └──────────┘    └──────┬──────┘   │
//!                         │                                       │          │
//!     Client Response     │  ┌────────┐    ┌──────────┐           │          │
//!     ◀───────────────────┼──│release │◀───│ handler  │◀──────────┘          │
//!                         │  │        │    │ (guarded)│──▶ notify ───────────┼───▶ Webhook
//!                         │  └────────┘    └──────────┘     forms            │
//!                         └──────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;

use hook_proxy::config::ConfigArgs;
use hook_proxy::lifecycle::startup;
use hook_proxy::observability::init_logging;

#[derive(Parser)]
#[command(name = "hook-proxy", version)]
#[command(about = "Transparent reverse proxy with webhook notifications", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("hook-proxy: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(
        config.observability.log_format,
        config.observability.log_filter.as_deref(),
    ) {
        eprintln!("hook-proxy: failed to initialize logging: {}", e);
    }

    tracing::info!("hook-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
