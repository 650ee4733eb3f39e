use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use hook_proxy::config::ConfigArgs;
use hook_proxy::forms;
use hook_proxy::intercept::build_routes;
use hook_proxy::notify::{Delivery, MessageOptions, Notifier, NotifierSettings};
use hook_proxy::routing::build_rules;

#[derive(Parser)]
#[command(name = "hook-proxy-cli")]
#[command(about = "Operator tool for hook-proxy configuration and notifications", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the intercept routes the current mapping document produces
    Routes,
    /// Print the notification a form submission file would produce
    RenderForm {
        /// JSON submission document
        file: PathBuf,
    },
    /// Send a single notification with the configured webhook settings
    Notify {
        /// Message text
        message: String,

        /// Channel override
        #[arg(long = "to")]
        channel: Option<String>,

        /// Username override
        #[arg(long = "as")]
        username: Option<String>,

        /// Icon emoji override
        #[arg(long = "icon")]
        icon_emoji: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = cli.config.resolve()?;
    let settings = NotifierSettings::from_config(&config.notifications)?;

    match cli.command {
        Commands::Routes => {
            let rules = build_rules(config.mappings.as_deref())?;
            let notifier = Arc::new(Notifier::new(settings)?);
            let table = build_routes(&rules, notifier);

            for route in table.routes() {
                println!("{:<7} {:<40} {}", route.method.as_str(), route.pattern, route.handler.describe());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::RenderForm { file } => {
            let body = std::fs::read(&file)?;
            println!("{}", forms::render_body(&body)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Notify {
            message,
            channel,
            username,
            icon_emoji,
        } => {
            let notifier = Notifier::new(settings)?;
            let options = MessageOptions {
                channel,
                username,
                icon_emoji,
            };

            match notifier.send(message, options).await {
                Delivery::Suppressed { payload } => {
                    println!("{}", payload);
                    Ok(ExitCode::SUCCESS)
                }
                Delivery::Delivered { status } => {
                    println!("Delivered ({})", status);
                    Ok(ExitCode::SUCCESS)
                }
                Delivery::Failed { error } => {
                    eprintln!("Error: notification failed: {}", error);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
