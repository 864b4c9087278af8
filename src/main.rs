use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use media_gateway::config::load_config;
use media_gateway::lifecycle::startup;
use media_gateway::observability::logging::init_logging;
use media_gateway::Router;

#[derive(Parser)]
#[command(name = "media-gateway", version, about = "Static media server and reverse proxy")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "gateway.toml")]
    config: PathBuf,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.check {
        return match Router::from_config(&config) {
            Ok(router) => {
                println!(
                    "{}: configuration OK ({} virtual hosts)",
                    cli.config.display(),
                    router.len()
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Invalid configuration: {e}");
                ExitCode::FAILURE
            }
        };
    }

    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        virtual_hosts = config.virtual_hosts.len(),
        "media-gateway starting"
    );

    match startup::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Gateway failed");
            ExitCode::FAILURE
        }
    }
}
