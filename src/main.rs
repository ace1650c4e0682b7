use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use vibe_checker::config::{read_config, validate_config, AppConfig, ConfigError};
use vibe_checker::lifecycle::{bind_listener, Shutdown};
use vibe_checker::observability::{logging, metrics};
use vibe_checker::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "vibe-checker", version)]
#[command(about = "Serves a page that shows a fresh upstream image on every load", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "VIBE_CHECKER_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides listener.bind_address
    #[arg(short, long, env = "VIBE_CHECKER_BIND")]
    bind: Option<String>,

    /// Upstream image URL, overrides upstream.url
    #[arg(short, long, env = "VIBE_CHECKER_UPSTREAM")]
    upstream: Option<String>,
}

impl Cli {
    fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => AppConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(upstream) = &self.upstream {
            config.upstream.url = upstream.clone();
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("vibe-checker: {e}");
            return ExitCode::from(2);
        }
    };

    logging::init_logging(&config.observability);

    tracing::info!("vibe-checker v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        config_file = ?cli.config,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validation already checked the address.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let server = match HttpServer::new(&config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize server");
            return ExitCode::FAILURE;
        }
    };

    let listener = match bind_listener(&config.listener).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Server failed to start");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    if let Err(e) = server.run(listener, server_shutdown).await {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
