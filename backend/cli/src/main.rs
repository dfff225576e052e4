mod check_config_cmd;
mod status_cmd;

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use lineqr_channels::{LineClient, LineClientConfig, LineSignatureVerifier};
use lineqr_config::{load_and_prepare, port_from_env, resolve_config_path};
use lineqr_gateway::{GatewayState, InMemoryMemberStore, start_server};
use lineqr_logging::{bootstrap_subscriber, init_logger};
use lineqr_understanding::QrReader;

#[derive(Parser)]
#[command(name = "lineqr")]
#[command(about = "LINE webhook bot that answers /join and reads QR codes from images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server (default)
    Serve {
        /// Config file (defaults to $LINEQR_CONFIG, ./line_secret_key.yaml, ~/.lineqr/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Port to bind; overrides $PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Validate the config and print it with secrets masked
    CheckConfig {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Query the health endpoint of a running server
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve {
        config: None,
        port: None,
    }) {
        Commands::Serve { config, port } => run_server(config.as_deref(), port).await,
        Commands::CheckConfig { config } => check_config_cmd::run(config.as_deref()).await,
        Commands::Status { port } => status_cmd::run(port.unwrap_or_else(port_from_env)).await,
    }
}

async fn run_server(config_path: Option<&Path>, port: Option<u16>) -> Result<()> {
    let path = resolve_config_path(config_path);
    let config = {
        let _bootstrap = tracing::subscriber::set_default(bootstrap_subscriber());
        load_and_prepare(&path)
            .await
            .with_context(|| format!("Failed to load config from {}", path.display()))?
    };

    let _log_guard = init_logger(config.log_dir().map(Path::new), config.log_level());

    let secrets = config
        .secrets()
        .context("channel_secret and channel_access_token are required")?;
    let port = port.unwrap_or_else(port_from_env);
    let ip: IpAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.bind_address()))?;
    let addr = SocketAddr::new(ip, port);

    info!(
        config = %path.display(),
        addr = %addr,
        webhook_path = config.webhook_path(),
        "Starting lineqr"
    );

    let verifier = LineSignatureVerifier::new(secrets.channel_secret);
    let client = LineClient::new(LineClientConfig {
        channel_access_token: secrets.channel_access_token,
        api_base_url: config.api_base_url().to_string(),
        data_api_base_url: config.data_api_base_url().to_string(),
    });

    let state = GatewayState::new(
        Arc::new(verifier),
        Arc::new(client),
        QrReader::default(),
        Arc::new(InMemoryMemberStore::new()),
    );

    start_server(addr, state, config.webhook_path()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["lineqr"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_accepts_port_and_config() {
        let cli = Cli::try_parse_from(["lineqr", "serve", "--port", "8080", "-c", "bot.yaml"]).unwrap();
        match cli.command {
            Some(Commands::Serve { config, port }) => {
                assert_eq!(port, Some(8080));
                assert_eq!(config, Some(PathBuf::from("bot.yaml")));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert!(Cli::try_parse_from(["lineqr", "serve", "--port", "70000"]).is_err());
    }
}
