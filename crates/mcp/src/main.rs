use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use comcontrol_core::{RemoteClient, RemoteConfig};
use tracing::{error, info};

use comcontrol_mcp::cli::Cli;
use comcontrol_mcp::server::{serve, McpServer, SERVER_NAME, SERVER_VERSION};
use comcontrol_mcp::{logging, watchdog};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format(), cli.log_file().as_deref())?;

    let config = match RemoteConfig::resolve(cli.config_input()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "fatal configuration error");
            return Err(e).context("invalid configuration");
        }
    };
    info!(url = %config.url, api_key = config.api_key.is_some(), "remote endpoint resolved");

    if let Some(delay) = cli.watchdog_delay() {
        watchdog::arm(delay).context("failed to start watchdog")?;
        info!(delay_secs = delay.as_secs(), "watchdog armed");
    }

    let client = RemoteClient::new(config).context("failed to build HTTP client")?;
    let mut server = McpServer::with_options(client, cli.server_options());

    info!(name = SERVER_NAME, version = SERVER_VERSION, "serving on stdio");
    serve(&mut server, io::stdin().lock(), io::stdout().lock())?;

    Ok(())
}
