use std::path::PathBuf;
use std::time::Duration;

use clap::builder::FalseyValueParser;
use clap::Parser;
use comcontrol_core::{ConfigInput, ConfigMode};

use crate::logging::LogFormat;
use crate::server::ServerOptions;

#[derive(Debug, Parser)]
#[command(name = "comcontrol-mcp")]
#[command(version)]
#[command(about = "MCP stdio server exposing the report_done tool")]
pub struct Cli {
    #[arg(long, env = "BASE_URL", help = "Origin for outbound calls")]
    pub base_url: Option<String>,
    #[arg(long, env = "ENDPOINT", help = "Path appended to the base URL")]
    pub endpoint: Option<String>,
    #[arg(long, env = "API_KEY", hide_env_values = true, help = "Sent as the X-API-KEY header")]
    pub api_key: Option<String>,
    #[arg(
        long,
        env = "STRICT_CONFIG",
        value_parser = FalseyValueParser::new(),
        help = "Fail at startup unless BASE_URL, ENDPOINT and API_KEY are all set"
    )]
    pub strict: bool,
    #[arg(
        long,
        env = "REQUIRE_HANDSHAKE",
        value_parser = FalseyValueParser::new(),
        help = "Reject tool requests received before initialize"
    )]
    pub require_handshake: bool,
    #[arg(
        long,
        env = "TEST",
        value_parser = FalseyValueParser::new(),
        help = "Terminate the process once the watchdog delay elapses"
    )]
    pub test: bool,
    #[arg(long, env = "WATCHDOG_SECS", default_value_t = 30, help = "Watchdog delay in seconds")]
    pub watchdog_secs: u64,
    #[arg(
        long,
        env = "LOG_FORMAT",
        default_value = "text",
        help = "'json' for JSON lines, anything else for text"
    )]
    pub log_format: String,
    #[arg(long, env = "LOG_FILE", help = "Append logs to this file instead of stderr")]
    pub log_file: Option<String>,
}

impl Cli {
    pub fn config_input(&self) -> ConfigInput {
        ConfigInput {
            mode: if self.strict {
                ConfigMode::Strict
            } else {
                ConfigMode::Permissive
            },
            base_url: self.base_url.clone(),
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
        }
    }

    pub fn server_options(&self) -> ServerOptions {
        ServerOptions {
            require_handshake: self.require_handshake,
        }
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.log_format)
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    pub fn watchdog_delay(&self) -> Option<Duration> {
        self.test.then(|| Duration::from_secs(self.watchdog_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("comcontrol-mcp").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_feed_config_input() {
        let cli = parse(&[
            "--base-url",
            "https://x.com/",
            "--endpoint",
            "/t",
            "--api-key",
            "k",
            "--strict",
        ]);
        let input = cli.config_input();

        assert_eq!(input.mode, ConfigMode::Strict);
        assert_eq!(input.base_url.as_deref(), Some("https://x.com/"));
        assert_eq!(input.endpoint.as_deref(), Some("/t"));
        assert_eq!(input.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn watchdog_only_when_test_flag_set() {
        let cli = parse(&["--test", "--watchdog-secs", "5"]);
        assert_eq!(cli.watchdog_delay(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn blank_log_file_means_stderr() {
        let cli = parse(&["--log-file", "  "]);
        assert_eq!(cli.log_file(), None);

        let cli = parse(&["--log-file", "/tmp/mcp.log", "--log-format", "JSON"]);
        assert_eq!(cli.log_file(), Some(PathBuf::from("/tmp/mcp.log")));
        assert_eq!(cli.log_format(), LogFormat::Json);
    }

    #[test]
    fn handshake_flag_maps_to_server_options() {
        let cli = parse(&["--require-handshake"]);
        assert!(cli.server_options().require_handshake);
    }
}
