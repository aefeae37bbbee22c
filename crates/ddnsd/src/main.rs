// # ddnsd - DDNS HTTP Daemon
//
// The ddnsd daemon is a thin integration layer. It is responsible for:
// 1. Reading configuration once at startup
// 2. Initializing logging and the runtime
// 3. Building the long-lived IP source and Route 53 client
// 4. Serving `GET /message/{recordName}` until a shutdown signal arrives
//
// All DDNS logic lives in ddns-core.
//
// ## Configuration
//
// ### Daemon (environment variables)
// - `DDNS_CONFIG_FILE`: Property file to read (default: `config.properties`;
//   a missing default file is treated as empty)
// - `DDNS_LISTEN_ADDR`: Socket address to listen on (default: `0.0.0.0:8080`)
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn or error (default: `info`)
//
// ### Updater (property file, then environment)
// - `IP_SERVICE`: "what is my IP" URL (default: `http://checkip.amazonaws.com/`)
// - `HOSTED_ZONE`: Route 53 hosted zone id (property file or environment)
//
// AWS credentials and region are read through the default AWS provider chain.
//
// ## Example
//
// ```bash
// export HOSTED_ZONE=Z0123456789ABCDEFGHIJ
// export AWS_REGION=us-east-1
//
// ddnsd
// curl http://localhost:8080/message/home.example.com
// ```

mod errors;
mod routes;

use anyhow::Result;
use ddns_core::config::DEFAULT_CONFIG_FILE;
use ddns_core::{DdnsConfig, DdnsUpdater, Properties};
use ddns_ip_http::HttpIpSource;
use ddns_provider_route53::Route53Provider;
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Default socket address for the HTTP server
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Daemon configuration
#[derive(Debug)]
struct Config {
    config_file: Option<String>,
    listen_addr: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            config_file: non_empty("DDNS_CONFIG_FILE"),
            listen_addr: non_empty("DDNS_LISTEN_ADDR")
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            log_level: non_empty("DDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.listen_addr.parse::<SocketAddr>().map_err(|e| {
            anyhow::anyhow!(
                "DDNS_LISTEN_ADDR '{}' is not a valid socket address: {}",
                self.listen_addr,
                e
            )
        })?;

        self.log_level()?;

        Ok(())
    }

    fn log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    /// Read the property file
    ///
    /// An explicitly configured file must exist; the default one is optional.
    fn load_properties(&self) -> Result<Properties> {
        match &self.config_file {
            Some(path) => Ok(Properties::load(path)?),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Ok(Properties::load(DEFAULT_CONFIG_FILE)?)
            }
            None => Ok(Properties::new()),
        }
    }
}

fn main() -> ExitCode {
    let config = Config::from_env();

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let log_level = config.log_level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    // Resolved before any client exists, so a bad config makes no network calls
    let ddns_config = match config
        .load_properties()
        .and_then(|props| Ok(DdnsConfig::from_env(&props)?))
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    info!("Starting ddnsd daemon");
    info!("IP service: {}", ddns_config.ip_service_url);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config, ddns_config).await {
            error!("Daemon error: {}", e);
            DdnsExitCode::RuntimeError
        } else {
            DdnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config, ddns_config: DdnsConfig) -> Result<()> {
    let ip_source = HttpIpSource::new(ddns_config.ip_service_url.clone())?;
    let provider = Route53Provider::from_env().await;

    let updater = DdnsUpdater::new(Arc::new(ip_source), Arc::new(provider), &ddns_config)?;
    info!("Updating records in hosted zone {}", updater.zone_id());
    let app = routes::create_routes(updater);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", config.listen_addr, e))?;

    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match wait_for_shutdown().await {
                Ok(signal) => info!("Received shutdown signal: {}", signal),
                Err(e) => error!("Shutdown error: {}", e),
            }
        })
        .await?;

    info!("Shutting down daemon");
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);

        assert_eq!(config.config_file, None);
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("DDNS_LISTEN_ADDR", " "), ("DDNS_LOG_LEVEL", "")]);

        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn invalid_listen_addr_is_rejected() {
        let config = config_from(&[("DDNS_LISTEN_ADDR", "localhost")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let config = config_from(&[("DDNS_LOG_LEVEL", "verbose")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let config = config_from(&[("DDNS_LOG_LEVEL", "DEBUG")]);
        assert_eq!(config.log_level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "HOSTED_ZONE=Z123").unwrap();
        writeln!(file, "IP_SERVICE=http://example.test/ip").unwrap();

        let path = file.path().to_string_lossy().into_owned();
        let config = config_from(&[("DDNS_CONFIG_FILE", path.as_str())]);
        let props = config.load_properties().unwrap();

        let ddns_config = DdnsConfig::resolve(&props, |_| None).unwrap();
        assert_eq!(ddns_config.hosted_zone, "Z123");
        assert_eq!(ddns_config.ip_service_url, "http://example.test/ip");
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.properties");
        let path = path.to_string_lossy().into_owned();

        let config = config_from(&[("DDNS_CONFIG_FILE", path.as_str())]);
        assert!(config.load_properties().is_err());
    }
}
