//! Configuration types for the DDNS system
//!
//! Configuration is read once at process start from a Java-style property file
//! (`config.properties`) with an environment fallback for the hosted zone, and is
//! immutable afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Property key for the IP-discovery endpoint
pub const IP_SERVICE_KEY: &str = "IP_SERVICE";

/// Property (and environment variable) key for the hosted zone identifier
pub const HOSTED_ZONE_KEY: &str = "HOSTED_ZONE";

/// Endpoint used when `IP_SERVICE` is unset or blank
pub const DEFAULT_IP_SERVICE: &str = "http://checkip.amazonaws.com/";

/// Property file read when no other path is configured
pub const DEFAULT_CONFIG_FILE: &str = "config.properties";

/// TTL applied to every upserted address record
pub const RECORD_TTL_SECS: i64 = 1200;

/// Page size requested when listing records
pub const LIST_PAGE_SIZE: i32 = 1;

/// Key/value pairs read from a property file
///
/// Supported syntax is the common subset of `java.util.Properties`:
/// `key=value`, `key: value` or `key value`, one per line, with `#` and `!`
/// comment lines. Line continuations and escapes are not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: HashMap<String, String>,
}

impl Properties {
    /// Create an empty property set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse property file contents
    pub fn parse(contents: &str) -> Self {
        let entries = contents.lines().filter_map(parse_line).collect();
        Self { entries }
    }

    /// Read and parse a property file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Error loading properties file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::parse(&contents))
    }

    /// Get a property value
    ///
    /// Blank values are reported as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no properties were read
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
        return None;
    }

    let key_end = line
        .find(|c: char| c == '=' || c == ':' || c.is_whitespace())
        .unwrap_or(line.len());
    let key = &line[..key_end];

    let rest = line[key_end..].trim_start();
    let value = rest.strip_prefix(['=', ':']).unwrap_or(rest).trim();

    Some((key.to_string(), value.to_string()))
}

/// Main DDNS configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// URL of the "what is my IP" endpoint
    pub ip_service_url: String,

    /// Hosted zone holding the managed records
    pub hosted_zone: String,
}

impl DdnsConfig {
    /// Create a configuration from explicit values
    pub fn new(ip_service_url: impl Into<String>, hosted_zone: impl Into<String>) -> Self {
        Self {
            ip_service_url: ip_service_url.into(),
            hosted_zone: hosted_zone.into(),
        }
    }

    /// Resolve configuration from properties with an environment fallback
    ///
    /// `IP_SERVICE` defaults to [`DEFAULT_IP_SERVICE`]. `HOSTED_ZONE` is looked up
    /// in the properties first, then through `env`. The result is validated.
    pub fn resolve<F>(props: &Properties, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ip_service_url = props
            .get(IP_SERVICE_KEY)
            .unwrap_or(DEFAULT_IP_SERVICE)
            .to_string();

        let hosted_zone = match props.get(HOSTED_ZONE_KEY) {
            Some(zone) => zone.to_string(),
            None => env(HOSTED_ZONE_KEY)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    Error::config(format!(
                        "Could not find value for {} in environmental variables or properties file",
                        HOSTED_ZONE_KEY
                    ))
                })?,
        };

        let config = Self {
            ip_service_url,
            hosted_zone,
        };
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration from properties and the process environment
    pub fn from_env(props: &Properties) -> Result<Self> {
        Self::resolve(props, |key| std::env::var(key).ok())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.hosted_zone.trim().is_empty() {
            return Err(Error::config("Hosted zone cannot be empty"));
        }

        let url = url::Url::parse(&self.ip_service_url).map_err(|e| {
            Error::config(format!(
                "Malformed IP service URL '{}': {}",
                self.ip_service_url, e
            ))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::config(format!(
                "IP service URL must use HTTP or HTTPS scheme. Got: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio_test::{assert_err, assert_ok};

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn parses_common_property_syntax() {
        let props = Properties::parse(
            "# comment\n\
             ! another comment\n\
             \n\
             IP_SERVICE=http://example.test/ip\n\
             HOSTED_ZONE : Z123\n\
             SPACED value with spaces\n",
        );

        assert_eq!(props.len(), 3);
        assert_eq!(props.get("IP_SERVICE"), Some("http://example.test/ip"));
        assert_eq!(props.get("HOSTED_ZONE"), Some("Z123"));
        assert_eq!(props.get("SPACED"), Some("value with spaces"));
    }

    #[test]
    fn blank_values_are_absent() {
        let props = Properties::parse("IP_SERVICE=\nHOSTED_ZONE=   \n");
        assert!(!props.is_empty());
        assert_eq!(props.get("IP_SERVICE"), None);
        assert_eq!(props.get("HOSTED_ZONE"), None);
    }

    #[test]
    fn later_duplicates_win() {
        let props = Properties::parse("HOSTED_ZONE=Z1\nHOSTED_ZONE=Z2\n");
        assert_eq!(props.get("HOSTED_ZONE"), Some("Z2"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "HOSTED_ZONE=ZFILE").unwrap();

        let props = assert_ok!(Properties::load(file.path()));
        assert_eq!(props.get("HOSTED_ZONE"), Some("ZFILE"));
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = assert_err!(Properties::load(dir.path().join("missing.properties")));
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn resolve_uses_properties() {
        let props = Properties::parse("IP_SERVICE=http://example.test/ip\nHOSTED_ZONE=Z123\n");
        let config = DdnsConfig::resolve(&props, no_env).unwrap();
        assert_eq!(config, DdnsConfig::new("http://example.test/ip", "Z123"));
    }

    #[test]
    fn resolve_defaults_ip_service() {
        let props = Properties::parse("IP_SERVICE= \nHOSTED_ZONE=Z123\n");
        let config = DdnsConfig::resolve(&props, no_env).unwrap();
        assert_eq!(config.ip_service_url, DEFAULT_IP_SERVICE);
    }

    #[test]
    fn resolve_falls_back_to_environment_for_zone() {
        let props = Properties::new();
        assert!(props.is_empty());

        let config = DdnsConfig::resolve(&props, |key| {
            (key == HOSTED_ZONE_KEY).then(|| "ZENV".to_string())
        })
        .unwrap();
        assert_eq!(config.hosted_zone, "ZENV");
    }

    #[test]
    fn properties_take_precedence_over_environment() {
        let props = Properties::parse("HOSTED_ZONE=ZFILE\n");
        let config = DdnsConfig::resolve(&props, |_| Some("ZENV".to_string())).unwrap();
        assert_eq!(config.hosted_zone, "ZFILE");
    }

    #[test]
    fn missing_zone_everywhere_is_config_error() {
        let props = Properties::parse("IP_SERVICE=http://example.test/ip\n");
        let err = DdnsConfig::resolve(&props, |_| Some("  ".to_string())).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains(HOSTED_ZONE_KEY)));
    }

    #[test]
    fn malformed_service_url_is_config_error() {
        let props = Properties::parse("IP_SERVICE=not a url\nHOSTED_ZONE=Z123\n");
        let err = DdnsConfig::resolve(&props, no_env).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn non_http_service_url_is_rejected() {
        let config = DdnsConfig::new("ftp://example.test/ip", "Z123");
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
