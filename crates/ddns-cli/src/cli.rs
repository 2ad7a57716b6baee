//! Command-line argument definitions using clap.
//!
//! Every flag can also be supplied through a `DDNS_*` environment variable.
//! Nothing has a built-in value for credentials, record or domain: they must
//! be provided explicitly and are validated before any request is made.

use anyhow::Result;
use clap::Parser;
use ddns_core::config::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_REGION, DdnsConfig, ProviderConfig, ReconcileConfig,
    RecordConfig, RedirectStatus,
};
use tracing::Level;

/// Point a subdomain at a URL with a Huawei Cloud DNS redirect record
///
/// Creates `<record>.<domain>.` as a REDIRECT_URL record if it does not
/// exist, otherwise replaces its value. Exits non-zero on any failure.
#[derive(Parser, Debug)]
#[command(name = "ddns-redirect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Access key (AK)
    #[arg(long, alias = "ak", env = "DDNS_ACCESS_KEY", hide_env_values = true)]
    pub access_key: String,

    /// Secret key (SK)
    #[arg(long, alias = "sk", env = "DDNS_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Bare record label, e.g. "w"
    #[arg(short, long, alias = "rm", env = "DDNS_RECORD")]
    pub record: String,

    /// Bare domain, e.g. "example.com"
    #[arg(short, long, alias = "dm", env = "DDNS_DOMAIN")]
    pub domain: String,

    /// Redirect target URL
    #[arg(short, long, alias = "ur", env = "DDNS_URL")]
    pub url: String,

    /// Redirect status code (301 or 302)
    #[arg(long, env = "DDNS_REDIRECT_STATUS", default_value_t = 301)]
    pub status: u16,

    /// Provider region
    #[arg(long, env = "DDNS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Endpoint override (defaults to the regional DNS endpoint)
    #[arg(long, env = "DDNS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Project ID sent with every request
    #[arg(long, env = "DDNS_PROJECT_ID")]
    pub project_id: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, env = "DDNS_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Look everything up but do not create or update the record
    #[arg(long)]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DDNS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Build and validate the run configuration
    pub fn into_config(self) -> Result<DdnsConfig> {
        let status = RedirectStatus::from_code(self.status)?;

        let mut provider = ProviderConfig::new(self.access_key, self.secret_key)
            .with_region(self.region)
            .with_timeout_secs(self.timeout_secs);
        if let Some(endpoint) = self.endpoint {
            provider = provider.with_endpoint(endpoint);
        }
        if let Some(project_id) = self.project_id {
            provider = provider.with_project_id(project_id);
        }

        let config = DdnsConfig {
            provider,
            record: RecordConfig::new(self.record, self.domain, self.url).with_status(status),
            reconcile: ReconcileConfig {
                dry_run: self.dry_run,
                ..ReconcileConfig::default()
            },
        };

        config.validate()?;
        Ok(config)
    }
}

/// Parse a log level name
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "Log level '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["ddns-redirect"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("arguments parse")
    }

    const REQUIRED: &[&str] = &[
        "--access-key",
        "AK123",
        "--secret-key",
        "SK456",
        "--record",
        "w",
        "--domain",
        "zjlchb.com",
        "--url",
        "https://ww.zjlchb.com:34567",
    ];

    #[test]
    fn builds_normalized_config() {
        let config = parse(REQUIRED).into_config().unwrap();
        let desired = config.record.desired_state();

        assert_eq!(desired.domain, "zjlchb.com.");
        assert_eq!(desired.record_name, "w.zjlchb.com.");
        assert_eq!(desired.value, "301 https://ww.zjlchb.com:34567");
        assert_eq!(config.provider.region, "cn-east-3");
        assert!(!config.reconcile.dry_run);
    }

    #[test]
    fn accepts_short_legacy_flag_names() {
        let cli = parse(&[
            "--ak",
            "AK123",
            "--sk",
            "SK456",
            "--rm",
            "w",
            "--dm",
            "zjlchb.com",
            "--ur",
            "https://ww.zjlchb.com:34567",
        ]);
        assert_eq!(cli.record, "w");
        assert_eq!(cli.domain, "zjlchb.com");
    }

    #[test]
    fn optional_settings_flow_into_config() {
        let mut args = REQUIRED.to_vec();
        args.extend_from_slice(&[
            "--status",
            "302",
            "--endpoint",
            "http://127.0.0.1:8080",
            "--project-id",
            "proj-1",
            "--dry-run",
        ]);
        let config = parse(&args).into_config().unwrap();

        assert_eq!(config.record.status, RedirectStatus::Temporary);
        assert_eq!(config.provider.endpoint_url(), "http://127.0.0.1:8080");
        assert_eq!(config.provider.project_id.as_deref(), Some("proj-1"));
        assert!(config.reconcile.dry_run);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut args = REQUIRED.to_vec();
        args.extend_from_slice(&["--status", "307"]);
        assert!(parse(&args).into_config().is_err());

        let mut args = REQUIRED.to_vec();
        args[9] = "ww.zjlchb.com";
        assert!(parse(&args).into_config().is_err());

        let mut args = REQUIRED.to_vec();
        args[5] = "bad_label";
        assert!(parse(&args).into_config().is_err());
    }

    #[test]
    fn log_levels() {
        assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
        assert!(parse_log_level("verbose").is_err());
    }
}
