//! Configuration types for the reconciler
//!
//! This module defines the configuration structures used throughout the crate
//! and the normalization from user-facing input (bare label, bare domain, URL)
//! to the fully-qualified [`DesiredState`] the pipeline works on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default provider region
pub const DEFAULT_REGION: &str = "cn-east-3";

/// Default HTTP timeout for provider calls, in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Main configuration for one reconciliation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// The record to reconcile
    pub record: RecordConfig,

    /// Optional run settings
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

impl DdnsConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        self.record.validate()?;
        self.reconcile.validate()?;
        Ok(())
    }
}

/// Huawei Cloud DNS credentials and endpoint
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Access key (AK)
    pub access_key: String,

    /// Secret key (SK)
    /// ⚠️ NEVER log this value
    pub secret_key: String,

    /// Region the endpoint is derived from
    #[serde(default = "default_region")]
    pub region: String,

    /// Project ID sent with every request, if set
    #[serde(default)]
    pub project_id: Option<String>,

    /// Endpoint override (defaults to the regional DNS endpoint)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// HTTP timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

// Custom Debug implementation that hides the secret key
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<REDACTED>")
            .field("region", &self.region)
            .field("project_id", &self.project_id)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a provider configuration with default region and timeout
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: default_region(),
            project_id: None,
            endpoint: None,
            timeout_secs: default_http_timeout_secs(),
        }
    }

    /// Set the region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the endpoint override
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the project ID
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the HTTP timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// The base URL requests are sent to
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://dns.{}.myhuaweicloud.com", self.region),
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.access_key.trim().is_empty() {
            return Err(crate::Error::config("Access key cannot be empty"));
        }
        if self.secret_key.trim().is_empty() {
            return Err(crate::Error::config("Secret key cannot be empty"));
        }
        if self.region.trim().is_empty() {
            return Err(crate::Error::config("Region cannot be empty"));
        }
        if let Some(endpoint) = &self.endpoint
            && !endpoint.starts_with("https://")
            && !endpoint.starts_with("http://")
        {
            return Err(crate::Error::config(format!(
                "Endpoint must use HTTP or HTTPS scheme. Got: {}",
                endpoint
            )));
        }
        if !(1..=300).contains(&self.timeout_secs) {
            return Err(crate::Error::config(format!(
                "HTTP timeout must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            )));
        }
        Ok(())
    }
}

/// HTTP status the redirect record answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RedirectStatus {
    /// 301 Moved Permanently
    #[default]
    #[serde(rename = "301")]
    Permanent,
    /// 302 Found
    #[serde(rename = "302")]
    Temporary,
}

impl RedirectStatus {
    /// Numeric status code
    pub fn code(self) -> u16 {
        match self {
            RedirectStatus::Permanent => 301,
            RedirectStatus::Temporary => 302,
        }
    }

    /// Parse a numeric status code
    pub fn from_code(code: u16) -> Result<Self, crate::Error> {
        match code {
            301 => Ok(RedirectStatus::Permanent),
            302 => Ok(RedirectStatus::Temporary),
            other => Err(crate::Error::config(format!(
                "Redirect status must be 301 or 302. Got: {}",
                other
            ))),
        }
    }
}

/// The record to reconcile, as the user supplies it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Bare record label (e.g. "w")
    pub label: String,

    /// Bare domain (e.g. "example.com")
    pub domain: String,

    /// Redirect target URL
    pub url: String,

    /// Redirect status code
    #[serde(default)]
    pub status: RedirectStatus,
}

impl RecordConfig {
    /// Create a new record configuration with a permanent redirect
    pub fn new(
        label: impl Into<String>,
        domain: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            domain: domain.into(),
            url: url.into(),
            status: RedirectStatus::default(),
        }
    }

    /// Set the redirect status
    pub fn with_status(mut self, status: RedirectStatus) -> Self {
        self.status = status;
        self
    }

    /// Validate the record configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_domain_name(&self.label)?;
        validate_domain_name(self.domain.trim_end_matches('.'))?;

        if self.url.is_empty() {
            return Err(crate::Error::config("Redirect URL cannot be empty"));
        }
        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Redirect URL must use HTTP or HTTPS scheme. Got: {}",
                self.url
            )));
        }
        if self.url.chars().any(char::is_whitespace) {
            return Err(crate::Error::config(format!(
                "Redirect URL cannot contain whitespace. Got: {}",
                self.url
            )));
        }
        Ok(())
    }

    /// Normalize into the fully-qualified desired state
    pub fn desired_state(&self) -> DesiredState {
        DesiredState::from_parts(&self.label, &self.domain, &self.url, self.status)
    }
}

/// Run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Look everything up but skip the create/update call
    #[serde(default)]
    pub dry_run: bool,

    /// Page size for zone and record set listings
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl ReconcileConfig {
    /// Validate the run settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.page_limit == 0 || self.page_limit > crate::traits::DEFAULT_PAGE_LIMIT {
            return Err(crate::Error::config(format!(
                "Page limit must be between 1 and {}. Got: {}",
                crate::traits::DEFAULT_PAGE_LIMIT,
                self.page_limit
            )));
        }
        Ok(())
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            page_limit: default_page_limit(),
        }
    }
}

/// The fully-qualified `(record name, domain, value)` triple a run converges to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredState {
    /// Fully-qualified record name (e.g. "w.example.com.")
    pub record_name: String,
    /// Fully-qualified zone domain (e.g. "example.com.")
    pub domain: String,
    /// Record value (e.g. "301 https://example.net")
    pub value: String,
}

impl DesiredState {
    /// Build from a bare label, bare domain and target URL
    ///
    /// A trailing dot on `domain` is accepted and not doubled.
    pub fn from_parts(label: &str, domain: &str, url: &str, status: RedirectStatus) -> Self {
        let domain = fqdn(domain);
        Self {
            record_name: format!("{}.{}", label, domain),
            domain,
            value: format!("{} {}", status.code(), url),
        }
    }
}

/// Terminate a domain with exactly one trailing dot
pub fn fqdn(domain: &str) -> String {
    format!("{}.", domain.trim_end_matches('.'))
}

/// Validate that a string is a valid domain name or label
///
/// This implements basic DNS domain name validation per RFC 1035.
/// It's not comprehensive but catches common errors.
pub fn validate_domain_name(domain: &str) -> Result<(), crate::Error> {
    if domain.is_empty() {
        return Err(crate::Error::config("Domain name cannot be empty"));
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        return Err(crate::Error::config(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Domain name has empty label: '{}'",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(crate::Error::config(format!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric and hyphen only.",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_page_limit() -> u32 {
    crate::traits::DEFAULT_PAGE_LIMIT
}
