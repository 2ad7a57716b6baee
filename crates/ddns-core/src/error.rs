//! Error types for the reconciler
//!
//! This module defines all error types used throughout the crate.

use std::fmt;
use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Domain → zone identifier
    ZoneLookup,
    /// Record name → record identifier
    RecordLookup,
    /// Create record set
    Create,
    /// Update record set
    Update,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ZoneLookup => "zone lookup",
            Stage::RecordLookup => "record lookup",
            Stage::Create => "record create",
            Stage::Update => "record update",
        };
        f.write_str(name)
    }
}

/// Core error type for the reconciler
#[derive(Error, Debug)]
pub enum Error {
    /// The provider call itself failed (network, provider-side rejection)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Credentials were rejected by the provider
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// A provider response could not be interpreted into the expected shape
    #[error("Unexpected response shape: {0}")]
    Schema(String),

    /// No zone is named exactly after the requested domain
    #[error("No zone found for domain {0}")]
    ZoneNotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error tagged with the pipeline stage it came from
    #[error("{stage} failed: {source}")]
    Stage {
        /// Stage that failed
        stage: Stage,
        /// Underlying error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a schema error
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Create a "zone not found" error naming the queried domain
    pub fn zone_not_found(domain: impl Into<String>) -> Self {
        Self::ZoneNotFound(domain.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Tag this error with the stage it was raised in
    ///
    /// An error that already carries a stage keeps its original tag.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            Self::Stage { .. } => self,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage this error was tagged with, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The error with any stage tag removed
    pub fn root(&self) -> &Error {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the underlying RPC failed (any provider-side failure)
    pub fn is_transport(&self) -> bool {
        matches!(
            self.root(),
            Self::Transport(_)
                | Self::Authentication(_)
                | Self::RateLimited(_)
                | Self::Provider { .. }
        )
    }

    /// Whether a provider response had an unexpected shape
    pub fn is_schema(&self) -> bool {
        matches!(self.root(), Self::Schema(_))
    }

    /// Whether the zone for the requested domain does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Self::ZoneNotFound(_))
    }
}

/// JSON payloads that fail to decode are shape errors, never "empty"
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Schema(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_tag_is_kept_and_displayed() {
        let err = Error::zone_not_found("example.com.").in_stage(Stage::ZoneLookup);

        assert_eq!(err.stage(), Some(Stage::ZoneLookup));
        assert!(err.is_not_found());
        assert!(!err.is_schema());
        assert_eq!(
            err.to_string(),
            "zone lookup failed: No zone found for domain example.com."
        );
    }

    #[test]
    fn retagging_keeps_the_first_stage() {
        let err = Error::transport("connection reset")
            .in_stage(Stage::RecordLookup)
            .in_stage(Stage::Update);

        assert_eq!(err.stage(), Some(Stage::RecordLookup));
        assert!(err.is_transport());
    }

    #[test]
    fn json_errors_are_schema_errors() {
        let bad = serde_json::from_str::<Vec<String>>("42").unwrap_err();
        let err: Error = bad.into();
        assert!(err.is_schema());
        assert!(!err.is_transport());
    }
}
