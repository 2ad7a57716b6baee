//! Wire types of the Huawei Cloud DNS v2 API
//!
//! Responses are decoded straight into these types. A response whose
//! collection field is missing or has the wrong type fails to decode and
//! surfaces as `Error::Schema`, which keeps it apart from an empty listing.

use ddns_core::traits::{RecordSet, Zone};
use serde::{Deserialize, Serialize};

/// `GET /v2/zones`
#[derive(Debug, Clone, Deserialize)]
pub struct ListZonesResponse {
    /// Zones on this page
    pub zones: Vec<Zone>,
    /// Paging metadata
    #[serde(default)]
    pub metadata: Option<ListMetadata>,
}

/// `GET /v2/zones/{zone_id}/recordsets`
#[derive(Debug, Clone, Deserialize)]
pub struct ListRecordSetsResponse {
    /// Record sets on this page
    pub recordsets: Vec<RecordSet>,
    /// Paging metadata
    #[serde(default)]
    pub metadata: Option<ListMetadata>,
}

/// Listing metadata
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMetadata {
    /// Number of entries across all pages
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl ListMetadata {
    /// Total count from optional metadata
    pub fn total(metadata: Option<&ListMetadata>) -> Option<u64> {
        metadata.and_then(|m| m.total_count)
    }
}

/// `PUT /v2/zones/{zone_id}/recordsets/{recordset_id}`
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRecordSetBody<'a> {
    /// Replacement values
    pub records: &'a [String],
}

/// Error body returned with non-2xx responses
///
/// The API uses both `code`/`message` and `error_code`/`error_msg`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    /// Error code (e.g. "DNS.0302")
    #[serde(default, alias = "error_code")]
    pub code: Option<String>,
    /// Human-readable message
    #[serde(default, alias = "error_msg")]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Best-effort description of an error body
    pub fn describe(text: &str) -> String {
        match serde_json::from_str::<ApiErrorBody>(text) {
            Ok(ApiErrorBody {
                code: Some(code),
                message: Some(message),
            }) => format!("{}: {}", code, message),
            Ok(ApiErrorBody {
                message: Some(message),
                ..
            }) => message,
            _ => text.to_string(),
        }
    }
}
