// # DNS Provider Trait
//
// Defines the RPC seam between the reconciler and a DNS provider's API.
//
// ## Implementations
//
// - Huawei Cloud DNS: `ddns-provider-huaweicloud` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::traits::{DnsProvider, PageRequest};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let page = provider.list_zones(PageRequest::first()).await?;
//     for zone in page.items {
//         println!("{} -> {}", zone.name, zone.id);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record type written by this tool
pub const REDIRECT_RECORD_TYPE: &str = "REDIRECT_URL";

/// Largest page size the listing calls ask for
pub const DEFAULT_PAGE_LIMIT: u32 = 500;

/// Opaque zone identifier issued by the provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(String);

/// Opaque record set identifier, scoped to a zone
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSetId(String);

macro_rules! opaque_id {
    ($ty:ident) => {
        impl $ty {
            /// The identifier exactly as the provider issued it
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        /// Provider implementations wrap identifiers taken from responses.
        impl From<String> for $ty {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $ty {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

opaque_id!(ZoneId);
opaque_id!(RecordSetId);

/// A hosted zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Provider identifier
    pub id: ZoneId,
    /// Fully-qualified zone name (trailing dot)
    pub name: String,
}

/// A named, typed set of record values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Provider identifier
    pub id: RecordSetId,
    /// Fully-qualified record name (trailing dot)
    pub name: String,
    /// Record type tag (e.g. "A", "REDIRECT_URL")
    #[serde(rename = "type", default)]
    pub record_type: String,
    /// Record values, in provider order
    #[serde(default)]
    pub records: Vec<String>,
}

/// Body of a record set creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRecordSet {
    /// Fully-qualified record name
    pub name: String,
    /// Record type tag
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record values
    pub records: Vec<String>,
}

impl NewRecordSet {
    /// A redirect record holding a single value
    pub fn redirect(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: REDIRECT_RECORD_TYPE.to_string(),
            records: vec![value.into()],
        }
    }
}

/// Offset/limit window for listing calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Number of entries to skip
    pub offset: u32,
    /// Maximum number of entries to return
    pub limit: u32,
}

impl PageRequest {
    /// The first page with the default limit
    pub fn first() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// The first page with a custom limit (clamped to at least 1)
    pub fn with_limit(limit: u32) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
        }
    }

    /// The window following a page that returned `received` entries
    ///
    /// The offset advances by what the provider actually returned, so a
    /// provider that caps its page size below `limit` is not skipped over.
    pub fn after(self, received: usize) -> Self {
        let received = u32::try_from(received).unwrap_or(u32::MAX);
        Self {
            offset: self.offset.saturating_add(received),
            limit: self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Entries on this page
    pub items: Vec<T>,
    /// Total number of entries across all pages, when the provider reports it
    pub total: Option<u64>,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, total: Option<u64>) -> Self {
        Self { items, total }
    }

    /// Whether no further page should be requested after `request`
    ///
    /// With a reported total the listing ends only once `total` entries have
    /// been seen; a short page says nothing about the pages after it. Without
    /// a total, a page shorter than `limit` is the last one.
    pub fn is_last(&self, request: PageRequest) -> bool {
        if self.items.is_empty() {
            return true;
        }
        let seen = u64::from(request.offset) + self.items.len() as u64;
        match self.total {
            Some(total) => seen >= total,
            None => (self.items.len() as u64) < u64::from(request.limit),
        }
    }
}

/// RPC seam to a DNS provider
///
/// The reconciler treats every method as a black-box call that returns
/// either a structured result or an error. Authentication, transport and
/// request signing belong to the implementation.
///
/// # Error Contract
///
/// - Network failures and provider-side rejections: `Error::Transport`,
///   `Error::Authentication`, `Error::RateLimited` or `Error::Provider`
/// - A response body that does not fit the expected shape: `Error::Schema`.
///   An empty collection is a valid answer and must not be reported as
///   `Error::Schema`.
///
/// Implementations must not retry. A failed call aborts the run.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List hosted zones
    async fn list_zones(&self, page: PageRequest) -> Result<Page<Zone>, crate::Error>;

    /// List record sets within a zone
    async fn list_record_sets(
        &self,
        zone_id: &ZoneId,
        page: PageRequest,
    ) -> Result<Page<RecordSet>, crate::Error>;

    /// Create a record set in a zone
    async fn create_record_set(
        &self,
        zone_id: &ZoneId,
        record: &NewRecordSet,
    ) -> Result<RecordSet, crate::Error>;

    /// Replace the values of an existing record set
    async fn update_record_set(
        &self,
        zone_id: &ZoneId,
        record_id: &RecordSetId,
        records: &[String],
    ) -> Result<RecordSet, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_page_is_last() {
        let request = PageRequest::with_limit(10);
        let page = Page::new(vec![1, 2, 3], None);
        assert!(page.is_last(request));
    }

    #[test]
    fn full_page_continues_until_total() {
        let request = PageRequest::with_limit(2);
        let page = Page::new(vec![1, 2], Some(5));
        assert!(!page.is_last(request));

        let third = request.after(2).after(2);
        assert_eq!(third.offset, 4);
        assert!(Page::new(vec![1], Some(5)).is_last(third));
    }

    #[test]
    fn short_page_continues_while_total_remains() {
        let request = PageRequest::first();
        let page = Page::new(vec![1, 2], Some(3));
        assert!(!page.is_last(request));

        let second = request.after(page.items.len());
        assert_eq!(second.offset, 2);
        assert_eq!(second.limit, DEFAULT_PAGE_LIMIT);
        assert!(Page::new(vec![3], Some(3)).is_last(second));
    }

    #[test]
    fn empty_page_is_last_even_below_total() {
        let request = PageRequest::first().after(4);
        assert!(Page::<u8>::new(vec![], Some(10)).is_last(request));
    }

    #[test]
    fn full_page_without_total_continues() {
        let request = PageRequest::with_limit(2);
        assert!(!Page::new(vec![1, 2], None).is_last(request));
        assert!(Page::<u8>::new(vec![], None).is_last(request));
    }

    #[test]
    fn record_set_tolerates_missing_records() {
        let record: RecordSet =
            serde_json::from_str(r#"{"id":"R1","name":"w.example.com.","type":"A"}"#).unwrap();
        assert!(record.records.is_empty());
        assert_eq!(record.id.as_str(), "R1");
    }

    #[test]
    fn zone_requires_name() {
        let zone = serde_json::from_str::<Zone>(r#"{"id":"Z1"}"#);
        assert!(zone.is_err());
    }

    #[test]
    fn new_redirect_serializes_type_tag() {
        let body = serde_json::to_value(NewRecordSet::redirect(
            "w.example.com.",
            "301 https://example.net",
        ))
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "name": "w.example.com.",
                "type": "REDIRECT_URL",
                "records": ["301 https://example.net"],
            })
        );
    }
}
