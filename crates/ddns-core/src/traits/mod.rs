//! Core traits for the reconciler
//!
//! This module defines the abstract interface that provider implementations must follow.
//!
//! - [`DnsProvider`]: List zones and record sets, create and update record sets

pub mod dns_provider;

pub use dns_provider::{
    DEFAULT_PAGE_LIMIT, DnsProvider, NewRecordSet, Page, PageRequest, REDIRECT_RECORD_TYPE,
    RecordSet, RecordSetId, Zone, ZoneId,
};
