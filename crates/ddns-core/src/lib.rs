// # ddns-core
//
// Core library for the redirect-record DDNS reconciler.
//
// ## Architecture Overview
//
// One run makes a provider's hosted zone hold exactly one redirect record
// for a name:
// - **DnsProvider**: Trait for the provider RPC seam (list, create, update)
// - **Zone resolver**: domain → zone identifier
// - **Record locator**: record name → existing record identifier, or absent
// - **Upsert executor**: create when absent, update when present
// - **Reconciler**: Drives the three stages in order
//
// ## Design Principles
//
// 1. **Single-shot**: No watch loop, no retained state between runs
// 2. **Fail fast**: The first failing stage aborts the run, no retries
// 3. **Opaque identifiers**: Zone and record IDs only come from provider responses
// 4. **Library-First**: The CLI is a thin layer over this crate

pub mod config;
pub mod engine;
pub mod error;
pub mod traits;

// Re-export core types for convenience
pub use config::{DdnsConfig, DesiredState, ProviderConfig, RecordConfig, ReconcileConfig};
pub use engine::{
    Reconciler, Reconciliation, UpsertAction, UpsertOutcome, find_record, resolve_zone, upsert,
};
pub use error::{Error, Result, Stage};
pub use traits::DnsProvider;
