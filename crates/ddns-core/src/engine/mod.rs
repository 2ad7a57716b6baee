//! Reconciliation pipeline
//!
//! The [`Reconciler`] drives one single-shot run:
//!
//! ```text
//! ┌──────────────┐  ZoneId   ┌────────────────┐  Option<RecordSetId>  ┌─────────────────┐
//! │ Zone resolver│──────────▶│ Record locator │──────────────────────▶│ Upsert executor │
//! └──────────────┘           └────────────────┘                       └─────────────────┘
//!        │                            │                                  │
//!        ▼                            ▼                                  ▼
//!   list zones              list record sets               create  or  update
//! ```
//!
//! ## Flow
//!
//! 1. Resolve the domain to a zone; no match aborts the run
//! 2. Look the record name up in that zone; absence selects the create branch
//! 3. Issue exactly one create or update (skipped in dry-run mode)
//!
//! Every stage awaits the previous one. No stage retries and no state is
//! kept between runs.

pub mod record;
pub mod upsert;
pub mod zone;

pub use record::{find_record, find_record_with};
pub use upsert::{UpsertAction, UpsertOutcome, upsert};
pub use zone::{resolve_zone, resolve_zone_with};

use crate::config::{DesiredState, ReconcileConfig};
use crate::error::Result;
use crate::traits::{DnsProvider, PageRequest, ZoneId};
use tracing::{info, warn};

/// Report of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Zone the record lives in
    pub zone_id: ZoneId,
    /// Fully-qualified record name
    pub record_name: String,
    /// Value the record now holds (or would hold, in dry-run mode)
    pub value: String,
    /// What the run did
    pub outcome: UpsertOutcome,
}

/// Single-shot reconciler over a provider handle
///
/// The provider is borrowed for the duration of the run and never mutated.
pub struct Reconciler<'a, P: DnsProvider + ?Sized> {
    /// Provider handle shared by all stages
    provider: &'a P,

    /// Run settings
    config: ReconcileConfig,
}

impl<'a, P: DnsProvider + ?Sized> Reconciler<'a, P> {
    /// Create a reconciler with default settings
    pub fn new(provider: &'a P) -> Self {
        Self::with_config(provider, ReconcileConfig::default())
    }

    /// Create a reconciler with explicit settings
    pub fn with_config(provider: &'a P, config: ReconcileConfig) -> Self {
        Self { provider, config }
    }

    /// Converge the provider to `desired`
    ///
    /// # Returns
    ///
    /// - `Ok(Reconciliation)`: the record was created or updated
    /// - `Err(Error)`: the first failing stage's error, tagged with that stage
    pub async fn run(&self, desired: &DesiredState) -> Result<Reconciliation> {
        info!(
            "Reconciling {} -> {} via {} [mode: {}]",
            desired.record_name,
            desired.value,
            self.provider.provider_name(),
            if self.config.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        let first = PageRequest::with_limit(self.config.page_limit);

        let zone_id = resolve_zone_with(self.provider, &desired.domain, first).await?;

        let record_id =
            find_record_with(self.provider, &zone_id, &desired.record_name, first).await?;

        let action = UpsertAction::plan(&desired.record_name, record_id.as_ref(), &desired.value);

        let outcome = if self.config.dry_run {
            warn!("[DRY-RUN] Would send {:?} to zone {}", action, zone_id);
            match action {
                UpsertAction::Create(_) => UpsertOutcome::WouldCreate,
                UpsertAction::Update { record_id, .. } => {
                    UpsertOutcome::WouldUpdate { id: record_id }
                }
            }
        } else {
            action.execute(self.provider, &zone_id).await?
        };

        Ok(Reconciliation {
            zone_id,
            record_name: desired.record_name.clone(),
            value: desired.value.clone(),
            outcome,
        })
    }
}
