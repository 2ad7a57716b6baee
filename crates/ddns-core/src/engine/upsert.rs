//! Upsert executor: create the record set if absent, else replace its values

use crate::error::{Result, Stage};
use crate::traits::{DnsProvider, NewRecordSet, RecordSetId, ZoneId};
use tracing::info;

/// The single mutating request a run issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertAction {
    /// No record set with the name exists yet
    Create(NewRecordSet),
    /// Replace the values of an existing record set
    Update {
        /// Existing record set
        record_id: RecordSetId,
        /// New values
        records: Vec<String>,
    },
}

impl UpsertAction {
    /// Decide between create and update from the locator's result
    ///
    /// No comparison with the record's current value is made: an existing
    /// record always yields an update.
    pub fn plan(record_name: &str, record_id: Option<&RecordSetId>, value: &str) -> Self {
        match record_id {
            None => UpsertAction::Create(NewRecordSet::redirect(record_name, value)),
            Some(id) => UpsertAction::Update {
                record_id: id.clone(),
                records: vec![value.to_string()],
            },
        }
    }

    /// Stage the request belongs to
    pub fn stage(&self) -> Stage {
        match self {
            UpsertAction::Create(_) => Stage::Create,
            UpsertAction::Update { .. } => Stage::Update,
        }
    }

    /// Issue the request
    pub async fn execute<P>(self, provider: &P, zone_id: &ZoneId) -> Result<UpsertOutcome>
    where
        P: DnsProvider + ?Sized,
    {
        let stage = self.stage();
        match self {
            UpsertAction::Create(record) => {
                let created = provider
                    .create_record_set(zone_id, &record)
                    .await
                    .map_err(|e| e.in_stage(stage))?;
                info!("Created record {} -> {:?}", record.name, record.records);
                Ok(UpsertOutcome::Created { id: created.id })
            }
            UpsertAction::Update { record_id, records } => {
                provider
                    .update_record_set(zone_id, &record_id, &records)
                    .await
                    .map_err(|e| e.in_stage(stage))?;
                info!("Updated record {} -> {:?}", record_id, records);
                Ok(UpsertOutcome::Updated { id: record_id })
            }
        }
    }
}

/// Terminal state of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// Record set was created
    Created {
        /// Identifier the provider assigned
        id: RecordSetId,
    },
    /// Existing record set had its values replaced
    Updated {
        /// Record set that was updated
        id: RecordSetId,
    },
    /// Dry-run: a create would have been issued
    WouldCreate,
    /// Dry-run: an update would have been issued
    WouldUpdate {
        /// Record set that would be updated
        id: RecordSetId,
    },
}

impl UpsertOutcome {
    /// Whether the provider was actually modified
    pub fn is_applied(&self) -> bool {
        matches!(
            self,
            UpsertOutcome::Created { .. } | UpsertOutcome::Updated { .. }
        )
    }
}

/// Create or update the redirect record
///
/// `record_id` is the locator's result: `None` issues a create with
/// `name = record_name`, the redirect type and `records = [value]`;
/// `Some(id)` issues an update of `id` with `records = [value]`.
///
/// # Errors
///
/// Provider errors are propagated without retry, tagged with
/// [`Stage::Create`] or [`Stage::Update`].
pub async fn upsert<P>(
    provider: &P,
    zone_id: &ZoneId,
    record_name: &str,
    record_id: Option<&RecordSetId>,
    value: &str,
) -> Result<UpsertOutcome>
where
    P: DnsProvider + ?Sized,
{
    UpsertAction::plan(record_name, record_id, value)
        .execute(provider, zone_id)
        .await
}
