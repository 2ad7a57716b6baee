//! Record locator: record name within a zone → record set identifier

use super::zone::MAX_PAGES;
use crate::error::{Error, Result, Stage};
use crate::traits::{DnsProvider, PageRequest, RecordSetId, ZoneId};
use tracing::{debug, warn};

/// Find the record set named exactly `record_name` in `zone_id`
///
/// Returns `Ok(None)` when no record set has that name: absence is the
/// signal for the create branch, not an error. Names are compared with
/// strict string equality (no case folding, no trimming); the first match
/// wins and duplicates are not reported.
///
/// # Errors
///
/// Transport and schema errors from the provider, tagged with
/// [`Stage::RecordLookup`].
pub async fn find_record<P>(
    provider: &P,
    zone_id: &ZoneId,
    record_name: &str,
) -> Result<Option<RecordSetId>>
where
    P: DnsProvider + ?Sized,
{
    find_record_with(provider, zone_id, record_name, PageRequest::first()).await
}

/// [`find_record`] starting from an explicit page window
pub async fn find_record_with<P>(
    provider: &P,
    zone_id: &ZoneId,
    record_name: &str,
    first: PageRequest,
) -> Result<Option<RecordSetId>>
where
    P: DnsProvider + ?Sized,
{
    debug!("Looking up record ID: {} (zone: {})", record_name, zone_id);

    let mut request = first;
    for _ in 0..MAX_PAGES {
        let page = provider
            .list_record_sets(zone_id, request)
            .await
            .map_err(|e| e.in_stage(Stage::RecordLookup))?;

        if let Some(record) = page.items.iter().find(|record| record.name == record_name) {
            debug!("Found record ID: {}", record.id);
            return Ok(Some(record.id.clone()));
        }

        if page.is_last(request) {
            debug!("No record named {} in zone {}", record_name, zone_id);
            return Ok(None);
        }
        request = request.after(page.items.len());
    }

    warn!("Record set listing still had entries after {} pages", MAX_PAGES);
    Err(Error::schema(format!(
        "record set listing did not end after {} pages",
        MAX_PAGES
    ))
    .in_stage(Stage::RecordLookup))
}
