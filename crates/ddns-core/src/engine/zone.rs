//! Zone resolver: fully-qualified domain → zone identifier

use crate::error::{Error, Result, Stage};
use crate::traits::{DnsProvider, PageRequest, ZoneId};
use tracing::{debug, warn};

/// Upper bound on listing pages fetched in one scan
pub(crate) const MAX_PAGES: usize = 1000;

/// Resolve the zone named exactly `domain`
///
/// `domain` must be fully-qualified (trailing dot). Zone names are compared
/// with strict string equality; the first match wins.
///
/// # Errors
///
/// - `Error::ZoneNotFound` naming `domain` when no zone matches
/// - `Error::Schema` when a listing response has an unexpected shape
/// - transport errors from the provider, unchanged
///
/// Every error is tagged with [`Stage::ZoneLookup`].
pub async fn resolve_zone<P>(provider: &P, domain: &str) -> Result<ZoneId>
where
    P: DnsProvider + ?Sized,
{
    resolve_zone_with(provider, domain, PageRequest::first()).await
}

/// [`resolve_zone`] starting from an explicit page window
pub async fn resolve_zone_with<P>(provider: &P, domain: &str, first: PageRequest) -> Result<ZoneId>
where
    P: DnsProvider + ?Sized,
{
    debug!("Looking up zone ID for domain: {}", domain);

    let mut request = first;
    for _ in 0..MAX_PAGES {
        let page = provider
            .list_zones(request)
            .await
            .map_err(|e| e.in_stage(Stage::ZoneLookup))?;

        if let Some(zone) = page.items.iter().find(|zone| zone.name == domain) {
            debug!("Found zone ID: {}", zone.id);
            return Ok(zone.id.clone());
        }

        if page.is_last(request) {
            return Err(Error::zone_not_found(domain).in_stage(Stage::ZoneLookup));
        }
        request = request.after(page.items.len());
    }

    warn!("Zone listing still had entries after {} pages", MAX_PAGES);
    Err(Error::schema(format!("zone listing did not end after {} pages", MAX_PAGES))
        .in_stage(Stage::ZoneLookup))
}
