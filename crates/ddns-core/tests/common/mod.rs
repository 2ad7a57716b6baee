//! Test doubles and common utilities for reconciliation contract tests
//!
//! This module provides an in-memory provider that behaves like a hosted
//! DNS API (paged listings, server-assigned IDs) and records every call.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{
    DnsProvider, NewRecordSet, Page, PageRequest, RecordSet, RecordSetId, Zone, ZoneId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Provider calls, for counting and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    ListZones,
    ListRecordSets,
    Create,
    Update,
}

/// Kind of failure to inject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// RPC failed
    Transport,
    /// Response had the wrong shape
    Schema,
}

impl Failure {
    fn to_error(self, call: Call) -> Error {
        match self {
            Failure::Transport => Error::transport(format!("{:?}: connection reset", call)),
            Failure::Schema => Error::schema(format!("{:?}: expected a sequence", call)),
        }
    }
}

#[derive(Default)]
struct Inner {
    zones: Vec<Zone>,
    record_sets: HashMap<ZoneId, Vec<RecordSet>>,
    failures: HashMap<Call, Failure>,
    calls: Vec<Call>,
    pages: Vec<PageRequest>,
    page_cap: Option<usize>,
}

/// In-memory provider that tracks calls
#[derive(Clone, Default)]
pub struct MockDnsProvider {
    inner: Arc<Mutex<Inner>>,
    next_id: Arc<AtomicUsize>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone
    pub fn with_zone(self, name: &str, id: &str) -> Self {
        self.inner.lock().unwrap().zones.push(Zone {
            id: ZoneId::from(id),
            name: name.to_string(),
        });
        self
    }

    /// Add a record set to a zone
    pub fn with_record(self, zone_id: &str, name: &str, id: &str, value: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .record_sets
            .entry(ZoneId::from(zone_id))
            .or_default()
            .push(RecordSet {
                id: RecordSetId::from(id),
                name: name.to_string(),
                record_type: "REDIRECT_URL".to_string(),
                records: vec![value.to_string()],
            });
        self
    }

    /// Make every call of `call` fail
    pub fn failing(self, call: Call, failure: Failure) -> Self {
        self.inner.lock().unwrap().failures.insert(call, failure);
        self
    }

    /// Serve at most `cap` entries per page, whatever limit is requested
    pub fn with_page_cap(self, cap: usize) -> Self {
        self.inner.lock().unwrap().page_cap = Some(cap);
        self
    }

    /// Number of times `call` was issued
    pub fn call_count(&self, call: Call) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| **c == call)
            .count()
    }

    /// Total number of calls issued
    pub fn total_calls(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }

    /// Page windows requested by listing calls, in order
    pub fn pages(&self) -> Vec<PageRequest> {
        self.inner.lock().unwrap().pages.clone()
    }

    /// Record sets currently stored in a zone
    pub fn records_in(&self, zone_id: &str) -> Vec<RecordSet> {
        self.inner
            .lock()
            .unwrap()
            .record_sets
            .get(&ZoneId::from(zone_id))
            .cloned()
            .unwrap_or_default()
    }

    fn enter(&self, call: Call) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        match inner.failures.get(&call) {
            Some(failure) => Err(failure.to_error(call)),
            None => Ok(()),
        }
    }

    fn paginate<T: Clone>(&self, items: &[T], page: PageRequest) -> Page<T> {
        let mut inner = self.inner.lock().unwrap();
        inner.pages.push(page);
        let size = match inner.page_cap {
            Some(cap) => cap.min(page.limit as usize),
            None => page.limit as usize,
        };
        let window = items
            .iter()
            .skip(page.offset as usize)
            .take(size)
            .cloned()
            .collect();
        Page::new(window, Some(items.len() as u64))
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_zones(&self, page: PageRequest) -> Result<Page<Zone>> {
        self.enter(Call::ListZones)?;
        let zones = self.inner.lock().unwrap().zones.clone();
        Ok(self.paginate(&zones, page))
    }

    async fn list_record_sets(
        &self,
        zone_id: &ZoneId,
        page: PageRequest,
    ) -> Result<Page<RecordSet>> {
        self.enter(Call::ListRecordSets)?;
        let records = self
            .inner
            .lock()
            .unwrap()
            .record_sets
            .get(zone_id)
            .cloned()
            .unwrap_or_default();
        Ok(self.paginate(&records, page))
    }

    async fn create_record_set(
        &self,
        zone_id: &ZoneId,
        record: &NewRecordSet,
    ) -> Result<RecordSet> {
        self.enter(Call::Create)?;
        let id = format!("R{}", 100 + self.next_id.fetch_add(1, Ordering::SeqCst));
        let created = RecordSet {
            id: RecordSetId::from(id),
            name: record.name.clone(),
            record_type: record.record_type.clone(),
            records: record.records.clone(),
        };
        self.inner
            .lock()
            .unwrap()
            .record_sets
            .entry(zone_id.clone())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn update_record_set(
        &self,
        zone_id: &ZoneId,
        record_id: &RecordSetId,
        records: &[String],
    ) -> Result<RecordSet> {
        self.enter(Call::Update)?;
        let mut inner = self.inner.lock().unwrap();
        let record = inner
            .record_sets
            .get_mut(zone_id)
            .and_then(|sets| sets.iter_mut().find(|r| &r.id == record_id))
            .ok_or_else(|| Error::transport(format!("record set {} not found", record_id)))?;
        record.records = records.to_vec();
        Ok(record.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// The desired state used across scenarios
pub fn scenario_desired_state() -> ddns_core::DesiredState {
    ddns_core::RecordConfig::new("w", "zjlchb.com", "https://ww.zjlchb.com:34567").desired_state()
}
