//! Multi-source device reconciliation.
//!
//! Records arrive from several adapters, each with its own identifier
//! namespace. The [`Reconciler`] folds them into a working set of canonical
//! records as they arrive, and [`advanced_deduplication`] makes a final global
//! pass over everything that was filed separately.
//!
//! The canonical record keeps its own `id` and `source_id` through every
//! merge, whichever side supplied the stronger signal. In the streaming phase
//! that is the first record filed under the key; in the final pass it is the
//! strongest record of its group.

pub mod identity;
pub mod merge;

pub use identity::{devices_match, is_significant_service, match_reason, MatchReason};
pub use merge::{merge, merge_device_type};

use crate::config::{MatchPolicy, ScanConfig};
use crate::constants::MISSING_RSSI_SENTINEL;
use crate::model::DeviceRecord;
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::debug;

/// Where an incoming record ended up in the working set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Filed as a new canonical record
    Inserted,
    /// Merged into the record already filed under the same id
    SameKey(String),
    /// Merged into a record judged to be the same device
    Matched(String, MatchReason),
}

/// Working set of canonical records for one scan
#[derive(Debug, Clone)]
pub struct Reconciler {
    entries: Vec<DeviceRecord>,
    index: HashMap<String, usize>,
    deduplicate: bool,
    prioritize_rssi: bool,
    policy: MatchPolicy,
}

impl Reconciler {
    pub fn new(deduplicate: bool, prioritize_rssi: bool, policy: MatchPolicy) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            deduplicate,
            prioritize_rssi,
            policy,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.deduplicate, config.prioritize_rssi, config.policy.clone())
    }

    /// Fold one record into the working set
    pub fn insert(&mut self, record: DeviceRecord) -> Placement {
        if let Some(&slot) = self.index.get(&record.id) {
            let key = self.entries[slot].id.clone();
            debug!("Merging {} into {} (same id)", record.id, key);
            merge_into(&mut self.entries[slot], &record, self.prioritize_rssi);
            return Placement::SameKey(key);
        }

        if self.deduplicate {
            let found = self.entries.iter().enumerate().find_map(|(slot, entry)| {
                match_reason(entry, &record, &self.policy).map(|reason| (slot, reason))
            });
            if let Some((slot, reason)) = found {
                let key = self.entries[slot].id.clone();
                debug!("Merging {} into {} ({:?})", record.id, key, reason);
                let alias = record.id.clone();
                merge_into(&mut self.entries[slot], &record, self.prioritize_rssi);
                self.index.entry(alias).or_insert(slot);
                return Placement::Matched(key, reason);
            }
        }

        self.index.insert(record.id.clone(), self.entries.len());
        self.entries.push(record);
        Placement::Inserted
    }

    pub fn extend<I: IntoIterator<Item = DeviceRecord>>(&mut self, records: I) {
        for record in records {
            self.insert(record);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical records in insertion order
    pub fn entries(&self) -> &[DeviceRecord] {
        &self.entries
    }

    /// Canonical records, after the final global pass when deduplication is on
    pub fn finish(self) -> Vec<DeviceRecord> {
        if self.deduplicate {
            advanced_deduplication(self.entries, &self.policy, self.prioritize_rssi)
        } else {
            self.entries
        }
    }
}

/// Merge `other` into `canonical`, keeping the canonical identity
fn merge_into(canonical: &mut DeviceRecord, other: &DeviceRecord, prioritize_rssi: bool) {
    let mut merged = merge(canonical, other, prioritize_rssi);
    merged.id = std::mem::take(&mut canonical.id);
    if !canonical.source_id.is_empty() {
        merged.source_id = std::mem::take(&mut canonical.source_id);
    }
    *canonical = merged;
}

/// Global pass over every canonical record.
///
/// Records are visited strongest signal first (unmeasured ones last). Each
/// unvisited record becomes canonical and absorbs every other unvisited
/// record that matches it, sweeping the working set until nothing more
/// matches. Passes repeat until one completes without a merge, so no two
/// survivors match each other.
pub fn advanced_deduplication(
    records: Vec<DeviceRecord>,
    policy: &MatchPolicy,
    prioritize_rssi: bool,
) -> Vec<DeviceRecord> {
    let mut current = records;
    loop {
        let (next, merges) = dedup_pass(current, policy, prioritize_rssi);
        current = next;
        if merges == 0 {
            return current;
        }
    }
}

fn dedup_pass(
    records: Vec<DeviceRecord>,
    policy: &MatchPolicy,
    prioritize_rssi: bool,
) -> (Vec<DeviceRecord>, usize) {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&i| Reverse(records[i].rssi_or(MISSING_RSSI_SENTINEL)));

    let mut processed = vec![false; records.len()];
    let mut survivors = Vec::with_capacity(records.len());
    let mut merges = 0;

    for &i in &order {
        if processed[i] {
            continue;
        }
        processed[i] = true;
        let mut canonical = records[i].clone();

        loop {
            let mut absorbed = false;
            for (j, candidate) in records.iter().enumerate() {
                if processed[j] || !devices_match(&canonical, candidate, policy) {
                    continue;
                }
                debug!("Final pass: merging {} into {}", candidate.id, canonical.id);
                merge_into(&mut canonical, candidate, prioritize_rssi);
                processed[j] = true;
                merges += 1;
                absorbed = true;
            }
            if !absorbed {
                break;
            }
        }

        survivors.push(canonical);
    }

    (survivors, merges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, address: &str, name: &str, rssi: i16) -> DeviceRecord {
        DeviceRecord::new(id, address, name).with_rssi(rssi)
    }

    #[test]
    fn same_key_merges_without_deduplication() {
        let mut reconciler = Reconciler::new(false, true, MatchPolicy::default());
        reconciler.insert(record("dev-1", "AA:BB:CC:00:00:01", "Buds", -70));
        let placement = reconciler.insert(record("dev-1", "AA:BB:CC:00:00:01", "Buds", -50));
        assert_eq!(placement, Placement::SameKey("dev-1".to_string()));
        assert_eq!(reconciler.len(), 1);
        assert_eq!(reconciler.entries()[0].rssi, Some(-50));
    }

    #[test]
    fn matching_record_keeps_existing_key() {
        let mut reconciler = Reconciler::new(true, true, MatchPolicy::default());
        reconciler.insert(record("ble-1", "00:11:22:33:44:55", "Unknown", -75));
        let placement = reconciler.insert(record("classic-1", "00-11-22-33-44-55", "iPhone 13", -60));

        assert_eq!(
            placement,
            Placement::Matched("ble-1".to_string(), MatchReason::SameAddress)
        );
        let merged = &reconciler.entries()[0];
        assert_eq!(merged.id, "ble-1");
        assert_eq!(merged.source_id, "ble-1");
        assert_eq!(merged.name, "iPhone 13");
        assert_eq!(merged.rssi, Some(-60));
        assert_eq!(merged.merged_from, vec!["classic-1".to_string(), "ble-1".to_string()]);
    }

    #[test]
    fn absorbed_alias_routes_later_records() {
        let mut reconciler = Reconciler::new(true, true, MatchPolicy::default());
        reconciler.insert(record("ble-1", "00:11:22:33:44:55", "Buds", -75));
        reconciler.insert(record("classic-1", "00:11:22:33:44:55", "Buds", -60));
        let placement = reconciler.insert(record("classic-1", "", "", -55));
        assert_eq!(placement, Placement::SameKey("ble-1".to_string()));
        assert_eq!(reconciler.len(), 1);
    }

    #[test]
    fn final_pass_prefers_strongest_canonical() {
        let policy = MatchPolicy::default();
        let records = vec![
            record("weak", "WIN-1", "Galaxy Buds", -90),
            record("strong", "WIN-2", "Galaxy Buds Pro", -40),
            record("other", "WIN-3", "Kettle", -60),
        ];
        let survivors = advanced_deduplication(records, &policy, true);
        assert_eq!(survivors.len(), 2);
        assert_eq!(survivors[0].id, "strong");
        assert_eq!(survivors[1].id, "other");
    }

    #[test]
    fn final_pass_reaches_fixpoint() {
        let policy = MatchPolicy::default();
        let mut bridge = record("bridge", "WIN-2", "", -50);
        bridge.merged_from = vec!["bridge".to_string(), "late".to_string()];
        let records = vec![
            record("first", "00:11:22:33:44:55", "", -40),
            record("late", "WIN-9", "", -80),
            bridge,
            record("mac", "00:11:22:33:44:55", "", -60),
        ];
        let survivors = advanced_deduplication(records, &policy, true);
        for (i, a) in survivors.iter().enumerate() {
            for b in &survivors[i + 1..] {
                assert!(!devices_match(a, b, &policy));
            }
        }
    }

    #[test]
    fn finish_skips_final_pass_without_deduplication() {
        let mut reconciler = Reconciler::new(false, true, MatchPolicy::default());
        reconciler.insert(record("a", "00:11:22:33:44:55", "Buds", -40));
        reconciler.insert(record("b", "00:11:22:33:44:55", "Buds", -60));
        assert_eq!(reconciler.finish().len(), 2);
    }
}
