use crate::config::MatchPolicy;
use crate::constants::SIGNIFICANT_SERVICE_UUIDS;
use crate::ident;
use crate::model::DeviceRecord;
use crate::names;

/// Which piece of evidence tied two records to the same device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    SameAddress,
    SimilarNames,
    DecodedNames,
    SimilarFriendlyNames,
    KnownAlias,
    SharedSignificantService,
    SharedManufacturer,
}

/// True when `a` and `b` are judged to be the same physical device.
/// Symmetric in its arguments.
pub fn devices_match(a: &DeviceRecord, b: &DeviceRecord, policy: &MatchPolicy) -> bool {
    match_reason(a, b, policy).is_some()
}

/// First criterion that ties `a` to `b`, checked cheapest first
pub fn match_reason(a: &DeviceRecord, b: &DeviceRecord, policy: &MatchPolicy) -> Option<MatchReason> {
    if ident::same_address(&a.address, &b.address) {
        return Some(MatchReason::SameAddress);
    }

    if !names::is_placeholder(&a.name)
        && !names::is_placeholder(&b.name)
        && names::names_match(&a.name, &b.name, policy.name_threshold)
    {
        return Some(MatchReason::SimilarNames);
    }

    if decoded_names_match(a, b, policy) {
        return Some(MatchReason::DecodedNames);
    }

    if !names::is_generic_label(&a.friendly_name)
        && !names::is_generic_label(&b.friendly_name)
        && names::names_match(&a.friendly_name, &b.friendly_name, policy.name_threshold)
    {
        return Some(MatchReason::SimilarFriendlyNames);
    }

    if is_known_alias(a, b) || is_known_alias(b, a) {
        return Some(MatchReason::KnownAlias);
    }

    if policy.significant_services && shares_significant_service(a, b) {
        return Some(MatchReason::SharedSignificantService);
    }

    if policy.shared_manufacturer
        && !a.manufacturer_data.is_empty()
        && a.manufacturer_data.keys().any(|id| b.manufacturer_data.contains_key(id))
    {
        return Some(MatchReason::SharedManufacturer);
    }

    None
}

fn decoded_names_match(a: &DeviceRecord, b: &DeviceRecord, policy: &MatchPolicy) -> bool {
    if a.name.is_empty() || b.name.is_empty() {
        return false;
    }
    let decoded_a = names::decode_numeric_name(&a.name);
    let decoded_b = names::decode_numeric_name(&b.name);
    if decoded_a == a.name && decoded_b == b.name {
        return false;
    }
    names::names_match(&decoded_a, &decoded_b, policy.name_threshold)
}

/// `other` was already absorbed into `record` under its original identifier
fn is_known_alias(record: &DeviceRecord, other: &DeviceRecord) -> bool {
    let alias = if other.source_id.is_empty() {
        &other.id
    } else {
        &other.source_id
    };
    !alias.is_empty() && record.merged_from.iter().any(|id| id == alias)
}

fn shares_significant_service(a: &DeviceRecord, b: &DeviceRecord) -> bool {
    if a.service_uuids.is_empty() || b.service_uuids.is_empty() {
        return false;
    }
    a.service_uuids.iter().any(|uuid| {
        is_significant_service(uuid) && b.service_uuids.iter().any(|other| other.eq_ignore_ascii_case(uuid))
    })
}

/// Member of the GATT profile allow-list, compared case-insensitively
pub fn is_significant_service(uuid: &str) -> bool {
    SIGNIFICANT_SERVICE_UUIDS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(uuid.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, address: &str, name: &str) -> DeviceRecord {
        DeviceRecord::new(id, address, name)
    }

    #[test]
    fn matches_on_normalized_address() {
        let a = record("a", "AA:BB:CC:DD:EE:FF", "Unknown");
        let b = record("b", "aabbccddeeff", "Unknown");
        assert_eq!(
            match_reason(&a, &b, &MatchPolicy::default()),
            Some(MatchReason::SameAddress)
        );
    }

    #[test]
    fn placeholder_names_never_match() {
        let a = record("a", "WIN-1", "Unknown");
        let b = record("b", "WIN-2", "unknown");
        assert!(!devices_match(&a, &b, &MatchPolicy::default()));
    }

    #[test]
    fn decoded_name_matches_plain_name() {
        let a = record("a", "WIN-1", "105 112 104 111 110 101 0");
        let b = record("b", "WIN-2", "iPhone");
        assert_eq!(
            match_reason(&a, &b, &MatchPolicy::default()),
            Some(MatchReason::DecodedNames)
        );
    }

    #[test]
    fn generic_friendly_names_are_ignored() {
        let mut a = record("a", "x1", "");
        let mut b = record("b", "x2", "");
        a.friendly_name = "BT Device 33:44:55".to_string();
        b.friendly_name = "BT Device 33:44:56".to_string();
        assert!(!devices_match(&a, &b, &MatchPolicy::default()));
    }

    #[test]
    fn alias_in_merged_from_matches_both_ways() {
        let mut canonical = record("a", "x1", "");
        canonical.merged_from = vec!["a".to_string(), "legacy-id".to_string()];
        let late = record("legacy-id", "x2", "");
        assert!(devices_match(&canonical, &late, &MatchPolicy::default()));
        assert!(devices_match(&late, &canonical, &MatchPolicy::default()));
    }

    #[test]
    fn only_significant_services_count() {
        let mut a = record("a", "x1", "");
        let mut b = record("b", "x2", "");
        a.service_uuids.insert("0000fe9f-0000-1000-8000-00805f9b34fb".to_string());
        b.service_uuids.insert("0000fe9f-0000-1000-8000-00805f9b34fb".to_string());
        assert!(!devices_match(&a, &b, &MatchPolicy::default()));

        a.service_uuids.insert("0000180F-0000-1000-8000-00805F9B34FB".to_string());
        b.service_uuids.insert("0000180f-0000-1000-8000-00805f9b34fb".to_string());
        assert_eq!(
            match_reason(&a, &b, &MatchPolicy::default()),
            Some(MatchReason::SharedSignificantService)
        );

        let strict = MatchPolicy {
            significant_services: false,
            ..MatchPolicy::default()
        };
        assert!(!devices_match(&a, &b, &strict));
    }

    #[test]
    fn shared_manufacturer_id_matches() {
        let mut a = record("a", "x1", "");
        let mut b = record("b", "x2", "");
        a.manufacturer_data.insert(0x004C, vec![1]);
        b.manufacturer_data.insert(0x004C, vec![2]);
        assert_eq!(
            match_reason(&a, &b, &MatchPolicy::default()),
            Some(MatchReason::SharedManufacturer)
        );
    }
}
