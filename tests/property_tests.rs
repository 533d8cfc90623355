use bluescout::config::MatchPolicy;
use bluescout::ident::normalize;
use bluescout::model::DeviceRecord;
use bluescout::reconcile::{advanced_deduplication, devices_match, merge};
use bluescout::report::rank_by_rssi;
use proptest::prelude::*;
use proptest::sample::select;
use std::collections::BTreeSet;

const ADDRESSES: &[&str] = &[
    "00:11:22:33:44:55",
    "001122334455",
    "aa-bb-cc-dd-ee-ff",
    "AA:BB:CC:DD:EE:FF",
    "04:15:52:00:00:01",
    "WIN-PNP-1",
    "WIN-PNP-2",
    "",
];

const NAMES: &[&str] = &[
    "",
    "Unknown",
    "iPhone",
    "105 112 104 111 110 101 0",
    "Galaxy Buds",
    "Galaxy Buds Pro",
    "Kettle",
    "Mouse",
    "Studio Speaker",
];

const FRIENDLY: &[&str] = &["", "BT Device 33:44:55", "Pixel", "Studio Speaker", "Buds"];

const SERVICES: &[&str] = &[
    "0000180f-0000-1000-8000-00805f9b34fb",
    "0000180F-0000-1000-8000-00805F9B34FB",
    "0000fe9f-0000-1000-8000-00805f9b34fb",
];

prop_compose! {
    fn record_strategy()(
        id in select(vec!["a", "b", "c", "d", "e", "f"]),
        address in select(ADDRESSES.to_vec()),
        name in select(NAMES.to_vec()),
        friendly in select(FRIENDLY.to_vec()),
        rssi in proptest::option::of(-100i16..-20),
        manufacturers in proptest::collection::btree_set(select(vec![0x004C_u16, 0x0075, 0x0006]), 0..2),
        services in proptest::collection::btree_set(select(SERVICES.to_vec()), 0..2),
        detected_by in select(vec!["bluez", "bluez_paired", "windows_pnp", "replay"]),
    ) -> DeviceRecord {
        let mut record = DeviceRecord::new(id, address, name).with_detected_by(detected_by);
        record.rssi = rssi;
        record.friendly_name = friendly.to_string();
        for id in manufacturers {
            record.manufacturer_data.insert(id, vec![1, 2]);
        }
        for uuid in services {
            record.service_uuids.insert(uuid.to_string());
        }
        record
    }
}

fn policies() -> impl Strategy<Value = MatchPolicy> {
    (any::<bool>(), any::<bool>()).prop_map(|(significant_services, shared_manufacturer)| MatchPolicy {
        significant_services,
        shared_manufacturer,
        ..MatchPolicy::default()
    })
}

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(raw in "[0-9a-fA-F:.-]{0,20}") {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn prop_normalize_is_idempotent_for_any_string(raw in any::<String>()) {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn prop_devices_match_is_symmetric(a in record_strategy(), b in record_strategy(), policy in policies()) {
        prop_assert_eq!(devices_match(&a, &b, &policy), devices_match(&b, &a, &policy));
    }

    #[test]
    fn prop_merge_never_loses_sources(
        a in record_strategy(),
        b in record_strategy(),
        c in record_strategy(),
        prioritize in any::<bool>(),
    ) {
        let left = merge(&merge(&a, &b, prioritize), &c, prioritize);
        let right = merge(&merge(&c, &a, prioritize), &b, prioritize);

        let expected_ids: BTreeSet<String> = [&a, &b, &c].iter().map(|r| r.source_id.clone()).collect();
        let expected_sources: BTreeSet<String> = [&a, &b, &c].iter().map(|r| r.detected_by.clone()).collect();

        for merged in [&left, &right] {
            let ids: BTreeSet<String> = merged.merged_from.iter().cloned().collect();
            let sources: BTreeSet<String> = merged.detection_sources.iter().cloned().collect();
            prop_assert!(ids.is_superset(&expected_ids));
            prop_assert!(sources.is_superset(&expected_sources));
        }
    }

    #[test]
    fn prop_no_duplicate_survivors(
        records in proptest::collection::vec(record_strategy(), 0..12),
        policy in policies(),
        prioritize in any::<bool>(),
    ) {
        let survivors = advanced_deduplication(records, &policy, prioritize);
        for (i, a) in survivors.iter().enumerate() {
            for b in &survivors[i + 1..] {
                prop_assert!(!devices_match(a, b, &policy), "{} and {} still match", a.id, b.id);
            }
        }
    }

    #[test]
    fn prop_ranking_is_descending_with_missing_last(records in proptest::collection::vec(record_strategy(), 0..12)) {
        let ranked = rank_by_rssi(records);
        for pair in ranked.windows(2) {
            match (pair[0].rssi, pair[1].rssi) {
                (Some(first), Some(second)) => prop_assert!(first >= second),
                (None, Some(_)) => prop_assert!(false, "missing RSSI ranked above a measurement"),
                _ => {}
            }
        }
    }
}
