use crate::model::DeviceRecord;
use crate::names;
use std::collections::BTreeSet;

/// Merge two observations of the same device into one record.
///
/// The record with the stronger signal (RSSI closer to zero) is the base when
/// `prioritize_rssi` is set; an unmeasured side always defers to a measured
/// one. Otherwise `first` is the base. Blank base fields are backfilled from
/// the other side, collections are unioned, and the provenance lists
/// (`detection_sources`, `merged_from`) accumulate both sides in first-seen
/// order.
pub fn merge(first: &DeviceRecord, second: &DeviceRecord, prioritize_rssi: bool) -> DeviceRecord {
    let (stronger, weaker) = if prioritize_rssi && second_is_stronger(first, second) {
        (second, first)
    } else {
        (first, second)
    };

    let mut merged = stronger.clone();
    backfill(&mut merged, weaker);

    merged.name = merge_name(&stronger.name, &weaker.name);
    merged.friendly_name = merge_friendly_name(&stronger.friendly_name, &weaker.friendly_name);

    for (id, data) in &weaker.manufacturer_data {
        merged
            .manufacturer_data
            .entry(*id)
            .or_insert_with(|| data.clone());
    }
    merged
        .service_uuids
        .extend(weaker.service_uuids.iter().cloned());
    for (uuid, data) in &weaker.service_data {
        merged
            .service_data
            .entry(uuid.clone())
            .or_insert_with(|| data.clone());
    }
    for class in &weaker.service_classes {
        push_unique(&mut merged.service_classes, class);
    }

    merged.detection_sources = accumulate(&[
        stronger.detection_sources.as_slice(),
        std::slice::from_ref(&stronger.detected_by),
        weaker.detection_sources.as_slice(),
        std::slice::from_ref(&weaker.detected_by),
    ]);

    merged.merged_from = accumulate(&[
        stronger.merged_from.as_slice(),
        std::slice::from_ref(&stronger.source_id),
        std::slice::from_ref(&weaker.source_id),
        weaker.merged_from.as_slice(),
    ]);
    if merged.merged_from.is_empty() {
        merged.merged_from = accumulate(&[
            std::slice::from_ref(&stronger.id),
            std::slice::from_ref(&weaker.id),
        ]);
    }

    merged.device_type = merge_device_type(&stronger.device_type, &weaker.device_type);

    merged
}

fn second_is_stronger(first: &DeviceRecord, second: &DeviceRecord) -> bool {
    match (first.rssi, second.rssi) {
        (None, Some(_)) => true,
        (Some(a), Some(b)) => b.unsigned_abs() < a.unsigned_abs(),
        _ => false,
    }
}

/// Fill blank scalar fields of `merged` from `weaker`.
/// Blank means absent, empty, or zero.
fn backfill(merged: &mut DeviceRecord, weaker: &DeviceRecord) {
    fill_str(&mut merged.id, &weaker.id);
    fill_str(&mut merged.source_id, &weaker.source_id);
    fill_str(&mut merged.address, &weaker.address);
    fill_str(&mut merged.company_name, &weaker.company_name);
    fill_str(&mut merged.detected_by, &weaker.detected_by);
    fill_str(&mut merged.major_device_class, &weaker.major_device_class);
    fill_str(&mut merged.minor_device_class, &weaker.minor_device_class);
    fill_str(&mut merged.raw_info, &weaker.raw_info);
    fill_str(&mut merged.detection_note, &weaker.detection_note);
    fill_str(&mut merged.device_type, &weaker.device_type);

    fill_nonzero(&mut merged.rssi, weaker.rssi);
    fill_nonzero(&mut merged.tx_power, weaker.tx_power);
    fill_nonzero(&mut merged.appearance, weaker.appearance);
    fill_nonzero(&mut merged.device_class, weaker.device_class);
    if merged.is_connectable.is_none() {
        merged.is_connectable = weaker.is_connectable;
    }

    if merged.connected_info.is_none() {
        merged.connected_info = weaker.connected_info.clone();
    }
    if merged.services.as_ref().map_or(true, Vec::is_empty) {
        if let Some(services) = weaker.services.as_ref().filter(|s| !s.is_empty()) {
            merged.services = Some(services.clone());
        }
    }
    if merged.characteristics.as_ref().map_or(true, Vec::is_empty) {
        if let Some(characteristics) = weaker.characteristics.as_ref().filter(|c| !c.is_empty()) {
            merged.characteristics = Some(characteristics.clone());
        }
    }
}

fn fill_str(target: &mut String, source: &str) {
    if target.is_empty() && !source.is_empty() {
        *target = source.to_string();
    }
}

fn fill_nonzero<T: Copy + Default + PartialEq>(target: &mut Option<T>, source: Option<T>) {
    let blank = target.map_or(true, |v| v == T::default());
    if blank && source.is_some() {
        *target = source;
    }
}

/// A decodable weak name wins over a missing strong one, then any real weak
/// name does.
fn merge_name(strong: &str, weak: &str) -> String {
    if !names::is_placeholder(strong) || weak.is_empty() {
        return if strong.is_empty() { weak.to_string() } else { strong.to_string() };
    }
    let decoded = names::decode_numeric_name(weak);
    if decoded != weak {
        return decoded;
    }
    if !names::is_placeholder(weak) {
        return weak.to_string();
    }
    strong.to_string()
}

/// A decoded weak label replaces a generic strong one; otherwise the longer
/// label wins as reported.
fn merge_friendly_name(strong: &str, weak: &str) -> String {
    if weak.is_empty() {
        return strong.to_string();
    }
    let decoded = names::decode_numeric_name(weak);
    if decoded != weak && names::is_generic_label(strong) {
        return decoded;
    }
    if strong.is_empty() || weak.chars().count() > strong.chars().count() {
        return weak.to_string();
    }
    strong.to_string()
}

/// Split both composite tags on `+`, union them, and re-join sorted
pub fn merge_device_type(strong: &str, weak: &str) -> String {
    if strong == weak || weak.is_empty() {
        return strong.to_string();
    }
    if strong.is_empty() {
        return weak.to_string();
    }
    let tags: BTreeSet<&str> = strong
        .split('+')
        .chain(weak.split('+'))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    tags.into_iter().collect::<Vec<_>>().join("+")
}

fn accumulate(groups: &[&[String]]) -> Vec<String> {
    let mut out = Vec::new();
    for value in groups.iter().flat_map(|group| group.iter()) {
        push_unique(&mut out, value);
    }
    out
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
