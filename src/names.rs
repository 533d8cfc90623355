use crate::constants::{MIN_COMMON_SUBSTRING, PLACEHOLDER_NAME};
use crate::db::catalog;
use crate::ident;
use std::collections::{BTreeMap, HashSet};

/// Missing or reported as "Unknown"
pub fn is_placeholder(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(PLACEHOLDER_NAME)
}

/// Auto-generated labels such as "BT Device 33:44:55" carry no identity
pub fn is_generic_label(label: &str) -> bool {
    label.is_empty() || label.contains("Device")
}

/// Digits and whitespace only, with at least one digit
pub fn looks_numeric(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || c.is_whitespace())
}

/// Decode names reported as a dump of decimal byte values.
///
/// `"105 80 104 111 110 101 0"` decodes to `"iPhone"`: values are read up to
/// the first `0`, non-printable values are dropped, and the result is only
/// accepted when it has at least two characters including a letter.
/// Anything else is returned unchanged.
pub fn decode_numeric_name(s: &str) -> String {
    if !looks_numeric(s) {
        return s.to_string();
    }

    let decoded: String = s
        .split_whitespace()
        .filter_map(|code| code.parse::<u64>().ok())
        .take_while(|&code| code != 0)
        .filter(|code| (32..=126).contains(code))
        .filter_map(|code| char::from_u32(code as u32))
        .collect();

    if decoded.chars().count() >= 2 && decoded.chars().any(char::is_alphabetic) {
        decoded
    } else {
        s.to_string()
    }
}

/// Pick the most human-friendly label available for a device.
///
/// Order: a decodable numeric name, a real reported name, the MAC-prefix
/// catalog, the manufacturer-ID catalog, then a label built from the address.
pub fn friendly_name(name: &str, address: &str, manufacturer_data: &BTreeMap<u16, Vec<u8>>) -> String {
    if looks_numeric(name) {
        let decoded = decode_numeric_name(name);
        if decoded != name {
            return decoded;
        }
    }

    if !is_placeholder(name) {
        return name.to_string();
    }

    if let Some(info) = catalog::device_info(address) {
        return info.friendly_name.to_string();
    }

    let suffix = ident::address_suffix(address);
    if let Some(company) = manufacturer_data.keys().find_map(|&id| catalog::company_name(id)) {
        return format!("{} Device ({})", company, suffix);
    }

    format!("BT Device {}", suffix)
}

/// Fuzzy, symmetric, case-insensitive name comparison.
///
/// Matches on equality, containment either way, a shared distinct-character
/// ratio of at least `threshold`, or a shared run of three or more characters.
pub fn names_match(n1: &str, n2: &str, threshold: f64) -> bool {
    let a = n1.trim().to_lowercase();
    let b = n2.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b || a.contains(&b) || b.contains(&a) {
        return true;
    }

    let set_a: HashSet<char> = a.chars().collect();
    let set_b: HashSet<char> = b.chars().collect();
    let common = set_a.intersection(&set_b).count();
    let larger = set_a.len().max(set_b.len());
    if larger > 0 && common as f64 / larger as f64 >= threshold {
        return true;
    }

    has_common_run(&a, &b, MIN_COMMON_SUBSTRING)
}

fn has_common_run(a: &str, b: &str, len: usize) -> bool {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len() < len || b.len() < len {
        return false;
    }
    let windows: HashSet<&[char]> = a.windows(len).collect();
    b.windows(len).any(|w| windows.contains(w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_null_terminated_byte_dump() {
        assert_eq!(decode_numeric_name("105 80 104 111 110 101 0"), "iPhone");
        assert_eq!(decode_numeric_name("105 112 104 111 110 101 0 65 66"), "iphone");
    }

    #[test]
    fn keeps_undecodable_input() {
        assert_eq!(decode_numeric_name("My Device"), "My Device");
        assert_eq!(decode_numeric_name("65"), "65");
        assert_eq!(decode_numeric_name("49 50 51"), "49 50 51");
        assert_eq!(decode_numeric_name("0 65 66"), "0 65 66");
        assert_eq!(decode_numeric_name(""), "");
    }

    #[test]
    fn drops_non_printable_values() {
        assert_eq!(decode_numeric_name("7 72 105 300 0"), "Hi");
    }

    #[test]
    fn friendly_name_priority() {
        let none = BTreeMap::new();
        assert_eq!(friendly_name("My Device", "00:11:22:33:44:55", &none), "My Device");
        assert_eq!(friendly_name("Unknown", "00:11:22:33:44:55", &none), "BT Device 33:44:55");
        assert_eq!(friendly_name("72 105 0", "00:11:22:33:44:55", &none), "Hi");
        assert_eq!(friendly_name("", "04:15:52:00:00:01", &none), "iPhone");

        let apple = BTreeMap::from([(0x004C_u16, vec![1, 2, 3])]);
        assert_eq!(
            friendly_name("Unknown", "00:11:22:33:44:55", &apple),
            "Apple, Inc. Device (33:44:55)"
        );
    }

    #[test]
    fn names_match_is_case_insensitive_and_fuzzy() {
        assert!(names_match("iphone", "iPhone", 0.7));
        assert!(names_match("DaVinci Keyboard", "DaVinci Keyboard BLE", 0.7));
        assert!(names_match("Galaxy Buds", "Buds2 Pro", 0.7));
        assert!(!names_match("Kettle", "Mouse", 0.7));
        assert!(!names_match("", "", 0.7));
    }
}
