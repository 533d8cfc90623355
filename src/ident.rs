//! Canonical forms for device identifiers.
//!
//! Adapters report hardware addresses as `aa:bb:cc:dd:ee:ff`,
//! `AA-BB-CC-DD-EE-FF`, `aabb.ccdd.eeff` or a bare hex string, and some report
//! synthetic vendor identifiers that are not addresses at all. Everything here
//! is total: malformed input is passed through, never rejected.

const SEPARATORS: [char; 3] = [':', '-', '.'];

/// Upper-cased `s` with the `:`, `-` and `.` separators removed
pub fn strip_separators(s: &str) -> String {
    s.chars()
        .filter(|c| !SEPARATORS.contains(c))
        .flat_map(char::to_uppercase)
        .collect()
}

/// True when `s` starts with twelve hex digits once separators are dropped.
pub fn is_address_like(s: &str) -> bool {
    let clean = strip_separators(s);
    clean.len() >= 12 && clean.chars().take(12).all(|c| c.is_ascii_hexdigit())
}

/// Normalize a MAC address to `XX:XX:XX:XX:XX:XX`.
///
/// Input that is not exactly twelve hex digits after cleaning is returned
/// unchanged; empty input yields an empty string.
pub fn normalize(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    if !is_address_like(address) {
        return address.to_string();
    }
    let clean = strip_separators(address);
    if clean.len() != 12 {
        return address.to_string();
    }

    let mut buf = String::with_capacity(17);
    for (i, chunk) in clean.as_bytes().chunks(2).enumerate() {
        if i > 0 {
            buf.push(':');
        }
        buf.push_str(&String::from_utf8_lossy(chunk));
    }
    buf
}

/// Normalized forms are equal, non-empty, and both sides are addresses.
pub fn same_address(a: &str, b: &str) -> bool {
    if !is_address_like(a) || !is_address_like(b) {
        return false;
    }
    let left = normalize(a);
    !left.is_empty() && left == normalize(b)
}

/// Last eight characters of an address, used in generated labels
/// (`33:44:55` for `00:11:22:33:44:55`).
pub fn address_suffix(address: &str) -> &str {
    let start = address
        .char_indices()
        .rev()
        .nth(7)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &address[start..]
}

/// Locally administered addresses (bit 1 of the first octet) are usually
/// randomized privacy addresses rather than a stable hardware identity.
pub fn is_locally_administered(address: &str) -> bool {
    let normalized = normalize(address);
    normalized
        .split(':')
        .next()
        .filter(|_| is_address_like(&normalized))
        .and_then(|octet| u8::from_str_radix(octet, 16).ok())
        .map(|octet| octet & 0x02 != 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_common_formats() {
        assert_eq!(normalize("00:11:22:33:44:55"), "00:11:22:33:44:55");
        assert_eq!(normalize("001122334455"), "00:11:22:33:44:55");
        assert_eq!(normalize("00-11-22-33-44-55"), "00:11:22:33:44:55");
        assert_eq!(normalize("0011.2233.4455"), "00:11:22:33:44:55");
        assert_eq!(normalize("aa:bb:cc:dd:ee:ff"), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn passes_through_non_addresses() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("not-a-mac-address"), "not-a-mac-address");
        assert_eq!(normalize("WIN-PNP-BTHLE-DEV"), "WIN-PNP-BTHLE-DEV");
        // address-like but too long: left alone
        assert_eq!(normalize("00:11:22:33:44:55:66"), "00:11:22:33:44:55:66");
    }

    #[test]
    fn address_like_requires_twelve_leading_hex_digits() {
        assert!(is_address_like("AA:BB:CC:DD:EE:FF"));
        assert!(is_address_like("aabbccddeeff_extra"));
        assert!(!is_address_like("AA:BB:CC"));
        assert!(!is_address_like("GG:BB:CC:DD:EE:FF"));
        assert!(!is_address_like(""));
    }

    #[test]
    fn suffix_takes_last_eight_chars() {
        assert_eq!(address_suffix("00:11:22:33:44:55"), "33:44:55");
        assert_eq!(address_suffix("short"), "short");
    }

    #[test]
    fn detects_locally_administered_addresses() {
        assert!(is_locally_administered("AA:BB:CC:DD:EE:FF"));
        assert!(!is_locally_administered("00:11:22:33:44:55"));
        assert!(!is_locally_administered("garbage"));
    }
}
