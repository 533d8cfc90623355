use crate::constants::{BUILTIN_OUI, COMPANY_IDENTIFIERS, MAC_PREFIXES};
use crate::ident;
use crate::model::DeviceInfo;
use ::oui::OuiDatabase;
use eui48::MacAddress;
use once_cell::sync::{Lazy, OnceCell};
use std::collections::HashMap;
use std::sync::Arc;

/// Static lookup tables, built once on first use and shared read-only
pub mod catalog {
    use super::*;

    static MAC_CATALOG: Lazy<MacPrefixCatalog> = Lazy::new(MacPrefixCatalog::builtin);
    static COMPANY_CATALOG: Lazy<CompanyCatalog> = Lazy::new(CompanyCatalog::builtin);

    /// Catalog entry for the longest registered prefix of `address`
    pub fn device_info(address: &str) -> Option<&'static DeviceInfo> {
        MAC_CATALOG.lookup(address)
    }

    /// Company registered for a Bluetooth SIG manufacturer identifier
    pub fn company_name(manufacturer_id: u16) -> Option<&'static str> {
        COMPANY_CATALOG.lookup(manufacturer_id)
    }

    /// MAC address prefix table keyed by the hex digits of the prefix
    pub struct MacPrefixCatalog {
        entries: HashMap<String, DeviceInfo>,
        max_prefix_len: usize,
    }

    impl MacPrefixCatalog {
        pub fn builtin() -> Self {
            Self::from_rows(MAC_PREFIXES)
        }

        pub fn from_rows(rows: &[(&'static str, &'static str, &'static str, &'static str, &'static str)]) -> Self {
            let mut entries = HashMap::with_capacity(rows.len());
            let mut max_prefix_len = 0;
            for &(prefix, company, device_type, model, friendly_name) in rows {
                let key = ident::strip_separators(prefix);
                max_prefix_len = max_prefix_len.max(key.len());
                entries.insert(
                    key,
                    DeviceInfo {
                        company,
                        device_type,
                        model,
                        friendly_name,
                    },
                );
            }
            Self {
                entries,
                max_prefix_len,
            }
        }

        /// Longest-prefix lookup. Works on any address-like string regardless
        /// of separators or case; anything else finds nothing.
        pub fn lookup(&self, address: &str) -> Option<&DeviceInfo> {
            if !ident::is_address_like(address) {
                return None;
            }
            let clean = ident::strip_separators(address);
            let longest = self.max_prefix_len.min(clean.len());
            (1..=longest)
                .rev()
                .find_map(|len| clean.get(..len).and_then(|p| self.entries.get(p)))
        }

        pub fn len(&self) -> usize {
            self.entries.len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }
    }

    pub struct CompanyCatalog {
        names: HashMap<u16, &'static str>,
    }

    impl CompanyCatalog {
        pub fn builtin() -> Self {
            Self {
                names: COMPANY_IDENTIFIERS.iter().copied().collect(),
            }
        }

        pub fn lookup(&self, manufacturer_id: u16) -> Option<&'static str> {
            self.names.get(&manufacturer_id).copied()
        }
    }
}

/// OUI (Organizationally Unique Identifier) database for MAC address vendor lookup
pub mod oui {
    use super::*;
    use tracing::warn;

    /// Global OUI database instance, loaded lazily on first use
    static OUI_DB: OnceCell<Option<Arc<OuiDatabase>>> = OnceCell::new();

    fn database() -> Option<&'static Arc<OuiDatabase>> {
        OUI_DB
            .get_or_init(|| {
                OuiDatabase::new_from_file("manuf.txt")
                    .or_else(|_| OuiDatabase::new_from_str(BUILTIN_OUI))
                    .map(Arc::new)
                    .map_err(|e| warn!("OUI database unavailable: {:?}", e))
                    .ok()
            })
            .as_ref()
    }

    /// Vendor name registered for the OUI of `address`, if it is a MAC address
    pub fn lookup_vendor(address: &str) -> Option<String> {
        let normalized = ident::normalize(address);
        if !ident::is_address_like(&normalized) {
            return None;
        }
        let db = database()?;
        let mac = MacAddress::parse_str(&normalized).ok()?;
        match db.query_by_mac(&mac) {
            Ok(Some(entry)) => entry
                .name_long
                .clone()
                .filter(|name| !name.is_empty())
                .or_else(|| Some(entry.name_short.clone()))
                .filter(|name| !name.is_empty()),
            _ => None,
        }
    }
}
