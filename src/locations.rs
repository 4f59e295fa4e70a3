//! Static catalogue of Mullvad exit locations
//!
//! Adding or removing a location means editing this table; no other code
//! changes. Match tokens (relay hostname, city) must stay disjoint across
//! entries, since resolution takes the first match in catalogue order.

/// One exit location known to the widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationEntry {
    /// Short widget code, unique across the catalogue.
    pub code: &'static str,
    /// Human-readable country name.
    pub name: &'static str,
    pub city: &'static str,
    /// Relay hostname as reported by `mullvad status`; the primary match
    /// token when resolving raw status text.
    pub server: &'static str,
    /// Positional arguments for `mullvad relay set location`. Empty when
    /// the entry is addressed by server name instead.
    pub relay: &'static [&'static str],
    /// Flag glyph for the button widgets.
    pub flag: &'static str,
}

pub static CATALOGUE: &[LocationEntry] = &[
    LocationEntry {
        code: "AUS",
        name: "Australia",
        city: "Adelaide",
        server: "au-adl-wg-301",
        relay: &["au", "adl", "au-adl-wg-301"],
        flag: "🇦🇺",
    },
    LocationEntry {
        code: "SWE",
        name: "Sweden",
        city: "Stockholm",
        server: "se-sto-wg-001",
        relay: &["se", "sto", "se-sto-wg-001"],
        flag: "🇸🇪",
    },
    LocationEntry {
        code: "SGP",
        name: "Singapore",
        city: "Singapore",
        server: "sg-sin-wg-001",
        relay: &["sg", "sin", "sg-sin-wg-001"],
        flag: "🇸🇬",
    },
    LocationEntry {
        code: "JPN",
        name: "Japan",
        city: "Tokyo",
        server: "jp-tok-wg-001",
        relay: &["jp", "tok", "jp-tok-wg-001"],
        flag: "🇯🇵",
    },
    LocationEntry {
        code: "USA",
        name: "USA",
        city: "San Francisco",
        server: "us-sfo-wg-001",
        relay: &["us", "sfo", "us-sfo-wg-001"],
        flag: "🇺🇸",
    },
    LocationEntry {
        code: "UK",
        name: "UK",
        city: "London",
        server: "gb-lon-wg-001",
        relay: &["gb", "lon", "gb-lon-wg-001"],
        flag: "🇬🇧",
    },
];

impl LocationEntry {
    /// True when raw status text names this location, either by relay
    /// hostname or by city (case-insensitive).
    pub fn matches(&self, raw: &str) -> bool {
        raw.contains(self.server) || raw.to_lowercase().contains(&self.city.to_lowercase())
    }
}

/// Look up a catalogue entry by code, case-insensitively.
pub fn lookup(code: &str) -> Option<&'static LocationEntry> {
    let code = code.to_uppercase();
    CATALOGUE.iter().find(|entry| entry.code == code)
}

/// First catalogue entry whose match tokens appear in the raw status text.
pub fn resolve(raw: &str) -> Option<&'static LocationEntry> {
    CATALOGUE.iter().find(|entry| entry.matches(raw))
}

/// All catalogue codes, in catalogue order.
pub fn codes() -> impl Iterator<Item = &'static str> {
    CATALOGUE.iter().map(|entry| entry.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        for (i, a) in CATALOGUE.iter().enumerate() {
            for b in &CATALOGUE[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("aus").unwrap().code, "AUS");
        assert_eq!(lookup("Swe").unwrap().code, "SWE");
        assert_eq!(lookup("UK").unwrap().code, "UK");
    }

    #[test]
    fn lookup_unknown_code() {
        assert!(lookup("XXX").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn every_server_token_resolves_to_its_own_entry() {
        for entry in CATALOGUE {
            let raw = format!("Relay: {}", entry.server);
            assert_eq!(resolve(&raw).unwrap().code, entry.code);
        }
    }

    #[test]
    fn city_matches_case_insensitively() {
        let resolved = resolve("wireguard exit in ADELAIDE").unwrap();
        assert_eq!(resolved.code, "AUS");
    }

    #[test]
    fn unrelated_text_resolves_to_nothing() {
        assert!(resolve("de-fra-wg-102").is_none());
        assert!(resolve("").is_none());
    }

    #[test]
    fn relay_arguments_end_with_server_name() {
        for entry in CATALOGUE {
            assert_eq!(entry.relay.last(), Some(&entry.server));
        }
    }
}
