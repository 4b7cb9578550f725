//! Persistent identifiers and their lifecycle states

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::MintConfig;

/// A persistent identifier (DOI-style), e.g. `10.5072/lib-1897-0042`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pid(String);

impl Pid {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Compose a new identifier from the mint configuration and the
    /// document's catalogue id:
    /// `base "/" [prefix separator] [name separator] catalogue_id`.
    /// Blank prefix/name segments contribute nothing.
    pub fn mint(config: &MintConfig, catalogue_id: &str) -> Self {
        let mut suffix = String::new();
        if !config.prefix.trim().is_empty() {
            suffix.push_str(&config.prefix);
            suffix.push_str(&config.separator);
        }
        if !config.name.trim().is_empty() {
            suffix.push_str(&config.name);
            suffix.push_str(&config.separator);
        }
        Self(format!("{}/{}{}", config.base, suffix, catalogue_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry-side state of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PidState {
    /// Registered with the registry but not publicly resolvable
    Drafted,
    /// Publicly resolvable through the registry's resolution service
    Findable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn mint_config(prefix: &str, name: &str, separator: &str) -> MintConfig {
        MintConfig {
            base: "10.5072".to_string(),
            prefix: prefix.to_string(),
            name: name.to_string(),
            separator: separator.to_string(),
            draft: false,
            viewer: "https://viewer.example.org/resolve/".to_string(),
        }
    }

    #[rstest]
    #[case("lib", "maps", "-", "10.5072/lib-maps-0042")]
    #[case("lib", "", "-", "10.5072/lib-0042")]
    #[case("", "maps", "-", "10.5072/maps-0042")]
    #[case("", "", "-", "10.5072/0042")]
    #[case("lib", "maps", ".", "10.5072/lib.maps.0042")]
    // Blank segments contribute nothing
    #[case("  ", "maps", "-", "10.5072/maps-0042")]
    fn mint_composes_configured_segments(
        #[case] prefix: &str,
        #[case] name: &str,
        #[case] separator: &str,
        #[case] expected: &str,
    ) {
        let pid = Pid::mint(&mint_config(prefix, name, separator), "0042");
        assert_eq!(pid.as_str(), expected);
    }

    #[test]
    fn mint_bare_catalogue_id() {
        let pid = Pid::mint(&mint_config("", "", "-"), "20250101");
        assert_eq!(pid.as_str(), "10.5072/20250101");
    }

    #[test]
    fn display_matches_inner_value() {
        let pid = Pid::new("10.5072/lib-0042");
        assert_eq!(pid.to_string(), "10.5072/lib-0042");
    }
}
