//! Service keys and the element ids derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Element id of the shared "last updated" indicator.
pub const LAST_UPDATED_ID: &str = "last-updated";

/// Fallback key when a display name has no usable characters.
const FALLBACK_KEY: &str = "service";

/// Errors produced when validating a service key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("service key cannot be empty")]
    Empty,

    #[error("invalid character {ch:?} in service key '{key}'")]
    InvalidChar { key: String, ch: char },
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'
}

/// A stable, pre-validated service identifier.
///
/// Keys only contain `[a-z0-9_-]`, so they can be spliced into element ids
/// without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceKey(String);

impl ServiceKey {
    /// Validate an identifier supplied by the status backend or the config.
    pub fn parse(key: &str) -> Result<Self, KeyError> {
        if key.is_empty() {
            return Err(KeyError::Empty);
        }
        if let Some(ch) = key.chars().find(|c| !is_key_char(*c)) {
            return Err(KeyError::InvalidChar {
                key: key.to_string(),
                ch,
            });
        }
        Ok(Self(key.to_string()))
    }

    /// Derive a key from a human display name.
    ///
    /// Total and deterministic, but different names can collide
    /// (`"A B"` and `"a-b"` both become `a-b`); callers must check uniqueness.
    pub fn derive(display_name: &str) -> Self {
        let mut key = String::with_capacity(display_name.len());
        let mut pending_dash = false;
        for c in display_name.trim().chars().flat_map(char::to_lowercase) {
            if c.is_whitespace() {
                pending_dash = true;
                continue;
            }
            if !is_key_char(c) {
                continue;
            }
            if pending_dash {
                key.push('-');
                pending_dash = false;
            }
            key.push(c);
        }
        if key.is_empty() {
            key.push_str(FALLBACK_KEY);
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the card container.
    pub fn card_id(&self) -> String {
        format!("card-{}", self.0)
    }

    /// Id of the outbound link.
    pub fn link_id(&self) -> String {
        format!("link-{}", self.0)
    }

    /// Id of the status text element.
    pub fn status_text_id(&self) -> String {
        format!("status-text-{}", self.0)
    }

    /// Id of the chart canvas.
    pub fn chart_id(&self) -> String {
        format!("chart-{}", self.0)
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ServiceKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ServiceKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ServiceKey> for String {
    fn from(key: ServiceKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_keys() {
        for key in ["beszel", "open-webui", "n8n", "adguard_home"] {
            assert_eq!(ServiceKey::parse(key).unwrap().as_str(), key);
        }
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(ServiceKey::parse(""), Err(KeyError::Empty));
    }

    #[test]
    fn test_parse_rejects_unsafe_characters() {
        let err = ServiceKey::parse("Beszel (Status)").unwrap_err();
        assert!(matches!(err, KeyError::InvalidChar { ch: 'B', .. }));
        assert!(ServiceKey::parse("a b").is_err());
        assert!(ServiceKey::parse("a\"b").is_err());
    }

    #[test]
    fn test_derive_from_display_name() {
        assert_eq!(ServiceKey::derive("Beszel (Status)").as_str(), "beszel-status");
        assert_eq!(ServiceKey::derive("AdGuard Home").as_str(), "adguard-home");
        assert_eq!(ServiceKey::derive("OpenWebUI").as_str(), "openwebui");
        assert_eq!(ServiceKey::derive("  n8n  ").as_str(), "n8n");
        assert_eq!(ServiceKey::derive("a \t b").as_str(), "a-b");
    }

    #[test]
    fn test_derive_empty_name_falls_back() {
        assert_eq!(ServiceKey::derive("").as_str(), "service");
        assert_eq!(ServiceKey::derive("()").as_str(), "service");
    }

    #[test]
    fn test_derive_collisions_are_possible() {
        assert_eq!(ServiceKey::derive("A B"), ServiceKey::derive("a-b"));
    }

    #[test]
    fn test_element_ids() {
        let key = ServiceKey::parse("litellm").unwrap();
        assert_eq!(key.card_id(), "card-litellm");
        assert_eq!(key.link_id(), "link-litellm");
        assert_eq!(key.status_text_id(), "status-text-litellm");
        assert_eq!(key.chart_id(), "chart-litellm");
    }

    #[test]
    fn test_serde_validates() {
        let key: ServiceKey = serde_json::from_str("\"nextcloud\"").unwrap();
        assert_eq!(key.as_str(), "nextcloud");
        assert!(serde_json::from_str::<ServiceKey>("\"Next Cloud\"").is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_derived_keys_always_parse(name in ".*") {
                let key = ServiceKey::derive(&name);
                prop_assert_eq!(ServiceKey::parse(key.as_str()), Ok(key.clone()));
            }
        }
    }
}
