//! Per-request addon configuration
//!
//! The addon framework deserializes the user's configuration blob once per
//! request and passes it down unchanged; nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::models::DebridProvider;

/// User configuration carried with every stream request.
///
/// Field names mirror the addon's configuration keys. A DebridLink key is a
/// separate field for historical reasons: its presence routes the request to
/// DebridLink regardless of the selected provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "DebridProvider", default)]
    pub provider: Option<DebridProvider>,
    #[serde(rename = "DebridApiKey", default)]
    pub api_key: Option<String>,
    #[serde(rename = "DebridLinkApiKey", default)]
    pub debrid_link_api_key: Option<String>,
}

impl Config {
    /// Provider this request dispatches to, or `None` when unconfigured
    pub fn route(&self) -> Option<DebridProvider> {
        if self.debrid_link_api_key.is_some() {
            return Some(DebridProvider::DebridLink);
        }
        self.provider
    }

    /// Credential for the routed provider; the link-specific key wins over
    /// the generic one
    pub fn credential(&self) -> Option<&str> {
        self.debrid_link_api_key
            .as_deref()
            .or(self.api_key.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_routes_nowhere() {
        let config = Config::default();
        assert!(config.route().is_none());
        assert!(config.credential().is_none());
    }

    #[test]
    fn test_link_key_overrides_selected_provider() {
        let config = Config {
            provider: Some(DebridProvider::RealDebrid),
            api_key: Some("rd-key".to_string()),
            debrid_link_api_key: Some("dl-key".to_string()),
        };
        assert_eq!(config.route(), Some(DebridProvider::DebridLink));
        assert_eq!(config.credential(), Some("dl-key"));
    }

    #[test]
    fn test_generic_key_used_for_selected_provider() {
        let config = Config {
            provider: Some(DebridProvider::Premiumize),
            api_key: Some("pm-key".to_string()),
            debrid_link_api_key: None,
        };
        assert_eq!(config.route(), Some(DebridProvider::Premiumize));
        assert_eq!(config.credential(), Some("pm-key"));
    }

    #[test]
    fn test_deserializes_addon_config_keys() {
        let config: Config = serde_json::from_str(
            r#"{"DebridProvider": "TorBox", "DebridApiKey": "tb-key"}"#,
        )
        .unwrap();
        assert_eq!(config.route(), Some(DebridProvider::TorBox));
        assert_eq!(config.credential(), Some("tb-key"));
    }
}
