/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Renderer configuration.
//!
//! ```yaml
//! engine: v4
//! site_settings:
//!   cdn_url: https://cdn.example.com
//!   theme_version_id: 3f2a
//! theme_settings:
//!   color: red
//! translations:
//!   locale: en-US
//!   messages:
//!     cart.title: Your Cart
//! ```
//!
//! Every field is optional. JSON is accepted too, since it parses as YAML.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::engine::EngineVersion;
use crate::translator::DictionaryTranslator;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub engine: EngineVersion,
    pub site_settings: Map<String, Value>,
    pub theme_settings: Map<String, Value>,
    pub translations: Option<TranslationsConfig>,
}

/// A flat message catalog for one locale.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationsConfig {
    pub locale: String,
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

impl TranslationsConfig {
    pub fn to_translator(&self) -> DictionaryTranslator {
        DictionaryTranslator::with_messages(
            self.locale.clone(),
            self.messages.iter().map(|(k, v)| (k.clone(), v.clone())),
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse renderer configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl RendererConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as null.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::Translator;
    use serde_json::json;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RendererConfig::from_yaml_str("").unwrap();
        assert_eq!(config.engine, EngineVersion::V3);
        assert!(config.site_settings.is_empty());
        assert!(config.translations.is_none());
    }

    #[test]
    fn test_full_yaml_config() {
        let config = RendererConfig::from_yaml_str(
            r#"
engine: v4
site_settings:
  cdn_url: https://cdn.example.com
  theme_version_id: 3f2a
theme_settings:
  color: red
translations:
  locale: en-US
  messages:
    cart.title: Your Cart
"#,
        )
        .unwrap();
        assert_eq!(config.engine, EngineVersion::V4);
        assert_eq!(
            config.site_settings.get("cdn_url"),
            Some(&json!("https://cdn.example.com"))
        );
        assert_eq!(config.theme_settings.get("color"), Some(&json!("red")));

        let translator = config.translations.unwrap().to_translator();
        assert_eq!(translator.locale_name(), "en-US");
        assert_eq!(
            translator.translate("cart.title", &Map::new()),
            Some("Your Cart".to_string())
        );
    }

    #[test]
    fn test_json_config() {
        let config =
            RendererConfig::from_yaml_str(r#"{"engine": "v4", "site_settings": {"a": 1}}"#).unwrap();
        assert_eq!(config.engine, EngineVersion::V4);
        assert_eq!(config.site_settings.get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_unknown_engine_falls_back_to_v3() {
        let config = RendererConfig::from_yaml_str("engine: v9").unwrap();
        assert_eq!(config.engine, EngineVersion::V3);
    }

    #[test]
    fn test_malformed_config() {
        let err = RendererConfig::from_yaml_str("site_settings: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = RendererConfig::from_path("/nonexistent/vellum.yml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
