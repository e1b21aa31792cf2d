use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Per-session settings. Every field has a default, so `{}` is a valid
/// configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Shown in the prompt as `user@host`.
    pub user: String,
    pub host: String,
    /// Joins multi-line handler output such as `ls`. Browser front ends
    /// usually want `<br />`.
    pub line_separator: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user: "guest".to_string(),
            host: "aaronnech.com".to_string(),
            line_separator: "\n".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SessionConfig::from_json("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.line_separator, "\n");
        assert_eq!(config.host, "aaronnech.com");
    }

    #[test]
    fn test_partial_override() {
        let config = SessionConfig::from_json(r#"{"host": "localhost", "line_separator": "<br />"}"#).unwrap();
        assert_eq!(config.user, "guest");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.line_separator, "<br />");
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(SessionConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SessionConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
