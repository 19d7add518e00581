use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::category::CategoryMap;
use crate::constants::{DEFAULT_CONFIG_FILE, DEFAULT_INDENT, DEFAULT_TARGET};
use crate::engine::EngineKind;
use crate::error::{CategorizerError, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub target: Option<PathBuf>,
    pub engine: Option<EngineKind>,
    pub indent: Option<String>,
    #[serde(default)]
    pub backup: bool,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub renames: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Directory for JSON log files; console logging only when unset
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Loads `path` when given, otherwise `categorizer.toml` from the working
    /// directory if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CategorizerError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if let Some(indent) = &config.indent {
            if !indent.chars().all(|c| c == ' ' || c == '\t') {
                return Err(CategorizerError::Config(
                    "indent may only contain spaces and tabs".to_string(),
                ));
            }
        }
        // Surface bad renames at load time rather than mid-run
        config.category_map()?;
        Ok(config)
    }

    pub fn target(&self) -> PathBuf {
        self.target
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET))
    }

    pub fn engine(&self) -> EngineKind {
        self.engine.unwrap_or_default()
    }

    pub fn indent(&self) -> &str {
        self.indent.as_deref().unwrap_or(DEFAULT_INDENT)
    }

    pub fn category_map(&self) -> Result<CategoryMap> {
        CategoryMap::with_renames(&self.renames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.target(), PathBuf::from(DEFAULT_TARGET));
        assert_eq!(config.engine(), EngineKind::Structured);
        assert_eq!(config.indent(), DEFAULT_INDENT);
        assert!(!config.backup);
        assert!(config.log.dir.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
target = "taxonomy.ts"
engine = "legacy"
indent = "    "
backup = true

[log]
dir = "logs"

[renames]
creative = "creative_media"
"#,
        )
        .unwrap();
        assert_eq!(config.target(), PathBuf::from("taxonomy.ts"));
        assert_eq!(config.engine(), EngineKind::Legacy);
        assert_eq!(config.indent(), "    ");
        assert!(config.backup);
        assert_eq!(config.log.dir, Some(PathBuf::from("logs")));
        assert_eq!(
            config.category_map().unwrap().target(Category::Creative),
            "creative_media"
        );
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_values() {
        assert!(Config::from_toml("tagret = \"x\"").is_err());
        assert!(Config::from_toml("indent = \"--\"").is_err());
        assert!(Config::from_toml("[renames]\nspace = \"space\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, CategorizerError::Config(_)));
    }
}
