//! Configuration file discovery and loading

use super::rdom_config::RdomConfig;
use crate::error::DomError;
use crate::result::Result;
use std::path::{Path, PathBuf};

/// File names searched in each directory, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".rdomrc.toml",
    ".rdomrc.json",
    "rdom.yaml",
    "rdom.yml",
    "rdom.json",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Checks [`CONFIG_FILE_NAMES`] in each directory, starting from the
    /// given one and moving up until a config is found or the filesystem
    /// root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| DomError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<RdomConfig> {
        RdomConfig::load(path).map_err(|e| {
            DomError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. Without one, discovery starts at
    /// `start_dir` (or the current directory); finding nothing yields the
    /// default configuration.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<RdomConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(DomError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(RdomConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndentStyle;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".rdomrc.toml",
            r#"
                [emit]
                indentStyle = "tabs"

                [model]
                strict = true
            "#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.emit_config().indent_style, Some(IndentStyle::Tabs));
        assert!(config.model_config().is_strict());
    }

    #[test]
    fn test_load_from_file_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "rdom.yaml",
            "emit:\n  indentSize: 2\n  emitComments: false\n",
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        let emit = config.emit_config();
        assert_eq!(emit.indent_unit(), "  ");
        assert!(!emit.emit_comments());
    }

    #[test]
    fn test_auto_discover() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/nested");
        fs::create_dir_all(&nested).unwrap();

        create_temp_config(temp_dir.path(), "rdom.json", r#"{"model": {"strict": true}}"#);

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(
            found.and_then(|p| p.file_name().map(|n| n.to_os_string())),
            Some("rdom.json".into())
        );
    }

    #[test]
    fn test_dotfile_wins_over_unified_name() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "rdom.json", "{}");
        create_temp_config(temp_dir.path(), ".rdomrc.toml", "");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap().unwrap();
        assert!(found.ends_with(".rdomrc.toml"));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Some(Path::new("nonexistent.toml")), None);
        assert!(matches!(result, Err(DomError::ConfigError { .. })));
    }

    #[test]
    fn test_invalid_content_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "rdom.json", "{ not json");

        let err = ConfigLoader::load_from_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "rdom.ini", "strict=1");
        assert!(ConfigLoader::load_from_file(&config_path).is_err());
    }
}
