use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Config file looked up in the working directory when no path is given
pub const CONFIG_FILE: &str = "tasktray.toml";

/// Error type for reading the config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// A loaded config together with the directory relative paths resolve against
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub base_dir: PathBuf,
}

impl LoadedConfig {
    /// Location of the task file, honoring an explicit override
    pub fn store_path(&self, override_path: Option<&Path>) -> PathBuf {
        if let Some(p) = override_path {
            return p.to_path_buf();
        }
        let configured = Path::new(&self.config.store.path);
        if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            self.base_dir.join(configured)
        }
    }
}

/// Read the config.
///
/// With an explicit `path` the file must exist. Otherwise `tasktray.toml`
/// in `cwd` is used if present, and defaults apply when it is not.
pub fn load_config(path: Option<&Path>, cwd: &Path) -> Result<LoadedConfig, ConfigError> {
    let (config_path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (cwd.join(CONFIG_FILE), false),
    };

    let text = match fs::read_to_string(&config_path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(LoadedConfig {
                config: Config::default(),
                base_dir: cwd.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: config_path,
                source: e,
            });
        }
    };

    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;
    tracing::debug!("loaded config from {}", config_path.display());

    let base_dir = match config_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => cwd.to_path_buf(),
    };
    Ok(LoadedConfig { config, base_dir })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::UndatedPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_missing_default_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let loaded = load_config(None, tmp.path()).unwrap();
        assert_eq!(loaded.config, Config::default());
        assert_eq!(loaded.store_path(None), tmp.path().join("tasks.json"));
        assert!(loaded.config.ui.show_key_hints);
    }

    #[test]
    fn test_missing_explicit_config_errors() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(Some(&tmp.path().join("other.toml")), tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_reads_sections() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r##"[store]
path = "data/todo.json"

[report]
undated = "exclude"

[ui]
show_key_hints = false

[ui.colors]
highlight = "#FF0000"
"##,
        )
        .unwrap();
        let loaded = load_config(None, tmp.path()).unwrap();
        assert_eq!(loaded.config.report.undated, UndatedPolicy::Exclude);
        assert!(!loaded.config.ui.show_key_hints);
        assert_eq!(loaded.config.ui.colors["highlight"], "#FF0000");
        assert_eq!(loaded.store_path(None), tmp.path().join("data/todo.json"));
    }

    #[test]
    fn test_relative_store_path_resolves_against_config_dir() {
        let tmp = TempDir::new().unwrap();
        let conf_dir = tmp.path().join("conf");
        fs::create_dir_all(&conf_dir).unwrap();
        let conf = conf_dir.join("mine.toml");
        fs::write(&conf, "[store]\npath = \"t.json\"\n").unwrap();
        let loaded = load_config(Some(&conf), tmp.path()).unwrap();
        assert_eq!(loaded.store_path(None), conf_dir.join("t.json"));
    }

    #[test]
    fn test_override_wins() {
        let tmp = TempDir::new().unwrap();
        let loaded = load_config(None, tmp.path()).unwrap();
        let p = PathBuf::from("/elsewhere/x.json");
        assert_eq!(loaded.store_path(Some(&p)), p);
    }

    #[test]
    fn test_bad_toml_errors() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[report]\nundated = \"sometimes\"\n").unwrap();
        let err = load_config(None, tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
