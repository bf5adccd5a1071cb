use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{PipelineError, Result};

pub const CONFIG_ENV: &str = "BOS_CONFIG";
pub const STAGING_DIR_ENV: &str = "BOS_STAGING_DIR";
pub const CLEAN_DIR_ENV: &str = "BOS_CLEAN_DIR";
pub const REFERENCE_FILE_ENV: &str = "BOS_REFERENCE_FILE";
pub const ACTION_LOG_ENV: &str = "BOS_ACTION_LOG";

const DEFAULT_CONFIG_FILE: &str = "bos.toml";

/// Locations of everything the cleaning pipeline reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub staging_dir: PathBuf,
    pub clean_dir: PathBuf,
    pub reference_file: PathBuf,
    pub action_log_file: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from("data/staging"),
            clean_dir: PathBuf::from("data/clean"),
            reference_file: PathBuf::from("data/reference/rooms.csv"),
            action_log_file: PathBuf::from("data/log/action_log.json"),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a TOML file; relative paths inside it are taken from the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            PipelineError::Config(format!("failed to read '{}': {err}", path.display()))
        })?;
        let config = Self::from_toml_str(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    /// Resolve the config file (explicit path, then `BOS_CONFIG`, then `./bos.toml`
    /// when present, else defaults) and apply `BOS_*` environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = env::var_os(CONFIG_ENV).map(PathBuf::from);
        let path = explicit.map(Path::to_path_buf).or(from_env).or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        });

        let config = match path {
            Some(path) => {
                debug!(path = %path.display(), "loading pipeline configuration");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| env::var(key).ok()))
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields = [
            (STAGING_DIR_ENV, &mut self.staging_dir),
            (CLEAN_DIR_ENV, &mut self.clean_dir),
            (REFERENCE_FILE_ENV, &mut self.reference_file),
            (ACTION_LOG_ENV, &mut self.action_log_file),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = PathBuf::from(value);
            }
        }
        self
    }

    fn relative_to(self, base: &Path) -> Self {
        let resolve = |path: PathBuf| {
            if path.is_absolute() {
                path
            } else {
                base.join(path)
            }
        };
        Self {
            staging_dir: resolve(self.staging_dir),
            clean_dir: resolve(self.clean_dir),
            reference_file: resolve(self.reference_file),
            action_log_file: resolve(self.action_log_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = PipelineConfig::from_toml_str(r#"clean_dir = "/srv/bos/clean""#)
            .expect("config");
        assert_eq!(config.clean_dir, PathBuf::from("/srv/bos/clean"));
        assert_eq!(config.staging_dir, PipelineConfig::default().staging_dir);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = PipelineConfig::from_toml_str(r#"stagin_dir = "x""#).expect_err("typo");
        assert!(matches!(err, PipelineError::Toml(_)));
    }

    #[test]
    fn file_paths_resolve_against_config_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bos.toml");
        std::fs::write(
            &path,
            "staging_dir = \"raw\"\naction_log_file = \"/var/log/bos.json\"\n",
        )
        .expect("write config");

        let config = PipelineConfig::from_file(&path).expect("config");
        assert_eq!(config.staging_dir, dir.path().join("raw"));
        assert_eq!(config.clean_dir, dir.path().join("data/clean"));
        assert_eq!(config.action_log_file, PathBuf::from("/var/log/bos.json"));
    }

    #[test]
    fn environment_overrides_win() {
        let vars: HashMap<&str, &str> = [
            (STAGING_DIR_ENV, "/in"),
            (ACTION_LOG_ENV, "  "),
        ]
        .into_iter()
        .collect();
        let config = PipelineConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.staging_dir, PathBuf::from("/in"));
        assert_eq!(
            config.action_log_file,
            PipelineConfig::default().action_log_file
        );
    }
}
