//! Configuration management for the medkg CLI.

use anyhow::{Context, Result};
use medkg::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "medkg.toml";

/// medkg project configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub reference: ReferenceConfig,
    /// Directory relative paths resolve against: the config file's
    /// directory, or the working directory when there is none.
    #[serde(skip)]
    pub root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Reference graph used by `audit`, the graph queries and `update-graph`.
    #[serde(default = "default_ground_truth")]
    pub ground_truth: PathBuf,
    /// Known-vocabulary text file.
    #[serde(default = "default_vocabulary")]
    pub vocabulary: PathBuf,
}

fn default_ground_truth() -> PathBuf { PathBuf::from("knowledge_graph.json") }
fn default_vocabulary() -> PathBuf { PathBuf::from("info.txt") }

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            ground_truth: default_ground_truth(),
            vocabulary: default_vocabulary(),
        }
    }
}

impl Config {
    /// Load config from medkg.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read the working directory")?;
        Self::load_from(&cwd)
    }

    /// Load config found at or above `dir`, validating every threshold.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut config = match find_config_file(dir) {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                let mut config: Config = toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config: {}", path.display()))?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                tracing::debug!(path = %path.display(), "loaded config");
                config
            }
            None => Config {
                root: dir.to_path_buf(),
                ..Default::default()
            },
        };
        config.audit.validate().context("Invalid [audit] configuration")?;
        config.reference.validate().context("Invalid [reference] configuration")?;
        if config.root.as_os_str().is_empty() {
            config.root = dir.to_path_buf();
        }
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Generate default config as TOML string.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Config::default()).context("Failed to serialize config")
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// An explicit path as given, otherwise the configured one.
    pub fn ground_truth_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.resolve(&self.paths.ground_truth))
    }

    pub fn vocabulary_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.resolve(&self.paths.vocabulary))
    }
}

/// Find medkg.toml in `dir` or its parents.
fn find_config_file(dir: &Path) -> Option<PathBuf> {
    let mut dir = dir.to_path_buf();
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_back() {
        let text = Config::default_toml().unwrap();
        assert!(text.contains("[audit.validation]"));
        assert!(text.contains("[[reference.age_groups]]"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn found_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("cases").join("today");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[paths]\nground_truth = \"graphs/kg.json\"\n\n[audit.validation]\nimportant_factor_weight = 0.6\n",
        )
        .unwrap();

        let config = Config::load_from(&nested).unwrap();
        assert_eq!(config.audit.validation.important_factor_weight, 0.6);
        assert_eq!(config.audit.scoring.coverage_weight, 0.5);
        assert_eq!(config.ground_truth_path(None), dir.path().join("graphs").join("kg.json"));
        assert_eq!(config.vocabulary_path(None), dir.path().join("info.txt"));
        assert_eq!(
            config.ground_truth_path(Some(Path::new("other.json"))),
            PathBuf::from("other.json")
        );
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.audit, AuditConfig::default());
        assert_eq!(config.root, dir.path());
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[reference]\nsymptom_threshold = 2.0\n").unwrap();
        let err = Config::load_from(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("reference.symptom_threshold"));
    }
}
