// Configuration for the engine, loaded from YAML.

use crate::error::ConfigError;
use crate::policy::RequiredCounts;

use serde::Deserialize;
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_BASE_NAME: &str = "livery";
const DEFAULT_CONFIG_EXTENSION: &str = "yaml";

fn default_cache_dir_name() -> String {
  "livery".to_string()
}

fn default_cache_file_name() -> String {
  "outfitcache.json".to_string()
}

fn default_true() -> bool {
  true
}

/// Top-level engine configuration. Every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
  /// Directory under the local data dir that holds the cache files.
  #[serde(default = "default_cache_dir_name")]
  pub cache_dir_name: String,
  #[serde(default = "default_cache_file_name")]
  pub cache_file_name: String,
  /// Keep a `{namespace}_backup` baseline of the first outfits ever seen.
  #[serde(default = "default_true")]
  pub keep_backup: bool,
  #[serde(default)]
  pub required_counts: RequiredCounts,
  #[serde(default)]
  pub messages: MessageTemplates,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      cache_dir_name: default_cache_dir_name(),
      cache_file_name: default_cache_file_name(),
      keep_backup: true,
      required_counts: RequiredCounts::default(),
      messages: MessageTemplates::default(),
    }
  }
}

/// User-facing texts. `{name}` and `{count}` are substituted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessageTemplates {
  pub header: String,
  pub camouflages_added: String,
  pub paints_added: String,
  pub modifications_added: String,
  pub server_error: String,
}

impl Default for MessageTemplates {
  fn default() -> Self {
    Self {
      header: "<b>{name}:</b>".to_string(),
      camouflages_added: "Camouflages applied: {count}".to_string(),
      paints_added: "Paints applied: {count}".to_string(),
      modifications_added: "Effects applied: {count}".to_string(),
      server_error: "The saved outfit could not be applied.".to_string(),
    }
  }
}

impl EngineConfig {
  /// Reads and validates a YAML configuration file.
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let file = File::open(path)?;
    let config: EngineConfig = serde_yaml::from_reader(BufReader::new(file))
      .map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    tracing::debug!(path = ?path, "engine configuration loaded");
    Ok(config)
  }

  /// Parses and validates YAML text.
  pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
    let config: EngineConfig =
      serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub(crate) fn validate(&self) -> Result<(), ConfigError> {
    if self.cache_file_name.trim().is_empty() {
      return Err(ConfigError::InvalidValue {
        field: "cache_file_name".to_string(),
        message: "must not be empty".to_string(),
      });
    }
    if self.cache_dir_name.trim().is_empty() {
      return Err(ConfigError::InvalidValue {
        field: "cache_dir_name".to_string(),
        message: "must not be empty".to_string(),
      });
    }
    Ok(())
  }
}

/// Finds the configuration file based on an optional environment suffix.
///
/// Looks for `livery.{env}.yaml` then `livery.yaml` in `dir`, where `env`
/// comes from the argument or the `LIVERY_ENV` variable.
pub fn find_config_file(dir: &Path, environment_suffix: Option<&str>) -> Result<PathBuf, ConfigError> {
  let env_name = environment_suffix
    .map(|s| s.to_string())
    .or_else(|| env::var("LIVERY_ENV").ok());

  let mut files_to_check: Vec<String> = Vec::new();
  if let Some(env_str) = &env_name {
    if !env_str.is_empty() {
      files_to_check.push(format!(
        "{}.{}.{}",
        DEFAULT_CONFIG_BASE_NAME, env_str, DEFAULT_CONFIG_EXTENSION
      ));
    }
  }
  files_to_check.push(format!("{}.{}", DEFAULT_CONFIG_BASE_NAME, DEFAULT_CONFIG_EXTENSION));

  for file_name in &files_to_check {
    let path = dir.join(file_name);
    if path.is_file() {
      return Ok(path);
    }
  }

  Err(ConfigError::NotFound(format!(
    "searched for {:?} in {:?}",
    files_to_check, dir
  )))
}
