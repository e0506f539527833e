//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeforge/treeforge.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `TREEFORGE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::PlaceholderPolicy;

/// Name prefixes for the nodes created by the placeholder growth policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NamingConfig {
    /// Prefix of the decision node opened by a split
    pub split_decision_prefix: String,
    /// Prefix of the leaf opened by a split
    pub split_leaf_prefix: String,
    /// Prefix of the leaf appended by a stop
    pub stop_leaf_prefix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        let policy = PlaceholderPolicy::default();
        Self {
            split_decision_prefix: policy.split_decision_prefix,
            split_leaf_prefix: policy.split_leaf_prefix,
            stop_leaf_prefix: policy.stop_leaf_prefix,
        }
    }
}

impl NamingConfig {
    /// Overlay wins per field if specified.
    pub fn merge(&self, overlay: &RawNamingConfig) -> Self {
        Self {
            split_decision_prefix: overlay
                .split_decision_prefix
                .clone()
                .unwrap_or_else(|| self.split_decision_prefix.clone()),
            split_leaf_prefix: overlay
                .split_leaf_prefix
                .clone()
                .unwrap_or_else(|| self.split_leaf_prefix.clone()),
            stop_leaf_prefix: overlay
                .stop_leaf_prefix
                .clone()
                .unwrap_or_else(|| self.stop_leaf_prefix.clone()),
        }
    }

    pub fn to_policy(&self) -> PlaceholderPolicy {
        PlaceholderPolicy {
            split_decision_prefix: self.split_decision_prefix.clone(),
            split_leaf_prefix: self.split_leaf_prefix.clone(),
            stop_leaf_prefix: self.stop_leaf_prefix.clone(),
        }
    }
}

/// Raw naming config for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawNamingConfig {
    pub split_decision_prefix: Option<String>,
    pub split_leaf_prefix: Option<String>,
    pub stop_leaf_prefix: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub builder_name: Option<String>,
    pub root_name: Option<String>,
    pub strict_targets: Option<bool>,
    pub naming: RawNamingConfig,
}

/// Unified configuration for treeforge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Builder name used when a build script does not name one
    pub builder_name: String,
    /// Root node name used when a build script has no `[tree]`
    pub root_name: String,
    /// Reject builder targets that are not reachable from the root
    pub strict_targets: bool,
    /// Node naming for split/stop
    pub naming: NamingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            builder_name: "builder".into(),
            root_name: "root".into(),
            strict_targets: false,
            naming: NamingConfig::default(),
        }
    }
}

/// Get the XDG config directory for treeforge.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeforge").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeforge.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            builder_name: overlay
                .builder_name
                .clone()
                .unwrap_or_else(|| self.builder_name.clone()),
            root_name: overlay
                .root_name
                .clone()
                .unwrap_or_else(|| self.root_name.clone()),
            strict_targets: overlay.strict_targets.unwrap_or(self.strict_targets),
            naming: self.naming.merge(&overlay.naming),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_config` - Optional config file given on the command line; it
    ///   must exist when specified.
    pub fn load(local_config: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(local) = local_config {
            let raw = load_raw_settings(local)?;
            current = current.merge_with(&raw);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply TREEFORGE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREEFORGE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("builder_name") {
            settings.builder_name = val;
        }
        if let Ok(val) = config.get_string("root_name") {
            settings.root_name = val;
        }
        if let Ok(val) = config.get_bool("strict_targets") {
            settings.strict_targets = val;
        }
        if let Ok(val) = config.get_string("naming.split_decision_prefix") {
            settings.naming.split_decision_prefix = val;
        }
        if let Ok(val) = config.get_string("naming.split_leaf_prefix") {
            settings.naming.split_leaf_prefix = val;
        }
        if let Ok(val) = config.get_string("naming.stop_leaf_prefix") {
            settings.naming.stop_leaf_prefix = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treeforge configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treeforge/treeforge.toml
#   Local:  file passed with --config
#   Env:    TREEFORGE_* environment variables, nested keys with "__"
#           (e.g. TREEFORGE_NAMING__STOP_LEAF_PREFIX=end_)

# Builder name when a build script does not set one
# builder_name = "builder"

# Root node name when a build script has no [tree] section
# root_name = "root"

# Reject targets that are not reachable from the builder root
# strict_targets = false

[naming]
# split_decision_prefix = "split_left_of_"
# split_leaf_prefix = "split_right_of_"
# stop_leaf_prefix = "stopped_leaf_of_"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
