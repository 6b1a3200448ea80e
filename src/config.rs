//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/forensic/forensic.toml`
//! 3. Local config: file given with `--config`
//! 4. Environment variables: `FORENSIC_*` prefix (`__` separates nested keys)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DuplicatePolicy;

/// Report rendering options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    /// List each profile's markers next to its name
    pub show_markers: bool,
    /// Render the surviving registry as a tree after analysis
    pub tree_view: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            show_markers: false,
            tree_view: true,
        }
    }
}

/// Raw report config for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawReportConfig {
    pub show_markers: Option<bool>,
    pub tree_view: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub duplicate_policy: Option<DuplicatePolicy>,
    pub case_file: Option<PathBuf>,
    pub report: RawReportConfig,
}

impl ReportConfig {
    fn merge(&self, overlay: &RawReportConfig) -> Self {
        Self {
            show_markers: overlay.show_markers.unwrap_or(self.show_markers),
            tree_view: overlay.tree_view.unwrap_or(self.tree_view),
        }
    }
}

/// Unified configuration for forensic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// How to treat a name registered twice (default: reject)
    pub duplicate_policy: DuplicatePolicy,
    /// Case file used when a command gets no FILE argument
    pub case_file: Option<PathBuf>,
    /// Report rendering options
    pub report: ReportConfig,
}

/// Get the XDG config directory for forensic.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "forensic").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("forensic.toml"))
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

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(case_file) = &self.case_file {
            self.case_file = Some(PathBuf::from(expand_path(&case_file.to_string_lossy())));
        }
    }

    /// Overlay config onto self (base): specified values win.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            duplicate_policy: overlay.duplicate_policy.unwrap_or(self.duplicate_policy),
            case_file: overlay.case_file.clone().or_else(|| self.case_file.clone()),
            report: self.report.merge(&overlay.report),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_config` - Optional config file given on the command line; it must exist
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/forensic/forensic.toml`
    /// 3. Local config file
    /// 4. Environment variables: `FORENSIC_*` prefix
    pub fn load(local_config: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(local_path) = local_config {
            if !local_path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", local_path.display()),
                });
            }
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply FORENSIC_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("FORENSIC")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("duplicate_policy") {
            settings.duplicate_policy = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("case_file") {
            settings.case_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("report.show_markers") {
            settings.report.show_markers = val;
        }
        if let Ok(val) = config.get_bool("report.tree_view") {
            settings.report.tree_view = val;
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
        r#"# forensic configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/forensic/forensic.toml
#   Local:  file passed with --config
#   Env:    FORENSIC_* environment variables (FORENSIC_REPORT__SHOW_MARKERS=true)

# What to do when a case file lists the same "Last, First" twice:
#   reject (default), overwrite, insert-right
# duplicate_policy = "reject"

# Case file used when no FILE argument is given (~ and $VAR are expanded)
# case_file = "~/cases/current.txt"

[report]
# List each profile's markers next to its name
# show_markers = false

# Render the surviving registry as a tree after analysis
# tree_view = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
