//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cardcat/cardcat.toml`
//! 3. Local config: `<project_dir>/cardcat.toml`
//! 4. Environment variables: `CARDCAT_*` prefix, `__` between sections
//!    (e.g. `CARDCAT_FETCH__TIMEOUT_SECS=10`)
//!
//! Relative paths are resolved against the project directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Name of the config file, both global and project-local.
pub const CONFIG_FILE: &str = "cardcat.toml";

/// Image download configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    /// Top-level image directory inside the web directory
    pub image_dir: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Do not retry cards that failed on a previous run
    pub skip_errored: bool,
    /// Convert bare-URL entries to card mappings before fetching
    pub normalize_shorthand: bool,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            image_dir: "img".into(),
            timeout_secs: 5,
            skip_errored: false,
            normalize_shorthand: true,
            user_agent: format!("cardcat/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Overlay wins where it specifies a value.
    pub fn merge(&self, overlay: &RawFetchConfig) -> Self {
        Self {
            image_dir: overlay
                .image_dir
                .clone()
                .unwrap_or_else(|| self.image_dir.clone()),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
            skip_errored: overlay.skip_errored.unwrap_or(self.skip_errored),
            normalize_shorthand: overlay
                .normalize_shorthand
                .unwrap_or(self.normalize_shorthand),
            user_agent: overlay
                .user_agent
                .clone()
                .unwrap_or_else(|| self.user_agent.clone()),
        }
    }
}

/// Raw fetch config for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawFetchConfig {
    pub image_dir: Option<String>,
    pub timeout_secs: Option<u64>,
    pub skip_errored: Option<bool>,
    pub normalize_shorthand: Option<bool>,
    pub user_agent: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub document: Option<PathBuf>,
    pub template_dir: Option<PathBuf>,
    pub web_dir: Option<PathBuf>,
    #[serde(default)]
    pub fetch: RawFetchConfig,
}

/// Unified configuration for cardcat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Catalog document (default: cards.yaml)
    pub document: PathBuf,
    /// Directory holding `index.header.html`, `index.footer.html`, `card.html`
    pub template_dir: PathBuf,
    /// Output directory for `index.html` and downloaded images
    pub web_dir: PathBuf,
    /// Image download settings
    pub fetch: FetchConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            document: PathBuf::from("cards.yaml"),
            template_dir: PathBuf::from("templates"),
            web_dir: PathBuf::from("web"),
            fetch: FetchConfig::default(),
        }
    }
}

/// Get the XDG config directory for cardcat.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cardcat").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Get the path to the local config file of a project.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(CONFIG_FILE)
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
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        for path in [&mut self.document, &mut self.template_dir, &mut self.web_dir] {
            *path = PathBuf::from(expand_env_vars(path.to_string_lossy().as_ref()));
        }
    }

    /// Make relative paths relative to `project_dir`.
    fn resolve_paths(&mut self, project_dir: &Path) {
        for path in [&mut self.document, &mut self.template_dir, &mut self.web_dir] {
            if path.is_relative() {
                *path = project_dir.join(&*path);
            }
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            document: overlay
                .document
                .clone()
                .unwrap_or_else(|| self.document.clone()),
            template_dir: overlay
                .template_dir
                .clone()
                .unwrap_or_else(|| self.template_dir.clone()),
            web_dir: overlay
                .web_dir
                .clone()
                .unwrap_or_else(|| self.web_dir.clone()),
            fetch: self.fetch.merge(&overlay.fetch),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Directory holding the local `cardcat.toml`; relative
    ///   paths are resolved against it. `None` skips both.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        if let Some(project) = project_dir {
            current.resolve_paths(project);
        }

        Ok(current)
    }

    /// Apply CARDCAT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CARDCAT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("document") {
            settings.document = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("template_dir") {
            settings.template_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("web_dir") {
            settings.web_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("fetch.image_dir") {
            settings.fetch.image_dir = val;
        }
        if let Ok(val) = config.get_int("fetch.timeout_secs") {
            settings.fetch.timeout_secs = u64::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("fetch.timeout_secs must not be negative: {val}"),
            })?;
        }
        if let Ok(val) = config.get_bool("fetch.skip_errored") {
            settings.fetch.skip_errored = val;
        }
        if let Ok(val) = config.get_bool("fetch.normalize_shorthand") {
            settings.fetch.normalize_shorthand = val;
        }
        if let Ok(val) = config.get_string("fetch.user_agent") {
            settings.fetch.user_agent = val;
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
        r#"# cardcat configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/cardcat/cardcat.toml
#   Local:  <project_dir>/cardcat.toml
#   Env:    CARDCAT_* environment variables (CARDCAT_FETCH__TIMEOUT_SECS=10)
#
# Relative paths are resolved against the project directory.

# Catalog document
# document = "cards.yaml"

# Templates: index.header.html, index.footer.html, card.html
# template_dir = "templates"

# Output directory for index.html and images
# web_dir = "web"

[fetch]
# Image directory inside web_dir
# image_dir = "img"

# Per-request timeout in seconds
# timeout_secs = 5

# Do not retry cards marked has_error
# skip_errored = false

# Convert `Name: https://...` entries to `{image_url: ...}` before fetching
# normalize_shorthand = true

# user_agent = "cardcat"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load(None).expect("load defaults");
        assert_eq!(settings.document, PathBuf::from("cards.yaml"));
        assert_eq!(settings.fetch.image_dir, "img");
        assert_eq!(settings.fetch.timeout(), Duration::from_secs(5));
        assert!(!settings.fetch.skip_errored);
    }

    #[test]
    fn given_tilde_in_paths_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            web_dir: PathBuf::from("~/site"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(
            settings.web_dir.to_string_lossy().starts_with(&home),
            "web_dir should start with home dir: {}",
            settings.web_dir.display()
        );
    }

    #[test]
    fn given_relative_paths_when_resolve_then_joined_to_project() {
        let mut settings = Settings {
            document: PathBuf::from("/abs/cards.yaml"),
            ..Settings::default()
        };

        settings.resolve_paths(Path::new("/project"));

        assert_eq!(settings.document, PathBuf::from("/abs/cards.yaml"));
        assert_eq!(settings.template_dir, PathBuf::from("/project/templates"));
        assert_eq!(settings.web_dir, PathBuf::from("/project/web"));
    }

    #[test]
    fn given_partial_overlay_when_merge_then_keeps_unspecified() {
        let base = FetchConfig::default();
        let overlay = RawFetchConfig {
            timeout_secs: Some(30),
            skip_errored: Some(true),
            ..RawFetchConfig::default()
        };

        let result = base.merge(&overlay);

        assert_eq!(result.timeout_secs, 30);
        assert!(result.skip_errored);
        assert_eq!(result.image_dir, "img");
        assert!(result.normalize_shorthand);
    }

    #[test]
    fn given_settings_when_to_toml_then_contains_fetch_section() {
        let toml = Settings::default().to_toml().unwrap();
        assert!(toml.contains("[fetch]"));
        assert!(toml.contains("timeout_secs = 5"));
    }
}
