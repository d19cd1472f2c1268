//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cloudproxy/cloudproxy.toml`
//! 3. Environment variables: `CLOUDPROXY_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{expand_env_vars, InstallLayout};

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub home_dir: Option<PathBuf>,
    pub install_subdir: Option<PathBuf>,
    pub binary_name: Option<String>,
    pub interpreter: Option<String>,
    pub download_url: Option<String>,
    pub runtime_marker: Option<String>,
    pub catalog_path: Option<PathBuf>,
}

/// Unified configuration for cloudproxy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Home directory override (default: the user's home)
    pub home_dir: Option<PathBuf>,
    /// Install directory of the platform binary, relative to home
    pub install_subdir: PathBuf,
    /// File name of the platform binary
    pub binary_name: String,
    /// Interpreter running the binary (e.g. "php" for a phar)
    pub interpreter: Option<String>,
    /// Where to download the binary from when it is missing
    pub download_url: Option<String>,
    /// Env var whose presence means we run inside the platform's own containers
    pub runtime_marker: String,
    /// Command catalog replacing the built-in one
    pub catalog_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let layout = InstallLayout::default();
        Self {
            home_dir: None,
            install_subdir: layout.subdir,
            binary_name: layout.binary_name,
            interpreter: None,
            download_url: None,
            runtime_marker: "PLATFORM_APPLICATION_NAME".into(),
            catalog_path: None,
        }
    }
}

/// Get the XDG config directory for cloudproxy.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cloudproxy").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cloudproxy.toml"))
}

/// Home directory of the current user.
pub fn user_home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Configuration {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Configuration {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Install layout of the platform binary.
    pub fn layout(&self) -> InstallLayout {
        InstallLayout {
            subdir: self.install_subdir.clone(),
            binary_name: self.binary_name.clone(),
        }
    }

    /// Directory the install layout is rooted at.
    ///
    /// Fails when no override is set and the home directory cannot be determined.
    pub fn resolve_base_dir(&self) -> ApplicationResult<PathBuf> {
        self.resolve_base_dir_with(user_home_dir)
    }

    /// [`Settings::resolve_base_dir`] with a custom home lookup.
    pub fn resolve_base_dir_with(
        &self,
        home: impl FnOnce() -> Option<PathBuf>,
    ) -> ApplicationResult<PathBuf> {
        if let Some(home) = &self.home_dir {
            return Ok(home.clone());
        }
        home().ok_or_else(|| ApplicationError::Configuration {
            message: "cannot determine home directory".into(),
        })
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expand = |p: &PathBuf| PathBuf::from(expand_env_vars(&p.to_string_lossy()));
        self.home_dir = self.home_dir.as_ref().map(expand);
        self.catalog_path = self.catalog_path.as_ref().map(expand);
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            home_dir: overlay.home_dir.clone().or_else(|| self.home_dir.clone()),
            install_subdir: overlay
                .install_subdir
                .clone()
                .unwrap_or_else(|| self.install_subdir.clone()),
            binary_name: overlay
                .binary_name
                .clone()
                .unwrap_or_else(|| self.binary_name.clone()),
            interpreter: overlay.interpreter.clone().or_else(|| self.interpreter.clone()),
            download_url: overlay
                .download_url
                .clone()
                .or_else(|| self.download_url.clone()),
            runtime_marker: overlay
                .runtime_marker
                .clone()
                .unwrap_or_else(|| self.runtime_marker.clone()),
            catalog_path: overlay
                .catalog_path
                .clone()
                .or_else(|| self.catalog_path.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Config file to use instead of the global one
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Config file (explicit path, else `$XDG_CONFIG_HOME/cloudproxy/cloudproxy.toml`)
    /// 3. Environment variables: `CLOUDPROXY_*` prefix
    pub fn load(config_file: Option<&Path>) -> ApplicationResult<Self> {
        let mut current = Self::default();

        let path = config_file.map(Path::to_path_buf).or_else(global_config_path);
        if let Some(path) = path {
            if path.exists() {
                let raw = load_raw_settings(&path)?;
                current = current.merge_with(&raw);
            } else if config_file.is_some() {
                return Err(ApplicationError::Configuration {
                    message: format!("config file not found: {}", path.display()),
                });
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply CLOUDPROXY_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CLOUDPROXY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let raw = RawSettings {
            home_dir: config.get_string("home_dir").ok().map(PathBuf::from),
            install_subdir: config.get_string("install_subdir").ok().map(PathBuf::from),
            binary_name: config.get_string("binary_name").ok(),
            interpreter: config.get_string("interpreter").ok(),
            download_url: config.get_string("download_url").ok(),
            runtime_marker: config.get_string("runtime_marker").ok(),
            catalog_path: config.get_string("catalog_path").ok().map(PathBuf::from),
        };

        Ok(settings.merge_with(&raw))
    }

    /// Note for `config show` when the platform CLI cannot be installed automatically.
    pub fn provisioning_hint(&self) -> Option<String> {
        if self.download_url.is_some() {
            return None;
        }
        Some(format!(
            "download_url not set: install the platform CLI at {} yourself or configure download_url",
            self.layout()
                .target_path(&self.home_dir.clone().unwrap_or_else(|| PathBuf::from("~")))
                .display()
        ))
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Configuration {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# cloudproxy configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/cloudproxy/cloudproxy.toml
#   Env:    CLOUDPROXY_* environment variables (explicit overrides)

# Home directory the platform CLI is installed under (default: your home)
# home_dir = "~"

# Install location below home_dir
# install_subdir = ".platformsh/bin"
# binary_name = "platform"

# Run the binary through an interpreter (e.g. for a phar archive)
# interpreter = "php"

# Download location used when the binary is missing.
# No default: without it, proxy commands fail until the binary is installed
# at home_dir/install_subdir/binary_name by other means.
# download_url = "https://example.com/platform"

# Skip installation when this variable is set (platform containers)
# runtime_marker = "PLATFORM_APPLICATION_NAME"

# Replace the built-in command catalog
# catalog_path = "~/.config/cloudproxy/catalog.toml"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Configuration {
        message: e.to_string(),
    }
}
