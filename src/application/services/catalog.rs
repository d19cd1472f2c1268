//! Catalog construction service
//!
//! Loads the command list (built-in or from `catalog_path`) and turns it into
//! proxy commands bound to the resolved install location.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{Catalog, CommandSpec};
use crate::infrastructure::traits::FileSystem;

/// Command list shipped with the binary.
pub const BUILTIN_CATALOG: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalog.toml"));

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    command: Vec<CommandSpec>,
}

/// Builds the proxy command catalog.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl CatalogService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Parse `[[command]]` tables from TOML.
    pub fn parse(content: &str) -> ApplicationResult<Vec<CommandSpec>> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|e| ApplicationError::Configuration {
                message: format!("parse command catalog: {e}"),
            })?;
        Ok(file.command)
    }

    /// Command specs from `catalog_path` if configured, else the built-in list.
    pub fn load_specs(&self) -> ApplicationResult<Vec<CommandSpec>> {
        match &self.settings.catalog_path {
            Some(path) => {
                debug!("load_specs: path={}", path.display());
                if !self.fs.is_file(path) {
                    return Err(ApplicationError::Configuration {
                        message: format!("command catalog not found: {}", path.display()),
                    });
                }
                let content =
                    self.fs
                        .read_to_string(path)
                        .map_err(|e| ApplicationError::Configuration {
                            message: format!("read {}: {}", path.display(), e),
                        })?;
                Self::parse(&content)
            }
            None => Self::parse(BUILTIN_CATALOG),
        }
    }

    /// Load the configured command list and build the catalog from it.
    pub fn build(&self) -> ApplicationResult<Catalog> {
        let specs = self.load_specs()?;
        self.build_from(&specs)
    }

    /// Build the catalog from an externally supplied command list.
    ///
    /// Fails without a partial catalog when the home directory cannot be resolved.
    #[instrument(skip_all, fields(commands = specs.len()))]
    pub fn build_from(&self, specs: &[CommandSpec]) -> ApplicationResult<Catalog> {
        let base_dir = self.settings.resolve_base_dir_with(|| self.fs.home_dir())?;
        let catalog = Catalog::build(specs, &base_dir, &self.settings.layout())?;
        debug!(
            "build_from: {} commands, target={}",
            catalog.commands().len(),
            catalog.target_path().display()
        );
        Ok(catalog)
    }
}
