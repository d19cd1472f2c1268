//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{CatalogService, DelegationService};
use crate::config::Settings;
use crate::infrastructure::traits::{
    EnvRuntimeProbe, FileSystem, HttpInstaller, Installer, ProcessRunner, RealFileSystem,
    RealProcessRunner, RuntimeProbe,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Platform runtime detection
    pub probe: Arc<dyn RuntimeProbe>,

    /// Provisioning of the platform binary
    pub installer: Arc<dyn Installer>,

    /// Process launcher
    pub runner: Arc<dyn ProcessRunner>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let probe = Arc::new(EnvRuntimeProbe::new(settings.runtime_marker.clone()));
        let installer = Arc::new(HttpInstaller::new(
            settings.layout(),
            settings.download_url.clone(),
        ));
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            probe,
            installer,
            Arc::new(RealProcessRunner),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        probe: Arc<dyn RuntimeProbe>,
        installer: Arc<dyn Installer>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            probe,
            installer,
            runner,
        }
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(self.fs.clone(), self.settings.clone())
    }

    pub fn delegation_service(&self) -> DelegationService {
        DelegationService::new(
            self.probe.clone(),
            self.installer.clone(),
            self.runner.clone(),
            self.settings.clone(),
        )
    }
}
