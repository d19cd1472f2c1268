//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::domain::{ExecutionRequest, InstallLayout};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Home directory of the current user, if it can be determined.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Launches the target binary.
pub trait ProcessRunner: Send + Sync {
    /// Run to completion with inherited stdio and return the exit code.
    fn run(&self, request: &ExecutionRequest) -> io::Result<i32>;
}

/// Provisions the target binary below a base directory.
pub trait Installer: Send + Sync {
    /// Make sure the binary is in place. Must be a no-op when it already is.
    fn install(&self, base_dir: &Path) -> io::Result<()>;
}

/// Tells whether we execute inside the target platform's own runtime.
pub trait RuntimeProbe: Send + Sync {
    fn in_native_runtime(&self) -> bool;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        crate::config::user_home_dir()
    }
}

/// Real process runner: blocks until the child exits.
#[derive(Debug, Default)]
pub struct RealProcessRunner;

impl RealProcessRunner {
    /// `PATH` with `prefixes` in front of the inherited entries.
    pub fn search_path(prefixes: &[PathBuf], current: Option<OsString>) -> io::Result<OsString> {
        let inherited = current
            .as_deref()
            .map(|p| std::env::split_paths(p).collect::<Vec<_>>())
            .unwrap_or_default();
        std::env::join_paths(prefixes.iter().cloned().chain(inherited))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
    }
}

impl ProcessRunner for RealProcessRunner {
    fn run(&self, request: &ExecutionRequest) -> io::Result<i32> {
        let mut cmd = Command::new(&request.program);
        cmd.args(request.argv.iter().skip(1));
        cmd.envs(request.extra_env.iter().map(|(k, v)| (k, v)));
        if !request.path_prefixes.is_empty() {
            let path = Self::search_path(&request.path_prefixes, std::env::var_os("PATH"))?;
            cmd.env("PATH", path);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            if let Some(arg0) = request.argv.first() {
                cmd.arg0(arg0);
            }
        }

        debug!("run: program={}, argv={:?}", request.program.display(), request.argv);
        let status = cmd.status()?;
        // killed by a signal: no code
        Ok(status.code().unwrap_or(1))
    }
}

/// Real installer: downloads the binary when it is missing.
#[derive(Debug)]
pub struct HttpInstaller {
    layout: InstallLayout,
    download_url: Option<String>,
}

impl HttpInstaller {
    pub fn new(layout: InstallLayout, download_url: Option<String>) -> Self {
        Self {
            layout,
            download_url,
        }
    }

    fn download(&self, url: &str, target: &Path) -> io::Result<()> {
        let dir = target.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(dir)?;

        let bytes = reqwest::blocking::get(url)
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map_err(|e| io::Error::other(format!("download {url}: {e}")))?;

        // write next to the target so the final rename stays on one filesystem
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        io::Write::write_all(&mut tmp, &bytes)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o755))?;
        }

        tmp.persist(target).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Installer for HttpInstaller {
    fn install(&self, base_dir: &Path) -> io::Result<()> {
        let target = self.layout.target_path(base_dir);
        if target.is_file() {
            debug!("install: already present at {}", target.display());
            return Ok(());
        }

        let url = self.download_url.as_deref().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!(
                    "platform CLI not found at {} and no download_url configured",
                    target.display()
                ),
            )
        })?;

        info!("install: downloading {} to {}", url, target.display());
        self.download(url, &target)
    }
}

/// Detects the platform runtime by a marker environment variable.
#[derive(Debug)]
pub struct EnvRuntimeProbe {
    marker: String,
}

impl EnvRuntimeProbe {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl RuntimeProbe for EnvRuntimeProbe {
    fn in_native_runtime(&self) -> bool {
        std::env::var_os(&self.marker).is_some_and(|v| !v.is_empty())
    }
}
