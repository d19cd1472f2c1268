//! Invocation delegation service
//!
//! One handler shared by every proxy command: provision the platform binary,
//! rewrite the process arguments and hand over to the binary.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{rewrite_os_args, Catalog, ExecutionRequest, ProxyCommand, APPLICATION_ENV};
use crate::infrastructure::traits::{Installer, ProcessRunner, RuntimeProbe};

/// Delegates proxy command invocations to the platform binary.
pub struct DelegationService {
    probe: Arc<dyn RuntimeProbe>,
    installer: Arc<dyn Installer>,
    runner: Arc<dyn ProcessRunner>,
    settings: Arc<Settings>,
}

impl DelegationService {
    pub fn new(
        probe: Arc<dyn RuntimeProbe>,
        installer: Arc<dyn Installer>,
        runner: Arc<dyn ProcessRunner>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            probe,
            installer,
            runner,
            settings,
        }
    }

    /// Run `command` as typed in `argv` (full process argv, program name first).
    ///
    /// Returns the child's exit code unchanged. Nothing is launched when
    /// provisioning fails.
    #[instrument(skip_all, fields(command = %command.canonical_name))]
    pub fn delegate(
        &self,
        catalog: &Catalog,
        command: &ProxyCommand,
        argv: &[OsString],
    ) -> ApplicationResult<i32> {
        self.provision(catalog.base_dir())?;

        let request = self.execution_request(catalog.target_path(), command, argv);
        debug!("delegate: argv={:?}", request.argv);

        let code = self
            .runner
            .run(&request)
            .with_path_context("launch platform CLI", &request.program)?;
        debug!("delegate: exit code {}", code);
        Ok(code)
    }

    /// Install the binary unless running inside the platform runtime.
    pub fn provision(&self, base_dir: &Path) -> ApplicationResult<()> {
        // the platform's containers ship the binary
        if self.probe.in_native_runtime() {
            debug!("provision: native runtime, skipping install");
            return Ok(());
        }

        info!("provision: ensuring platform CLI under {}", base_dir.display());
        self.installer
            .install(base_dir)
            .map_err(|e| ApplicationError::Provisioning {
                message: e.to_string(),
            })
    }

    /// Build the request launching `target` for `command`.
    pub fn execution_request(
        &self,
        target: &Path,
        command: &ProxyCommand,
        argv: &[OsString],
    ) -> ExecutionRequest {
        let args = argv.get(1..).unwrap_or_default();
        let rewritten = rewrite_os_args(args, &command.alias_names, &command.canonical_name);
        let target_arg = target.as_os_str().to_os_string();

        let (program, mut full_argv) = match &self.settings.interpreter {
            Some(interpreter) => (
                PathBuf::from(interpreter),
                vec![OsString::from(interpreter), target_arg],
            ),
            None => (target.to_path_buf(), vec![target_arg]),
        };
        full_argv.extend(rewritten);

        ExecutionRequest {
            program,
            argv: full_argv,
            extra_env: APPLICATION_ENV
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            path_prefixes: target.parent().map(Path::to_path_buf).into_iter().collect(),
        }
    }
}
