//! Proxy command catalog
//!
//! Built once from the external command list; read-only afterwards.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::{CommandSpec, DomainError, DomainResult, InstallLayout, ProxyCommand};

/// Commands promoted in the summarized help view, by qualified name.
pub const MAIN_COMMANDS: &[&str] = &[
    "cloud:project:list",
    "cloud:environment:list",
    "cloud:environment:branch",
    "cloud:tunnel:open",
    "cloud:environment:ssh",
    "cloud:environment:push",
    "cloud:domain:list",
    "cloud:variable:list",
    "cloud:user:add",
];

/// Ordered set of proxy commands sharing one target binary.
#[derive(Debug, Clone)]
pub struct Catalog {
    commands: Vec<ProxyCommand>,
    base_dir: PathBuf,
    target_path: PathBuf,
}

impl Catalog {
    /// Build proxy commands in input order.
    ///
    /// The target path is resolved once and shared by every command.
    /// Empty names and duplicate `(category, name)` keys are rejected.
    pub fn build(
        specs: &[CommandSpec],
        base_dir: &Path,
        layout: &InstallLayout,
    ) -> DomainResult<Self> {
        let target_path = layout.target_path(base_dir);

        let mut seen = HashSet::new();
        let mut commands = Vec::with_capacity(specs.len());
        for spec in specs {
            if spec.category.is_empty() || spec.name.is_empty() {
                return Err(DomainError::InvalidCatalog {
                    message: format!("empty category or name: {:?}", spec.qualified_name()),
                });
            }
            if !seen.insert((spec.category.as_str(), spec.name.as_str())) {
                return Err(DomainError::InvalidCatalog {
                    message: format!("duplicate command: {}", spec.qualified_name()),
                });
            }
            commands.push(ProxyCommand::from_spec(spec));
        }

        Ok(Self {
            commands,
            base_dir: base_dir.to_path_buf(),
            target_path,
        })
    }

    pub fn commands(&self) -> &[ProxyCommand] {
        &self.commands
    }

    /// Base directory the target binary is installed under.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolved location of the target binary.
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Find the command registered under `name` (any of its alias names).
    pub fn find(&self, name: &str) -> Option<&ProxyCommand> {
        self.commands
            .iter()
            .find(|c| c.full_name == name || c.alias_names.iter().any(|a| a == name))
    }

    /// Commands promoted by [`MAIN_COMMANDS`].
    pub fn main_commands(&self) -> Vec<&ProxyCommand> {
        main_commands(&self.commands, MAIN_COMMANDS)
    }
}

/// Subset of `commands` whose qualified name is in `allow_list`, order preserved.
pub fn main_commands<'a>(commands: &'a [ProxyCommand], allow_list: &[&str]) -> Vec<&'a ProxyCommand> {
    let allowed: HashSet<&str> = allow_list.iter().copied().collect();
    commands
        .iter()
        .filter(|c| allowed.contains(c.qualified_name.as_str()))
        .collect()
}
