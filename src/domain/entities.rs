//! Domain entities: core data structures

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Prefix stripped from qualified names to get the name the target binary expects.
pub const CLOUD_PREFIX: &str = "cloud:";

/// Environment variables telling the target binary how it is embedded.
///
/// The values are matched byte-for-byte by the target's self-identification.
pub const APPLICATION_ENV: [(&str, &str); 2] = [
    (
        "PLATFORMSH_CLI_APPLICATION_NAME",
        "Platform.sh CLI for Symfony",
    ),
    ("PLATFORMSH_CLI_APPLICATION_EXECUTABLE", "symfony cloud:"),
];

/// A command of the target CLI, as listed in the external catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    pub category: String,
    pub name: String,
    /// Extra names the parent CLI accepts for this command
    #[serde(default)]
    pub aliases: Vec<String>,
    /// One-line help text
    #[serde(default)]
    pub description: Option<String>,
}

impl CommandSpec {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            aliases: Vec::new(),
            description: None,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// `category:name`
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.category, self.name)
    }

    /// Qualified name with the `cloud:` prefix stripped.
    pub fn public_name(&self) -> String {
        let qualified = self.qualified_name();
        match qualified.strip_prefix(CLOUD_PREFIX) {
            Some(stripped) => stripped.to_string(),
            None => qualified,
        }
    }
}

/// How the parent CLI treats flags following a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagParsing {
    Enabled,
    /// Flags are left untouched and passed on as plain arguments
    Skipped,
}

/// Positional argument declaration of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub optional: bool,
    pub repeatable: bool,
}

impl ArgSpec {
    /// Optional, repeatable, untyped positional capturing everything.
    pub fn anything() -> Self {
        Self {
            name: "anything",
            optional: true,
            repeatable: true,
        }
    }
}

/// A parent CLI command delegating to the target binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyCommand {
    pub category: String,
    pub name: String,
    /// `category:name`, unstripped
    pub qualified_name: String,
    /// Public-facing name (qualified name without `cloud:`)
    pub full_name: String,
    /// Command name handed to the target binary
    pub canonical_name: String,
    /// Every name the parent parser recognizes for this command
    pub alias_names: Vec<String>,
    pub description: Option<String>,
    pub args: Vec<ArgSpec>,
    pub flag_parsing: FlagParsing,
}

impl ProxyCommand {
    pub fn from_spec(spec: &CommandSpec) -> Self {
        let qualified_name = spec.qualified_name();
        let full_name = spec.public_name();

        let mut alias_names: Vec<String> = Vec::new();
        for alias in [&qualified_name, &full_name].into_iter().chain(&spec.aliases) {
            if !alias.is_empty() && !alias_names.contains(alias) {
                alias_names.push(alias.clone());
            }
        }

        Self {
            category: spec.category.clone(),
            name: spec.name.clone(),
            canonical_name: full_name.clone(),
            qualified_name,
            full_name,
            alias_names,
            description: spec.description.clone(),
            args: vec![ArgSpec::anything()],
            flag_parsing: FlagParsing::Skipped,
        }
    }

    /// Alias names other than the public name, for help output.
    pub fn extra_names(&self) -> impl Iterator<Item = &str> {
        self.alias_names
            .iter()
            .map(String::as_str)
            .filter(move |n| *n != self.full_name)
    }

    /// Leading namespace of the public name (`environment` for `environment:ssh`).
    pub fn namespace(&self) -> &str {
        self.full_name
            .split_once(':')
            .map(|(ns, _)| ns)
            .unwrap_or("")
    }
}

/// Where the target binary lives below a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    pub subdir: PathBuf,
    pub binary_name: String,
}

impl InstallLayout {
    /// `<base_dir>/<subdir>/<binary_name>`
    pub fn target_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.subdir).join(&self.binary_name)
    }
}

impl Default for InstallLayout {
    fn default() -> Self {
        Self {
            subdir: PathBuf::from(".platformsh").join("bin"),
            binary_name: "platform".into(),
        }
    }
}

/// Everything needed to launch the target binary once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    /// Executable to launch
    pub program: PathBuf,
    /// Full argument vector, including argv[0]; raw bytes on unix
    pub argv: Vec<OsString>,
    /// Variables added to the inherited environment
    pub extra_env: Vec<(String, String)>,
    /// Directories prepended to the executable search path
    pub path_prefixes: Vec<PathBuf>,
}

/// Expand environment variables and tilde in a path string.
///
/// Handles `~`, `$VAR`, and `${VAR}` syntax.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_cloud_category_when_public_name_then_prefix_stripped() {
        let spec = CommandSpec::new("cloud", "tunnel:open");
        assert_eq!(spec.public_name(), "tunnel:open");
        assert_eq!(spec.qualified_name(), "cloud:tunnel:open");
    }

    #[test]
    fn given_other_category_when_public_name_then_kept() {
        let spec = CommandSpec::new("other", "tunnel:open");
        assert_eq!(spec.public_name(), "other:tunnel:open");
    }

    #[test]
    fn given_spec_with_aliases_when_from_spec_then_alias_names_ordered_and_unique() {
        let spec = CommandSpec::new("cloud", "environment:ssh")
            .with_aliases(["env:ssh", "ssh", "env:ssh"]);

        let cmd = ProxyCommand::from_spec(&spec);

        assert_eq!(
            cmd.alias_names,
            vec!["cloud:environment:ssh", "environment:ssh", "env:ssh", "ssh"]
        );
        assert_eq!(cmd.canonical_name, "environment:ssh");
        assert_eq!(cmd.namespace(), "environment");
        assert_eq!(
            cmd.extra_names().collect::<Vec<_>>(),
            vec!["cloud:environment:ssh", "env:ssh", "ssh"]
        );
    }

    #[test]
    fn given_default_layout_when_target_path_then_under_platformsh_bin() {
        let layout = InstallLayout::default();
        assert_eq!(
            layout.target_path(Path::new("/home/u")),
            PathBuf::from("/home/u/.platformsh/bin/platform")
        );
    }
}
