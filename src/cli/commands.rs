//! Built-in command handlers

use std::io;

use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::proxy::build_command;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{Catalog, ProxyCommand};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(
    cli: &Cli,
    container: &ServiceContainer,
    catalog: &Catalog,
) -> CliResult<()> {
    match &cli.command {
        Some(Commands::List { all }) => _list(catalog, *all),
        Some(Commands::Config { command }) => _config(command, &container.settings),
        Some(Commands::Completion { shell }) => {
            let mut cmd = build_command(catalog);
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => _list(catalog, false),
    }
}

#[instrument(skip(catalog))]
fn _list(catalog: &Catalog, all: bool) -> CliResult<()> {
    let commands: Vec<&ProxyCommand> = if all {
        catalog.commands().iter().collect()
    } else {
        catalog.main_commands()
    };
    debug!("listing {} commands", commands.len());

    let width = commands
        .iter()
        .map(|c| c.full_name.len())
        .max()
        .unwrap_or_default();

    output::header("Available commands:");
    for (namespace, group) in &commands.iter().chunk_by(|c| c.namespace().to_string()) {
        output::group(&namespace);
        for command in group {
            output::detail(&format_entry(command, width));
        }
    }
    if !all {
        output::info("");
        output::info("Use `list --all` to see every cloud command.");
    }
    Ok(())
}

fn format_entry(command: &ProxyCommand, width: usize) -> String {
    let mut line = format!(
        "{:<width$}  {}",
        command.full_name,
        command.description.as_deref().unwrap_or_default()
    );
    let aliases: Vec<&str> = command
        .extra_names()
        .filter(|n| *n != command.qualified_name)
        .collect();
    if !aliases.is_empty() {
        line.push_str(&format!(" [{}]", aliases.join("|")));
    }
    line.trim_end().to_string()
}

fn _config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            if let Some(hint) = settings.provisioning_hint() {
                output::warning(&hint);
            }
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no config directory available"),
            }
            output::action(
                "platform CLI",
                &settings.layout().target_path(&settings.resolve_base_dir()?).display(),
            );
            Ok(())
        }
        ConfigCommands::Init => {
            let path = global_config_path()
                .ok_or_else(|| CliError::Usage("no config directory available".into()))?;
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| InfraError::io(format!("create {}", dir.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommandSpec;

    #[test]
    fn given_command_with_aliases_when_format_then_lists_short_names() {
        let mut spec = CommandSpec::new("cloud", "environment:ssh").with_aliases(["ssh"]);
        spec.description = Some("SSH to the current environment".into());
        let command = ProxyCommand::from_spec(&spec);

        let line = format_entry(&command, 20);

        assert_eq!(
            line,
            "environment:ssh       SSH to the current environment [ssh]"
        );
    }

    #[test]
    fn given_command_without_description_when_format_then_trimmed() {
        let command = ProxyCommand::from_spec(&CommandSpec::new("cloud", "tunnel:open"));

        assert_eq!(format_entry(&command, 20), "tunnel:open");
    }
}
