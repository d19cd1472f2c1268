//! Proxy command registration and dispatch
//!
//! Every catalog entry becomes a clap subcommand that accepts anything.
//! Only the main commands show up in `--help`.

use std::collections::HashSet;
use std::ffi::OsString;

use clap::builder::ValueParser;
use clap::{Arg, ArgAction, ArgMatches, Command, CommandFactory};
use tracing::debug;

use crate::application::services::DelegationService;
use crate::cli::args::Cli;
use crate::cli::CliResult;
use crate::domain::{ArgSpec, Catalog, FlagParsing, ProxyCommand};

/// Full parent command: built-in commands plus one subcommand per proxy command.
pub fn build_command(catalog: &Catalog) -> Command {
    let main: HashSet<&str> = catalog
        .main_commands()
        .iter()
        .map(|c| c.full_name.as_str())
        .collect();

    let mut cmd = Cli::command();
    for command in catalog.commands() {
        let visible = main.contains(command.full_name.as_str());
        cmd = cmd.subcommand(proxy_subcommand(command, visible));
    }
    cmd
}

/// clap subcommand for one proxy command.
pub fn proxy_subcommand(command: &ProxyCommand, visible: bool) -> Command {
    let mut sub = Command::new(command.full_name.clone())
        .aliases(command.extra_names().map(str::to_string))
        .hide(!visible);
    if let Some(about) = &command.description {
        sub = sub.about(about.clone());
    }
    if command.flag_parsing == FlagParsing::Skipped {
        // flags belong to the platform CLI
        sub = sub.disable_help_flag(true).disable_version_flag(true);
    }
    for spec in &command.args {
        sub = sub.arg(passthrough_arg(spec));
    }
    sub
}

fn passthrough_arg(spec: &ArgSpec) -> Arg {
    let arg = Arg::new(spec.name)
        .required(!spec.optional)
        .allow_hyphen_values(true)
        .value_parser(ValueParser::os_string());
    match (spec.repeatable, spec.optional) {
        (true, true) => arg
            .num_args(0..)
            .action(ArgAction::Append)
            .trailing_var_arg(true),
        (true, false) => arg
            .num_args(1..)
            .action(ArgAction::Append)
            .trailing_var_arg(true),
        (false, _) => arg.num_args(1).action(ArgAction::Set),
    }
}

/// Proxy command selected by `matches`, if any.
pub fn matched<'a>(catalog: &'a Catalog, matches: &ArgMatches) -> Option<&'a ProxyCommand> {
    let (name, _) = matches.subcommand()?;
    catalog.find(name)
}

/// Delegate `command` using the raw process argv; returns the child's exit code.
///
/// Everything after the program name is forwarded, including parent flags such
/// as `-d` given before the command name.
pub fn dispatch(
    service: &DelegationService,
    catalog: &Catalog,
    command: &ProxyCommand,
    argv: &[OsString],
) -> CliResult<i32> {
    debug!("dispatch: {} -> {}", command.full_name, command.canonical_name);
    Ok(service.delegate(catalog, command, argv)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommandSpec, InstallLayout};
    use std::path::Path;

    fn catalog() -> Catalog {
        let specs = vec![
            CommandSpec::new("cloud", "tunnel:open"),
            CommandSpec::new("cloud", "environment:ssh").with_aliases(["env:ssh"]),
            CommandSpec::new("cloud", "mount:list"),
        ];
        Catalog::build(&specs, Path::new("/home/u"), &InstallLayout::default()).unwrap()
    }

    #[test]
    fn verify_cli_with_proxies() {
        build_command(&catalog()).debug_assert();
    }

    #[test]
    fn given_proxy_subcommand_then_single_optional_repeatable_positional() {
        let catalog = catalog();
        let sub = proxy_subcommand(&catalog.commands()[0], true);

        let args: Vec<_> = sub.get_arguments().collect();
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].get_id().as_str(), "anything");
        assert!(!args[0].is_required_set());
        assert!(args[0].is_positional());
        assert!(sub.is_disable_help_flag_set());
    }

    #[test]
    fn given_flags_after_proxy_command_when_parsing_then_accepted_verbatim() {
        let catalog = catalog();
        let matches = build_command(&catalog)
            .try_get_matches_from(["cloudproxy", "env:ssh", "--foo", "-x", "bar", "--help"])
            .expect("flags pass through");

        let command = matched(&catalog, &matches).expect("proxy command");
        assert_eq!(command.canonical_name, "environment:ssh");

        let (_, sub) = matches.subcommand().unwrap();
        let values: Vec<_> = sub.get_many::<OsString>("anything").unwrap().collect();
        assert_eq!(values, vec!["--foo", "-x", "bar", "--help"]);
    }

    #[cfg(unix)]
    #[test]
    fn given_non_utf8_argument_when_parsing_then_accepted_as_is() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let catalog = catalog();
        let raw = OsStr::from_bytes(b"/tmp/\xff");
        let matches = build_command(&catalog)
            .try_get_matches_from([OsStr::new("cloudproxy"), OsStr::new("tunnel:open"), raw])
            .expect("non-UTF-8 passes through");

        let (_, sub) = matches.subcommand().unwrap();
        let values: Vec<_> = sub.get_many::<OsString>("anything").unwrap().collect();
        assert_eq!(values[0].as_bytes(), b"/tmp/\xff");
    }

    #[test]
    fn given_proxy_without_args_when_parsing_then_accepted() {
        let catalog = catalog();
        let matches = build_command(&catalog)
            .try_get_matches_from(["cloudproxy", "tunnel:open"])
            .unwrap();

        assert_eq!(
            matched(&catalog, &matches).unwrap().full_name,
            "tunnel:open"
        );
    }

    #[test]
    fn given_builtin_command_when_matched_then_none() {
        let catalog = catalog();
        let matches = build_command(&catalog)
            .try_get_matches_from(["cloudproxy", "list", "--all"])
            .unwrap();

        assert!(matched(&catalog, &matches).is_none());
    }

    #[test]
    fn given_non_main_command_then_hidden_from_help() {
        let cmd = build_command(&catalog());

        let hidden = |name: &str| {
            cmd.get_subcommands()
                .find(|s| s.get_name() == name)
                .map(|s| s.is_hide_set())
                .unwrap()
        };
        assert!(!hidden("tunnel:open"));
        assert!(!hidden("environment:ssh"));
        assert!(hidden("mount:list"));
    }
}
