//! Argument vector rewriting
//!
//! Replaces the alias the user typed with the canonical command name. Matching is
//! plain substring replacement: an alias embedded in an unrelated argument is
//! rewritten as well.

use std::ffi::{OsStr, OsString};

/// Rewrite each argument, replacing the first occurrence of the first alias it contains.
///
/// Aliases are tried in the given order. At most one replacement happens per argument.
pub fn rewrite_args<S: AsRef<str>>(args: &[S], aliases: &[String], canonical: &str) -> Vec<String> {
    args.iter()
        .map(|arg| rewrite_one(arg.as_ref(), aliases, canonical))
        .collect()
}

/// [`rewrite_args`] for raw process arguments.
///
/// Arguments that are not valid UTF-8 cannot contain an alias and are passed through untouched.
pub fn rewrite_os_args<S: AsRef<OsStr>>(
    args: &[S],
    aliases: &[String],
    canonical: &str,
) -> Vec<OsString> {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            match arg.to_str() {
                Some(s) => OsString::from(rewrite_one(s, aliases, canonical)),
                None => arg.to_os_string(),
            }
        })
        .collect()
}

fn rewrite_one(arg: &str, aliases: &[String], canonical: &str) -> String {
    aliases
        .iter()
        .filter(|alias| !alias.is_empty())
        .find(|alias| arg.contains(alias.as_str()))
        .map(|alias| arg.replacen(alias.as_str(), canonical, 1))
        .unwrap_or_else(|| arg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn aliases(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case::alias_is_canonical(
        &["tunnel:open", "--foo", "bar"],
        &["cloud:tunnel:open", "tunnel:open"],
        "tunnel:open",
        &["tunnel:open", "--foo", "bar"]
    )]
    #[case::short_alias(
        &["env:ssh", "prod"],
        &["cloud:environment:ssh", "environment:ssh", "env:ssh"],
        "environment:ssh",
        &["environment:ssh", "prod"]
    )]
    #[case::qualified_name(
        &["cloud:environment:ssh", "prod"],
        &["cloud:environment:ssh", "environment:ssh"],
        "environment:ssh",
        &["environment:ssh", "prod"]
    )]
    #[case::no_args(&[], &["env:ssh"], "environment:ssh", &[])]
    fn given_argv_when_rewrite_then_alias_replaced(
        #[case] args: &[&str],
        #[case] names: &[&str],
        #[case] canonical: &str,
        #[case] expected: &[&str],
    ) {
        let result = rewrite_args(args, &aliases(names), canonical);
        assert_eq!(result, expected);
    }

    #[test]
    fn given_alias_inside_flag_value_when_rewrite_then_substring_also_replaced() {
        let result = rewrite_args(
            &["env:ssh", "--env:ssh-mode"],
            &aliases(&["env:ssh"]),
            "environment:ssh",
        );

        assert_eq!(result, vec!["environment:ssh", "--environment:ssh-mode"]);
    }

    #[test]
    fn given_alias_twice_in_one_arg_when_rewrite_then_only_first_replaced() {
        let result = rewrite_args(&["env:ssh,env:ssh"], &aliases(&["env:ssh"]), "environment:ssh");

        assert_eq!(result, vec!["environment:ssh,env:ssh"]);
    }

    #[test]
    fn given_several_matching_aliases_when_rewrite_then_stops_after_first() {
        // "environment:ssh" matches first; the canonical name must not be rewritten again
        let result = rewrite_args(
            &["environment:ssh"],
            &aliases(&["environment:ssh", "ssh"]),
            "environment:ssh",
        );

        assert_eq!(result, vec!["environment:ssh"]);
    }

    #[test]
    fn given_utf8_os_args_when_rewrite_os_then_same_as_strings() {
        let args = [OsString::from("env:ssh"), OsString::from("prod")];

        let result = rewrite_os_args(&args, &aliases(&["env:ssh"]), "environment:ssh");

        assert_eq!(result, vec!["environment:ssh", "prod"]);
    }

    #[cfg(unix)]
    #[test]
    fn given_non_utf8_arg_when_rewrite_os_then_bytes_kept() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"/tmp/env:ssh\xff");
        let args = [OsStr::new("env:ssh"), raw];

        let result = rewrite_os_args(&args, &aliases(&["env:ssh"]), "environment:ssh");

        assert_eq!(result[0], "environment:ssh");
        assert_eq!(result[1].as_bytes(), b"/tmp/env:ssh\xff");
    }
}
