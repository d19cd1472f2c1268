//! End-to-end delegation through the real process runner.
//!
//! A shell script stands in for the platform binary and records what it was
//! called with.
#![cfg(unix)]

use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use cloudproxy::cli::proxy::{build_command, dispatch, matched};
use cloudproxy::config::Settings;
use cloudproxy::infrastructure::di::ServiceContainer;

const FAKE_PLATFORM: &str = r#"#!/bin/sh
out="$(dirname "$0")/calls.log"
for arg in "$@"; do echo "arg:$arg" >> "$out"; done
echo "name:$PLATFORMSH_CLI_APPLICATION_NAME" >> "$out"
echo "exe:$PLATFORMSH_CLI_APPLICATION_EXECUTABLE" >> "$out"
echo "path:$PATH" >> "$out"
exit 3
"#;

fn install_fake_platform(home: &Path) -> PathBuf {
    let bin = home.join(".platformsh").join("bin");
    fs::create_dir_all(&bin).unwrap();
    let target = bin.join("platform");
    fs::write(&target, FAKE_PLATFORM).unwrap();
    fs::set_permissions(&target, fs::Permissions::from_mode(0o755)).unwrap();
    target
}

fn container(home: &Path) -> ServiceContainer {
    ServiceContainer::new(Settings {
        home_dir: Some(home.to_path_buf()),
        runtime_marker: "CLOUDPROXY_E2E_MARKER_NEVER_SET".into(),
        ..Settings::default()
    })
}

#[test]
fn given_installed_platform_when_proxy_invoked_then_rewritten_and_exit_code_propagated() {
    // Arrange
    let home = TempDir::new().unwrap();
    let target = install_fake_platform(home.path());
    let container = container(home.path());
    let catalog = container.catalog_service().build().unwrap();
    let argv: Vec<OsString> = ["symfony", "cloud:ssh", "--project", "abc", "-e", "main"]
        .iter()
        .map(OsString::from)
        .collect();

    // Act
    let matches = build_command(&catalog).try_get_matches_from(&argv).unwrap();
    let command = matched(&catalog, &matches).expect("proxy command");
    let code = dispatch(&container.delegation_service(), &catalog, command, &argv).unwrap();

    // Assert
    assert_eq!(code, 3);
    let log = fs::read_to_string(target.with_file_name("calls.log")).unwrap();
    let lines: Vec<_> = log.lines().collect();
    assert_eq!(
        &lines[..5],
        &[
            "arg:environment:ssh",
            "arg:--project",
            "arg:abc",
            "arg:-e",
            "arg:main"
        ]
    );
    assert!(lines.contains(&"name:Platform.sh CLI for Symfony"));
    assert!(lines.contains(&"exe:symfony cloud:"));
    let bin_dir = target.parent().unwrap().display().to_string();
    assert!(
        lines.iter().any(|l| l.starts_with(&format!("path:{bin_dir}"))),
        "PATH should start with the binary's directory: {log}"
    );
}

#[test]
fn given_missing_platform_without_download_url_when_proxy_invoked_then_provisioning_fails() {
    let home = TempDir::new().unwrap();
    let container = container(home.path());
    let catalog = container.catalog_service().build().unwrap();
    let argv: Vec<OsString> = vec!["symfony".into(), "tunnel:open".into()];

    let command = catalog.find("tunnel:open").unwrap();
    let err = dispatch(&container.delegation_service(), &catalog, command, &argv).unwrap_err();

    assert!(err.is_provisioning());
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("no download_url configured"));
}
