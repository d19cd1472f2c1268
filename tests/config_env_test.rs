//! Environment overrides live in their own test binary: they mutate process env.

use std::fs;

use tempfile::TempDir;

use cloudproxy::config::Settings;

#[test]
fn given_env_override_when_load_then_env_wins_over_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cloudproxy.toml");
    fs::write(&path, "binary_name = \"from-file\"\nruntime_marker = \"FILE_MARKER\"\n").unwrap();
    std::env::set_var("CLOUDPROXY_BINARY_NAME", "from-env");

    let settings = Settings::load(Some(&path)).unwrap();

    std::env::remove_var("CLOUDPROXY_BINARY_NAME");
    assert_eq!(settings.binary_name, "from-env");
    assert_eq!(settings.runtime_marker, "FILE_MARKER");
}
