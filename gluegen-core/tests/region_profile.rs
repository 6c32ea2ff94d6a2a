//! Region lookup through the shared AWS config file.
//!
//! Kept in its own test binary with a single test: it rewrites process
//! environment variables.

#![cfg(feature = "glue")]
#![allow(unsafe_code)]
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use gluegen_core::RunConfig;
use serde_json::json;

#[test]
fn test_region_falls_back_to_shared_config_profile() {
    let home = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(home.path().join(".aws")).expect("mkdir");
    std::fs::write(
        home.path().join(".aws").join("config"),
        "[default]\nregion = eu-west-1\n\n[profile analytics]\nregion = ap-southeast-2\n",
    )
    .expect("write config");

    // SAFETY: no other test runs in this binary, so nothing reads the
    // environment concurrently.
    unsafe {
        std::env::set_var("HOME", home.path());
        std::env::remove_var("AWS_REGION");
        std::env::remove_var("AWS_DEFAULT_REGION");
        std::env::remove_var("AWS_CONFIG_FILE");
        std::env::remove_var("AWS_PROFILE");
    }

    let config: RunConfig = serde_json::from_value(json!({
        "sourceDB": ["sales"],
        "targetDB": "glueDBgeneral.template",
        "targetTables": "glueTablegeneral.template"
    }))
    .expect("config");
    assert_eq!(config.resolve_region().expect("region"), "eu-west-1");

    // SAFETY: as above.
    unsafe {
        std::env::set_var("AWS_PROFILE", "analytics");
    }
    assert_eq!(config.resolve_region().expect("region"), "ap-southeast-2");

    // The file still wins over every other source.
    let pinned: RunConfig = serde_json::from_value(json!({
        "sourceDB": ["sales"],
        "targetDB": "glueDBgeneral.template",
        "targetTables": "glueTablegeneral.template",
        "region": "us-east-2"
    }))
    .expect("config");
    assert_eq!(pinned.resolve_region().expect("region"), "us-east-2");
}
