//! `OMNIA_*` environment overrides read through the real process environment.
//!
//! Kept in its own test binary with a single test so no other test observes
//! the mutated environment.

use std::path::PathBuf;

use omnia::config;

fn default_toml() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/default.toml")
}

#[test]
fn env_overrides_apply_through_load() {
    let path = default_toml();
    let path = path.to_str().unwrap();

    // SAFETY: this is the only test in this binary, so no other thread reads
    // the environment concurrently.
    unsafe {
        std::env::set_var("OMNIA_DATA_DIR", "/tmp/omnia-env-data");
        std::env::set_var("OMNIA_LOG_LEVEL", "trace");
        std::env::set_var("OMNIA_BIND", "127.0.0.1:3999");
    }

    let overrides = config::Overrides::from_env();
    assert_eq!(overrides.data_dir.as_deref(), Some("/tmp/omnia-env-data"));
    assert_eq!(overrides.log_level.as_deref(), Some("trace"));
    assert_eq!(overrides.bind.as_deref(), Some("127.0.0.1:3999"));

    let cfg = config::load(Some(path)).unwrap();
    assert_eq!(cfg.data_dir, PathBuf::from("/tmp/omnia-env-data"));
    assert_eq!(cfg.log_level, "trace");
    assert_eq!(cfg.bind, "127.0.0.1:3999");
    assert_eq!(cfg.mind_path(), PathBuf::from("/tmp/omnia-env-data/mind.json"));

    unsafe {
        std::env::remove_var("OMNIA_DATA_DIR");
        std::env::remove_var("OMNIA_LOG_LEVEL");
        std::env::remove_var("OMNIA_BIND");
    }

    let cfg = config::load(Some(path)).unwrap();
    assert_eq!(cfg.bind, "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.data_dir, PathBuf::from("Nova"));
}
