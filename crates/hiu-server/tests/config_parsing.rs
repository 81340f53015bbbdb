use std::{env, fs, time::Duration};

use hiu_server::config::loader::load_config;

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("hiu.toml");

    let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8081
body_limit_bytes = 4096

[gateway]
base_url = "http://gateway.local:8000"
request_timeout_ms = 1500
bearer_token = "secret"

[hiu]
id = "hiu-test"

[cache]
result_ttl_secs = 120
correlation_ttl_secs = 30

[logging]
level = "debug"
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses, missing keys take defaults
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.gateway.base_url, "http://gateway.local:8000");
    assert_eq!(cfg.gateway_timeout(), Duration::from_millis(1500));
    assert_eq!(cfg.gateway.bearer_token.as_deref(), Some("secret"));
    assert_eq!(cfg.hiu.id, "hiu-test");
    assert_eq!(cfg.cache.result_ttl(), Duration::from_secs(120));
    assert_eq!(cfg.cache.cleanup_interval_secs, 60);
    assert_eq!(cfg.logging.level.to_ascii_lowercase(), "debug");

    // 2) Env override should win over file
    unsafe {
        env::set_var("HIU__GATEWAY__REQUEST_TIMEOUT_MS", "5000");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.gateway.request_timeout_ms, 5000);
    unsafe {
        env::remove_var("HIU__GATEWAY__REQUEST_TIMEOUT_MS");
    }

    // 3) Invalid config should error
    let invalid_path = dir.path().join("invalid.toml");
    let invalid_toml = r#"
[gateway]
base_url = "http://gateway.local:8000"
request_timeout_ms = 0
"#;
    fs::write(&invalid_path, invalid_toml).expect("write invalid toml");
    let err = load_config(invalid_path.to_str()).expect_err("expected validation error");
    assert!(err.contains("request_timeout_ms must be > 0"));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("absent.toml");

    let cfg = load_config(path.to_str()).expect("defaults should be valid");
    assert_eq!(cfg.hiu.id, "10000005");
    assert_eq!(cfg.cache.result_ttl_secs, 300);
}
