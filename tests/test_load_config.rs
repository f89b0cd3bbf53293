use std::env;

use devjourney::load_config::{load_config, API_ROOT_ENV, DEFAULT_API_ROOT};
use serial_test::serial;

/// The --api-root flag wins over the environment and loses its trailing slash.
#[test]
#[serial]
fn test_load_config_prefers_flag_over_env() {
    env::set_var(API_ROOT_ENV, "https://env.example.com");

    let config = load_config("secret", Some("https://flag.example.com/")).expect("Config should load");

    assert_eq!(config.api_root, "https://flag.example.com");
    assert_eq!(config.api_key, "secret");
    env::remove_var(API_ROOT_ENV);
}

#[test]
#[serial]
fn test_load_config_reads_api_root_from_env() {
    env::set_var(API_ROOT_ENV, "http://127.0.0.1:9000/");

    let config = load_config("secret", None).expect("Config should load");

    assert_eq!(config.api_root, "http://127.0.0.1:9000");
    env::remove_var(API_ROOT_ENV);
}

#[test]
#[serial]
fn test_load_config_falls_back_to_default_root() {
    env::remove_var(API_ROOT_ENV);

    let config = load_config("secret", None).expect("Config should load");

    assert_eq!(config.api_root, DEFAULT_API_ROOT);
}

#[test]
#[serial]
fn test_load_config_rejects_blank_api_key() {
    let err = load_config("   ", Some("https://api.example.com")).unwrap_err();
    assert!(err.to_string().contains("api-key"), "got: {err}");
}

#[test]
#[serial]
fn test_load_config_rejects_non_http_root() {
    let err = load_config("secret", Some("ftp://api.example.com")).unwrap_err();
    assert!(err.to_string().contains("http"), "got: {err}");
}

#[test]
fn test_debug_output_redacts_api_key() {
    let config = devjourney::config::ClientConfig {
        api_root: "https://api.example.com".into(),
        api_key: "super-secret".into(),
    };
    let debug = format!("{config:?}");
    assert!(!debug.contains("super-secret"), "key leaked: {debug}");
    assert!(debug.contains("https://api.example.com"));
}
