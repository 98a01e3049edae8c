use credwatch::config::Config;
use credwatch::error::CredwatchError;

fn clear_all() -> Vec<(&'static str, Option<&'static str>)> {
    vec![
        ("SERVICE_URL", None),
        ("SERVICE_KEY", None),
        ("LOGLEVEL", None),
    ]
}

#[test]
fn missing_service_url_is_a_configuration_error() {
    temp_env::with_vars(
        vec![
            ("SERVICE_URL", None),
            ("SERVICE_KEY", Some("secret")),
            ("LOGLEVEL", None),
        ],
        || {
            let err = Config::from_env().expect_err("config must not build");
            assert!(matches!(err, CredwatchError::Configuration(_)));
        },
    );
}

#[test]
fn missing_service_key_is_a_configuration_error() {
    temp_env::with_vars(
        vec![
            ("SERVICE_URL", Some("https://db.example.com")),
            ("SERVICE_KEY", None),
            ("LOGLEVEL", None),
        ],
        || {
            let err = Config::from_env().expect_err("config must not build");
            assert!(matches!(err, CredwatchError::Configuration(_)));
        },
    );
}

#[test]
fn both_missing_is_a_configuration_error() {
    temp_env::with_vars(clear_all(), || {
        assert!(Config::from_env().is_err());
    });
}

#[test]
fn empty_service_key_is_rejected() {
    temp_env::with_vars(
        vec![
            ("SERVICE_URL", Some("https://db.example.com")),
            ("SERVICE_KEY", Some("   ")),
            ("LOGLEVEL", None),
        ],
        || {
            let err = Config::from_env().expect_err("config must not build");
            assert!(matches!(err, CredwatchError::EmptyServiceKey));
        },
    );
}

#[test]
fn unparseable_service_url_is_rejected() {
    temp_env::with_vars(
        vec![
            ("SERVICE_URL", Some("not a url")),
            ("SERVICE_KEY", Some("secret")),
            ("LOGLEVEL", None),
        ],
        || {
            assert!(Config::from_env().is_err());
        },
    );
}

#[test]
fn valid_environment_builds_a_config() {
    temp_env::with_vars(
        vec![
            ("SERVICE_URL", Some("https://db.example.com")),
            ("SERVICE_KEY", Some("secret")),
            ("LOGLEVEL", None),
        ],
        || {
            let cfg = Config::from_env().expect("config must build");
            assert_eq!(cfg.service_url.as_str(), "https://db.example.com/");
            assert_eq!(cfg.service_key, "secret");
            assert_eq!(cfg.loglevel, "info");
        },
    );
}

#[test]
fn loglevel_override_is_honored() {
    temp_env::with_vars(
        vec![
            ("SERVICE_URL", Some("https://db.example.com")),
            ("SERVICE_KEY", Some("secret")),
            ("LOGLEVEL", Some("debug")),
        ],
        || {
            let cfg = Config::from_env().expect("config must build");
            assert_eq!(cfg.loglevel, "debug");
        },
    );
}
