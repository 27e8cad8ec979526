use nursery_portal::{
    AppConfig,
    config::{ConfigError, Env},
};
use serial_test::serial;
use std::{env, panic};

const CONFIG_VARS: [&str; 11] = [
    "APP_ENV",
    "SUPABASE_URL",
    "NEXT_PUBLIC_SUPABASE_URL",
    "SUPABASE_ANON_KEY",
    "NEXT_PUBLIC_SUPABASE_ANON_KEY",
    "SUPABASE_JWT_SECRET",
    "SITE_URL",
    "NEXT_PUBLIC_SITE_URL",
    "BIND_ADDR",
    "RUST_LOG",
    "DATABASE_URL",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with the given variables set (and every other config variable cleared),
/// restoring the original environment afterwards, even if the test panics.
fn run_with_env<T, R>(vars: &[(&str, &str)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(key, val);
            } else {
                env::remove_var(key);
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_missing_supabase_url_is_fatal() {
    let result = run_with_env(&[("SUPABASE_ANON_KEY", "anon")], AppConfig::try_load);
    assert_eq!(result.unwrap_err(), ConfigError::Missing("SUPABASE_URL"));

    // The panicking loader refuses to produce a config at all.
    let panicked = run_with_env(&[("SUPABASE_ANON_KEY", "anon")], || {
        panic::catch_unwind(AppConfig::load).is_err()
    });
    assert!(panicked, "load() must panic without Supabase settings");
}

#[test]
#[serial]
fn test_missing_anon_key_is_fatal() {
    let result = run_with_env(
        &[("SUPABASE_URL", "https://abcd.supabase.co"), ("SUPABASE_ANON_KEY", "  ")],
        AppConfig::try_load,
    );
    assert_eq!(result.unwrap_err(), ConfigError::Missing("SUPABASE_ANON_KEY"));
}

#[test]
#[serial]
fn test_invalid_supabase_url_is_rejected() {
    let result = run_with_env(
        &[("SUPABASE_URL", "not a url"), ("SUPABASE_ANON_KEY", "anon")],
        AppConfig::try_load,
    );
    assert!(matches!(
        result,
        Err(ConfigError::InvalidUrl {
            var: "SUPABASE_URL",
            ..
        })
    ));
}

#[test]
#[serial]
fn test_next_public_names_are_accepted() {
    let config = run_with_env(
        &[
            ("NEXT_PUBLIC_SUPABASE_URL", "https://abcd.supabase.co/"),
            ("NEXT_PUBLIC_SUPABASE_ANON_KEY", "anon"),
        ],
        AppConfig::load,
    );

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.supabase_url, "https://abcd.supabase.co");
    assert_eq!(config.supabase_anon_key, "anon");
    assert_eq!(config.auth_cookie_name(), "sb-abcd-auth-token");
    // Local fallbacks
    assert_eq!(config.jwt_secret, None);
    assert_eq!(config.site_url, "http://localhost:3000");
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_production_starts_without_jwt_secret() {
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("SUPABASE_URL", "https://abcd.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("SITE_URL", "https://nursery.example.vn"),
        ],
        AppConfig::load,
    );
    assert_eq!(config.env, Env::Production);
    assert_eq!(config.jwt_secret, None);
    assert!(config.secure_cookies());

    // The secret is picked up when present, but never required.
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("SUPABASE_URL", "https://abcd.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("SUPABASE_JWT_SECRET", "secret"),
        ],
        AppConfig::load,
    );
    assert_eq!(config.jwt_secret.as_deref(), Some("secret"));
}
