use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use verdant_cli::commands::{doctor, migrate, rescore, seed};

#[test]
fn migrate_returns_success_with_valid_env() {
    with_env(
        &[
            ("VERDANT_DATABASE_URL", "sqlite::memory:"),
            ("VERDANT_DATABASE_MAX_CONNECTIONS", "1"),
        ],
        || {
            let result = migrate::run();
            assert_eq!(result.exit_code, 0, "expected successful migrate run");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["command"], "migrate");
            assert_eq!(payload["status"], "ok");
            let message = payload["message"].as_str().unwrap_or("");
            assert!(message.contains("1 migrations applied"), "unexpected message: {message}");
        },
    );
}

#[test]
fn migrate_reports_connection_failures_with_the_db_error_class() {
    with_env(&[("VERDANT_DATABASE_URL", "sqlite:///nonexistent-dir/verdant.db")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 4, "expected db connectivity failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "db_connectivity");
    });
}

#[test]
fn seed_loads_and_verifies_the_demo_catalog() {
    with_env(
        &[
            ("VERDANT_DATABASE_URL", "sqlite::memory:"),
            ("VERDANT_DATABASE_MAX_CONNECTIONS", "1"),
        ],
        || {
            let result = seed::run();
            assert_eq!(result.exit_code, 0, "expected successful seed run");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["command"], "seed");
            assert_eq!(payload["status"], "ok");
            let message = payload["message"].as_str().unwrap_or("");
            assert!(message.contains("6 products"), "unexpected message: {message}");
        },
    );
}

#[test]
fn seed_is_idempotent_across_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("verdant.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());

    with_env(&[("VERDANT_DATABASE_URL", &url)], || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let first_payload = parse_payload(&first.output);
        assert_eq!(first_payload["status"], "ok");

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        let second_payload = parse_payload(&second.output);
        assert_eq!(second_payload["status"], "ok");

        assert_eq!(first_payload["message"], second_payload["message"]);
    });
}

#[test]
fn rescore_touches_every_seeded_product() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("verdant.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());

    with_env(&[("VERDANT_DATABASE_URL", &url)], || {
        let seeded = seed::run();
        assert_eq!(seeded.exit_code, 0, "expected seed success before rescore");

        let result = rescore::run();
        assert_eq!(result.exit_code, 0, "expected successful rescore run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "rescore");
        assert_eq!(payload["status"], "ok");
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("6 products"), "unexpected message: {message}");
    });
}

#[test]
fn rescore_on_an_empty_catalog_reports_zero_updates() {
    with_env(
        &[
            ("VERDANT_DATABASE_URL", "sqlite::memory:"),
            ("VERDANT_DATABASE_MAX_CONNECTIONS", "1"),
        ],
        || {
            let result = rescore::run();
            assert_eq!(result.exit_code, 0, "expected successful rescore run");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["status"], "ok");
            let message = payload["message"].as_str().unwrap_or("");
            assert!(message.contains("0 products"), "unexpected message: {message}");
        },
    );
}

#[test]
fn doctor_reports_the_catalog_state_after_seeding() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("verdant.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());

    with_env(&[("VERDANT_DATABASE_URL", &url)], || {
        let seeded = seed::run();
        assert_eq!(seeded.exit_code, 0, "expected seed success before doctor");

        let report: Value =
            serde_json::from_str(&doctor::run(true)).expect("doctor output should be valid JSON");
        assert_eq!(report["overall_status"], "pass");

        let checks = report["checks"].as_array().expect("checks array");
        let catalog = checks
            .iter()
            .find(|check| check["name"] == "product_catalog")
            .expect("product_catalog check present");
        assert_eq!(catalog["status"], "pass");
        let details = catalog["details"].as_str().unwrap_or("");
        assert!(details.contains("6 products"), "unexpected details: {details}");
    });
}

#[test]
fn doctor_flags_a_missing_schema_in_the_catalog_check() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("verdant.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());

    with_env(&[("VERDANT_DATABASE_URL", &url)], || {
        let report: Value =
            serde_json::from_str(&doctor::run(true)).expect("doctor output should be valid JSON");
        assert_eq!(report["overall_status"], "fail");

        let checks = report["checks"].as_array().expect("checks array");
        let catalog = checks
            .iter()
            .find(|check| check["name"] == "product_catalog")
            .expect("product_catalog check present");
        assert_eq!(catalog["status"], "fail");
        let details = catalog["details"].as_str().unwrap_or("");
        assert!(details.contains("verdant migrate"), "unexpected details: {details}");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "VERDANT_DATABASE_URL",
        "VERDANT_DATABASE_MAX_CONNECTIONS",
        "VERDANT_DATABASE_TIMEOUT_SECS",
        "VERDANT_DATABASE_BUSY_TIMEOUT_MS",
        "VERDANT_GENERATION_API_KEY",
        "VERDANT_GENERATION_BASE_URL",
        "VERDANT_GENERATION_MODEL",
        "VERDANT_GENERATION_TIMEOUT_SECS",
        "VERDANT_GENERATION_MAX_RETRIES",
        "VERDANT_SERVER_BIND_ADDRESS",
        "VERDANT_SERVER_PORT",
        "VERDANT_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "VERDANT_LOG_LEVEL",
        "VERDANT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
