use serde::Serialize;
use verdant_core::config::{AppConfig, LoadOptions};
use verdant_db::{connect, DbPool, ProductRepository, SqlProductRepository};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck { name, status: CheckStatus::Skipped, details: reason.to_string() }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_generation_key(&config));
            checks.extend(database_checks(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            let reason = "skipped because configuration did not load";
            checks.push(skipped("generation_key_presence", reason));
            checks.push(skipped("database_connectivity", reason));
            checks.push(skipped("product_catalog", reason));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_generation_key(config: &AppConfig) -> DoctorCheck {
    let details = if config.generation.api_key.is_some() {
        "generation api key configured".to_string()
    } else {
        "no api key configured; comparison summaries fall back and tips/analysis answer 502"
            .to_string()
    };
    DoctorCheck { name: "generation_key_presence", status: CheckStatus::Pass, details }
}

/// Connectivity and catalog checks share one pool so the report reflects a
/// single view of the configured database.
fn database_checks(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            let details = format!("failed to initialize async runtime: {error}");
            return vec![
                DoctorCheck {
                    name: "database_connectivity",
                    status: CheckStatus::Fail,
                    details: details.clone(),
                },
                skipped("product_catalog", &details),
            ];
        }
    };

    runtime.block_on(async {
        let pool = match connect(&config.database).await {
            Ok(pool) => pool,
            Err(error) => {
                return vec![
                    DoctorCheck {
                        name: "database_connectivity",
                        status: CheckStatus::Fail,
                        details: format!("failed to connect to database: {error}"),
                    },
                    skipped("product_catalog", "skipped because the database is unreachable"),
                ];
            }
        };

        let connectivity = DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Pass,
            details: format!(
                "connected using `{}` (busy timeout {} ms)",
                config.database.url, config.database.busy_timeout_ms
            ),
        };
        let catalog = check_product_catalog(&pool).await;
        pool.close().await;
        vec![connectivity, catalog]
    })
}

async fn check_product_catalog(pool: &DbPool) -> DoctorCheck {
    let repository = SqlProductRepository::new(pool.clone());
    match repository.list_all().await {
        Ok(products) => {
            let scored =
                products.iter().filter(|product| product.sustainability_score.is_some()).count();
            DoctorCheck {
                name: "product_catalog",
                status: CheckStatus::Pass,
                details: format!("{} products on record, {scored} scored", products.len()),
            }
        }
        Err(error) => DoctorCheck {
            name: "product_catalog",
            status: CheckStatus::Fail,
            details: format!("catalog query failed (run `verdant migrate` first): {error}"),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
