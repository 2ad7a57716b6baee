// # ddns-redirect
//
// Single-shot CLI that points `<record>.<domain>.` at a URL through a
// Huawei Cloud DNS REDIRECT_URL record, then exits.
//
// This binary is a THIN integration layer:
// - Parse flags / `DDNS_*` environment variables and validate them
// - Initialize logging and the runtime
// - Construct the provider and run one reconciliation
// - Translate the result into an exit code
//
// All lookup and upsert logic lives in ddns-core.
//
// ## Example
//
// ```bash
// export DDNS_ACCESS_KEY=your_ak
// export DDNS_SECRET_KEY=your_sk
//
// ddns-redirect --record w --domain example.com --url https://home.example.net:8443
// ```
//
// `DDNS_MODE=dry-run` (or `--dry-run`) performs the lookups and logs the
// create or update that would be issued without sending it.

mod cli;

use clap::Parser;
use cli::{Cli, parse_log_level};
use ddns_core::{DdnsConfig, Error, Reconciler, Reconciliation, Stage, UpsertOutcome};
use ddns_provider_huaweicloud::HuaweiCloudProvider;
use std::env;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: The record was created or updated (or would be, in dry-run mode)
/// - 1: Configuration or startup error, no request was sent
/// - 2: A reconciliation stage failed
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Run completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Zone lookup, record lookup, create or update failed
    ReconcileError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let mut cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                DdnsExitCode::ConfigError.into()
            } else {
                // --help / --version
                DdnsExitCode::Success.into()
            };
        }
    };

    if dry_run_mode_from_env() {
        cli.dry_run = true;
    }

    let log_level = match parse_log_level(&cli.log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration validation error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration validation error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddns-redirect");

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    rt.block_on(run(config)).into()
}

/// `DDNS_MODE=dry-run` enables dry-run mode
fn dry_run_mode_from_env() -> bool {
    env::var("DDNS_MODE")
        .map(|mode| mode.eq_ignore_ascii_case("dry-run"))
        .unwrap_or(false)
}

async fn run(config: DdnsConfig) -> DdnsExitCode {
    let provider = match HuaweiCloudProvider::new(&config.provider) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to initialize provider: {}", e);
            return DdnsExitCode::ConfigError;
        }
    };

    info!("Using endpoint {}", provider.endpoint());

    let desired = config.record.desired_state();
    let result = Reconciler::with_config(&provider, config.reconcile)
        .run(&desired)
        .await;

    match result {
        Ok(report) => {
            report_success(&report);
            DdnsExitCode::Success
        }
        Err(e) => {
            report_failure(&e);
            DdnsExitCode::ReconcileError
        }
    }
}

fn report_success(report: &Reconciliation) {
    match &report.outcome {
        UpsertOutcome::Created { id } => info!(
            "Record created: {} -> {} (id: {}, zone: {})",
            report.record_name, report.value, id, report.zone_id
        ),
        UpsertOutcome::Updated { id } => info!(
            "Record updated: {} -> {} (id: {}, zone: {})",
            report.record_name, report.value, id, report.zone_id
        ),
        UpsertOutcome::WouldCreate => warn!(
            "[DRY-RUN] Record {} would be created with {}",
            report.record_name, report.value
        ),
        UpsertOutcome::WouldUpdate { id } => warn!(
            "[DRY-RUN] Record {} (id: {}) would be updated to {}",
            report.record_name, id, report.value
        ),
    }
}

fn report_failure(err: &Error) {
    let what = match err.stage() {
        Some(Stage::ZoneLookup) => "Failed to resolve zone",
        Some(Stage::RecordLookup) => "Failed to look up record",
        Some(Stage::Create) => "Failed to create record",
        Some(Stage::Update) => "Failed to update record",
        None => "Reconciliation failed",
    };

    error!("{}: {}", what, err.root());

    if err.is_not_found() {
        error!("Check that the domain is a public zone hosted by this account");
    } else if err.is_schema() {
        error!("The provider response did not have the expected shape");
    }
}
