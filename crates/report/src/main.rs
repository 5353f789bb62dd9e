use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use financeflow_core::alerts;
use financeflow_core::domain::contract::SnapshotPayload;
use financeflow_core::domain::snapshot::{demo_month, FinancialSnapshot};
use financeflow_core::time::month::{days_remaining_in_month, report_date};

#[derive(Debug, Parser)]
#[command(name = "financeflow_report")]
struct Args {
    /// Report as-of date (YYYY-MM-DD). Defaults to today's report-local date.
    #[arg(long)]
    as_of_date: Option<String>,

    /// Snapshot payload JSON file. Defaults to the built-in demo month.
    #[arg(long)]
    snapshot: Option<std::path::PathBuf>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = financeflow_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let utc_offset_minutes = settings.report_utc_offset_minutes.unwrap_or(0);
    let as_of_date = resolve_as_of_date(args.as_of_date.as_deref(), utc_offset_minutes)?;
    let snapshot = load_snapshot(args.snapshot.as_deref())?;

    let now = chrono::Utc::now();
    let batch = alerts::evaluate(&snapshot, as_of_date, now);

    for notification in &batch {
        tracing::info!(
            id = %notification.id,
            kind = ?notification.kind,
            title = %notification.title,
            message = %notification.message,
            "alert"
        );
    }

    tracing::info!(
        %as_of_date,
        alerts = batch.len(),
        days_left = days_remaining_in_month(as_of_date),
        net_balance = snapshot.net_balance,
        "report complete"
    );

    Ok(())
}

fn resolve_as_of_date(
    as_of_date_arg: Option<&str>,
    utc_offset_minutes: i32,
) -> anyhow::Result<chrono::NaiveDate> {
    if let Some(s) = as_of_date_arg {
        return Ok(chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")?);
    }

    report_date(chrono::Utc::now(), utc_offset_minutes)
}

fn load_snapshot(path: Option<&std::path::Path>) -> anyhow::Result<FinancialSnapshot> {
    let Some(path) = path else {
        return Ok(demo_month());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot file {}", path.display()))?;
    let payload: SnapshotPayload =
        serde_json::from_str(&text).context("snapshot file is not a valid snapshot payload")?;
    payload.validate_and_into_snapshot()
}

fn init_sentry(
    settings: &financeflow_core::config::Settings,
) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
