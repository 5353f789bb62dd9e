use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use financeflow_core::alerts::{evaluate, Notification, NotificationFeed};
use financeflow_core::auth::supabase::SupabaseGate;
use financeflow_core::auth::{decide, Access, AuthenticatedUser, SessionGate};
use financeflow_core::domain::contract::SnapshotPayload;
use financeflow_core::domain::ledger::{EntryKind, Ledger, LedgerEntry};
use financeflow_core::domain::snapshot::{
    demo_month, demo_week, FinancialSnapshot, WeekSeries,
};
use financeflow_core::time::month::report_date;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = financeflow_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let gate: Option<Arc<dyn SessionGate>> = match SupabaseGate::from_settings(&settings) {
        Ok(gate) => Some(Arc::new(gate)),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(
                error = %e,
                "identity provider config missing; starting API in degraded mode (protected routes redirect to /login)"
            );
            None
        }
    };

    let state = AppState {
        gate,
        report_utc_offset_minutes: settings.report_utc_offset_minutes.unwrap_or(0),
        data: Arc::new(Mutex::new(AppData::default())),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/login", get(login))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/notifications", get(get_notifications))
        .route("/notifications/:id/read", post(mark_notification_read))
        .route("/ledger", get(get_ledger))
        .route("/ledger/entries", post(add_ledger_entry))
        .route("/snapshot", put(put_snapshot))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_gate_layer,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    gate: Option<Arc<dyn SessionGate>>,
    report_utc_offset_minutes: i32,
    data: Arc<Mutex<AppData>>,
}

impl AppState {
    fn lock(&self) -> MutexGuard<'_, AppData> {
        self.data.lock().expect("app state mutex poisoned")
    }
}

#[derive(Default)]
struct AppData {
    snapshot: Option<FinancialSnapshot>,
    ledger: Ledger,
    feeds: HashMap<Uuid, NotificationFeed>,
}

impl AppData {
    fn current_snapshot(&self) -> FinancialSnapshot {
        self.snapshot.clone().unwrap_or_else(demo_month)
    }
}

/// Session gate over every route. Public routes pass through anonymously;
/// everything else requires a verified session, with deny expressed as a
/// redirect to the login entry point.
async fn session_gate_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let access = match &state.gate {
        Some(gate) => match gate.authorize(&path, token.as_deref()).await {
            Ok(access) => access,
            Err(e) => {
                sentry_anyhow::capture_anyhow(&e);
                tracing::error!(error = %e, path, "session gate failed");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        },
        // Degraded mode: no verifier configured, treat every request as
        // unauthenticated.
        None => decide(&path, None),
    };

    match access {
        Access::Allow(user) => {
            if let Some(user) = user {
                req.extensions_mut().insert(user);
            }
            next.run(req).await
        }
        Access::RedirectTo(target) => Redirect::to(&target).into_response(),
    }
}

async fn login(State(state): State<AppState>) -> Json<serde_json::Value> {
    // The login form itself is the identity provider's hosted widget; this
    // endpoint only tells clients where to go.
    Json(serde_json::json!({
        "message": "Inicia sesión para gestionar tus finanzas",
        "provider": "supabase",
        "configured": state.gate.is_some(),
    }))
}

#[derive(Debug, Serialize)]
struct DashboardSummary {
    month: FinancialSnapshot,
    fixed_expenses_pct: f64,
    taxes_pct: f64,
    week: WeekSeries,
    week_scale_max: f64,
    balance_positive: bool,
}

async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardSummary> {
    let month = state.lock().current_snapshot();
    let week = demo_week();

    Json(DashboardSummary {
        fixed_expenses_pct: month.income_share_pct(month.fixed_expenses),
        taxes_pct: month.income_share_pct(month.taxes),
        week_scale_max: week.scale_max(),
        balance_positive: month.net_balance >= 0.0,
        month,
        week,
    })
}

#[derive(Debug, Serialize)]
struct NotificationsResponse {
    notifications: Vec<Notification>,
    unread_count: usize,
}

async fn get_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<NotificationsResponse>, StatusCode> {
    let now = Utc::now();
    let today = report_date(now, state.report_utc_offset_minutes).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let mut data = state.lock();
    let batch = evaluate(&data.current_snapshot(), today, now);

    let feed = data.feeds.entry(user.id).or_default();
    feed.replace(batch);

    Ok(Json(NotificationsResponse {
        notifications: feed.notifications().to_vec(),
        unread_count: feed.unread_count(),
    }))
}

#[derive(Debug, Serialize)]
struct MarkReadResponse {
    id: String,
    unread_count: usize,
}

async fn mark_notification_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<MarkReadResponse>, StatusCode> {
    let mut data = state.lock();
    let Some(feed) = data.feeds.get_mut(&user.id) else {
        return Err(StatusCode::NOT_FOUND);
    };

    if !feed.mark_as_read(&id) {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(Json(MarkReadResponse {
        id,
        unread_count: feed.unread_count(),
    }))
}

#[derive(Debug, Serialize)]
struct LedgerResponse {
    balance: f64,
    entries: Vec<LedgerEntry>,
}

async fn get_ledger(State(state): State<AppState>) -> Json<LedgerResponse> {
    let data = state.lock();
    Json(LedgerResponse {
        balance: data.ledger.balance(),
        entries: data.ledger.entries().to_vec(),
    })
}

#[derive(Debug, Deserialize)]
struct NewEntry {
    kind: EntryKind,
    amount: f64,
}

async fn add_ledger_entry(
    State(state): State<AppState>,
    Json(body): Json<NewEntry>,
) -> Result<(StatusCode, Json<LedgerResponse>), (StatusCode, String)> {
    let mut data = state.lock();

    if let Err(e) = data.ledger.record(body.kind, body.amount, Utc::now()) {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, format!("{e:#}")));
    }

    Ok((
        StatusCode::CREATED,
        Json(LedgerResponse {
            balance: data.ledger.balance(),
            entries: data.ledger.entries().to_vec(),
        }),
    ))
}

async fn put_snapshot(
    State(state): State<AppState>,
    Json(payload): Json<SnapshotPayload>,
) -> Result<StatusCode, (StatusCode, String)> {
    match payload.validate_and_into_snapshot() {
        Ok(snapshot) => {
            state.lock().snapshot = Some(snapshot);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => Err((StatusCode::UNPROCESSABLE_ENTITY, format!("{e:#}"))),
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
