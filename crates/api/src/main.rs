use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dotyield_core::catalog::Catalog;
use dotyield_core::domain::asset::{AssetId, AssetInfo};
use dotyield_core::domain::protocol::Protocol;
use dotyield_core::domain::recommendation::Recommendation;
use dotyield_core::domain::selection::Selection;
use dotyield_core::error::UnknownAssetError;
use dotyield_core::recommender;
use dotyield_core::session::flow::{self, Page};
use dotyield_core::session::{short_address, Session, WalletState};

mod wallet;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = dotyield_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let catalog = match settings.load_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "catalog load failed");
            return Err(e);
        }
    };

    let state = AppState {
        catalog: Arc::new(catalog),
        session: Arc::new(Mutex::new(Session::new())),
        connect_delay: settings.wallet_connect_delay(),
        mock_address: Arc::from(settings.mock_wallet_address.as_str()),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/assets", get(list_assets))
        .route("/assets/:asset/protocols", get(get_asset_protocols))
        .route("/recommendations", get(get_recommendation))
        .route("/session", get(get_session))
        .route("/session/wallet/connect", post(connect_wallet))
        .route("/session/wallet/disconnect", post(disconnect_wallet))
        .route("/session/assets/:asset/toggle", post(toggle_asset))
        .route("/session/optimize", post(optimize))
        .route("/session/reset", post(reset_session))
        .route("/pages/resolve", get(resolve_page))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));

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

#[derive(Debug, Clone)]
struct AppState {
    catalog: Arc<Catalog>,
    session: Arc<Mutex<Session>>,
    connect_delay: Duration,
    mock_address: Arc<str>,
}

#[derive(Debug, Serialize)]
struct ApiProtocol {
    #[serde(flatten)]
    protocol: Protocol,
    risk_label: &'static str,
}

impl From<Protocol> for ApiProtocol {
    fn from(protocol: Protocol) -> Self {
        let risk_label = protocol.risk_level().label();
        Self {
            protocol,
            risk_label,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiAssetProtocols {
    asset: AssetInfo,
    protocols: Vec<ApiProtocol>,
}

#[derive(Debug, Serialize)]
struct ApiRecommendation {
    generated_at: DateTime<Utc>,
    recommendation: Recommendation,
}

#[derive(Debug, Serialize)]
struct SessionView {
    wallet: WalletState,
    short_address: Option<String>,
    selection: Vec<AssetId>,
    can_optimize: bool,
    recommendation: Option<Recommendation>,
}

impl SessionView {
    fn new(session: &Session, catalog: &Catalog) -> Self {
        Self {
            wallet: session.wallet().clone(),
            short_address: session.wallet().address().map(short_address),
            selection: catalog
                .canonical_order(session.selection())
                .into_iter()
                .cloned()
                .collect(),
            can_optimize: session.can_optimize(),
            recommendation: session.recommendation().cloned(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecommendationQuery {
    assets: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    path: Option<String>,
}

#[derive(Debug, Serialize)]
struct PageResolution {
    requested: Page,
    resolved: Page,
    route: Option<&'static str>,
}

async fn list_assets(State(state): State<AppState>) -> Json<Vec<AssetInfo>> {
    Json(state.catalog.assets().cloned().collect())
}

async fn get_asset_protocols(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> Result<Json<ApiAssetProtocols>, StatusCode> {
    let asset = AssetId::new(asset);
    let info = state.catalog.asset(&asset).ok_or(StatusCode::NOT_FOUND)?;
    let protocols = state
        .catalog
        .protocols(&asset)
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Ok(Json(ApiAssetProtocols {
        asset: info.clone(),
        protocols: recommender::scored(protocols)
            .into_iter()
            .map(ApiProtocol::from)
            .collect(),
    }))
}

async fn get_recommendation(
    State(state): State<AppState>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<ApiRecommendation>, StatusCode> {
    let selection = parse_selection(query.assets.as_deref()).ok_or(StatusCode::BAD_REQUEST)?;

    let recommendation = recommender::recommend(&state.catalog, &selection).map_err(|e| {
        tracing::debug!(error = %e, "recommendation rejected");
        StatusCode::BAD_REQUEST
    })?;

    Ok(Json(ApiRecommendation {
        generated_at: Utc::now(),
        recommendation,
    }))
}

async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(SessionView::new(&session, &state.catalog))
}

async fn connect_wallet(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    let started = wallet::spawn_connect(
        state.session.clone(),
        state.connect_delay,
        state.mock_address.clone(),
    )
    .await
    .is_some();

    let session = state.session.lock().await;
    let status = if started {
        StatusCode::ACCEPTED
    } else {
        StatusCode::OK
    };
    (status, Json(SessionView::new(&session, &state.catalog)))
}

async fn disconnect_wallet(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.disconnect();
    Json(SessionView::new(&session, &state.catalog))
}

async fn toggle_asset(
    State(state): State<AppState>,
    Path(asset): Path<String>,
) -> Result<Json<SessionView>, StatusCode> {
    let mut session = state.session.lock().await;
    session
        .toggle_asset(&state.catalog, AssetId::new(asset))
        .map_err(|e| {
            if e.downcast_ref::<UnknownAssetError>().is_some() {
                StatusCode::NOT_FOUND
            } else {
                internal_error(e)
            }
        })?;
    Ok(Json(SessionView::new(&session, &state.catalog)))
}

async fn optimize(State(state): State<AppState>) -> Result<Json<ApiRecommendation>, StatusCode> {
    let mut session = state.session.lock().await;
    if !session.can_optimize() {
        return Err(StatusCode::CONFLICT);
    }

    let recommendation = session
        .optimize(&state.catalog)
        .map_err(internal_error)?
        .clone();

    Ok(Json(ApiRecommendation {
        generated_at: Utc::now(),
        recommendation,
    }))
}

async fn reset_session(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.reset();
    Json(SessionView::new(&session, &state.catalog))
}

async fn resolve_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<PageResolution> {
    let requested = Page::from_path(query.path.as_deref().unwrap_or("/"));
    let session = state.session.lock().await;
    let resolved = flow::resolve(
        requested,
        session.wallet().is_connected(),
        !session.selection().is_empty(),
    );

    Json(PageResolution {
        requested,
        resolved,
        route: resolved.route(),
    })
}

/// `None` when the parameter is missing or names no asset.
fn parse_selection(assets: Option<&str>) -> Option<Selection> {
    let selection: Selection = AssetId::parse_list(assets?).into_iter().collect();
    if selection.is_empty() {
        return None;
    }
    Some(selection)
}

fn internal_error(e: anyhow::Error) -> StatusCode {
    sentry_anyhow::capture_anyhow(&e);
    tracing::error!(error = %e, "request failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &dotyield_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
