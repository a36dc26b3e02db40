use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{
        header::{HeaderName, HeaderValue, CONTENT_TYPE},
        Method, Request,
    },
    middleware,
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Router,
};
use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::Mutex;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use td_core::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use td_core::outreach::{create_backend, OutreachGenerator, OutreachRuntimeConfig};
use td_core::search::{create_search_backend, FixtureSearchBackend, SearchBackend};
use td_core::session::SearchSession;

pub mod error;
pub mod handlers;

use error::ApiError;
use handlers::{candidates, health, outreach, search, selection, swipe, weights};

const SHUTDOWN_DRAIN_GRACE: std::time::Duration = std::time::Duration::from_millis(200);

#[derive(Debug, Clone, Parser)]
#[command(name = "td-api", about = "HTTP API for the talentdeck GUI")]
struct Cli {
    /// Server port
    #[arg(long, env = "TD_PORT", default_value_t = 3400)]
    port: u16,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "TD_CORS_ORIGINS", default_value = "http://localhost:3000")]
    cors_origins: String,

    /// Search backend to wire in
    #[arg(long, env = "TD_SEARCH_BACKEND", default_value = "fixture")]
    search_backend: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub search_backend: String,
}

impl AppConfig {
    fn from_cli(cli: Cli) -> Result<Self, ApiError> {
        let cors_origins = cli
            .cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect::<Vec<_>>();

        if cors_origins.iter().any(|origin| origin == "*") {
            return Err(ApiError::BadRequest(
                "TD_CORS_ORIGINS must list explicit origins when credentials are enabled".into(),
            ));
        }

        Ok(Self {
            port: cli.port,
            cors_origins,
            search_backend: cli.search_backend,
        })
    }

    pub fn for_tests() -> Self {
        Self {
            port: 3400,
            cors_origins: vec!["http://localhost:3000".into()],
            search_backend: "fixture".into(),
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    /// One in-memory session; state transitions apply one user action at a
    /// time, in the order received.
    pub session: Mutex<SearchSession>,
    pub search: Box<dyn SearchBackend>,
    pub generator: OutreachGenerator,
    pub readiness: AtomicBool,
}

pub type SharedState = Arc<AppState>;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}

async fn attach_request_id_context(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    Ok(error::with_request_id(request_id, next.run(req)).await)
}

pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_header = request_id_header.clone();

    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(&trace_header)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let api_routes = Router::new()
        .route("/search", post(search::run_search))
        .route("/candidates", get(candidates::list_candidates))
        .route("/candidates/sort", post(candidates::toggle_sort))
        .route(
            "/weights",
            get(weights::get_weights).put(weights::replace_weights),
        )
        .route("/weights/criteria", post(weights::upsert_criterion))
        .route("/weights/criteria/:key", delete(weights::remove_criterion))
        .route("/swipe/next", get(swipe::next_candidate))
        .route("/swipe", post(swipe::record_swipe))
        .route("/swipe/reset", post(swipe::reset_swipe))
        .route("/selection", get(selection::list_selection))
        .route("/selection/toggle", post(selection::toggle_selection))
        .route("/selection/clear", post(selection::clear_selection))
        .route("/outreach", post(outreach::generate_outreach));

    Router::new()
        .route("/livez", get(health::livez))
        .route("/readyz", get(health::readyz))
        .nest("/api", api_routes)
        .layer(middleware::from_fn(attach_request_id_context))
        .layer(DefaultBodyLimit::max(256 * 1024))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid::default(),
        ))
        .layer(cors)
        .with_state(state)
}

/// Fully wired in-memory state for router tests.
pub fn test_state() -> SharedState {
    Arc::new(AppState {
        config: AppConfig::for_tests(),
        session: Mutex::new(SearchSession::new()),
        search: Box::new(FixtureSearchBackend::new()),
        generator: OutreachGenerator::template_only(),
        readiness: AtomicBool::new(true),
    })
}

pub async fn run() -> Result<(), ApiError> {
    dotenv().ok();
    init_tracing_subscriber("td-api");
    install_tracing_panic_hook("td-api");

    let cli = Cli::parse();
    let config = AppConfig::from_cli(cli)?;

    let outreach_config = OutreachRuntimeConfig::from_env();
    let outreach_backend = if outreach_config.enabled {
        outreach_config.backend.as_str()
    } else {
        "template"
    };

    let state = Arc::new(AppState {
        search: create_search_backend(&config.search_backend),
        generator: OutreachGenerator::new(create_backend(outreach_backend)),
        session: Mutex::new(SearchSession::new()),
        config: config.clone(),
        readiness: AtomicBool::new(true),
    });

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let app = create_router(state.clone());

    info!(
        %addr,
        search_backend = state.search.name(),
        outreach_backend,
        "td-api listening"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.clone()))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(())
}

async fn shutdown_signal(state: SharedState) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    state.readiness.store(false, Ordering::SeqCst);

    // Give load balancers a brief window to observe /readyz as not ready
    // before axum stops accepting new connections.
    tokio::time::sleep(SHUTDOWN_DRAIN_GRACE).await;
}
