//! axum HTTP API: router, shared state and server lifecycle.
//!
//! Handlers validate their parameters, build a `fundlens_query` builder and
//! run it on the blocking pool against the shared [`Db`].

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::db::Db;
use crate::rate_limiter::{RateLimiters, Tier};

mod candidates;
mod committees;
mod contributions;
mod contributors;
mod error;
mod metadata;
mod params;
mod races;
mod rate_limit;
mod search;

pub use error::ApiError;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Db>>,
    pub config: Arc<Config>,
    limiters: Arc<RateLimiters>,
}

impl AppState {
    pub fn new(db: Db, config: Config) -> Self {
        let limiters = RateLimiters::new(
            config.rate_limit_enabled,
            config.rate_limit_default,
            config.rate_limit_search,
            config.rate_limit_stats,
        );
        Self {
            db: Arc::new(Mutex::new(db)),
            config: Arc::new(config),
            limiters: Arc::new(limiters),
        }
    }

    /// Run `f` against the database on the blocking thread pool.
    pub async fn with_db<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Db) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let guard = db
                .lock()
                .map_err(|_| ApiError::Internal("database lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("database task failed: {e}")))?
    }

    /// Apply the rate limit for `tier` to every route of `router`.
    fn limited(&self, router: Router<AppState>, tier: Tier) -> Router<AppState> {
        let guard = rate_limit::TierGuard {
            limiters: Arc::clone(&self.limiters),
            tier,
        };
        router.route_layer(middleware::from_fn_with_state(guard, rate_limit::enforce))
    }
}

#[derive(Serialize)]
struct RootResponse {
    name: String,
    version: String,
    description: String,
    docs_url: &'static str,
    openapi_url: &'static str,
}

async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        name: state.config.app_name.clone(),
        version: state.config.app_version.clone(),
        description: state.config.app_description.clone(),
        docs_url: "/docs",
        openapi_url: "/openapi.json",
    })
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins = if config.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let parsed: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin {o}");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.cors_allow_credentials)
        .expose_headers([header::RETRY_AFTER])
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let base = state.limited(
        Router::new()
            .route("/", get(root))
            .route("/health", get(health)),
        Tier::Default,
    );
    Router::new()
        .merge(base)
        .nest("/candidates", candidates::routes(&state))
        .nest("/committees", committees::routes(&state))
        .nest("/contributors", contributors::routes(&state))
        .nest("/contributions", contributions::routes(&state))
        .nest("/races", races::race_routes(&state))
        .nest("/states", races::state_routes(&state))
        .nest("/metadata", metadata::routes(&state))
        .nest("/search", search::routes(&state))
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// Bind and serve until Ctrl-C or SIGTERM.
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let address = state.config.bind_address();
    if state.limiters.is_enabled() {
        let limiters = Arc::clone(&state.limiters);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(300));
            loop {
                tick.tick().await;
                limiters.prune();
            }
        });
    }
    let app = router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
