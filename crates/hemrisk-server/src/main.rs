mod dto;
mod error;
mod handlers;
mod services;
mod state;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, Request, Response};
use axum::routing::{get, post};
use axum::Router;
use hemrisk_engine::RiskEngine;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::state::ServerState;

const DEFAULT_MODEL_PATH: &str = "model/multitask_lstm.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Origins the browser frontend is served from.
const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .compact()
        .init();

    // The artifact must load before the listener binds; a missing or
    // incompatible model means the process does not serve at all.
    let model_path = env::var("MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_PATH.into());
    let engine = RiskEngine::load(&model_path)
        .with_context(|| format!("cannot serve without a valid model artifact at {model_path}"))?;
    let state = Arc::new(ServerState::new(engine));

    let app = router(state)?;

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<ServerState>) -> Result<Router> {
    let mut origins = Vec::new();
    for origin in ALLOWED_ORIGINS {
        origins.push(origin.parse::<HeaderValue>()?);
    }
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/predict", post(handlers::predict::predict))
        .layer(trace_layer);

    Ok(Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state))
}
