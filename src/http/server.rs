//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers under the configured prefix
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Keep `/generate-logs` out of the request timeout
//! - Bind server to listener and serve until shutdown

use axum::{
    extract::{DefaultBodyLimit, MatchedPath, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{HarnessConfig, SimulationConfig};
use crate::harness::{handlers, RandomSource, RequestCounter, SeededRandom, ThreadRandom};
use crate::http::request::{request_span, MakeRequestUuid};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub counter: Arc<RequestCounter>,
    pub random: Arc<dyn RandomSource>,
    pub simulation: Arc<SimulationConfig>,
    pub shutdown: Shutdown,
}

/// HTTP server for the log harness.
pub struct HttpServer {
    router: Router,
    config: HarnessConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Draws are seeded when `simulation.seed` is set.
    pub fn new(config: HarnessConfig, shutdown: Shutdown) -> Self {
        let random: Arc<dyn RandomSource> = match config.simulation.seed {
            Some(seed) => Arc::new(SeededRandom::new(seed)),
            None => Arc::new(ThreadRandom),
        };
        Self::with_random_source(config, shutdown, random)
    }

    /// Create a server drawing delays and severities from `random`.
    pub fn with_random_source(
        config: HarnessConfig,
        shutdown: Shutdown,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let state = AppState {
            counter: Arc::new(RequestCounter::new()),
            random,
            simulation: Arc::new(config.simulation.clone()),
            shutdown,
        };

        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Log generation runs to completion whatever its size, so it sits
    /// outside the request timeout.
    #[allow(deprecated)]
    fn build_router(config: &HarnessConfig, state: AppState) -> Router {
        let timed = Router::new()
            .route("/hello", get(handlers::hello))
            .route("/process", post(handlers::process))
            .route("/simulate-error", get(handlers::simulate_error))
            .route("/health", get(handlers::health))
            .route_layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )));
        let untimed = Router::new().route("/generate-logs", get(handlers::generate_logs));

        let api = timed
            .merge(untimed)
            .route_layer(middleware::from_fn(track_metrics));

        let prefix = config.api.path_prefix.as_str();
        let routes = if prefix.is_empty() || prefix == "/" {
            api
        } else {
            Router::new().nest(prefix, api)
        };

        routes
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections until shutdown is triggered.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            path_prefix = %self.config.api.path_prefix,
            "HTTP server starting"
        );

        let shutdown = self.state.shutdown.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!(
            total_requests = self.state.counter.current(),
            "HTTP server stopped"
        );
        Ok(())
    }

    /// The fully layered router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The request counter shared by all handlers.
    pub fn counter(&self) -> Arc<RequestCounter> {
        self.state.counter.clone()
    }
}

/// Record request count and latency per matched route.
async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let response = next.run(request).await;
    metrics::record_request(&method, &route, response.status().as_u16(), start);
    response
}
