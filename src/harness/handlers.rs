//! Endpoint handlers.
//!
//! Every handler except [`health`] counts as one request. Log levels and
//! response keys are part of the contract with the downstream pipeline.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{de, Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::harness::logs;
use crate::http::response::{
    GenerateLogsResponse, HealthResponse, HelloResponse, ProcessResponse, WarningResponse,
};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Query parameters for [`hello`]. An empty `name` falls back to the default.
#[derive(Debug, Default, Deserialize)]
pub struct HelloParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
}

const DEFAULT_NAME: &str = "World";

#[derive(Debug, Default, Deserialize)]
pub struct SimulateErrorParams {
    #[serde(default, rename = "throwException", deserialize_with = "empty_as_none")]
    pub throw_exception: Option<bool>,
}

/// Query parameters for [`generate_logs`]. Any `i64` is accepted; negative
/// counts emit nothing.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateLogsParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub count: Option<i64>,
}

/// Treat a present but empty query value like a missing one.
fn empty_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// `GET /hello`: greet the caller by name.
pub async fn hello(
    State(state): State<AppState>,
    Query(params): Query<HelloParams>,
) -> Json<HelloResponse> {
    let name = params.name.as_deref().unwrap_or(DEFAULT_NAME);
    let request_number = state.counter.increment();
    tracing::info!(
        name = %name,
        request_count = request_number,
        "Received hello request"
    );

    Json(HelloResponse {
        message: format!("Hello, {name}!"),
        timestamp: now_millis(),
        request_number,
    })
}

/// `POST /process`: echo the payload after a simulated delay.
///
/// The delay is a timer, so other requests keep being served. Shutdown cuts
/// the wait short; the request still completes with the drawn delay.
pub async fn process(
    State(state): State<AppState>,
    Json(data): Json<Map<String, Value>>,
) -> Json<ProcessResponse> {
    let request_number = state.counter.increment();
    tracing::info!(
        request_count = request_number,
        data_size = data.len(),
        "Processing data request"
    );
    tracing::debug!(
        payload = %serde_json::to_string(&data).unwrap_or_default(),
        "Request payload"
    );

    let sim = &state.simulation;
    let delay_ms = sim.min_delay_ms + state.random.below(sim.delay_spread_ms);
    metrics::record_processing_delay(delay_ms);

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_millis(delay_ms)) => {}
        _ = state.shutdown.wait() => {
            tracing::error!(delay_ms, "Processing interrupted");
        }
    }

    tracing::info!(processing_time_ms = delay_ms, "Processing completed in {delay_ms}ms");

    Json(ProcessResponse {
        status: "processed".to_string(),
        processing_time_ms: delay_ms,
        received_data: data,
        request_number,
    })
}

/// `GET /simulate-error`: log a warning, optionally fail with a 500.
pub async fn simulate_error(
    State(state): State<AppState>,
    Query(params): Query<SimulateErrorParams>,
) -> Result<Json<WarningResponse>> {
    let throw_exception = params.throw_exception.unwrap_or(false);
    let request_number = state.counter.increment();
    tracing::warn!(throw_exception, "Error simulation endpoint called");

    if throw_exception {
        tracing::error!(request_count = request_number, "Simulating application error!");
        return Err(AppError::simulated());
    }

    tracing::info!("Logged warning without throwing exception");
    Ok(Json(WarningResponse {
        message: "Warning logged successfully".to_string(),
        request_number,
    }))
}

/// `GET /generate-logs`: emit `count` synthetic entries of random severity.
///
/// Counts as a single request no matter how many entries are emitted. The
/// blocking task owns the run through to the counter increment, so a client
/// that disconnects mid-run still leaves the tally consistent.
pub async fn generate_logs(
    State(state): State<AppState>,
    Query(params): Query<GenerateLogsParams>,
) -> Result<Json<GenerateLogsResponse>> {
    let count = params
        .count
        .unwrap_or_else(|| i64::try_from(state.simulation.default_log_count).unwrap_or(i64::MAX));
    let entries = u64::try_from(count).unwrap_or(0);
    if let Some(max) = state.simulation.max_log_count {
        if entries > max {
            tracing::warn!(count, max, "Rejected log generation request");
            return Err(AppError::BadRequest(format!(
                "count {count} exceeds the configured limit of {max}"
            )));
        }
    }

    tracing::info!(count, "Starting log generation");

    // Large counts must not stall the async workers.
    let counter = state.counter.clone();
    let random = state.random.clone();
    let span = tracing::Span::current();
    let dispatch = tracing::dispatcher::get_default(|d| d.clone());
    let request_number = tokio::task::spawn_blocking(move || {
        tracing::dispatcher::with_default(&dispatch, || {
            let _entered = span.enter();
            let tally = logs::generate(entries, random.as_ref());
            tracing::info!(
                count,
                trace = tally.trace,
                debug = tally.debug,
                info = tally.info,
                warn = tally.warn,
                "Log generation completed, generated {count} log entries"
            );
            metrics::record_generated_logs(&tally);
            counter.increment()
        })
    })
    .await
    .map_err(|e| AppError::Internal(format!("log generation task failed: {e}")))?;

    Ok(Json(GenerateLogsResponse {
        status: "completed".to_string(),
        logs_generated: count,
        request_number,
    }))
}

/// `GET /health`: liveness and request tally. Not counted.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP".to_string(),
        total_requests: state.counter.current(),
        timestamp: now_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::harness::{RequestCounter, SeededRandom};
    use crate::lifecycle::Shutdown;
    use crate::test_support::{capture_async, SlowRandom};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Instant;
    use tracing::Level;

    fn test_state(simulation: SimulationConfig) -> AppState {
        AppState {
            counter: Arc::new(RequestCounter::new()),
            random: Arc::new(SeededRandom::new(17)),
            simulation: Arc::new(simulation),
            shutdown: Shutdown::new(),
        }
    }

    fn fast_simulation() -> SimulationConfig {
        SimulationConfig {
            min_delay_ms: 5,
            delay_spread_ms: 10,
            ..SimulationConfig::default()
        }
    }

    fn query<T: serde::de::DeserializeOwned>(raw: &str) -> T {
        let uri: axum::http::Uri = format!("/?{raw}").parse().unwrap();
        Query::<T>::try_from_uri(&uri).unwrap().0
    }

    fn generate_params(count: i64) -> GenerateLogsParams {
        GenerateLogsParams { count: Some(count) }
    }

    #[tokio::test]
    async fn test_hello_counts_and_greets() {
        let state = test_state(SimulationConfig::default());

        let Json(first) = hello(
            State(state.clone()),
            Query(HelloParams {
                name: Some("Ada".into()),
            }),
        )
        .await;
        let Json(second) = hello(State(state.clone()), Query(HelloParams::default())).await;

        assert_eq!(first.message, "Hello, Ada!");
        assert_eq!(first.request_number, 1);
        assert_eq!(second.message, "Hello, World!");
        assert_eq!(second.request_number, 2);
        assert!(second.timestamp >= first.timestamp);
    }

    #[tokio::test]
    async fn test_empty_query_values_fall_back_to_defaults() {
        let state = test_state(SimulationConfig::default());

        let Json(greeting) = hello(State(state.clone()), Query(query("name="))).await;
        assert_eq!(greeting.message, "Hello, World!");

        let Json(warning) = simulate_error(State(state.clone()), Query(query("throwException=")))
            .await
            .unwrap();
        assert_eq!(warning.message, "Warning logged successfully");

        let Json(generated) = generate_logs(State(state.clone()), Query(query("count=")))
            .await
            .unwrap();
        assert_eq!(generated.logs_generated, 10);
        assert_eq!(state.counter.current(), 3);
    }

    #[test]
    fn test_query_values_parse() {
        let hello: HelloParams = query("name=Grace");
        assert_eq!(hello.name.as_deref(), Some("Grace"));

        let error: SimulateErrorParams = query("throwException=true");
        assert_eq!(error.throw_exception, Some(true));

        let generate: GenerateLogsParams = query("count=-5");
        assert_eq!(generate.count, Some(-5));

        let missing: GenerateLogsParams = query("other=1");
        assert_eq!(missing.count, None);
    }

    #[tokio::test]
    async fn test_hello_logs_single_info() {
        let state = test_state(SimulationConfig::default());
        let (_, captured) =
            capture_async(hello(State(state), Query(HelloParams::default()))).await;

        assert_eq!(captured.levels(), [Level::INFO]);
        assert_eq!(captured.messages(), ["Received hello request"]);
    }

    #[tokio::test]
    async fn test_process_echoes_payload_within_delay_bounds() {
        let state = test_state(fast_simulation());
        let payload = json!({"user": "ada", "items": [1, 2, 3], "nested": {"ok": true}});
        let data = payload.as_object().cloned().unwrap();

        let Json(body) = process(State(state.clone()), Json(data)).await;

        assert_eq!(body.status, "processed");
        assert_eq!(Value::Object(body.received_data), payload);
        assert!((5..15).contains(&body.processing_time_ms));
        assert_eq!(body.request_number, 1);
        assert_eq!(state.counter.current(), 1);
    }

    #[tokio::test]
    async fn test_process_default_delay_range() {
        let state = test_state(SimulationConfig::default());
        let started = Instant::now();

        let Json(body) = process(State(state), Json(Map::new())).await;

        assert!((100..=1099).contains(&body.processing_time_ms));
        assert!(started.elapsed() >= Duration::from_millis(body.processing_time_ms));
    }

    #[tokio::test]
    async fn test_process_log_levels() {
        let state = test_state(fast_simulation());
        let data = json!({"k": "v"}).as_object().cloned().unwrap();

        let (Json(body), captured) = capture_async(process(State(state), Json(data))).await;

        assert_eq!(captured.levels(), [Level::INFO, Level::DEBUG, Level::INFO]);
        assert_eq!(
            captured.messages()[2],
            format!("Processing completed in {}ms", body.processing_time_ms)
        );
    }

    #[tokio::test]
    async fn test_process_interrupted_by_shutdown_still_completes() {
        let state = test_state(SimulationConfig {
            min_delay_ms: 5_000,
            ..SimulationConfig::default()
        });
        state.shutdown.trigger();
        let started = Instant::now();

        let (Json(body), captured) =
            capture_async(process(State(state.clone()), Json(Map::new()))).await;

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(body.status, "processed");
        assert!(body.processing_time_ms >= 5_000);
        assert_eq!(state.counter.current(), 1);
        assert_eq!(
            captured.levels(),
            [Level::INFO, Level::DEBUG, Level::ERROR, Level::INFO]
        );
    }

    #[tokio::test]
    async fn test_simulate_error_without_throw() {
        let state = test_state(SimulationConfig::default());
        let (result, captured) = capture_async(simulate_error(
            State(state),
            Query(SimulateErrorParams::default()),
        ))
        .await;
        let Json(body) = result.unwrap();

        assert_eq!(body.message, "Warning logged successfully");
        assert_eq!(body.request_number, 1);
        assert_eq!(captured.levels(), [Level::WARN, Level::INFO]);
    }

    #[tokio::test]
    async fn test_simulate_error_with_throw_still_counts() {
        let state = test_state(SimulationConfig::default());
        let (result, captured) = capture_async(simulate_error(
            State(state.clone()),
            Query(SimulateErrorParams {
                throw_exception: Some(true),
            }),
        ))
        .await;
        let err = result.unwrap_err();

        assert!(matches!(err, AppError::Simulated(_)));
        assert_eq!(err.to_string(), "Simulated error for testing ELK stack");
        assert_eq!(state.counter.current(), 1);
        assert_eq!(captured.levels(), [Level::WARN, Level::ERROR]);
    }

    #[tokio::test]
    async fn test_generate_logs_counts_once() {
        let state = test_state(SimulationConfig::default());

        let Json(body) = generate_logs(State(state.clone()), Query(generate_params(250)))
            .await
            .unwrap();

        assert_eq!(body.status, "completed");
        assert_eq!(body.logs_generated, 250);
        assert_eq!(body.request_number, 1);
        assert_eq!(state.counter.current(), 1);
    }

    #[tokio::test]
    async fn test_generate_logs_bracketed_by_info() {
        let state = test_state(SimulationConfig::default());

        let (result, captured) =
            capture_async(generate_logs(State(state), Query(generate_params(20)))).await;
        result.unwrap();
        let levels = captured.levels();
        let messages = captured.messages();

        assert_eq!(levels.len(), 22);
        assert_eq!(levels.first(), Some(&Level::INFO));
        assert_eq!(levels.last(), Some(&Level::INFO));
        assert_eq!(messages[0], "Starting log generation");
        assert_eq!(messages[21], "Log generation completed, generated 20 log entries");
        assert!(!levels.contains(&Level::ERROR));
    }

    #[tokio::test]
    async fn test_generate_logs_uses_default_count() {
        let state = test_state(SimulationConfig::default());
        let Json(body) = generate_logs(State(state), Query(GenerateLogsParams::default()))
            .await
            .unwrap();
        assert_eq!(body.logs_generated, 10);
    }

    #[tokio::test]
    async fn test_generate_logs_negative_count_is_echoed() {
        let state = test_state(SimulationConfig::default());

        let (result, captured) = capture_async(generate_logs(
            State(state.clone()),
            Query(generate_params(-5)),
        ))
        .await;
        let Json(body) = result.unwrap();

        assert_eq!(body.logs_generated, -5);
        assert_eq!(body.request_number, 1);
        assert_eq!(state.counter.current(), 1);
        assert_eq!(captured.levels(), [Level::INFO, Level::INFO]);
    }

    #[tokio::test]
    async fn test_generate_logs_rejects_count_above_limit() {
        let state = test_state(SimulationConfig {
            max_log_count: Some(100),
            ..SimulationConfig::default()
        });

        let err = generate_logs(State(state.clone()), Query(generate_params(101)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(state.counter.current(), 0);

        let Json(body) = generate_logs(State(state), Query(generate_params(100)))
            .await
            .unwrap();
        assert_eq!(body.logs_generated, 100);
    }

    #[tokio::test]
    async fn test_generate_logs_counts_after_caller_gives_up() {
        let mut state = test_state(SimulationConfig::default());
        state.random = Arc::new(SlowRandom::new(17, Duration::from_millis(1)));

        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            generate_logs(State(state.clone()), Query(generate_params(200))),
        )
        .await;
        assert!(abandoned.is_err());

        let deadline = Instant::now() + Duration::from_secs(5);
        while state.counter.current() == 0 && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(state.counter.current(), 1);
    }

    #[tokio::test]
    async fn test_health_does_not_count() {
        let state = test_state(SimulationConfig::default());
        hello(State(state.clone()), Query(HelloParams::default())).await;

        let (Json(first), captured) = capture_async(health(State(state.clone()))).await;
        let Json(second) = health(State(state)).await;

        assert_eq!(first.status, "UP");
        assert_eq!(first.total_requests, 1);
        assert_eq!(second.total_requests, 1);
        assert!(captured.events.is_empty());
    }
}
