//! Streaming search endpoint.
//!
//! The stream is opened as soon as the request is accepted. Aggregation runs
//! in a background task and the stream carries exactly one terminal event,
//! `results` or `error`, after which it closes. With `progress=true`, one
//! `source` event per settled source precedes the terminal event.

use super::server::AppState;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::StreamExt;
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, error, warn};
use vortex_core::{AggregatedResults, CatalogError, SearchQuery, SourceProgress};

pub const RESULTS_EVENT: &str = "results";
pub const ERROR_EVENT: &str = "error";
pub const SOURCE_EVENT: &str = "source";

const SEARCH_FAILED_BODY: &str = r#"{"error":"Search failed"}"#;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<String>,
    pub year: Option<String>,
    #[serde(default)]
    pub progress: bool,
}

/// GET /api/search - aggregated search as an event stream
pub async fn search_stream(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = match SearchQuery::new(params.keyword.unwrap_or_default()) {
        Ok(q) => q.with_type(params.category).with_year(params.year),
        Err(CatalogError::InvalidInput(msg)) => {
            return (StatusCode::BAD_REQUEST, msg).into_response()
        }
        Err(_) => return (StatusCode::BAD_REQUEST, "Keyword is required").into_response(),
    };
    let identity = state.caller(&headers);
    debug!(keyword = query.keyword(), identity = ?identity, "search stream opened");

    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    tokio::spawn(run_search(state, query, identity, params.progress, tx));

    let stream = UnboundedReceiverStream::new(rx).map(Ok::<_, Infallible>);
    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("keep-alive"),
        )
        .into_response()
}

/// Drive one aggregation and emit its terminal event. Runs the search in its
/// own task so that even a panic still produces the error event.
async fn run_search(
    state: AppState,
    query: SearchQuery,
    identity: Option<String>,
    progress: bool,
    tx: mpsc::UnboundedSender<Event>,
) {
    let progress_tx = progress.then(|| tx.clone());
    let worker = tokio::spawn(async move {
        let search = &state.search;
        match progress_tx {
            None => search.search_all(&query, identity.as_deref()).await,
            Some(events) => {
                let (ptx, mut prx) = mpsc::unbounded_channel::<SourceProgress>();
                let forward = async move {
                    while let Some(p) = prx.recv().await {
                        if let Some(event) = source_event(&p) {
                            let _ = events.send(event);
                        }
                    }
                };
                let (result, ()) = tokio::join!(
                    search.search_all_with_progress(&query, identity.as_deref(), ptx),
                    forward
                );
                result
            }
        }
    });

    let terminal = match worker.await {
        Ok(Ok(results)) => results_event(&results),
        Ok(Err(e)) => {
            warn!(code = e.code_str(), error = %e, "search failed");
            error_event()
        }
        Err(e) => {
            error!(error = %e, "search task aborted");
            error_event()
        }
    };

    if tx.send(terminal).is_err() {
        debug!("client went away before the terminal event");
    }
}

fn results_event(results: &AggregatedResults) -> Event {
    match Event::default().event(RESULTS_EVENT).json_data(results) {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "failed to serialize results");
            error_event()
        }
    }
}

fn source_event(progress: &SourceProgress) -> Option<Event> {
    Event::default()
        .event(SOURCE_EVENT)
        .json_data(progress)
        .map_err(|e| warn!(error = %e, "failed to serialize progress"))
        .ok()
}

fn error_event() -> Event {
    Event::default().event(ERROR_EVENT).data(SEARCH_FAILED_BODY)
}
