//! HTTP route handlers.

use std::sync::Arc;

use askama::Template;
use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use futures::future::join_all;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::cache::{SearchEntry, SummaryEntry};
use crate::planner::{
    ConfigError, DepartureWindow, Planner, ScenarioFilter, SearchError, SummaryMatrix,
    best_in_window, top_across_scenarios,
};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Upper bound on results per search request.
const MAX_TOP: usize = 100;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/itineraries/search", post(search_itineraries))
        .route("/itineraries/summary", get(summary))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with the loaded trip and search form.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let html = IndexTemplate::new(&state.config, &state.fares)
        .render()
        .map_err(|e| AppError::Internal {
            message: format!("Template error: {e}"),
        })?;
    Ok(Html(html))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Search for the cheapest itineraries.
async fn search_itineraries(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    // An empty body means all defaults.
    let req: SearchItinerariesRequest = if body.is_empty() {
        SearchItinerariesRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid search JSON");
            AppError::BadRequest {
                message: format!("Invalid JSON: {e}"),
            }
        })?
    };

    let windows = state.config.select_windows(req.window.as_deref())?;
    let top = req.top.unwrap_or(state.config.max_results).min(MAX_TOP);
    let key = (req.window.clone(), req.scenario, top);

    let itineraries = state
        .cache
        .search_with(key, run_search(state.clone(), windows, req.scenario, top))
        .await
        .map_err(Arc::unwrap_or_clone)?;

    if accepts_html(&headers) {
        let template = ItineraryListTemplate {
            itineraries: ItineraryView::ranked(&itineraries),
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {e}"),
        })?;
        Ok(Html(html).into_response())
    } else {
        Ok(Json(SearchItinerariesResponse::from_itineraries(&itineraries)).into_response())
    }
}

/// Cheapest itinerary per window, with and without the optional city.
async fn summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SummaryQuery>,
) -> Result<Response, AppError> {
    let windows = state.config.select_windows(query.window.as_deref())?;

    let matrix = state
        .cache
        .summary_with(query.window.clone(), run_summary(state.clone(), windows))
        .await
        .map_err(Arc::unwrap_or_clone)?;

    if accepts_html(&headers) {
        let template = SummaryTableTemplate::new(&matrix, state.config.optional_label());
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {e}"),
        })?;
        Ok(Html(html).into_response())
    } else {
        let optional_city = state.config.optional_city.map(|s| s.city.to_string());
        Ok(Json(SummaryResponse::from_matrix(&matrix, optional_city)).into_response())
    }
}

/// Run a cross-scenario search on the blocking pool.
async fn run_search(
    state: AppState,
    windows: Vec<DepartureWindow>,
    scenario: ScenarioFilter,
    top: usize,
) -> Result<SearchEntry, AppError> {
    debug!(?scenario, top, windows = windows.len(), "running itinerary search");

    let found = tokio::task::spawn_blocking(move || {
        let planner = Planner::new(&state.fares, &state.config);
        top_across_scenarios(&planner, &state.config, scenario, &windows, top)
    })
    .await??;

    Ok(Arc::new(found))
}

/// Run one summary row per window concurrently on the blocking pool.
async fn run_summary(
    state: AppState,
    windows: Vec<DepartureWindow>,
) -> Result<SummaryEntry, AppError> {
    let tasks = windows.into_iter().map(|window| {
        let state = state.clone();
        tokio::task::spawn_blocking(move || {
            let planner = Planner::new(&state.fares, &state.config);
            best_in_window(&planner, &state.config, &window)
        })
    });

    let mut rows = Vec::new();
    for joined in join_all(tasks).await {
        rows.push(joined??);
    }

    Ok(Arc::new(SummaryMatrix { rows }))
}

/// Application error type.
#[derive(Debug, Clone)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        // The request came from the configuration, not the client.
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::UnknownWindow(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal {
            message: format!("search worker failed: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;
    use crate::cache::CacheConfig;
    use crate::fares::FareTable;
    use crate::planner::TripConfig;

    fn state() -> AppState {
        AppState::new(
            FareTable::default(),
            TripConfig::default(),
            &CacheConfig::default(),
        )
    }

    fn html_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        headers
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn accepts_html_header() {
        assert!(accepts_html(&html_headers()));
        assert!(!accepts_html(&HeaderMap::new()));
    }

    #[tokio::test]
    async fn search_returns_json() {
        let body =
            Bytes::from_static(br#"{"window": "late", "scenario": "exclude_only", "top": 2}"#);
        let response = search_itineraries(State(state()), HeaderMap::new(), body)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let itineraries = json["itineraries"].as_array().unwrap();
        assert_eq!(itineraries.len(), 2);
        assert_eq!(itineraries[0]["total_price"], 1695.0);
        assert_eq!(itineraries[0]["window"], "late");
        assert_eq!(itineraries[0]["includes_optional"], false);
    }

    #[tokio::test]
    async fn search_returns_html_fragment() {
        let body =
            Bytes::from_static(br#"{"window": "late", "scenario": "exclude_only", "top": 1}"#);
        let response = search_itineraries(State(state()), html_headers(), body)
            .await
            .unwrap();

        let html = body_text(response).await;
        assert!(html.contains("$1695"));
        assert!(html.contains("itinerary"));
    }

    #[tokio::test]
    async fn repeated_search_hits_cache() {
        let state = state();
        let body = || Bytes::from_static(br#"{"window": "late", "scenario": "exclude_only"}"#);

        search_itineraries(State(state.clone()), HeaderMap::new(), body())
            .await
            .unwrap();
        let key = (Some("late".to_string()), ScenarioFilter::ExcludeOnly, 10);
        let first = state.cache.get_search(&key).await.unwrap();

        search_itineraries(State(state.clone()), HeaderMap::new(), body())
            .await
            .unwrap();
        let second = state.cache.get_search(&key).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn unknown_window_is_bad_request() {
        let body = Bytes::from_static(br#"{"window": "spring"}"#);
        let err = search_itineraries(State(state()), HeaderMap::new(), body)
            .await
            .unwrap_err();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "unknown departure window: spring");
    }

    #[tokio::test]
    async fn invalid_json_is_bad_request() {
        let body = Bytes::from_static(b"{top");
        let err = search_itineraries(State(state()), HeaderMap::new(), body)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn summary_json_for_one_window() {
        let query = SummaryQuery {
            window: Some("late".to_string()),
        };
        let response = summary(State(state()), HeaderMap::new(), Query(query))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["optional_city"], "SHA");
        let rows = json["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["window"], "late");
        assert_eq!(rows[0]["without_optional"]["total_price"], 1695.0);
    }

    #[tokio::test]
    async fn summary_html_lists_every_window() {
        let response = summary(
            State(state()),
            html_headers(),
            Query(SummaryQuery::default()),
        )
        .await
        .unwrap();

        let html = body_text(response).await;
        assert!(html.contains("with SHA"));
        for name in ["early", "mid", "late"] {
            assert!(html.contains(name));
        }
    }

    #[tokio::test]
    async fn index_page_renders() {
        let Html(html) = index_page(State(state())).await.unwrap();
        assert!(html.contains("Trip Planner"));
        assert!(html.contains("NYC"));
    }
}
