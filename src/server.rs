//! HTTP surface of the dashboard built on axum.
//!
//! Every `GET /` is one complete render pass; requests share nothing but the
//! immutable configuration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tracing::{error, info};

use crate::dashboard::render_pass;
use crate::data::DataSource;
use crate::error::DashError;
use crate::sidebar::SelectionInput;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8501";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: DataSource,
    pub addr: SocketAddr,
}

type SharedConfig = Arc<DashboardConfig>;

impl IntoResponse for DashError {
    fn into_response(self) -> Response {
        let status = if self.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, self.to_string()).into_response()
    }
}

/// Build the router with `/` and `/health`.
pub fn router(config: DashboardConfig) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/health", get(health_handler))
        .with_state(Arc::new(config))
}

/// Runs the render pass on the blocking pool; the fetch is a blocking call.
async fn dashboard_handler(
    State(config): State<SharedConfig>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>, DashError> {
    let start = Instant::now();
    let input = SelectionInput::from_query(&pairs);

    let page = tokio::task::spawn_blocking(move || {
        render_pass(&config.source, &input).and_then(|dashboard| dashboard.to_html())
    })
    .await?
    .inspect_err(|err| error!(%err, "render pass aborted"))?;

    info!(elapsed = ?start.elapsed(), bytes = page.len(), "dashboard rendered");
    Ok(Html(page))
}

async fn health_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

pub async fn serve(config: DashboardConfig) -> Result<(), std::io::Error> {
    let addr = config.addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(source = %config.source, "dashboard listening on http://{}", addr);
    axum::serve(listener, router(config)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use tower::ServiceExt;

    fn config(source: &str) -> DashboardConfig {
        DashboardConfig {
            source: DataSource::from(source),
            addr: DEFAULT_ADDR.parse().unwrap(),
        }
    }

    fn fixture_config() -> DashboardConfig {
        config(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/movies.csv"))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let req = axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let resp = ServiceExt::<axum::http::Request<Body>>::oneshot(app, req)
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 10_000_000)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, body) = get(router(fixture_config()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_first_load() {
        let (status, body) = get(router(fixture_config()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Interactive Dashboard"));
        assert!(body.contains("<option value=\"Horror\" selected>Horror</option>"));
        assert!(body.contains("<option value=\"1980\" selected>1980</option>"));
    }

    #[tokio::test]
    async fn test_interaction_reruns_with_selection() {
        let (status, body) = get(
            router(fixture_config()),
            "/?submitted=1&genre=Horror&genre=Fantasy&year=1981&score_min=7&score_max=9",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<td>The Evil Dead</td>"));
        assert!(body.contains("<td>Clash of the Titans</td>"));
        assert!(!body.contains("<td>Heavy Metal</td>"));
        assert!(body.contains("<option value=\"Animation\">Animation</option>"));
        assert!(body.contains("Choose a value: 7.0 &ndash; 9.0"));
    }

    #[tokio::test]
    async fn test_empty_genre_selection_renders() {
        let (status, body) = get(router(fixture_config()), "/?submitted=1&year=1980").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("<td class=\"index\">"));
    }

    #[tokio::test]
    async fn test_broken_source_is_a_server_error() {
        let (status, _) = get(router(config("/nonexistent/movies.csv")), "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
