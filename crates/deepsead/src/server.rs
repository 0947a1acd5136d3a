//! HTTP surface: the scrape endpoint, a health check and a landing page.
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Landing page linking to the metrics path |
//! | GET | `/healthz` | Liveness |
//! | GET | `{metrics_path}` | Prometheus exposition |

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use deepsea_metrics::{encode_text, Registry, CONTENT_TYPE};
use tracing::{debug, error};

/// Shared state for handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
    pub metrics_path: Arc<str>,
}

/// Build the exporter router.
pub fn build_router(registry: Registry, metrics_path: &str) -> Router {
    let state = AppState {
        registry,
        metrics_path: Arc::from(metrics_path),
    };

    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route(metrics_path, get(metrics))
        .with_state(state)
}

/// GET {metrics_path}
///
/// Collection failures show up in the error counter, not in the status.
pub async fn metrics(State(state): State<AppState>) -> Response {
    let families = state.registry.gather().await;

    match encode_text(&families) {
        Ok(body) => {
            debug!(families = families.len(), bytes = body.len(), "scrape served");
            (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let path = &state.metrics_path;
    Html(format!(
        "<html>\n\
         <head><title>DigitalOcean Exporter</title></head>\n\
         <body>\n\
         <h1>DigitalOcean Exporter</h1>\n\
         <p><a href=\"{path}\">Metrics</a></p>\n\
         </body>\n\
         </html>\n"
    ))
}
