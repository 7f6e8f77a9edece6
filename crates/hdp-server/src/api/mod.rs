pub mod response;

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::error::{AppError, ServerResult};
use crate::extract::{sheets, DietExtractor, GoogleClient, SheetExtractor};
use crate::queue::{PublishReport, QueuePublisher};
use hdp_common::diet::{DietDocument, DocumentParser};
use hdp_common::HdpError;
use response::ApiResponse;

/// Application state shared across handlers.
///
/// Credentials are resolved once at process start; handlers never touch the
/// raw secret blob.
#[derive(Clone)]
pub struct AppState {
    pub google: GoogleClient,
    pub parser: Arc<DocumentParser>,
    pub publisher: Arc<QueuePublisher>,
    pub sheet_id: String,
    pub doc_id: String,
}

/// Create the application router with all routes and middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/weight", get(get_weight))
        .route("/diet", get(get_diet))
        .route("/weight/publish", post(publish_weight))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "HDP Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Recent weight mapping: current and prior year merged, current year wins
async fn get_weight(
    State(state): State<AppState>,
) -> ServerResult<ApiResponse<BTreeMap<NaiveDate, f64>>> {
    let extractor = SheetExtractor::new(&state.google, &state.sheet_id);
    let weights = extractor.recent(Utc::now().date_naive()).await?;

    Ok(ApiResponse::success(weights))
}

/// Recent diet document: date -> time -> description
async fn get_diet(State(state): State<AppState>) -> ServerResult<ApiResponse<DietDocument>> {
    let extractor = DietExtractor::new(&state.google, &state.parser, &state.doc_id);
    let document = extractor.recent().await?;

    Ok(ApiResponse::success(document))
}

/// Extract, window to the trailing week, and enqueue one message per record
async fn publish_weight(
    State(state): State<AppState>,
) -> ServerResult<ApiResponse<PublishReport>> {
    let today = Utc::now().date_naive();

    let extractor = SheetExtractor::new(&state.google, &state.sheet_id);
    let weights = extractor.recent(today).await?;
    let window = sheets::publish_window(&weights, today);

    if window.is_empty() {
        return Ok(ApiResponse::success(PublishReport::default()));
    }

    let report = state.publisher.publish_weights(&window).await;

    // Partial success is tolerated and reported; total failure is not
    if report.published == 0 {
        return Err(AppError::Hdp(HdpError::Publish {
            published: report.published,
            failed: report.failed,
        }));
    }

    Ok(ApiResponse::success(report))
}
