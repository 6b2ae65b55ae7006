use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::errors::ApiError;
use crate::services::MetricsService;

#[derive(Clone)]
pub struct MetricsState {
    pub metrics_service: Arc<MetricsService>,
}

pub async fn get_metrics(State(state): State<MetricsState>) -> Result<impl IntoResponse, ApiError> {
    let body = state.metrics_service.scrape().await?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}
