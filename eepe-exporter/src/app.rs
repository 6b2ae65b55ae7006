use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::configs::Settings;
use crate::handles::*;
use crate::services::{
    CredentialService, HttpClients, MetricsService, RefreshService, TelemetryService,
};

/// Builds the services, acquires the first credential and starts the refresh task.
pub async fn create_app(settings: &Arc<Settings>) -> anyhow::Result<Router> {
    settings.validate()?;
    let identity = settings.identity()?;
    let clients = HttpClients::new(&settings.http).context("Failed to build http clients")?;

    let credential_service = Arc::new(CredentialService::new(
        clients.clone(),
        settings.endpoints.clone(),
        identity.clone(),
    ));

    let refresh_service = RefreshService::start(credential_service, settings.refresh.period()?)
        .await
        .context("Failed to acquire device credential")?;
    refresh_service.spawn();

    let telemetry_service = Arc::new(TelemetryService::new(
        clients.device.clone(),
        settings.endpoints.clone(),
        identity.host.clone(),
    ));

    let metrics_service = Arc::new(MetricsService::new(refresh_service, telemetry_service));

    Ok(metrics_router(MetricsState { metrics_service }))
}

pub fn metrics_router(state: MetricsState) -> Router {
    Router::new()
        .route("/metrics", get(get_metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
