use eepe_api::models::{Home, InverterProduction, Production};
use eepe_api::paths::{HOME_PATH, INVERTERS_PATH, PRODUCTION_PATH, SESSION_COOKIE};
use reqwest::{Client, header};
use serde::de::DeserializeOwned;

use crate::configs::Endpoints;
use crate::errors::CollectionError;
use crate::services::Credential;

/// One consistent reading of the device, taken in a single collection cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    pub production: Production,
    /// In the order the device reported them.
    pub inverters: Vec<InverterProduction>,
    pub home: Home,
}

pub struct TelemetryService {
    client: Client,
    endpoints: Endpoints,
    host: String,
}

impl TelemetryService {
    pub fn new(client: Client, endpoints: Endpoints, host: String) -> Self {
        Self {
            client,
            endpoints,
            host,
        }
    }

    /// Queries the three device surfaces concurrently and waits for all of them. Any failure
    /// fails the whole snapshot.
    pub async fn collect(
        &self,
        credential: &Credential,
    ) -> Result<TelemetrySnapshot, CollectionError> {
        let (production, inverters, home) = tokio::join!(
            self.fetch::<Production>(PRODUCTION_PATH, credential),
            self.fetch::<Vec<InverterProduction>>(INVERTERS_PATH, credential),
            self.fetch::<Home>(HOME_PATH, credential),
        );

        Ok(TelemetrySnapshot {
            production: production?,
            inverters: inverters?,
            home: home?,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        credential: &Credential,
    ) -> Result<T, CollectionError> {
        let response = self
            .client
            .get(self.endpoints.device_url(&self.host, endpoint))
            .bearer_auth(&credential.token)
            .header(header::COOKIE, format!("{SESSION_COOKIE}={}", credential.session_id))
            .send()
            .await
            .map_err(|source| CollectionError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectionError::Status { endpoint, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| CollectionError::Transport { endpoint, source })?;

        serde_json::from_slice(&body).map_err(|source| CollectionError::Decode { endpoint, source })
    }
}
