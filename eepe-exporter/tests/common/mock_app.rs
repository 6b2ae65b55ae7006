use std::sync::Arc;

use axum::Router;
use eepe_exporter::app::create_app;
use eepe_exporter::configs::{Endpoints, Identity, Settings};
use eepe_exporter::services::{CredentialService, HttpClients, TelemetryService};
use eepe_mock::handles::{LOGIN_PATH, TOKEN_PATH};
use eepe_mock::{MockServer, Scenario};

pub struct MockApp {
    pub mock: MockServer,
    pub settings: Arc<Settings>,
    pub clients: HttpClients,
}

impl MockApp {
    pub async fn new() -> Self {
        Self::with_scenario(Scenario::default()).await
    }

    pub async fn with_scenario(scenario: Scenario) -> Self {
        let mock = MockServer::spawn(scenario.clone()).await.unwrap();

        let mut settings = Settings {
            username: Some(scenario.username.clone()),
            password: Some(scenario.password.clone()),
            serial_number: Some(scenario.serial_number.clone()),
            host: Some(mock.host()),
            endpoints: Endpoints {
                login_url: mock.url(LOGIN_PATH),
                token_url: mock.url(TOKEN_PATH),
                device_scheme: "http".to_string(),
            },
            ..Settings::default()
        };
        settings.http.timeout_secs = 2;
        settings.http.connect_timeout_secs = 1;

        let clients = HttpClients::new(&settings.http).unwrap();

        Self {
            mock,
            settings: Arc::new(settings),
            clients,
        }
    }

    pub fn identity(&self) -> Identity {
        self.settings.identity().unwrap()
    }

    pub fn credential_service(&self) -> CredentialService {
        self.credential_service_for(self.identity())
    }

    pub fn credential_service_for(&self, identity: Identity) -> CredentialService {
        CredentialService::new(self.clients.clone(), self.settings.endpoints.clone(), identity)
    }

    pub fn telemetry_service(&self) -> TelemetryService {
        self.telemetry_service_at(self.identity().host)
    }

    pub fn telemetry_service_at(&self, host: String) -> TelemetryService {
        TelemetryService::new(self.clients.device.clone(), self.settings.endpoints.clone(), host)
    }

    pub async fn router(&self) -> Router {
        create_app(&self.settings).await.unwrap()
    }
}

/// Address nothing is listening on.
pub async fn closed_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    address.to_string()
}

/// Address that accepts connections and never answers.
pub async fn hung_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            open.push(stream);
        }
    });

    address.to_string()
}
