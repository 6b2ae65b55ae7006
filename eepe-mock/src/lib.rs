use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::handles::create_app;
use crate::settings::Settings;

pub mod handles;
pub mod scenario;
pub mod settings;
pub mod state;
pub mod token;

pub use scenario::{FailingEndpoint, Failure, Scenario};
pub use state::MockState;

/// Simulated cloud and device served from one local listener.
pub struct MockServer {
    pub address: SocketAddr,
    pub state: MockState,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Serves `scenario` on an ephemeral localhost port until dropped.
    pub async fn spawn(scenario: Scenario) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;

        let state = MockState::new(scenario);
        let app = create_app(state.clone());

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("mock server stopped: {e}");
            }
        });

        Ok(Self {
            address,
            state,
            handle,
        })
    }

    /// Address to use as the device host, `127.0.0.1:<port>`.
    pub fn host(&self) -> String {
        self.address.to_string()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.address, path)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn run(settings: &Arc<Settings>) -> io::Result<()> {
    let ip_addr = settings
        .server
        .host
        .parse::<IpAddr>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let address = SocketAddr::from((ip_addr, settings.server.port));

    let listener = TcpListener::bind(&address).await?;

    tracing::info!("mock device listening on {:?}", address);

    axum::serve(listener, create_app(MockState::new(settings.scenario.clone()))).await
}
