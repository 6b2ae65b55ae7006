use reqwest::Client;

use crate::configs::Http;

/// Outbound HTTP clients, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct HttpClients {
    /// Enlighten/Entrez cloud calls, default certificate verification.
    pub cloud: Client,
    /// Device-local calls. The device serves a self-signed certificate, so verification is
    /// relaxed for this client and for nothing else.
    pub device: Client,
}

impl HttpClients {
    pub fn new(http: &Http) -> Result<Self, reqwest::Error> {
        let cloud = Client::builder()
            .timeout(http.timeout())
            .connect_timeout(http.connect_timeout())
            .build()?;

        let device = Client::builder()
            .timeout(http.timeout())
            .connect_timeout(http.connect_timeout())
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self { cloud, device })
    }
}
