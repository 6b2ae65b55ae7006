use eepe_api::models::{Home, HomeNetwork, InverterProduction, Production};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Failure {
    Status { code: u16 },
    MalformedJson,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailingEndpoint {
    pub path: String,
    pub failure: Failure,
}

/// What the simulated cloud and device accept and answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub username: String,
    pub password: String,
    pub serial_number: String,
    /// Cloud session returned by the login exchange.
    pub session_id: String,
    /// Device session set as cookie by `check_jwt`.
    pub local_session_id: String,
    pub token_ttl_days: i64,
    pub role: String,
    pub set_session_cookie: bool,
    pub production: Production,
    pub inverters: Vec<InverterProduction>,
    pub home: Home,
    pub failing_endpoint: Option<FailingEndpoint>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            username: "alice".to_string(),
            password: "secret".to_string(),
            serial_number: "SN123".to_string(),
            session_id: "abc".to_string(),
            local_session_id: "xyz".to_string(),
            token_ttl_days: 60,
            role: "owner".to_string(),
            set_session_cookie: true,
            production: Production {
                watt_hours_today: 100,
                watt_hours_lifetime: 5000,
                watts_now: 250,
            },
            inverters: vec![InverterProduction {
                serial_number: "INV1".to_string(),
                last_report_watts: 30,
                max_report_watts: 45,
            }],
            home: Home {
                db_size: 512,
                db_percent_full: "10.0".to_string(),
                network: HomeNetwork { web_comm: true },
            },
            failing_endpoint: None,
        }
    }
}

impl Scenario {
    pub fn failure_for(&self, path: &str) -> Option<&Failure> {
        self.failing_endpoint
            .as_ref()
            .filter(|endpoint| endpoint.path == path)
            .map(|endpoint| &endpoint.failure)
    }
}
