use std::env;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::configs::Identity;
use crate::errors::ConfigError;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
const MAX_PERIOD_DAYS: u64 = 3650;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Http {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refresh {
    pub period_days: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub login_url: String,
    pub token_url: String,
    pub device_scheme: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Settings {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "serialnumber")]
    pub serial_number: Option<String>,
    pub host: Option<String>,
    pub server: Server,
    pub logger: Logger,
    pub http: Http,
    pub refresh: Refresh,
    pub endpoints: Endpoints,
}

impl Settings {
    /// Loads compiled-in defaults, then `configs/default`, `configs/{RUN_MODE}` and finally
    /// `EEPE_*` environment variables (`EEPE_SERVER__PORT` for nested keys).
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("configs/default").required(false))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(
                Environment::with_prefix("EEPE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values that would leave the exporter running without bounded requests or without
    /// a working refresh task.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "http.timeout_secs",
                reason: "must be greater than zero",
            });
        }
        if self.http.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "http.connect_timeout_secs",
                reason: "must be greater than zero",
            });
        }
        self.refresh.period()?;

        Ok(())
    }

    pub fn identity(&self) -> Result<Identity, ConfigError> {
        Ok(Identity {
            username: required(&self.username, "EEPE_USERNAME")?.trim().to_string(),
            password: required(&self.password, "EEPE_PASSWORD")?.to_string(),
            serial_number: required(&self.serial_number, "EEPE_SERIALNUMBER")?.trim().to_string(),
            host: required(&self.host, "EEPE_HOST")?.trim().to_string(),
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            serial_number: None,
            host: None,
            server: Server {
                host: "0.0.0.0".to_string(),
                port: 9000,
            },
            logger: Logger {
                level: "info".to_string(),
            },
            http: Http {
                timeout_secs: 10,
                connect_timeout_secs: 5,
            },
            refresh: Refresh { period_days: 90 },
            endpoints: Endpoints {
                login_url: "https://enlighten.enphaseenergy.com/login/login.json".to_string(),
                token_url: "https://entrez.enphaseenergy.com/tokens".to_string(),
                device_scheme: "https".to_string(),
            },
        }
    }
}

impl Http {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Refresh {
    pub fn period(&self) -> Result<Duration, ConfigError> {
        let invalid = ConfigError::Invalid {
            key: "refresh.period_days",
            reason: "must be between 1 and 3650",
        };
        if !(1..=MAX_PERIOD_DAYS).contains(&self.period_days) {
            return Err(invalid);
        }

        self.period_days
            .checked_mul(SECONDS_PER_DAY)
            .map(Duration::from_secs)
            .ok_or(invalid)
    }
}

impl Endpoints {
    pub fn device_url(&self, host: &str, path: &str) -> String {
        format!("{}://{}{}", self.device_scheme, host, path)
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingField(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_settings() -> Settings {
        Settings {
            username: Some(" alice ".to_string()),
            password: Some(" secret ".to_string()),
            serial_number: Some("SN123".to_string()),
            host: Some("192.168.1.20".to_string()),
            ..Settings::default()
        }
    }

    #[test]
    fn test_identity_from_settings() {
        let identity = complete_settings().identity().unwrap();

        assert_eq!(identity.username, "alice");
        assert_eq!(identity.password, " secret ");
        assert_eq!(identity.serial_number, "SN123");
        assert_eq!(identity.host, "192.168.1.20");
    }

    #[test]
    fn test_missing_identity_field() {
        let settings = Settings {
            serial_number: None,
            ..complete_settings()
        };
        let error = settings.identity().unwrap_err();
        assert!(matches!(error, ConfigError::MissingField("EEPE_SERIALNUMBER")));

        let settings = Settings {
            host: Some("   ".to_string()),
            ..complete_settings()
        };
        let error = settings.identity().unwrap_err();
        assert!(matches!(error, ConfigError::MissingField("EEPE_HOST")));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.refresh.period().unwrap(), Duration::from_secs(90 * 86_400));
        assert!(settings.validate().is_ok());
        assert_eq!(
            settings.endpoints.device_url("envoy.local", "/home.json"),
            "https://envoy.local/home.json"
        );
    }

    #[test]
    fn test_defaults_survive_config_layering() {
        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default()).unwrap())
            .set_override("server.port", 9100)
            .unwrap()
            .set_override("username", "bob")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.username.as_deref(), Some("bob"));
        assert_eq!(settings.http.timeout_secs, 10);
    }

    #[test]
    fn test_zero_or_huge_refresh_period_rejected() {
        for period_days in [0, MAX_PERIOD_DAYS + 1, u64::MAX] {
            let mut settings = Settings::default();
            settings.refresh.period_days = period_days;

            assert!(matches!(
                settings.validate(),
                Err(ConfigError::Invalid { key: "refresh.period_days", .. })
            ));
        }

        let mut settings = Settings::default();
        settings.refresh.period_days = 1;
        assert_eq!(settings.refresh.period().unwrap(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut settings = Settings::default();
        settings.http.timeout_secs = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid { key: "http.timeout_secs", .. })
        ));

        let mut settings = Settings::default();
        settings.http.connect_timeout_secs = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid { key: "http.connect_timeout_secs", .. })
        ));
    }
}
