#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    MissingField(&'static str),

    #[error("{key} {reason}")]
    Invalid {
        key: &'static str,
        reason: &'static str,
    },

    #[error("Failed to load settings: {0}")]
    Load(#[from] ::config::ConfigError),
}
