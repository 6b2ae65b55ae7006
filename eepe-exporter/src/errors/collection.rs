use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {endpoint} failed with status {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("Response of {endpoint} was not valid: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl CollectionError {
    pub fn endpoint(&self) -> &'static str {
        match self {
            CollectionError::Transport { endpoint, .. } => endpoint,
            CollectionError::Status { endpoint, .. } => endpoint,
            CollectionError::Decode { endpoint, .. } => endpoint,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CollectionError::Transport { source, .. } if source.is_timeout() => {
                StatusCode::GATEWAY_TIMEOUT
            }
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}
