use super::CollectionError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Collection error: {0}")]
    CollectionError(#[from] CollectionError),

    #[error("Encoding error: {0}")]
    EncodingError(#[from] prometheus::Error),
}
