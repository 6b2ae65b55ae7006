/// Failures of the credential chain. Fatal when acquiring the first credential, logged when a
/// periodic refresh fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Login credentials are incorrect")]
    InvalidCredentials,

    #[error("Could not get an authentication token, serial number might be incorrect")]
    TokenIssuanceFailed,

    #[error("Authentication token is not valid")]
    InvalidToken,

    #[error("Local session id not found")]
    LocalSessionNotFound,

    #[error("Device is unreachable")]
    DeviceUnreachable,
}
