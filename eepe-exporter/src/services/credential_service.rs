use std::fmt;

use async_trait::async_trait;
use eepe_api::models::{LoginForm, LoginResponse, TokenRequest};
use eepe_api::paths::{CHECK_JWT_PATH, SESSION_COOKIE};
use time::OffsetDateTime;

use crate::configs::{Endpoints, Identity};
use crate::errors::AuthError;
use crate::services::{HttpClients, claim_service};

/// A validated token together with the device session it unlocked. Both parts are sent on every
/// device request.
#[derive(Clone)]
pub struct Credential {
    pub token: String,
    pub session_id: String,
    pub acquired_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"***")
            .field("session_id", &"***")
            .field("acquired_at", &self.acquired_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn acquire(&self) -> Result<Credential, AuthError>;
}

/// Runs the login, token issuance, claim check and device confirmation chain.
pub struct CredentialService {
    clients: HttpClients,
    endpoints: Endpoints,
    identity: Identity,
}

impl CredentialService {
    pub fn new(clients: HttpClients, endpoints: Endpoints, identity: Identity) -> Self {
        Self {
            clients,
            endpoints,
            identity,
        }
    }

    /// Logs in to Enlighten and returns the cloud session id.
    pub async fn login(&self) -> Result<String, AuthError> {
        let form = LoginForm {
            email: self.identity.username.clone(),
            password: self.identity.password.clone(),
        };

        let response = self
            .clients
            .cloud
            .post(&self.endpoints.login_url)
            .form(&form)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                tracing::warn!("login request failed: {e}");
                AuthError::InvalidCredentials
            })?;

        let body = response.json::<LoginResponse>().await.map_err(|e| {
            tracing::warn!("login response was not valid json: {e}");
            AuthError::InvalidCredentials
        })?;

        if body.session_id.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(body.session_id)
    }

    /// Exchanges a cloud session for a token scoped to the configured device.
    pub async fn issue_token(&self, session_id: &str) -> Result<String, AuthError> {
        let request = TokenRequest {
            session_id: session_id.to_string(),
            serial_num: self.identity.serial_number.clone(),
            username: self.identity.username.clone(),
        };

        let token = self
            .clients
            .cloud
            .post(&self.endpoints.token_url)
            .json(&request)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                tracing::warn!("token request failed: {e}");
                AuthError::TokenIssuanceFailed
            })?
            .text()
            .await
            .map_err(|_| AuthError::TokenIssuanceFailed)?;

        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::TokenIssuanceFailed);
        }

        Ok(token.to_string())
    }

    /// Presents the token to the device and returns the local session it hands back.
    pub async fn confirm(&self, token: &str) -> Result<String, AuthError> {
        let url = self.endpoints.device_url(&self.identity.host, CHECK_JWT_PATH);

        let response = self
            .clients
            .device
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("request {url} failed: {e}");
                AuthError::DeviceUnreachable
            })?;

        if !response.status().is_success() {
            tracing::warn!("device rejected token with status {}", response.status());
            return Err(AuthError::InvalidToken);
        }

        let local_session = response
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|session_id| !session_id.is_empty());

        local_session.ok_or(AuthError::LocalSessionNotFound)
    }
}

#[async_trait]
impl CredentialProvider for CredentialService {
    async fn acquire(&self) -> Result<Credential, AuthError> {
        let session_id = self.login().await?;
        let token = self.issue_token(&session_id).await?;

        let now = OffsetDateTime::now_utc();
        let claims = claim_service::inspect(
            &token,
            &self.identity.serial_number,
            &self.identity.username,
            now,
        )
        .map_err(|rejection| {
            tracing::warn!("rejected token: {rejection}");
            AuthError::InvalidToken
        })?;
        let expires_at =
            claim_service::expires_at(&claims).map_err(|_| AuthError::InvalidToken)?;

        let local_session = self.confirm(&token).await?;

        tracing::info!(
            serial_number = %self.identity.serial_number,
            expires_at = %expires_at,
            "acquired device credential"
        );

        Ok(Credential {
            token,
            session_id: local_session,
            acquired_at: now,
            expires_at,
        })
    }
}
