use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::errors::AuthError;
use crate::services::{Credential, CredentialProvider};

/// Owns the current credential and renews it on a fixed period.
///
/// Readers get an `Arc` snapshot; a refresh swaps the whole value, so a reader sees either the
/// previous credential or the new one, never a mix of both.
pub struct RefreshService {
    provider: Arc<dyn CredentialProvider>,
    current: RwLock<Arc<Credential>>,
    period: Duration,
}

impl RefreshService {
    /// Acquires the first credential. Fails if it cannot be obtained; there is nothing useful to
    /// serve without one.
    pub async fn start(
        provider: Arc<dyn CredentialProvider>,
        period: Duration,
    ) -> Result<Arc<Self>, AuthError> {
        let credential = provider.acquire().await?;

        Ok(Arc::new(Self {
            provider,
            current: RwLock::new(Arc::new(credential)),
            period,
        }))
    }

    pub async fn current(&self) -> Arc<Credential> {
        self.current.read().await.clone()
    }

    pub async fn last_acquired(&self) -> OffsetDateTime {
        self.current.read().await.acquired_at
    }

    /// Acquires a new credential and publishes it. On failure the previous credential stays.
    pub async fn refresh(&self) -> Result<Arc<Credential>, AuthError> {
        let credential = Arc::new(self.provider.acquire().await?);

        *self.current.write().await = credential.clone();

        Ok(credential)
    }

    /// Spawns the background task refreshing the credential every period, first one period
    /// after the call.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let service = self.clone();

        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + service.period, service.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                match service.refresh().await {
                    Ok(credential) => {
                        tracing::info!(expires_at = %credential.expires_at, "credential refreshed");
                    }
                    Err(e) => {
                        let last_acquired = service.last_acquired().await;
                        tracing::error!(
                            last_acquired = %last_acquired,
                            "credential refresh failed, keeping previous credential: {e}"
                        );
                    }
                }
            }
        })
    }
}
