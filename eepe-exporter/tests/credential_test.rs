use eepe_exporter::configs::Identity;
use eepe_exporter::errors::AuthError;
use eepe_exporter::services::CredentialProvider;
use eepe_mock::Scenario;
use time::{Duration, OffsetDateTime};

mod common;
use common::mock_app::{MockApp, closed_address};

#[tokio::test]
async fn test_acquire_credential() {
    let app = MockApp::new().await;

    let credential = app.credential_service().acquire().await.unwrap();

    assert!(!credential.token.is_empty());
    assert_eq!(credential.session_id, "xyz");
    assert!(credential.expires_at > OffsetDateTime::now_utc() + Duration::days(59));
    assert!(credential.acquired_at <= OffsetDateTime::now_utc());

    let counters = &app.mock.state.counters;
    assert_eq!(counters.logins(), 1);
    assert_eq!(counters.tokens(), 1);
    assert_eq!(counters.checks(), 1);
}

#[tokio::test]
async fn test_login_returns_cloud_session() {
    let app = MockApp::new().await;

    let session_id = app.credential_service().login().await.unwrap();

    assert_eq!(session_id, "abc");
}

#[tokio::test]
async fn test_wrong_password() {
    let app = MockApp::new().await;
    let identity = Identity {
        password: "wrong".to_string(),
        ..app.identity()
    };

    let result = app.credential_service_for(identity).acquire().await;

    assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
    assert_eq!(app.mock.state.counters.tokens(), 0);
}

#[tokio::test]
async fn test_unreachable_cloud() {
    let app = MockApp::new().await;
    let mut settings = (*app.settings).clone();
    settings.endpoints.login_url = format!("http://{}/login/login.json", closed_address().await);

    let service = eepe_exporter::services::CredentialService::new(
        app.clients.clone(),
        settings.endpoints,
        app.identity(),
    );

    assert_eq!(service.acquire().await.unwrap_err(), AuthError::InvalidCredentials);
}

#[tokio::test]
async fn test_rejected_serial_number() {
    let app = MockApp::new().await;
    let identity = Identity {
        serial_number: "SN999".to_string(),
        ..app.identity()
    };

    let result = app.credential_service_for(identity).acquire().await;

    assert_eq!(result.unwrap_err(), AuthError::TokenIssuanceFailed);
    assert_eq!(app.mock.state.counters.checks(), 0);
}

#[tokio::test]
async fn test_token_expiring_within_margin() {
    let app = MockApp::with_scenario(Scenario {
        token_ttl_days: 10,
        ..Scenario::default()
    })
    .await;

    let result = app.credential_service().acquire().await;

    assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
    // The device is never asked to confirm a token that failed validation.
    assert_eq!(app.mock.state.counters.checks(), 0);
}

#[tokio::test]
async fn test_token_without_owner_role() {
    let app = MockApp::with_scenario(Scenario {
        role: "installer".to_string(),
        ..Scenario::default()
    })
    .await;

    let result = app.credential_service().acquire().await;

    assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
}

#[tokio::test]
async fn test_device_rejects_token() {
    let app = MockApp::new().await;
    let service = app.credential_service();

    let result = service.confirm("never-issued").await;

    assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
}

#[tokio::test]
async fn test_missing_session_cookie() {
    let app = MockApp::with_scenario(Scenario {
        set_session_cookie: false,
        ..Scenario::default()
    })
    .await;

    let result = app.credential_service().acquire().await;

    assert_eq!(result.unwrap_err(), AuthError::LocalSessionNotFound);
}

#[tokio::test]
async fn test_unreachable_device() {
    let app = MockApp::new().await;
    let identity = Identity {
        host: closed_address().await,
        ..app.identity()
    };

    let result = app.credential_service_for(identity).acquire().await;

    assert_eq!(result.unwrap_err(), AuthError::DeviceUnreachable);
    assert_eq!(app.mock.state.counters.tokens(), 1);
}
