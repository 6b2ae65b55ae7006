use std::sync::atomic::Ordering;

use axum::extract::{Form, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::TypedHeader;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use eepe_api::models::{LoginForm, LoginResponse, TokenRequest};
use eepe_api::paths::*;
use serde_json::{Value, json};
use time::Duration;

use crate::scenario::{Failure, Scenario};
use crate::state::MockState;
use crate::token::{issue_claims, sign};

pub const LOGIN_PATH: &str = "/login/login.json";
pub const TOKEN_PATH: &str = "/tokens";

type BearerHeader = Option<TypedHeader<Authorization<Bearer>>>;

pub fn create_app(state: MockState) -> Router {
    Router::new()
        .route(LOGIN_PATH, post(login))
        .route(TOKEN_PATH, post(issue_token))
        .route(CHECK_JWT_PATH, get(check_jwt))
        .route(PRODUCTION_PATH, get(production))
        .route(INVERTERS_PATH, get(inverters))
        .route(HOME_PATH, get(home))
        .with_state(state)
}

async fn login(
    State(state): State<MockState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginResponse>, StatusCode> {
    state.counters.logins.fetch_add(1, Ordering::SeqCst);
    let scenario = state.scenario.read().await;

    if form.email != scenario.username || form.password != scenario.password {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(Json(LoginResponse {
        session_id: scenario.session_id.clone(),
    }))
}

async fn issue_token(
    State(state): State<MockState>,
    Json(request): Json<TokenRequest>,
) -> Result<String, StatusCode> {
    state.counters.tokens.fetch_add(1, Ordering::SeqCst);
    let scenario = state.scenario.read().await;

    if request.session_id != scenario.session_id || request.username != scenario.username {
        return Err(StatusCode::UNAUTHORIZED);
    }

    if request.serial_num != scenario.serial_number {
        return Err(StatusCode::BAD_REQUEST);
    }

    let claims = issue_claims(
        &scenario.serial_number,
        &scenario.username,
        &scenario.role,
        Duration::days(scenario.token_ttl_days),
    );

    let token = sign(&claims).map_err(|e| {
        tracing::error!("failed to sign token: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    state.record_token(token.clone()).await;

    Ok(token)
}

async fn check_jwt(State(state): State<MockState>, bearer: BearerHeader) -> Response {
    state.counters.checks.fetch_add(1, Ordering::SeqCst);

    if !bearer_is_issued(&state, &bearer).await {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let scenario = state.scenario.read().await;
    let page = Html("<!DOCTYPE html><h2>Valid token.</h2>");

    if scenario.set_session_cookie {
        let cookie = format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; Secure",
            scenario.local_session_id
        );
        ([(header::SET_COOKIE, cookie)], page).into_response()
    } else {
        page.into_response()
    }
}

async fn production(
    State(state): State<MockState>,
    bearer: BearerHeader,
    jar: CookieJar,
) -> Response {
    telemetry(&state, &bearer, &jar, PRODUCTION_PATH, |s| json!(s.production)).await
}

async fn inverters(
    State(state): State<MockState>,
    bearer: BearerHeader,
    jar: CookieJar,
) -> Response {
    telemetry(&state, &bearer, &jar, INVERTERS_PATH, |s| json!(s.inverters)).await
}

async fn home(
    State(state): State<MockState>,
    bearer: BearerHeader,
    jar: CookieJar,
) -> Response {
    telemetry(&state, &bearer, &jar, HOME_PATH, |s| json!(s.home)).await
}

async fn telemetry(
    state: &MockState,
    bearer: &BearerHeader,
    jar: &CookieJar,
    path: &str,
    payload: impl FnOnce(&Scenario) -> Value,
) -> Response {
    state.counters.telemetry.fetch_add(1, Ordering::SeqCst);

    let scenario = state.scenario.read().await;
    let session = jar.get(SESSION_COOKIE).map(|cookie| cookie.value());

    let authorized = bearer_is_issued(state, bearer).await
        && session == Some(scenario.local_session_id.as_str());
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match scenario.failure_for(path) {
        Some(Failure::Status { code }) => StatusCode::from_u16(*code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Some(Failure::MalformedJson) => {
            ([(header::CONTENT_TYPE, "application/json")], "{\"wattsNow\":").into_response()
        }
        None => Json(payload(&scenario)).into_response(),
    }
}

async fn bearer_is_issued(state: &MockState, bearer: &BearerHeader) -> bool {
    match bearer {
        Some(TypedHeader(authorization)) => state.is_issued(authorization.token()).await,
        None => false,
    }
}
