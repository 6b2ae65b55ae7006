//! Checks the claims of an Entrez token before it is used against the device.
//!
//! Only the algorithm family of the signature is checked. The issuer's public key is not held
//! here, so the signature itself is trusted as received (trust on first use). Adding key
//! verification would also have to follow the issuer's key rotation.

use eepe_api::models::{EnphaseRole, TOKEN_ISSUER, TokenClaims};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use time::{Duration, OffsetDateTime};

pub const ACCEPTED_ALGORITHMS: [Algorithm; 2] = [Algorithm::ES256, Algorithm::ES384];

/// Remaining validity a token must have when accepted, so it outlives the next refresh attempts.
pub const SAFETY_MARGIN: Duration = Duration::days(30);

#[derive(Debug, thiserror::Error)]
pub enum ClaimRejection {
    #[error("token is malformed")]
    Malformed,

    #[error("token is signed with {0:?}, expected ES256 or ES384")]
    Algorithm(Algorithm),

    #[error("token claims are invalid: {0}")]
    Claims(String),

    #[error("token was issued for user {0}")]
    Username(String),

    #[error("token role is {0}, expected owner")]
    Role(EnphaseRole),

    #[error("token expires at {0}, less than 30 days from now")]
    ExpiresTooSoon(OffsetDateTime),
}

pub fn validate(token: &str, serial_number: &str, username: &str) -> bool {
    validate_at(token, serial_number, username, OffsetDateTime::now_utc())
}

pub fn validate_at(token: &str, serial_number: &str, username: &str, now: OffsetDateTime) -> bool {
    inspect(token, serial_number, username, now).is_ok()
}

/// Decodes `token` and returns its claims if every check passes at `now`.
pub fn inspect(
    token: &str,
    serial_number: &str,
    username: &str,
    now: OffsetDateTime,
) -> Result<TokenClaims, ClaimRejection> {
    let header = decode_header(token).map_err(|_| ClaimRejection::Malformed)?;

    if !ACCEPTED_ALGORITHMS.contains(&header.alg) {
        return Err(ClaimRejection::Algorithm(header.alg));
    }

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_audience(&[serial_number]);
    validation.set_required_spec_claims(&["exp", "iss", "aud"]);
    // Expiry is checked below against `now`, with the safety margin applied.
    validation.validate_exp = false;

    let claims = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| ClaimRejection::Claims(e.to_string()))?
        .claims;

    if claims.username != username {
        return Err(ClaimRejection::Username(claims.username));
    }

    if claims.role() != EnphaseRole::Owner {
        return Err(ClaimRejection::Role(claims.role()));
    }

    let expires_at = expires_at(&claims)?;
    if expires_at - SAFETY_MARGIN <= now {
        return Err(ClaimRejection::ExpiresTooSoon(expires_at));
    }

    Ok(claims)
}

pub fn expires_at(claims: &TokenClaims) -> Result<OffsetDateTime, ClaimRejection> {
    OffsetDateTime::from_unix_timestamp(claims.exp)
        .map_err(|_| ClaimRejection::Claims("exp is out of range".to_string()))
}
