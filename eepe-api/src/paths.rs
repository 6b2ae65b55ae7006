//! Device-local endpoints, relative to `https://<device-address>`.

pub const CHECK_JWT_PATH: &str = "/auth/check_jwt";
pub const PRODUCTION_PATH: &str = "/api/v1/production";
pub const INVERTERS_PATH: &str = "/api/v1/production/inverters";
pub const HOME_PATH: &str = "/home.json";

/// Cookie carrying the device-local session handed out by `check_jwt`.
pub const SESSION_COOKIE: &str = "sessionId";
