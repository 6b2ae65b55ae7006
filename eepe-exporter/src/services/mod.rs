mod claim_service;
mod client_service;
mod credential_service;
mod metrics_service;
mod refresh_service;
mod telemetry_service;

pub use claim_service::*;
pub use client_service::*;
pub use credential_service::*;
pub use metrics_service::*;
pub use refresh_service::*;
pub use telemetry_service::*;
