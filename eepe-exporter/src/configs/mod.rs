mod identity;
mod settings;

pub use identity::Identity;
pub use settings::{Endpoints, Http, Logger, Refresh, Server, Settings};
