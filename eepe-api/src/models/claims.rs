use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Issuer stamped on every token handed out by Entrez.
pub const TOKEN_ISSUER: &str = "Entrez";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnphaseRole {
    Owner,
    Installer,
    #[default]
    Unknown,
}

impl From<String> for EnphaseRole {
    fn from(value: String) -> Self {
        match value.as_str() {
            "owner" => EnphaseRole::Owner,
            "installer" => EnphaseRole::Installer,
            _ => EnphaseRole::Unknown,
        }
    }
}

impl Display for EnphaseRole {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            EnphaseRole::Owner => write!(f, "owner"),
            EnphaseRole::Installer => write!(f, "installer"),
            EnphaseRole::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub iss: String,
    /// Serial number of the device the token is scoped to.
    pub aud: String,
    pub username: String,
    #[serde(rename = "enphaseUser")]
    pub enphase_user: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl TokenClaims {
    pub fn role(&self) -> EnphaseRole {
        EnphaseRole::from(self.enphase_user.clone())
    }
}
