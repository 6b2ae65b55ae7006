use serde::{Deserialize, Serialize};

/// Form body of the Enlighten login exchange.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(rename = "user[email]")]
    pub email: String,
    #[serde(rename = "user[password]")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub session_id: String,
}

/// JSON body of the Entrez token request. The response is the raw token, not JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub session_id: String,
    pub serial_num: String,
    pub username: String,
}
