use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub phone_number: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_verified: bool,
    pub last_login_at: Option<NaiveDateTime>,
}

/// One-time code issued per send request. Never physically deleted:
/// a new send marks all prior unused codes for the phone as used.
#[derive(Debug, Clone)]
pub struct Otp {
    pub id: String,
    pub phone_number: String,
    pub code: String,
    pub expires_at: NaiveDateTime,
    pub is_used: bool,
    pub attempts: i64,
}
