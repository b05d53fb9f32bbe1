use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use crate::errors::AppError;

/// Session claims bound to a verified phone identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub phone_number: String,
    pub exp: i64,
}

/// Issues and verifies HMAC-signed session credentials of the form
/// `base64url(claims).base64url(tag)`.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: String, ttl_hours: i64) -> Self {
        Self {
            secret,
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, user_id: &str, phone_number: &str) -> anyhow::Result<String> {
        let claims = Claims {
            user_id: user_id.to_string(),
            phone_number: phone_number.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let tag = self.sign(&payload)?;
        Ok(format!("{payload}.{tag}"))
    }

    pub fn verify(&self, credential: &str) -> Result<Claims, AppError> {
        let (payload, tag) = credential.split_once('.').ok_or(AppError::Unauthorized)?;

        let expected = self.sign(payload).map_err(|_| AppError::Unauthorized)?;
        let tag_bytes = URL_SAFE_NO_PAD
            .decode(tag)
            .map_err(|_| AppError::Unauthorized)?;
        let expected_bytes = URL_SAFE_NO_PAD
            .decode(&expected)
            .map_err(|_| AppError::Unauthorized)?;
        if tag_bytes.len() != expected_bytes.len()
            || !constant_time_eq(&tag_bytes, &expected_bytes)
        {
            return Err(AppError::Unauthorized);
        }

        let claims_bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AppError::Unauthorized)?;
        let claims: Claims =
            serde_json::from_slice(&claims_bytes).map_err(|_| AppError::Unauthorized)?;

        if claims.exp < Utc::now().timestamp() {
            return Err(AppError::Unauthorized);
        }

        Ok(claims)
    }

    fn sign(&self, payload: &str) -> anyhow::Result<String> {
        let mut mac = Hmac::<Sha1>::new_from_slice(self.secret.as_bytes())
            .map_err(|e| anyhow::anyhow!("invalid signing key: {e}"))?;
        mac.update(payload.as_bytes());
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
