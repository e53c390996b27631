//! Session token payload decoding.
//!
//! The token is a three-segment signed token issued by the auth service. Only the
//! payload segment is read here; the signature is never checked client-side, the
//! backends verify it on every authenticated request.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("token must have 3 segments, found {0}")]
    Segments(usize),
    #[error("token payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Client,
    Freelancer,
    Admin,
    /// Any role string the client does not know; grants no feature.
    Other(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "client" => Role::Client,
            "freelancer" => Role::Freelancer,
            "admin" => Role::Admin,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Client => "client",
            Role::Freelancer => "freelancer",
            Role::Admin => "admin",
            Role::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::parse(&raw))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenClaims {
    /// Identity label; the auth service puts the user's email here.
    pub sub: String,
    pub role: Role,
    pub user_id: Option<String>,
    /// Expiry in milliseconds since the Unix epoch; the `exp` claim is in seconds and
    /// may carry a fraction.
    pub exp_ms: i64,
}

impl TokenClaims {
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.exp_ms <= now_ms
    }
}

#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    role: Option<Role>,
    #[serde(default)]
    user_id: Option<serde_json::Value>,
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    exp: Option<f64>,
}

impl From<RawClaims> for TokenClaims {
    fn from(raw: RawClaims) -> Self {
        let user_id = raw
            .user_id
            .as_ref()
            .and_then(id_from_json)
            .or_else(|| raw.id.as_ref().and_then(id_from_json));
        Self {
            sub: raw.sub.unwrap_or_default(),
            role: raw.role.unwrap_or_else(|| Role::Other(String::new())),
            user_id,
            // A token without `exp` decodes as already expired.
            // Float to int casts saturate, so huge or NaN claims cannot wrap.
            exp_ms: raw.exp.map(|e| (e * 1000.0) as i64).unwrap_or(0),
        }
    }
}

/// Ids come over the wire as numbers from the current backends and as strings from
/// older ones; both normalise to the decimal string form.
pub(crate) fn id_from_json(v: &serde_json::Value) -> Option<String> {
    match v {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

pub fn decode_token(raw: &str) -> Result<TokenClaims, DecodeError> {
    let segments: Vec<&str> = raw.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::Segments(segments.len()));
    }

    let payload: String = segments[1]
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
    let claims: RawClaims = serde_json::from_slice(&bytes)?;
    Ok(claims.into())
}

#[cfg(test)]
#[path = "tests/token_tests.rs"]
mod tests;
