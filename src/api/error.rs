use std::error::Error as StdError;

pub const CONNECTION_FAILED_MESSAGE: &str = "Could not connect to the server. Try again later.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized { detail: Option<String> },

    #[error("forbidden")]
    Forbidden { detail: Option<String> },

    #[error("not found")]
    NotFound { detail: Option<String> },

    #[error("status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { .. } | ApiError::Decode { .. } => None,
        }
    }

    /// 401 and 403: the stored session is no good for this request.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. }
        )
    }

    /// The server-provided error detail, when the response carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail }
            | ApiError::Forbidden { detail }
            | ApiError::NotFound { detail } => detail.as_deref(),
            ApiError::Status { detail, .. } => Some(detail.as_str()),
            ApiError::Transport { .. } | ApiError::Decode { .. } => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }

    /// The line shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { .. } => "Unauthorized. Token invalid or expired.".to_string(),
            ApiError::Forbidden { detail } => match detail {
                Some(d) => format!("Forbidden. {}", d),
                None => "Forbidden. You do not have the required role.".to_string(),
            },
            ApiError::NotFound { detail } => match detail {
                Some(d) => format!("Not found: {}", d),
                None => "Not found.".to_string(),
            },
            ApiError::Status { detail, .. } => detail.clone(),
            ApiError::Transport { .. } => CONNECTION_FAILED_MESSAGE.to_string(),
            ApiError::Decode { .. } => "The server sent an unexpected response.".to_string(),
        }
    }

    pub(super) fn from_status(status: reqwest::StatusCode, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .as_ref()
            .and_then(error_detail);
        match status.as_u16() {
            401 => ApiError::Unauthorized { detail },
            403 => ApiError::Forbidden { detail },
            404 => ApiError::NotFound { detail },
            code => ApiError::Status {
                status: code,
                detail: detail.unwrap_or_else(|| {
                    format!(
                        "Error {}: {}",
                        code,
                        status.canonical_reason().unwrap_or("Unknown")
                    )
                }),
            },
        }
    }
}

/// Pulls the human-readable error out of a JSON error body: `detail` as a string,
/// `detail` as a list of validation errors, or `error`.
pub(crate) fn error_detail(body: &serde_json::Value) -> Option<String> {
    match body.get("detail") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => return Some(s.clone()),
        Some(serde_json::Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|i| i.get("msg").and_then(|m| m.as_str()))
                .collect();
            if !msgs.is_empty() {
                return Some(msgs.join("; "));
            }
        }
        _ => {}
    }
    body.get("error")
        .and_then(|e| e.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "../tests/api/error_tests.rs"]
mod tests;
