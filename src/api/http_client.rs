use reqwest::blocking::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{ApiClient, ApiError};

impl ApiClient {
    pub(super) fn auth_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.auth_url, path)
    }

    pub(super) fn catalog_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.catalog_url, path)
    }

    pub(super) fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    pub(super) fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    pub(super) fn put(&self, url: &str) -> RequestBuilder {
        self.client.put(url)
    }

    pub(super) fn delete(&self, url: &str) -> RequestBuilder {
        self.client.delete(url)
    }

    /// Sends once (no retries) and turns non-2xx responses into `ApiError`.
    pub(super) fn send(&self, req: RequestBuilder, url: &str) -> Result<Response, ApiError> {
        tracing::debug!(%url, "request");
        let resp = req.send().map_err(|err| {
            tracing::warn!(%url, error = %err, "request failed");
            ApiError::Transport {
                url: url.to_string(),
                source: Box::new(err),
            }
        })?;
        ensure_ok(resp, url)
    }

    pub(super) fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        url: &str,
    ) -> Result<T, ApiError> {
        let resp = self.send(req, url)?;
        resp.json::<T>().map_err(|err| ApiError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })
    }
}

fn ensure_ok(resp: Response, url: &str) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.bytes().map(|b| b.to_vec()).unwrap_or_default();
    let err = ApiError::from_status(status, &body);
    tracing::info!(%url, status = status.as_u16(), error = %err, "request rejected");
    Err(err)
}

pub(super) fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
