//! REST client for the auth service and the service catalog.

use anyhow::{Context, Result};

use crate::config::ClientConfig;

mod auth;
mod catalog;
mod error;
mod http_client;
mod types;

pub use self::error::{ApiError, CONNECTION_FAILED_MESSAGE};
pub use self::types::*;

pub trait AuthApi {
    fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError>;
    fn register(&self, request: &RegisterRequest) -> Result<RegisteredUser, ApiError>;
    fn probe(&self, target: ProbeTarget, token: &str) -> Result<serde_json::Value, ApiError>;
}

pub trait CatalogApi {
    fn list_services(
        &self,
        query: &ServiceQuery,
        token: Option<&str>,
    ) -> Result<Vec<Service>, ApiError>;
    fn my_services(&self, token: &str) -> Result<Vec<Service>, ApiError>;
    fn get_service(&self, id: i64) -> Result<Service, ApiError>;
    fn create_service(&self, token: &str, payload: &ServicePayload) -> Result<Service, ApiError>;
    fn update_service(
        &self,
        token: &str,
        id: i64,
        payload: &ServicePayload,
    ) -> Result<Service, ApiError>;
    fn delete_service(&self, token: &str, id: i64) -> Result<(), ApiError>;
    fn list_categories(&self) -> Result<Vec<Category>, ApiError>;
    fn landing_categories(&self) -> Result<Vec<LandingCategory>, ApiError>;
}

pub struct ApiClient {
    auth_url: String,
    catalog_url: String,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("redfreelance")
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            auth_url: config.auth_url.clone(),
            catalog_url: config.catalog_url.clone(),
            client,
        })
    }
}
