use reqwest::header::AUTHORIZATION;

use super::http_client::bearer;
use super::{
    ApiClient, ApiError, AuthApi, ProbeTarget, RegisterRequest, RegisteredUser, TokenResponse,
};

impl AuthApi for ApiClient {
    fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let url = self.auth_endpoint("/token");
        let req = self
            .post(&url)
            .form(&[("username", username), ("password", password)]);
        self.send_json(req, &url)
    }

    fn register(&self, request: &RegisterRequest) -> Result<RegisteredUser, ApiError> {
        let url = self.auth_endpoint("/register");
        let req = self.post(&url).json(request);
        self.send_json(req, &url)
    }

    fn probe(&self, target: ProbeTarget, token: &str) -> Result<serde_json::Value, ApiError> {
        let url = self.auth_endpoint(target.path());
        let req = self.get(&url).header(AUTHORIZATION, bearer(token));
        self.send_json(req, &url)
    }
}
