use reqwest::header::AUTHORIZATION;

use super::http_client::bearer;
use super::{
    ApiClient, ApiError, CatalogApi, Category, LandingCategory, Service, ServicePayload,
    ServiceQuery,
};

impl CatalogApi for ApiClient {
    fn list_services(
        &self,
        query: &ServiceQuery,
        token: Option<&str>,
    ) -> Result<Vec<Service>, ApiError> {
        let url = self.catalog_endpoint("/services/");
        let mut req = self.get(&url).query(&query.params());
        if let Some(token) = token {
            req = req.header(AUTHORIZATION, bearer(token));
        }
        self.send_json(req, &url)
    }

    fn my_services(&self, token: &str) -> Result<Vec<Service>, ApiError> {
        let url = self.catalog_endpoint("/services/my/");
        let req = self.get(&url).header(AUTHORIZATION, bearer(token));
        self.send_json(req, &url)
    }

    fn get_service(&self, id: i64) -> Result<Service, ApiError> {
        let url = self.catalog_endpoint(&format!("/services/{}", id));
        let req = self.get(&url);
        self.send_json(req, &url)
    }

    fn create_service(&self, token: &str, payload: &ServicePayload) -> Result<Service, ApiError> {
        let url = self.catalog_endpoint("/services/");
        let req = self
            .post(&url)
            .header(AUTHORIZATION, bearer(token))
            .json(payload);
        self.send_json(req, &url)
    }

    fn update_service(
        &self,
        token: &str,
        id: i64,
        payload: &ServicePayload,
    ) -> Result<Service, ApiError> {
        let url = self.catalog_endpoint(&format!("/services/{}", id));
        let req = self
            .put(&url)
            .header(AUTHORIZATION, bearer(token))
            .json(payload);
        self.send_json(req, &url)
    }

    fn delete_service(&self, token: &str, id: i64) -> Result<(), ApiError> {
        let url = self.catalog_endpoint(&format!("/services/{}", id));
        let req = self.delete(&url).header(AUTHORIZATION, bearer(token));
        let _ = self.send(req, &url)?;
        Ok(())
    }

    fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.catalog_endpoint("/categories/");
        let req = self.get(&url);
        self.send_json(req, &url)
    }

    fn landing_categories(&self) -> Result<Vec<LandingCategory>, ApiError> {
        let url = self.catalog_endpoint("/landing-categories/");
        let req = self.get(&url);
        self.send_json(req, &url)
    }
}
