//! DTOs for the auth and catalog APIs.

use serde::{Deserialize, Deserializer, Serialize};

use crate::session::Feature;
use crate::token::{Role, id_from_json};

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let v = serde_json::Value::deserialize(deserializer)?;
    id_from_json(&v).ok_or_else(|| serde::de::Error::custom("expected a numeric or string id"))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisteredUser {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub email: String,
    pub role: Role,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProbeTarget {
    ClientDashboard,
    FreelancerProfile,
    AdminPanel,
}

impl ProbeTarget {
    pub const ALL: [ProbeTarget; 3] = [
        ProbeTarget::ClientDashboard,
        ProbeTarget::FreelancerProfile,
        ProbeTarget::AdminPanel,
    ];

    pub fn path(self) -> &'static str {
        match self {
            ProbeTarget::ClientDashboard => "/client-dashboard/",
            ProbeTarget::FreelancerProfile => "/freelancer-profile/",
            ProbeTarget::AdminPanel => "/admin-panel/",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProbeTarget::ClientDashboard => "Client dashboard",
            ProbeTarget::FreelancerProfile => "Freelancer profile",
            ProbeTarget::AdminPanel => "Admin panel",
        }
    }

    pub fn feature(self) -> Feature {
        match self {
            ProbeTarget::ClientDashboard => Feature::ClientDashboard,
            ProbeTarget::FreelancerProfile => Feature::FreelancerProfile,
            ProbeTarget::AdminPanel => Feature::AdminPanel,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,

    #[serde(default)]
    pub categories: Vec<Category>,

    /// Single-category shape served by older catalog versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(alias = "freelancer_id", deserialize_with = "de_id")]
    pub owner_id: String,
}

impl Service {
    pub fn category_names(&self) -> Vec<String> {
        if self.categories.is_empty() {
            return self.category.iter().cloned().collect();
        }
        self.categories.iter().map(|c| c.name.clone()).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandingCategory {
    pub category: String,

    #[serde(default)]
    pub sample_services: Vec<Service>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceQuery {
    pub category_id: Option<i64>,
    pub search: Option<String>,
}

impl ServiceQuery {
    pub(super) fn params(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(id) = self.category_id {
            out.push(("category_id", id.to_string()));
        }
        if let Some(q) = self.search.as_deref().map(str::trim)
            && !q.is_empty()
        {
            out.push(("search_query", q.to_string()));
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServicePayload {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category_ids: Vec<i64>,
}
