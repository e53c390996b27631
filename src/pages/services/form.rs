use crate::api::{Category, Service, ServicePayload};

/// Type-ahead suggestions shown at most.
pub const MAX_SUGGESTIONS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Title is required.")]
    EmptyTitle,
    #[error("Price must be a number, got {0:?}.")]
    InvalidPrice(String),
    #[error("Price cannot be negative.")]
    NegativePrice,
    #[error("Select at least one category.")]
    NoCategory,
}

/// Multi-select over the preloaded category list.
#[derive(Clone, Debug, Default)]
pub struct CategoryPicker {
    pub query: String,
    selected: Vec<Category>,
}

impl CategoryPicker {
    /// Categories whose name contains the query (case-insensitive), minus those
    /// already selected. An empty query suggests nothing.
    pub fn suggestions<'a>(&self, all: &'a [Category]) -> Vec<&'a Category> {
        let q = self.query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        all.iter()
            .filter(|c| c.name.to_lowercase().contains(&q))
            .filter(|c| !self.is_selected(c.id))
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    pub fn select(&mut self, category: &Category) {
        if !self.is_selected(category.id) {
            self.selected.push(category.clone());
        }
        self.query.clear();
    }

    /// Selects the category whose name matches exactly, ignoring case.
    pub fn select_by_name(&mut self, all: &[Category], name: &str) -> bool {
        match all.iter().find(|c| names_match(&c.name, name)) {
            Some(c) => {
                self.select(c);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: i64) {
        self.selected.retain(|c| c.id != id);
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.iter().any(|c| c.id == id)
    }

    pub fn selected(&self) -> &[Category] {
        &self.selected
    }

    pub fn ids(&self) -> Vec<i64> {
        self.selected.iter().map(|c| c.id).collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ServiceForm {
    pub title: String,
    pub description: String,
    /// Raw price text as typed.
    pub price: String,
    pub picker: CategoryPicker,
    pub error: Option<FormError>,
}

impl ServiceForm {
    /// Prefills the manage form. Categories served by name only (older catalog shape)
    /// are matched against `all`.
    pub fn from_service(service: &Service, all: &[Category]) -> Self {
        let mut picker = CategoryPicker::default();
        if service.categories.is_empty() {
            for name in service.category_names() {
                picker.select_by_name(all, &name);
            }
        } else {
            for c in &service.categories {
                picker.select(c);
            }
        }
        Self {
            title: service.title.clone(),
            description: service.description.clone(),
            price: service.price.to_string(),
            picker,
            error: None,
        }
    }

    pub fn validate(&self) -> Result<ServicePayload, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::EmptyTitle);
        }
        let raw = self.price.trim();
        let price: f64 = raw
            .parse()
            .ok()
            .filter(|p: &f64| p.is_finite())
            .ok_or_else(|| FormError::InvalidPrice(raw.to_string()))?;
        if price < 0.0 {
            return Err(FormError::NegativePrice);
        }
        if self.picker.selected().is_empty() {
            return Err(FormError::NoCategory);
        }
        Ok(ServicePayload {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            price,
            category_ids: self.picker.ids(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Case-insensitive category name comparison; names like "Diseño Gráfico" fold too.
pub(crate) fn names_match(name: &str, typed: &str) -> bool {
    name.to_lowercase() == typed.trim().to_lowercase()
}
