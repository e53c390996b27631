use crate::api::{CatalogApi, Category, LandingCategory};
use crate::clock::Clock;
use crate::notify::Notification;
use crate::storage::KeyValueStore;

use super::{Controller, Navigation, PageContext};

#[derive(Clone, Debug, PartialEq)]
pub struct SampleService {
    pub title: String,
    pub price: f64,
    pub owner_id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryCard {
    pub name: String,
    pub samples: Vec<SampleService>,
}

impl From<LandingCategory> for CategoryCard {
    fn from(c: LandingCategory) -> Self {
        Self {
            name: c.category,
            samples: c
                .sample_services
                .into_iter()
                .map(|s| SampleService {
                    title: s.title,
                    price: s.price,
                    owner_id: s.owner_id,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LandingState {
    Loading,
    Empty,
    Loaded(Vec<CategoryCard>),
    Failed(String),
}

pub struct LandingPage<S, C> {
    ctx: PageContext<S, C>,
    state: LandingState,
}

impl<S: KeyValueStore, C: Clock> LandingPage<S, C> {
    pub fn new(ctx: PageContext<S, C>) -> Self {
        Self {
            ctx,
            state: LandingState::Loading,
        }
    }

    pub fn state(&self) -> &LandingState {
        &self.state
    }

    pub fn load(&mut self, api: &impl CatalogApi) {
        self.state = match api.landing_categories() {
            Ok(cats) if cats.is_empty() => LandingState::Empty,
            Ok(cats) => LandingState::Loaded(cats.into_iter().map(CategoryCard::from).collect()),
            Err(err) => {
                tracing::warn!(error = %err, "loading landing categories failed");
                let text = format!("Could not load categories: {}", err.user_message());
                self.ctx.notify(Notification::error(text.clone()));
                LandingState::Failed(text)
            }
        };
    }

    /// The full category list, for browsing without the sample cards.
    pub fn category_list(&mut self, api: &impl CatalogApi) -> Option<Vec<Category>> {
        match api.list_categories() {
            Ok(cats) => Some(cats),
            Err(err) => {
                tracing::warn!(error = %err, "loading categories failed");
                self.ctx.notify(Notification::error(format!(
                    "Could not load categories: {}",
                    err.user_message()
                )));
                None
            }
        }
    }

    /// Opens the services page filtered to the card's category.
    pub fn open_category(&mut self, index: usize) -> bool {
        let LandingState::Loaded(cards) = &self.state else {
            return false;
        };
        let Some(card) = cards.get(index) else {
            return false;
        };
        let category = Some(card.name.clone());
        self.ctx.navigate(Navigation::Services { category });
        true
    }

    pub fn go_to_login(&mut self) {
        self.ctx.navigate(Navigation::Login);
    }
}

impl<S: KeyValueStore, C: Clock> Controller for LandingPage<S, C> {
    type Store = S;
    type Clock = C;

    fn context(&self) -> &PageContext<S, C> {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut PageContext<S, C> {
        &mut self.ctx
    }
}

#[cfg(test)]
#[path = "../tests/pages/landing_tests.rs"]
mod tests;
