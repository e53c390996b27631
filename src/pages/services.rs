//! Services page: catalog listing with category/owner filters and the CRUD forms.

use anyhow::Result;

use crate::api::{ApiError, CatalogApi, Category, Service, ServiceQuery};
use crate::clock::Clock;
use crate::confirm::{ConfirmChoice, ConfirmDialog};
use crate::notify::Notification;
use crate::session::{Feature, Session};
use crate::storage::KeyValueStore;

use super::{Controller, Navigation, PageContext};

mod form;

pub use self::form::{CategoryPicker, FormError, MAX_SUGGESTIONS, ServiceForm};
pub(crate) use self::form::names_match;

pub const UNAUTHORIZED_LIST_MESSAGE: &str =
    "Not authorized to view this section. Please log in again.";

/// Work parked behind the confirmation dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingAction {
    DeleteService(i64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListTarget {
    Category { id: i64, name: String },
    Mine,
    All,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServiceCard {
    pub service: Service,
    /// Whether the manage control is offered for this card.
    pub can_manage: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Listing {
    pub title: String,
    pub target: Option<ListTarget>,
    pub cards: Vec<ServiceCard>,
    pub no_services: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ManageState {
    pub service: Service,
    pub form: ServiceForm,
}

pub struct ServicesPage<S, C> {
    ctx: PageContext<S, C>,
    session: Option<Session>,
    category_filter: Option<String>,
    pub search: String,
    showing_mine: bool,
    categories: Vec<Category>,
    /// Why the category list is missing, when preloading it failed.
    categories_error: Option<String>,
    listing: Listing,
    pub create_form: ServiceForm,
    manage: Option<ManageState>,
    confirm: ConfirmDialog<PendingAction>,
}

impl<S: KeyValueStore, C: Clock> ServicesPage<S, C> {
    /// Guards the page, preloads the category list and loads the first listing.
    /// Without a usable session the page only records a navigation to login.
    pub fn load(
        ctx: PageContext<S, C>,
        category: Option<String>,
        api: &impl CatalogApi,
    ) -> Result<Self> {
        let mut page = Self {
            ctx,
            session: None,
            category_filter: category.filter(|c| !c.trim().is_empty()),
            search: String::new(),
            showing_mine: false,
            categories: Vec::new(),
            categories_error: None,
            listing: Listing::default(),
            create_form: ServiceForm::default(),
            manage: None,
            confirm: ConfirmDialog::new(),
        };
        if page.require_session()?.is_none() {
            return Ok(page);
        }

        page.preload_categories(api);
        page.reload_listing(api, false)?;
        Ok(page)
    }

    /// A failure is only toasted here when no category filter depends on the list;
    /// otherwise the listing reports it.
    fn preload_categories(&mut self, api: &impl CatalogApi) {
        match api.list_categories() {
            Ok(cats) => {
                self.categories = cats;
                self.categories_error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "preloading categories failed");
                let text = err.user_message();
                if self.category_filter.is_none() {
                    self.ctx.notify(Notification::warning(format!(
                        "Could not load categories: {}",
                        text
                    )));
                }
                self.categories_error = Some(text);
            }
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn category_filter(&self) -> Option<&str> {
        self.category_filter.as_deref()
    }

    pub fn showing_mine(&self) -> bool {
        self.showing_mine
    }

    pub fn manage(&self) -> Option<&ManageState> {
        self.manage.as_ref()
    }

    pub fn manage_mut(&mut self) -> Option<&mut ManageState> {
        self.manage.as_mut()
    }

    pub fn confirm(&self) -> &ConfirmDialog<PendingAction> {
        &self.confirm
    }

    /// The form being edited: the manage form while a service is open, else the
    /// create form.
    pub fn active_form(&self) -> &ServiceForm {
        match &self.manage {
            Some(m) => &m.form,
            None => &self.create_form,
        }
    }

    pub fn active_form_mut(&mut self) -> &mut ServiceForm {
        match &mut self.manage {
            Some(m) => &mut m.form,
            None => &mut self.create_form,
        }
    }

    pub fn create_visible(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.allows(Feature::CreateService))
    }

    /// The "my services" toggle is hidden whenever a category filter is active.
    pub fn toggle_visible(&self) -> bool {
        self.category_filter.is_none()
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.allows(Feature::MyServicesToggle))
    }

    /// Re-reads the session; a missing or expired one sends the page to login.
    fn require_session(&mut self) -> Result<Option<Session>> {
        self.session = self.ctx.gate().guard_page()?;
        if self.session.is_none() {
            self.manage = None;
            self.ctx.navigate(Navigation::Login);
        }
        Ok(self.session.clone())
    }

    fn resolve_target(&self, session: &Session) -> Option<ListTarget> {
        if let Some(name) = &self.category_filter {
            return self
                .categories
                .iter()
                .find(|c| names_match(&c.name, name))
                .map(|c| ListTarget::Category {
                    id: c.id,
                    name: c.name.clone(),
                });
        }
        if self.showing_mine && session.allows(Feature::MyServicesToggle) {
            Some(ListTarget::Mine)
        } else {
            Some(ListTarget::All)
        }
    }

    /// Reloads the listing, retrying the category preload if it failed before.
    pub fn reload(&mut self, api: &impl CatalogApi) -> Result<()> {
        self.reload_listing(api, true)
    }

    fn reload_listing(&mut self, api: &impl CatalogApi, retry_categories: bool) -> Result<()> {
        let Some(session) = self.require_session()? else {
            return Ok(());
        };
        if retry_categories && self.categories_error.is_some() {
            self.preload_categories(api);
        }

        if let (Some(name), Some(text)) = (&self.category_filter, &self.categories_error) {
            let (name, text) = (name.clone(), text.clone());
            self.ctx.notify(Notification::error(format!(
                "Could not load categories: {}",
                text
            )));
            self.listing = Listing {
                title: format!("Services in: {}", name),
                target: None,
                cards: Vec::new(),
                no_services: false,
                error: Some(text),
            };
            return Ok(());
        }

        let Some(target) = self.resolve_target(&session) else {
            let name = self.category_filter.clone().unwrap_or_default();
            self.ctx
                .notify(Notification::warning(format!("Unknown category: {}", name)));
            self.listing = Listing {
                title: format!("Services in: {}", name),
                target: None,
                cards: Vec::new(),
                no_services: true,
                error: None,
            };
            return Ok(());
        };

        let search = Some(self.search.clone()).filter(|s| !s.trim().is_empty());
        let (title, result) = match &target {
            ListTarget::Category { id, name } => {
                let query = ServiceQuery {
                    category_id: Some(*id),
                    search,
                };
                (
                    format!("Services in: {}", name),
                    api.list_services(&query, Some(&session.token)),
                )
            }
            ListTarget::Mine => (
                "My published services".to_string(),
                api.my_services(&session.token),
            ),
            ListTarget::All => {
                let query = ServiceQuery {
                    category_id: None,
                    search,
                };
                (
                    "All available services".to_string(),
                    api.list_services(&query, Some(&session.token)),
                )
            }
        };

        match result {
            Ok(services) => {
                tracing::debug!(count = services.len(), ?target, "services loaded");
                let cards: Vec<ServiceCard> = services
                    .into_iter()
                    .map(|service| ServiceCard {
                        can_manage: session.can_manage(&service.owner_id),
                        service,
                    })
                    .collect();
                self.listing = Listing {
                    title,
                    target: Some(target),
                    no_services: cards.is_empty(),
                    cards,
                    error: None,
                };
            }
            Err(err) if err.is_auth() => {
                tracing::info!(error = %err, "listing rejected; dropping session");
                self.ctx.gate().logout()?;
                self.session = None;
                self.manage = None;
                self.listing = Listing::default();
                self.ctx.navigate_with(
                    Navigation::Login,
                    &Notification::error(UNAUTHORIZED_LIST_MESSAGE),
                )?;
            }
            Err(err) => {
                let text = err.user_message();
                self.ctx
                    .notify(Notification::error(format!("Error loading services: {}", text)));
                self.listing = Listing {
                    title,
                    target: Some(target),
                    cards: Vec::new(),
                    no_services: false,
                    error: Some(text),
                };
            }
        }
        Ok(())
    }

    /// Flips between the owner-scoped and full listing. Returns false when the
    /// toggle is not offered.
    pub fn toggle_my_services(&mut self, api: &impl CatalogApi) -> Result<bool> {
        if !self.toggle_visible() {
            return Ok(false);
        }
        self.showing_mine = !self.showing_mine;
        self.reload(api)?;
        Ok(true)
    }

    pub fn set_search(&mut self, api: &impl CatalogApi, query: impl Into<String>) -> Result<()> {
        self.search = query.into();
        self.reload(api)
    }

    pub fn create(&mut self, api: &impl CatalogApi) -> Result<()> {
        let Some(session) = self.require_session()? else {
            return Ok(());
        };
        if !session.allows(Feature::CreateService) {
            self.ctx
                .notify(Notification::error("Your role cannot publish services."));
            return Ok(());
        }
        let payload = match self.create_form.validate() {
            Ok(p) => p,
            Err(err) => {
                self.create_form.error = Some(err);
                return Ok(());
            }
        };
        self.create_form.error = None;

        match api.create_service(&session.token, &payload) {
            Ok(created) => {
                tracing::info!(id = created.id, "service created");
                self.ctx.notify(Notification::success(format!(
                    "Service \"{}\" created successfully!",
                    created.title
                )));
                self.create_form.reset();
                self.reload(api)?;
            }
            Err(err) => self.notify_failure("creating service", &err),
        }
        Ok(())
    }

    /// Loads a service into the manage form. Only offered for services the session
    /// may manage.
    /// Fetches one service for display. Failures are toasted and give `None`.
    pub fn show_service(&mut self, api: &impl CatalogApi, id: i64) -> Result<Option<Service>> {
        if self.require_session()?.is_none() {
            return Ok(None);
        }
        match api.get_service(id) {
            Ok(service) => Ok(Some(service)),
            Err(err) => {
                self.notify_failure("loading service", &err);
                Ok(None)
            }
        }
    }

    pub fn open_manage(&mut self, api: &impl CatalogApi, id: i64) -> Result<()> {
        let Some(session) = self.require_session()? else {
            return Ok(());
        };
        match api.get_service(id) {
            Ok(service) if session.can_manage(&service.owner_id) => {
                let form = ServiceForm::from_service(&service, &self.categories);
                self.manage = Some(ManageState { service, form });
            }
            Ok(_) => {
                self.ctx.notify(Notification::error(
                    "You do not have permission to edit or delete this service.",
                ));
            }
            Err(err) => self.notify_failure("loading service", &err),
        }
        Ok(())
    }

    pub fn update(&mut self, api: &impl CatalogApi) -> Result<()> {
        let Some(session) = self.require_session()? else {
            return Ok(());
        };
        let Some(manage) = self.manage.as_mut() else {
            return Ok(());
        };
        let payload = match manage.form.validate() {
            Ok(p) => p,
            Err(err) => {
                manage.form.error = Some(err);
                return Ok(());
            }
        };
        manage.form.error = None;
        let id = manage.service.id;

        match api.update_service(&session.token, id, &payload) {
            Ok(updated) => {
                tracing::info!(id, "service updated");
                self.ctx.notify(Notification::success(format!(
                    "Service \"{}\" updated successfully!",
                    updated.title
                )));
                self.manage = None;
                self.reload(api)?;
            }
            Err(err) => self.notify_failure("updating service", &err),
        }
        Ok(())
    }

    /// Asks for confirmation before deleting the managed service. Returns false when
    /// nothing is being managed or a confirmation is already open.
    pub fn request_delete(&mut self) -> bool {
        let Some(manage) = &self.manage else {
            return false;
        };
        let message = format!(
            "Delete \"{}\"? This cannot be undone.",
            manage.service.title
        );
        let action = PendingAction::DeleteService(manage.service.id);
        match self.confirm.open("Delete service", message, action) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(error = %err, "delete already awaiting confirmation");
                false
            }
        }
    }

    pub fn resolve_confirmation(
        &mut self,
        api: &impl CatalogApi,
        choice: ConfirmChoice,
    ) -> Result<()> {
        let Some(confirmed) = self.confirm.resolve(choice) else {
            return Ok(());
        };
        if !confirmed.answer {
            return Ok(());
        }
        match confirmed.action {
            PendingAction::DeleteService(id) => {
                let Some(session) = self.require_session()? else {
                    return Ok(());
                };
                match api.delete_service(&session.token, id) {
                    Ok(()) => {
                        tracing::info!(id, "service deleted");
                        self.ctx
                            .notify(Notification::success("Service deleted successfully!"));
                        self.manage = None;
                        self.reload(api)?;
                    }
                    Err(err) => self.notify_failure("deleting service", &err),
                }
            }
        }
        Ok(())
    }

    pub fn cancel_manage(&mut self) {
        self.confirm.resolve(ConfirmChoice::Dismiss);
        self.manage = None;
    }

    pub fn logout(&mut self) -> Result<()> {
        self.ctx.gate().logout()?;
        self.session = None;
        self.ctx.navigate_with(
            Navigation::Login,
            &Notification::success("Session closed successfully."),
        )
    }

    pub fn go_to_landing(&mut self) {
        self.ctx.navigate(Navigation::Landing);
    }

    fn notify_failure(&mut self, doing: &str, err: &ApiError) {
        tracing::warn!(error = %err, "{} failed", doing);
        self.ctx.notify(Notification::error(format!(
            "Error {}: {}",
            doing,
            err.user_message()
        )));
    }
}

impl<S: KeyValueStore, C: Clock> Controller for ServicesPage<S, C> {
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
#[path = "../tests/pages/services_tests.rs"]
mod tests;
