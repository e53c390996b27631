use super::*;
use crate::clock::ManualClock;
use crate::notify::{NotificationKind, take_pending};
use crate::pages::Navigation;
use crate::storage::{ACCESS_TOKEN_KEY, MemoryStore};
use crate::test_support::{
    FUTURE_EXP, FakeCatalog, NOW_MS, category, service, token_for, transport_error,
};

type Page<'a> = ServicesPage<&'a MemoryStore, &'a ManualClock>;

struct Fixture {
    store: MemoryStore,
    clock: ManualClock,
    api: FakeCatalog,
}

fn fixture(role: Option<&str>, user_id: i64) -> Fixture {
    let design = category(1, "Design");
    let writing = category(2, "Writing");
    let web = category(3, "Web Development");
    let services = vec![
        service(1, "Logo design", 5, &[design.clone()]),
        service(2, "Blog posts", 6, &[writing.clone()]),
        service(3, "Landing page", 5, &[web.clone(), design.clone()]),
    ];
    let f = Fixture {
        store: MemoryStore::new(),
        clock: ManualClock::new(NOW_MS),
        api: FakeCatalog::new(vec![design, writing, web], services),
    };
    if let Some(role) = role {
        f.store
            .set_item(ACCESS_TOKEN_KEY, &token_for("user@example.com", role, user_id, FUTURE_EXP))
            .unwrap();
    }
    f
}

fn load<'a>(f: &'a Fixture, category: Option<&str>) -> Page<'a> {
    let ctx = PageContext::load(&f.store, &f.clock).unwrap();
    ServicesPage::load(ctx, category.map(str::to_string), &f.api).unwrap()
}

fn manageable(page: &Page<'_>) -> Vec<i64> {
    page.listing()
        .cards
        .iter()
        .filter(|c| c.can_manage)
        .map(|c| c.service.id)
        .collect()
}

fn toast(page: &Page<'_>) -> (NotificationKind, String) {
    let n = page.context().toaster().current().unwrap();
    (n.kind, n.message.clone())
}

fn fill_form(form: &mut ServiceForm, title: &str, price: &str, cats: &[Category]) {
    form.title = title.to_string();
    form.description = "details".to_string();
    form.price = price.to_string();
    for c in cats {
        form.picker.select(c);
    }
}

#[test]
fn freelancer_sees_create_section_and_own_manage_controls() {
    let f = fixture(Some("freelancer"), 5);
    let page = load(&f, None);

    assert!(page.create_visible());
    assert!(page.toggle_visible());
    assert_eq!(page.listing().title, "All available services");
    assert_eq!(page.listing().target, Some(ListTarget::All));
    assert_eq!(page.listing().cards.len(), 3);
    assert_eq!(manageable(&page), vec![1, 3]);
    assert_eq!(
        f.api.calls(),
        vec!["GET /categories/".to_string(), "GET /services/".to_string()]
    );
}

#[test]
fn client_gets_no_create_toggle_or_manage_controls() {
    let f = fixture(Some("client"), 5);
    let page = load(&f, None);

    assert!(!page.create_visible());
    assert!(!page.toggle_visible());
    assert!(manageable(&page).is_empty());
}

#[test]
fn admin_manages_every_service() {
    let f = fixture(Some("admin"), 99);
    let page = load(&f, None);
    assert_eq!(manageable(&page), vec![1, 2, 3]);
}

#[test]
fn missing_session_redirects_to_login() {
    let f = fixture(None, 0);
    let page = load(&f, None);

    assert_eq!(
        page.context().pending_navigation(),
        Some(&Navigation::Login)
    );
    assert!(f.api.calls().is_empty());
    let pending = take_pending(&f.store).unwrap().unwrap();
    assert_eq!(pending.kind, NotificationKind::Error);
}

#[test]
fn toggle_switches_to_owner_scoped_endpoint() {
    let f = fixture(Some("freelancer"), 6);
    let mut page = load(&f, None);

    assert!(page.toggle_my_services(&f.api).unwrap());
    assert!(page.showing_mine());
    assert_eq!(f.api.last_call().unwrap(), "GET /services/my/");
    assert_eq!(page.listing().title, "My published services");
    assert_eq!(page.listing().cards.len(), 1);
    assert_eq!(page.listing().cards[0].service.title, "Blog posts");

    assert!(page.toggle_my_services(&f.api).unwrap());
    assert_eq!(f.api.last_call().unwrap(), "GET /services/");
}

#[test]
fn category_filter_wins_over_toggle() {
    let f = fixture(Some("freelancer"), 5);
    let mut page = load(&f, Some("design"));

    assert!(!page.toggle_visible());
    assert!(!page.toggle_my_services(&f.api).unwrap());
    assert_eq!(f.api.last_call().unwrap(), "GET /services/?category_id=1");
    assert_eq!(page.listing().title, "Services in: Design");
    assert_eq!(
        page.listing().target,
        Some(ListTarget::Category {
            id: 1,
            name: "Design".into()
        })
    );
    assert_eq!(page.listing().cards.len(), 2);
}

#[test]
fn unknown_category_shows_empty_listing() {
    let f = fixture(Some("client"), 1);
    let page = load(&f, Some("Gardening"));

    assert!(page.listing().no_services);
    assert!(page.listing().cards.is_empty());
    assert_eq!(f.api.calls(), vec!["GET /categories/".to_string()]);
    assert_eq!(toast(&page).0, NotificationKind::Warning);
}

#[test]
fn failed_category_preload_is_not_reported_as_unknown_category() {
    let f = fixture(Some("client"), 1);
    f.api.fail_next(transport_error());
    let page = load(&f, Some("Design"));

    let (kind, message) = toast(&page);
    assert_eq!(kind, NotificationKind::Error);
    assert!(message.starts_with("Could not load categories: "), "{}", message);
    assert!(page.listing().error.is_some());
    assert!(!page.listing().no_services);
    assert_eq!(f.api.calls(), vec!["GET /categories/".to_string()]);
}

#[test]
fn reload_retries_a_failed_category_preload() {
    let f = fixture(Some("client"), 1);
    f.api.fail_next(transport_error());
    let mut page = load(&f, Some("Design"));

    page.reload(&f.api).unwrap();
    assert!(page.listing().error.is_none());
    assert_eq!(page.listing().cards.len(), 2);
    assert_eq!(f.api.last_call().unwrap(), "GET /services/?category_id=1");
}

#[test]
fn category_filter_folds_non_ascii_case() {
    let f = fixture(Some("client"), 1);
    let api = FakeCatalog::new(
        vec![category(7, "Diseño Gráfico")],
        vec![service(1, "Logo", 5, &[category(7, "Diseño Gráfico")])],
    );
    let ctx = PageContext::load(&f.store, &f.clock).unwrap();
    let page = ServicesPage::load(ctx, Some("DISEÑO GRÁFICO".to_string()), &api).unwrap();

    assert_eq!(
        page.listing().target,
        Some(ListTarget::Category {
            id: 7,
            name: "Diseño Gráfico".into()
        })
    );
    assert_eq!(page.listing().cards.len(), 1);
}

#[test]
fn empty_catalog_sets_no_services() {
    let f = fixture(Some("client"), 1);
    f.api.services.borrow_mut().clear();
    let page = load(&f, None);

    assert!(page.listing().no_services);
    assert!(page.listing().cards.is_empty());
    assert!(page.listing().error.is_none());
}

#[test]
fn search_is_sent_with_catalog_listing() {
    let f = fixture(Some("client"), 1);
    let mut page = load(&f, None);

    page.set_search(&f.api, "logo").unwrap();
    assert_eq!(f.api.last_call().unwrap(), "GET /services/ search=logo");
    assert_eq!(page.listing().cards.len(), 1);
}

#[test]
fn rejected_listing_drops_session_and_redirects() {
    let f = fixture(Some("freelancer"), 5);
    let mut page = load(&f, None);

    f.api.fail_next(ApiError::Unauthorized { detail: None });
    page.reload(&f.api).unwrap();

    assert!(f.store.get_item(ACCESS_TOKEN_KEY).unwrap().is_none());
    assert!(page.session().is_none());
    assert_eq!(
        page.context().pending_navigation(),
        Some(&Navigation::Login)
    );
    let pending = take_pending(&f.store).unwrap().unwrap();
    assert_eq!(pending.message, UNAUTHORIZED_LIST_MESSAGE);
}

#[test]
fn server_error_on_listing_is_shown() {
    let f = fixture(Some("client"), 1);
    let mut page = load(&f, None);

    f.api.fail_next(ApiError::Status {
        status: 500,
        detail: "database down".into(),
    });
    page.reload(&f.api).unwrap();

    assert_eq!(page.listing().error.as_deref(), Some("database down"));
    assert!(page.listing().cards.is_empty());
    assert_eq!(
        toast(&page),
        (
            NotificationKind::Error,
            "Error loading services: database down".to_string()
        )
    );
}

#[test]
fn create_validates_before_posting() {
    let f = fixture(Some("freelancer"), 5);
    let mut page = load(&f, None);
    let design = page.categories()[0].clone();

    fill_form(&mut page.create_form, "Icons", "abc", &[design.clone()]);
    page.create(&f.api).unwrap();
    assert_eq!(
        page.create_form.error,
        Some(FormError::InvalidPrice("abc".into()))
    );

    page.create_form.price = "NaN".into();
    page.create(&f.api).unwrap();
    assert!(matches!(
        page.create_form.error,
        Some(FormError::InvalidPrice(_))
    ));

    page.create_form.price = "-3".into();
    page.create(&f.api).unwrap();
    assert_eq!(page.create_form.error, Some(FormError::NegativePrice));

    page.create_form.price = "12.5".into();
    page.create_form.picker.remove(design.id);
    page.create(&f.api).unwrap();
    assert_eq!(page.create_form.error, Some(FormError::NoCategory));

    page.create_form.title = " ".into();
    page.create(&f.api).unwrap();
    assert_eq!(page.create_form.error, Some(FormError::EmptyTitle));

    assert!(!f.api.calls().iter().any(|c| c.starts_with("POST")));
}

#[test]
fn create_posts_notifies_and_reloads() {
    let f = fixture(Some("freelancer"), 5);
    let mut page = load(&f, None);
    let cats = page.categories()[..2].to_vec();

    fill_form(&mut page.create_form, "Icons", "12.5", &cats);
    page.create(&f.api).unwrap();

    let calls = f.api.calls();
    assert_eq!(calls[calls.len() - 2], "POST /services/");
    assert_eq!(calls[calls.len() - 1], "GET /services/");
    assert_eq!(
        toast(&page),
        (
            NotificationKind::Success,
            "Service \"Icons\" created successfully!".to_string()
        )
    );
    assert!(page.create_form.title.is_empty());
    assert!(page.create_form.picker.selected().is_empty());
    let created = page.listing().cards.last().unwrap();
    assert_eq!(created.service.title, "Icons");
    assert!(created.can_manage);
}

#[test]
fn client_cannot_create() {
    let f = fixture(Some("client"), 1);
    let mut page = load(&f, None);
    let design = page.categories()[0].clone();
    fill_form(&mut page.create_form, "Icons", "1", &[design]);

    page.create(&f.api).unwrap();
    assert!(!f.api.calls().iter().any(|c| c.starts_with("POST")));
    assert_eq!(toast(&page).0, NotificationKind::Error);
}

#[test]
fn foreign_service_cannot_be_managed() {
    let f = fixture(Some("freelancer"), 5);
    let mut page = load(&f, None);

    page.open_manage(&f.api, 2).unwrap();
    assert!(page.manage().is_none());
    assert_eq!(
        toast(&page).1,
        "You do not have permission to edit or delete this service."
    );
}

#[test]
fn update_puts_and_reloads() {
    let f = fixture(Some("freelancer"), 5);
    let mut page = load(&f, None);

    page.open_manage(&f.api, 3).unwrap();
    let manage = page.manage_mut().unwrap();
    assert_eq!(manage.form.title, "Landing page");
    assert_eq!(manage.form.picker.ids(), vec![3, 1]);
    manage.form.title = "Landing page v2".into();
    manage.form.picker.remove(1);

    page.update(&f.api).unwrap();
    assert!(page.manage().is_none());
    assert!(f.api.calls().contains(&"PUT /services/3".to_string()));
    assert_eq!(f.api.last_call().unwrap(), "GET /services/");
    let card = page
        .listing()
        .cards
        .iter()
        .find(|c| c.service.id == 3)
        .unwrap();
    assert_eq!(card.service.title, "Landing page v2");
    assert_eq!(card.service.categories.len(), 1);
}

#[test]
fn delete_waits_for_confirmation() {
    let f = fixture(Some("freelancer"), 5);
    let mut page = load(&f, None);

    page.open_manage(&f.api, 1).unwrap();
    assert!(page.request_delete());
    assert!(page.confirm().is_open());
    assert!(!page.request_delete());
    assert!(!f.api.calls().iter().any(|c| c.starts_with("DELETE")));

    page.resolve_confirmation(&f.api, ConfirmChoice::No).unwrap();
    assert!(!page.confirm().is_open());
    assert!(page.manage().is_some());
    assert!(!f.api.calls().iter().any(|c| c.starts_with("DELETE")));

    assert!(page.request_delete());
    page.resolve_confirmation(&f.api, ConfirmChoice::Yes).unwrap();
    assert!(f.api.calls().contains(&"DELETE /services/1".to_string()));
    assert!(page.manage().is_none());
    assert_eq!(toast(&page).1, "Service deleted successfully!");
    assert!(page.listing().cards.iter().all(|c| c.service.id != 1));
}

#[test]
fn cancel_manage_drops_open_confirmation() {
    let f = fixture(Some("admin"), 1);
    let mut page = load(&f, None);

    page.open_manage(&f.api, 2).unwrap();
    assert!(page.request_delete());
    page.cancel_manage();
    assert!(page.manage().is_none());
    assert!(!page.confirm().is_open());
}

#[test]
fn expired_session_blocks_mutations() {
    let f = fixture(Some("freelancer"), 5);
    let mut page = load(&f, None);
    let design = page.categories()[0].clone();
    fill_form(&mut page.create_form, "Icons", "1", &[design]);

    f.clock.set(FUTURE_EXP * 1000 + 1);
    page.create(&f.api).unwrap();

    assert!(!f.api.calls().iter().any(|c| c.starts_with("POST")));
    assert_eq!(
        page.context().pending_navigation(),
        Some(&Navigation::Login)
    );
    let pending = take_pending(&f.store).unwrap().unwrap();
    assert_eq!(pending.kind, NotificationKind::Warning);
}

#[test]
fn logout_returns_to_login_with_notice() {
    let f = fixture(Some("client"), 1);
    let mut page = load(&f, None);
    page.logout().unwrap();

    assert!(f.store.get_item(ACCESS_TOKEN_KEY).unwrap().is_none());
    assert_eq!(
        take_pending(&f.store).unwrap().unwrap().message,
        "Session closed successfully."
    );
}

#[test]
fn picker_suggests_case_insensitively_and_skips_selected() {
    let all: Vec<Category> = (1..=12)
        .map(|i| category(i, &format!("Design {}", i)))
        .chain([category(20, "Writing")])
        .collect();
    let mut picker = CategoryPicker::default();
    assert!(picker.suggestions(&all).is_empty());

    picker.query = "DESIGN".into();
    assert_eq!(picker.suggestions(&all).len(), MAX_SUGGESTIONS);

    picker.query = "writ".into();
    let hits = picker.suggestions(&all);
    assert_eq!(hits.len(), 1);
    let writing = hits[0].clone();
    picker.select(&writing);
    assert!(picker.query.is_empty());

    picker.query = "writ".into();
    assert!(picker.suggestions(&all).is_empty());

    picker.select(&writing);
    assert_eq!(picker.ids(), vec![20]);
    assert!(picker.select_by_name(&all, " design 3 "));
    assert!(!picker.select_by_name(&all, "Gardening"));
    assert_eq!(picker.ids(), vec![20, 3]);
}

#[test]
fn form_prefills_single_category_shape() {
    let all = vec![category(1, "Design"), category(2, "Writing")];
    let mut legacy = service(9, "Old", 1, &[]);
    legacy.category = Some("writing".into());

    let form = ServiceForm::from_service(&legacy, &all);
    assert_eq!(form.picker.ids(), vec![2]);
    assert_eq!(form.price, "90");
    assert_eq!(form.validate().unwrap().category_ids, vec![2]);
}

#[test]
fn active_form_follows_the_managed_service() {
    let f = fixture(Some("freelancer"), 5);
    let mut page = load(&f, None);
    page.active_form_mut().title = "Draft".into();
    assert_eq!(page.create_form.title, "Draft");

    page.open_manage(&f.api, 3).unwrap();
    assert_eq!(page.active_form().title, "Landing page");
    page.active_form_mut().price = "75".into();
    assert_eq!(page.manage().unwrap().form.price, "75");
    assert_eq!(page.create_form.title, "Draft");

    page.cancel_manage();
    assert_eq!(page.active_form().title, "Draft");
}

#[test]
fn picker_selects_names_typed_in_another_case() {
    let all = vec![category(1, "Diseño Gráfico"), category(2, "Traducción")];
    let mut picker = CategoryPicker::default();
    assert!(picker.select_by_name(&all, " DISEÑO GRÁFICO "));
    assert!(picker.select_by_name(&all, "traducción"));
    assert_eq!(picker.selected().len(), 2);
    assert!(!picker.select_by_name(&all, "Diseno"));
}

#[test]
fn show_service_toasts_a_missing_service() {
    let f = fixture(Some("client"), 1);
    let mut page = load(&f, None);

    let shown = page.show_service(&f.api, 2).unwrap().unwrap();
    assert_eq!(shown.title, "Blog posts");

    assert!(page.show_service(&f.api, 99).unwrap().is_none());
    let (kind, message) = toast(&page);
    assert_eq!(kind, NotificationKind::Error);
    assert!(message.starts_with("Error loading service: "), "{}", message);
}
