use super::*;
use crate::clock::ManualClock;
use crate::pages::INLINE_MESSAGE_MS;
use crate::storage::{ACCESS_TOKEN_KEY, MemoryStore};
use crate::test_support::{FUTURE_EXP, FakeAuth, NOW_MS, token_for, transport_error};

type Page<'a> = LoginPage<&'a MemoryStore, &'a ManualClock>;

fn load<'a>(store: &'a MemoryStore, clock: &'a ManualClock) -> Page<'a> {
    LoginPage::load(PageContext::load(store, clock).unwrap()).unwrap()
}

fn fill(page: &mut Page<'_>, email: &str, password: &str) {
    page.form.email = email.to_string();
    page.form.password = password.to_string();
}

#[test]
fn login_stores_token_and_shows_welcome() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(NOW_MS);
    let api = FakeAuth::default().with_user("ana@example.com", "pw", Role::Freelancer);
    let mut page = load(&store, &clock);
    assert_eq!(page.view(), &LoginView::Form);

    fill(&mut page, " ana@example.com ", "pw");
    page.submit(&api).unwrap();

    assert!(store.get_item(ACCESS_TOKEN_KEY).unwrap().is_some());
    assert_eq!(
        page.view(),
        &LoginView::Welcome(Welcome {
            identity: "ana@example.com".into(),
            role: Role::Freelancer,
            probes: vec![ProbeTarget::FreelancerProfile],
        })
    );
    assert!(page.form.password.is_empty());
    assert!(page.message().is_none());
}

#[test]
fn bad_credentials_show_server_detail_inline() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(NOW_MS);
    let api = FakeAuth::default().with_user("ana@example.com", "pw", Role::Client);
    let mut page = load(&store, &clock);

    fill(&mut page, "ana@example.com", "wrong");
    page.submit(&api).unwrap();

    let msg = page.message().unwrap();
    assert!(msg.is_error);
    assert_eq!(msg.text, "Error: Incorrect username or password");
    assert!(store.is_empty());
}

#[test]
fn empty_fields_never_reach_the_server() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(NOW_MS);
    let api = FakeAuth::default();
    let mut page = load(&store, &clock);

    fill(&mut page, "  ", "pw");
    page.submit(&api).unwrap();
    assert!(page.message().unwrap().is_error);
    assert!(api.calls.borrow().is_empty());
}

#[test]
fn connection_failure_uses_generic_message() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(NOW_MS);
    let api = FakeAuth::default();
    api.fail_next(transport_error());
    let mut page = load(&store, &clock);

    fill(&mut page, "a@b.c", "pw");
    page.submit(&api).unwrap();
    assert_eq!(
        page.message().unwrap().text,
        format!("Error: {}", CONNECTION_FAILED_MESSAGE)
    );
}

#[test]
fn inline_message_expires() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(NOW_MS);
    let mut page = load(&store, &clock);

    page.submit(&FakeAuth::default()).unwrap();
    assert!(page.message().is_some());
    clock.advance(INLINE_MESSAGE_MS);
    assert!(page.message().is_none());
}

#[test]
fn existing_session_loads_welcome_and_logout_returns_to_form() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(NOW_MS);
    store
        .set_item(ACCESS_TOKEN_KEY, &token_for("root@example.com", "admin", 1, FUTURE_EXP))
        .unwrap();
    let mut page = load(&store, &clock);

    let LoginView::Welcome(welcome) = page.view() else {
        panic!("expected welcome view");
    };
    assert_eq!(welcome.probes, ProbeTarget::ALL.to_vec());

    page.logout().unwrap();
    assert_eq!(page.view(), &LoginView::Form);
    assert_eq!(page.message().unwrap().text, "Session closed successfully.");
    assert!(!page.message().unwrap().is_error);
    assert!(store.is_empty());
}

#[test]
fn probe_reports_access_and_denial_per_section() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(NOW_MS);
    let api = FakeAuth::default();
    store
        .set_item(ACCESS_TOKEN_KEY, &token_for("c@example.com", "client", 2, FUTURE_EXP))
        .unwrap();
    let mut page = load(&store, &clock);

    page.probe(&api, ProbeTarget::ClientDashboard).unwrap();
    page.probe(&api, ProbeTarget::AdminPanel).unwrap();

    let ok = page.probe_message(ProbeTarget::ClientDashboard).unwrap();
    assert!(!ok.is_error);
    assert!(ok.text.starts_with("Access granted! Data: "));

    let denied = page.probe_message(ProbeTarget::AdminPanel).unwrap();
    assert!(denied.is_error);
    assert_eq!(denied.text, "Error: Forbidden. Not enough permissions");
}

#[test]
fn probe_without_session_does_not_call_the_server() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(NOW_MS);
    let api = FakeAuth::default();
    let mut page = load(&store, &clock);

    page.probe(&api, ProbeTarget::ClientDashboard).unwrap();
    assert!(api.calls.borrow().is_empty());
    assert_eq!(
        page.probe_message(ProbeTarget::ClientDashboard).unwrap().text,
        "Not authenticated. Please log in."
    );
}

#[test]
fn pending_notification_is_shown_on_load() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(NOW_MS);
    crate::notify::enqueue_pending(&store, &crate::notify::Notification::warning("bye")).unwrap();

    let page = load(&store, &clock);
    assert_eq!(page.context().toaster().current().unwrap().message, "bye");
}

#[test]
fn links_record_navigation() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(NOW_MS);
    let mut page = load(&store, &clock);

    page.go_to_register();
    assert_eq!(
        page.context_mut().take_navigation(),
        Some(Navigation::Register)
    );
    page.go_to_services();
    assert_eq!(
        page.context().pending_navigation(),
        Some(&Navigation::Services { category: None })
    );
}
