//! In-process stand-in for the auth service and the catalog, served by axum on a
//! loopback port. Both backends share one base URL.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde_json::{Value, json};

/// Far-future expiry for minted tokens, in seconds.
const TOKEN_EXP: i64 = 4_102_444_800;

#[derive(Clone, Debug)]
struct User {
    id: i64,
    email: String,
    password: String,
    role: String,
}

#[derive(Clone, Debug)]
struct StoredService {
    id: i64,
    title: String,
    description: String,
    price: f64,
    category_ids: Vec<i64>,
    owner_id: i64,
}

#[derive(Debug, Default)]
pub struct StubState {
    users: Vec<User>,
    categories: Vec<(i64, String)>,
    services: Vec<StoredService>,
    next_service_id: i64,
    /// When set, every bearer token is rejected with 401.
    pub reject_tokens: bool,
    /// Request log, `METHOD /path`.
    pub requests: Vec<String>,
}

type Shared = Arc<Mutex<StubState>>;

pub struct StubBackend {
    pub base_url: String,
    state: Shared,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(t) = self.thread.take() {
            let _ = t.join();
        }
    }
}

impl StubBackend {
    pub fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap()
    }

    pub fn add_user(&self, email: &str, password: &str, role: &str) -> i64 {
        let mut s = self.state();
        let id = s.users.len() as i64 + 1;
        s.users.push(User {
            id,
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        });
        id
    }

    pub fn add_service(&self, title: &str, price: f64, category_ids: &[i64], owner_id: i64) -> i64 {
        let mut s = self.state();
        s.next_service_id += 1;
        let id = s.next_service_id;
        s.services.push(StoredService {
            id,
            title: title.to_string(),
            description: format!("{} by user {}", title, owner_id),
            price,
            category_ids: category_ids.to_vec(),
            owner_id,
        });
        id
    }

    pub fn service_titles(&self) -> Vec<String> {
        self.state().services.iter().map(|s| s.title.clone()).collect()
    }
}

/// Starts the stub with three categories: 1 Design, 2 Writing, 3 Web Development.
pub fn spawn_backend() -> Result<StubBackend> {
    let state: Shared = Arc::new(Mutex::new(StubState {
        categories: vec![
            (1, "Design".to_string()),
            (2, "Writing".to_string()),
            (3, "Web Development".to_string()),
        ],
        ..StubState::default()
    }));

    let listener = TcpListener::bind("127.0.0.1:0").context("bind stub listener")?;
    listener
        .set_nonblocking(true)
        .context("set listener nonblocking")?;
    let base_url = format!("http://{}", listener.local_addr()?);

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let app = router(state.clone());
    let thread = thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("build stub runtime");
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("adopt listener");
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await
                .expect("serve stub");
        });
    });

    Ok(StubBackend {
        base_url,
        state,
        shutdown: Some(tx),
        thread: Some(thread),
    })
}

/// A base URL nothing listens on.
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/token", axum::routing::post(login))
        .route("/register", axum::routing::post(register))
        .route("/client-dashboard/", get(client_dashboard))
        .route("/freelancer-profile/", get(freelancer_profile))
        .route("/admin-panel/", get(admin_panel))
        .route("/services/", get(list_services).post(create_service))
        .route("/services/my/", get(my_services))
        .route(
            "/services/:id",
            get(get_service).put(update_service).delete(delete_service),
        )
        .route("/categories/", get(list_categories))
        .route("/landing-categories/", get(landing_categories))
        .with_state(state)
}

fn detail(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "detail": msg }))).into_response()
}

fn mint_token(user: &User) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = json!({
        "sub": user.email,
        "role": user.role,
        "user_id": user.id,
        "exp": TOKEN_EXP,
    });
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.stub", header, payload)
}

/// Resolves the bearer token to a user, or the 401 the real service answers with.
fn caller(state: &StubState, headers: &HeaderMap) -> Result<User, Response> {
    let unauthorized = || detail(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    if state.reject_tokens {
        return Err(unauthorized());
    }
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
    let payload = token.split('.').nth(1).ok_or_else(unauthorized)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).map_err(|_| unauthorized())?;
    let claims: Value = serde_json::from_slice(&bytes).map_err(|_| unauthorized())?;
    let id = claims.get("user_id").and_then(Value::as_i64);
    state
        .users
        .iter()
        .find(|u| Some(u.id) == id)
        .cloned()
        .ok_or_else(unauthorized)
}

fn service_json(state: &StubState, s: &StoredService) -> Value {
    let categories: Vec<Value> = state
        .categories
        .iter()
        .filter(|(id, _)| s.category_ids.contains(id))
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();
    json!({
        "id": s.id,
        "title": s.title,
        "description": s.description,
        "price": s.price,
        "categories": categories,
        "owner_id": s.owner_id,
    })
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(state): State<Shared>, Form(form): Form<LoginForm>) -> Response {
    let mut s = state.lock().unwrap();
    s.requests.push("POST /token".to_string());
    match s
        .users
        .iter()
        .find(|u| u.email == form.username && u.password == form.password)
    {
        Some(user) => Json(json!({
            "access_token": mint_token(user),
            "token_type": "bearer",
        }))
        .into_response(),
        None => detail(StatusCode::UNAUTHORIZED, "Incorrect username or password"),
    }
}

#[derive(Deserialize)]
struct RegisterBody {
    email: String,
    password: String,
    role: String,
}

async fn register(State(state): State<Shared>, Json(body): Json<RegisterBody>) -> Response {
    let mut s = state.lock().unwrap();
    s.requests.push("POST /register".to_string());
    if s.users.iter().any(|u| u.email == body.email) {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    let id = s.users.len() as i64 + 1;
    s.users.push(User {
        id,
        email: body.email.clone(),
        password: body.password,
        role: body.role.clone(),
    });
    Json(json!({
        "id": id,
        "email": body.email,
        "role": body.role,
        "is_active": true,
    }))
    .into_response()
}

fn probe(state: &Shared, headers: &HeaderMap, path: &str, roles: &[&str]) -> Response {
    let mut s = state.lock().unwrap();
    s.requests.push(format!("GET {}", path));
    let user = match caller(&s, headers) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    if !roles.contains(&user.role.as_str()) {
        return detail(StatusCode::FORBIDDEN, "Not enough permissions");
    }
    Json(json!({ "message": format!("Hello {}", user.email) })).into_response()
}

async fn client_dashboard(State(state): State<Shared>, headers: HeaderMap) -> Response {
    probe(&state, &headers, "/client-dashboard/", &["client", "admin"])
}

async fn freelancer_profile(State(state): State<Shared>, headers: HeaderMap) -> Response {
    probe(&state, &headers, "/freelancer-profile/", &["freelancer", "admin"])
}

async fn admin_panel(State(state): State<Shared>, headers: HeaderMap) -> Response {
    probe(&state, &headers, "/admin-panel/", &["admin"])
}

async fn list_services(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.requests.push("GET /services/".to_string());
    if headers.contains_key(header::AUTHORIZATION) {
        if let Err(resp) = caller(&s, &headers) {
            return resp;
        }
    }
    let category = params.get("category_id").and_then(|v| v.parse::<i64>().ok());
    let search = params.get("search_query").map(|q| q.to_lowercase());
    let out: Vec<Value> = s
        .services
        .iter()
        .filter(|svc| category.is_none_or(|id| svc.category_ids.contains(&id)))
        .filter(|svc| {
            search
                .as_deref()
                .is_none_or(|q| svc.title.to_lowercase().contains(q))
        })
        .map(|svc| service_json(&s, svc))
        .collect();
    Json(out).into_response()
}

async fn my_services(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut s = state.lock().unwrap();
    s.requests.push("GET /services/my/".to_string());
    let user = match caller(&s, &headers) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let out: Vec<Value> = s
        .services
        .iter()
        .filter(|svc| svc.owner_id == user.id)
        .map(|svc| service_json(&s, svc))
        .collect();
    Json(out).into_response()
}

async fn get_service(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut s = state.lock().unwrap();
    s.requests.push(format!("GET /services/{}", id));
    match s.services.iter().find(|svc| svc.id == id) {
        Some(svc) => Json(service_json(&s, svc)).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Service not found"),
    }
}

#[derive(Deserialize)]
struct ServiceBody {
    title: String,
    description: String,
    price: f64,
    category_ids: Vec<i64>,
}

async fn create_service(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<ServiceBody>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.requests.push("POST /services/".to_string());
    let user = match caller(&s, &headers) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    if user.role == "client" {
        return detail(StatusCode::FORBIDDEN, "Not enough permissions");
    }
    s.next_service_id += 1;
    let created = StoredService {
        id: s.next_service_id,
        title: body.title,
        description: body.description,
        price: body.price,
        category_ids: body.category_ids,
        owner_id: user.id,
    };
    let out = service_json(&s, &created);
    s.services.push(created);
    (StatusCode::CREATED, Json(out)).into_response()
}

/// Owner or admin, else the matching error response.
fn owned_index(s: &StubState, headers: &HeaderMap, id: i64) -> Result<usize, Response> {
    let user = caller(s, headers)?;
    let idx = s
        .services
        .iter()
        .position(|svc| svc.id == id)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Service not found"))?;
    if user.role != "admin" && s.services[idx].owner_id != user.id {
        return Err(detail(StatusCode::FORBIDDEN, "Not enough permissions"));
    }
    Ok(idx)
}

async fn update_service(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<ServiceBody>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.requests.push(format!("PUT /services/{}", id));
    let idx = match owned_index(&s, &headers, id) {
        Ok(i) => i,
        Err(resp) => return resp,
    };
    let svc = &mut s.services[idx];
    svc.title = body.title;
    svc.description = body.description;
    svc.price = body.price;
    svc.category_ids = body.category_ids;
    let updated = s.services[idx].clone();
    Json(service_json(&s, &updated)).into_response()
}

async fn delete_service(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.requests.push(format!("DELETE /services/{}", id));
    let idx = match owned_index(&s, &headers, id) {
        Ok(i) => i,
        Err(resp) => return resp,
    };
    s.services.remove(idx);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_categories(State(state): State<Shared>) -> Response {
    let mut s = state.lock().unwrap();
    s.requests.push("GET /categories/".to_string());
    let out: Vec<Value> = s
        .categories
        .iter()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();
    Json(out).into_response()
}

async fn landing_categories(State(state): State<Shared>) -> Response {
    let mut s = state.lock().unwrap();
    s.requests.push("GET /landing-categories/".to_string());
    let out: Vec<Value> = s
        .categories
        .iter()
        .map(|(id, name)| {
            let samples: Vec<Value> = s
                .services
                .iter()
                .filter(|svc| svc.category_ids.contains(id))
                .take(3)
                .map(|svc| service_json(&s, svc))
                .collect();
            json!({ "category": name, "sample_services": samples })
        })
        .collect();
    Json(out).into_response()
}
