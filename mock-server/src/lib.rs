use std::{
    collections::HashSet,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub it_director_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub it_director_email: Option<String>,
    pub create_date: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstitution {
    pub name: String,
    #[serde(default)]
    pub it_director_name: Option<String>,
    #[serde(default)]
    pub it_director_email: Option<String>,
}

/// Behaviour knobs for tests and local runs.
#[derive(Clone, Debug, Default)]
pub struct MockConfig {
    /// Required bearer token; `None` accepts every request.
    pub token: Option<String>,
    /// Names whose creation fails with 500.
    pub fail_names: HashSet<String>,
}

impl MockConfig {
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn fail_on(mut self, name: &str) -> Self {
        self.fail_names.insert(name.to_string());
        self
    }
}

#[derive(Default)]
struct Registry {
    next_id: u32,
    institutions: Vec<Institution>,
}

#[derive(Clone)]
struct AppState {
    config: Arc<MockConfig>,
    db: Arc<RwLock<Registry>>,
}

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
        db: Arc::new(RwLock::new(Registry::default())),
    };
    Router::new()
        .route(
            "/api/institutions",
            get(list_institutions).post(create_institution),
        )
        .route(
            "/api/institutions/{id}",
            get(get_institution).delete(delete_institution),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if let Some(token) = &state.config.token {
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));
        if presented != Some(token.as_str()) {
            debug!(path = %request.uri().path(), "rejecting request without valid token");
            return Err(StatusCode::UNAUTHORIZED);
        }
    }
    Ok(next.run(request).await)
}

async fn list_institutions(State(state): State<AppState>) -> Json<Vec<Institution>> {
    let db = state.db.read().await;
    Json(db.institutions.clone())
}

async fn create_institution(
    State(state): State<AppState>,
    Json(input): Json<CreateInstitution>,
) -> Result<Json<Institution>, StatusCode> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    if state.config.fail_names.contains(name) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let mut db = state.db.write().await;
    if db
        .institutions
        .iter()
        .any(|existing| existing.name.eq_ignore_ascii_case(name))
    {
        return Err(StatusCode::CONFLICT);
    }

    db.next_id += 1;
    let institution = Institution {
        id: db.next_id,
        name: name.to_string(),
        it_director_name: input.it_director_name,
        it_director_email: input.it_director_email,
        create_date: now_millis(),
    };
    db.institutions.push(institution.clone());
    info!(id = institution.id, name = %institution.name, "institution created");
    Ok(Json(institution))
}

async fn get_institution(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Institution>, StatusCode> {
    let db = state.db.read().await;
    db.institutions
        .iter()
        .find(|institution| institution.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_institution(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, StatusCode> {
    let mut db = state.db.write().await;
    let before = db.institutions.len();
    db.institutions.retain(|institution| institution.id != id);
    if db.institutions.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
