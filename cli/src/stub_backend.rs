//! In-process foods API used by tests: same routes and status codes as the
//! real backend, backed by a `Vec` and recording every request line.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, put},
};

use foodsearch_core::models::FoodRecord;

#[derive(Clone, Default)]
struct StubState {
    rows: Arc<Mutex<Vec<FoodRecord>>>,
    requests: Arc<Mutex<Vec<String>>>,
    fetch_body: Arc<Mutex<Option<String>>>,
}

impl StubState {
    fn record(&self, method: &Method, uri: &Uri) {
        self.requests
            .lock()
            .unwrap()
            .push(format!("{method} {}", uri.path()));
    }
}

pub(crate) struct StubBackend {
    pub(crate) origin: String,
    state: StubState,
}

impl StubBackend {
    pub(crate) fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    pub(crate) fn rows(&self) -> Vec<FoodRecord> {
        self.state.rows.lock().unwrap().clone()
    }

    /// Serve `body` verbatim from `GET /foods` from now on.
    pub(crate) fn set_fetch_body(&self, body: &str) {
        *self.state.fetch_body.lock().unwrap() = Some(body.to_string());
    }
}

pub(crate) fn record(food: &str, origin: &str, calories: i64) -> FoodRecord {
    FoodRecord {
        food: food.to_string(),
        origin: origin.to_string(),
        calories,
        protein: 0.5,
        fiber: 4.4,
        vitamin_c: 8.4,
        antioxidant: 3,
    }
}

pub(crate) async fn spawn(rows: Vec<FoodRecord>) -> StubBackend {
    let state = StubState {
        rows: Arc::new(Mutex::new(rows)),
        ..StubState::default()
    };

    let app = Router::new()
        .route("/foods", get(list_foods).post(create_food))
        .route("/foods/{food}", put(update_food).delete(delete_food))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubBackend {
        origin: format!("http://{addr}"),
        state,
    }
}

fn json_body(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

async fn list_foods(State(state): State<StubState>, method: Method, uri: Uri) -> Response {
    state.record(&method, &uri);
    if let Some(body) = state.fetch_body.lock().unwrap().clone() {
        return json_body(body);
    }
    let rows = state.rows.lock().unwrap().clone();
    // An empty table serializes as `null`, like the real backend.
    if rows.is_empty() {
        return json_body("null".to_string());
    }
    Json(rows).into_response()
}

async fn create_food(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    Json(food): Json<FoodRecord>,
) -> Response {
    state.record(&method, &uri);
    let mut rows = state.rows.lock().unwrap();
    if rows.iter().any(|r| r.food == food.food) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to insert food");
    }
    rows.push(food);
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Food created" })),
    )
        .into_response()
}

async fn update_food(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    Path(key): Path<String>,
    Json(food): Json<FoodRecord>,
) -> Response {
    state.record(&method, &uri);
    let mut rows = state.rows.lock().unwrap();
    let Some(row) = rows.iter_mut().find(|r| r.food == key) else {
        return error(StatusCode::NOT_FOUND, "Food not found");
    };
    *row = FoodRecord { food: key, ..food };
    Json(serde_json::json!({ "message": "Food updated" })).into_response()
}

async fn delete_food(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    Path(key): Path<String>,
) -> Response {
    state.record(&method, &uri);
    let mut rows = state.rows.lock().unwrap();
    let before = rows.len();
    rows.retain(|r| r.food != key);
    if rows.len() == before {
        return error(StatusCode::NOT_FOUND, "Food not found");
    }
    Json(serde_json::json!({ "message": "Food deleted" })).into_response()
}
