use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub done: bool,
}

#[derive(Deserialize)]
pub struct CreateItem {
    pub name: String,
    #[serde(default)]
    pub done: bool,
}

/// Full replacement body for `PUT /items/{id}`.
#[derive(Deserialize)]
pub struct ReplaceItem {
    pub name: String,
    #[serde(default)]
    pub done: bool,
}

/// Partial update body for `PATCH /items/{id}`.
#[derive(Deserialize)]
pub struct PatchItem {
    pub name: Option<String>,
    pub done: Option<bool>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Item>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item)
                .put(replace_item)
                .patch(patch_item)
                .delete(delete_item),
        )
        .route("/fail", get(fail))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_items(State(db): State<Db>) -> Json<Vec<Item>> {
    let items = db.read().await;
    Json(items.values().cloned().collect())
}

async fn create_item(
    State(db): State<Db>,
    Json(input): Json<CreateItem>,
) -> (StatusCode, Json<Item>) {
    let item = Item {
        id: Uuid::new_v4(),
        name: input.name,
        done: input.done,
    };
    debug!(id = %item.id, "created item");
    db.write().await.insert(item.id, item.clone());
    (StatusCode::CREATED, Json(item))
}

async fn get_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Item>, StatusCode> {
    let items = db.read().await;
    items.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn replace_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<ReplaceItem>,
) -> Result<Json<Item>, StatusCode> {
    let mut items = db.write().await;
    let item = items.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    item.name = input.name;
    item.done = input.done;
    Ok(Json(item.clone()))
}

async fn patch_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<PatchItem>,
) -> Result<Json<Item>, StatusCode> {
    let mut items = db.write().await;
    let item = items.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        item.name = name;
    }
    if let Some(done) = input.done {
        item.done = done;
    }
    Ok(Json(item.clone()))
}

async fn delete_item(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut items = db.write().await;
    debug!(%id, "deleting item");
    items.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

/// Always answers 500 with a plain-text body.
async fn fail() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal")
}
