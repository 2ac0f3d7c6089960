use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Envelope status for a successful call.
pub const STATUS_OK: i64 = 200;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Travel {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub completed: bool,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: i64,
    pub message: String,
    #[serde(default)]
    pub travels: Vec<Travel>,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    travels: BTreeMap<i64, Travel>,
    uploads: HashMap<String, Vec<u8>>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
pub struct TravelQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub id: Option<i64>,
}

/// Fields of a create/update multipart form.
#[derive(Debug, Default)]
struct TravelUpload {
    id: Option<String>,
    user_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    completed: Option<String>,
    image: Option<Vec<u8>>,
}

type Reply = (StatusCode, Json<ApiResponse>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route(
            "/travel",
            get(list_travels)
                .post(create_travel)
                .put(update_travel)
                .delete(delete_travel),
        )
        .route("/uploads/{file}", get(get_upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn reply(code: StatusCode, message: &str, travels: Vec<Travel>) -> Reply {
    let status = if code.is_success() {
        STATUS_OK
    } else {
        i64::from(code.as_u16())
    };
    (
        code,
        Json(ApiResponse {
            status,
            message: message.to_string(),
            travels,
        }),
    )
}

fn bad_request(message: &str) -> Reply {
    reply(StatusCode::BAD_REQUEST, message, Vec::new())
}

fn not_found() -> Reply {
    reply(StatusCode::NOT_FOUND, "Travel not found", Vec::new())
}

fn require_user(user_id: Option<String>) -> Result<String, Reply> {
    match user_id {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(bad_request("userId is required")),
    }
}

async fn read_upload(mut multipart: Multipart) -> Result<TravelUpload, Reply> {
    let mut form = TravelUpload::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(bad_request(&e.body_text())),
        };
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let bytes = field.bytes().await.map_err(|e| bad_request(&e.body_text()))?;
            form.image = Some(bytes.to_vec());
            continue;
        }
        let text = field.text().await.map_err(|e| bad_request(&e.body_text()))?;
        match name.as_str() {
            "id" => form.id = Some(text),
            "userId" => form.user_id = Some(text),
            "title" => form.title = Some(text),
            "description" => form.description = Some(text),
            "completed" => form.completed = Some(text),
            _ => {}
        }
    }
    Ok(form)
}

fn parse_completed(raw: Option<&str>) -> Result<Option<bool>, Reply> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some("true") | Some("1") => Ok(Some(true)),
        Some("false") | Some("0") => Ok(Some(false)),
        Some(_) => Err(bad_request("completed must be true or false")),
    }
}

fn store_image(store: &mut Store, image: Option<Vec<u8>>) -> Option<String> {
    let bytes = image.filter(|b| !b.is_empty())?;
    let name = format!("{}.jpg", Uuid::new_v4());
    store.uploads.insert(name.clone(), bytes);
    Some(format!("uploads/{name}"))
}

fn drop_image(store: &mut Store, image_url: Option<&str>) {
    if let Some(name) = image_url.and_then(|u| u.strip_prefix("uploads/")) {
        store.uploads.remove(name);
    }
}

async fn list_travels(State(db): State<Db>, Query(query): Query<TravelQuery>) -> Reply {
    let user_id = match require_user(query.user_id) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let store = db.read().await;
    let travels: Vec<Travel> = store
        .travels
        .values()
        .filter(|t| t.user_id == user_id)
        .cloned()
        .collect();
    tracing::info!(user_id = %user_id, count = travels.len(), "list travels");
    reply(StatusCode::OK, "Travels retrieved", travels)
}

async fn create_travel(
    State(db): State<Db>,
    Query(query): Query<TravelQuery>,
    multipart: Multipart,
) -> Reply {
    let form = match read_upload(multipart).await {
        Ok(form) => form,
        Err(reply) => return reply,
    };
    let user_id = match require_user(query.user_id.or(form.user_id)) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let title = match form.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => return bad_request("title is required"),
    };
    let completed = match parse_completed(form.completed.as_deref()) {
        Ok(completed) => completed.unwrap_or(false),
        Err(reply) => return reply,
    };

    let mut store = db.write().await;
    store.next_id += 1;
    let image_url = store_image(&mut store, form.image);
    let travel = Travel {
        id: store.next_id,
        user_id,
        title,
        completed,
        description: form.description.filter(|d| !d.is_empty()),
        image_url,
    };
    store.travels.insert(travel.id, travel.clone());
    tracing::info!(id = travel.id, user_id = %travel.user_id, "travel created");
    reply(StatusCode::CREATED, "Travel created", vec![travel])
}

async fn update_travel(
    State(db): State<Db>,
    Query(query): Query<TravelQuery>,
    multipart: Multipart,
) -> Reply {
    let form = match read_upload(multipart).await {
        Ok(form) => form,
        Err(reply) => return reply,
    };
    let user_id = match require_user(query.user_id.or(form.user_id)) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let id = match (query.id, form.id.as_deref().map(str::trim)) {
        (Some(id), _) => id,
        (None, Some(raw)) => match raw.parse() {
            Ok(id) => id,
            Err(_) => return bad_request("id must be an integer"),
        },
        (None, None) => return bad_request("id is required"),
    };
    let completed = match parse_completed(form.completed.as_deref()) {
        Ok(completed) => completed,
        Err(reply) => return reply,
    };

    let mut store = db.write().await;
    let old_image = match store.travels.get(&id) {
        Some(t) if t.user_id == user_id => t.image_url.clone(),
        _ => return not_found(),
    };
    let new_image = store_image(&mut store, form.image);
    if new_image.is_some() {
        drop_image(&mut store, old_image.as_deref());
    }
    let Some(travel) = store.travels.get_mut(&id) else {
        return not_found();
    };
    if let Some(title) = form.title.filter(|t| !t.trim().is_empty()) {
        travel.title = title;
    }
    if let Some(description) = form.description {
        travel.description = Some(description).filter(|d| !d.is_empty());
    }
    if let Some(completed) = completed {
        travel.completed = completed;
    }
    if new_image.is_some() {
        travel.image_url = new_image;
    }
    let travel = travel.clone();
    tracing::info!(id, user_id = %user_id, "travel updated");
    reply(StatusCode::OK, "Travel updated", vec![travel])
}

async fn delete_travel(State(db): State<Db>, Query(query): Query<TravelQuery>) -> Reply {
    let user_id = match require_user(query.user_id) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let Some(id) = query.id else {
        return bad_request("id is required");
    };

    let mut store = db.write().await;
    match store.travels.get(&id) {
        Some(t) if t.user_id == user_id => {}
        _ => return not_found(),
    }
    if let Some(travel) = store.travels.remove(&id) {
        drop_image(&mut store, travel.image_url.as_deref());
    }
    tracing::info!(id, user_id = %user_id, "travel deleted");
    reply(StatusCode::OK, "Travel deleted", Vec::new())
}

async fn get_upload(
    State(db): State<Db>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let store = db.read().await;
    let bytes = store.uploads.get(&file).cloned().ok_or(StatusCode::NOT_FOUND)?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_serializes_to_camel_case() {
        let travel = Travel {
            id: 3,
            user_id: "ann@example.com".to_string(),
            title: "Komodo".to_string(),
            completed: false,
            description: None,
            image_url: Some("uploads/a.jpg".to_string()),
        };
        let json = serde_json::to_value(&travel).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["userId"], "ann@example.com");
        assert_eq!(json["imageUrl"], "uploads/a.jpg");
        assert!(json["description"].is_null());
    }

    #[test]
    fn error_replies_mirror_http_status() {
        let (code, Json(body)) = bad_request("nope");
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert_eq!(body.status, 400);
        assert_eq!(body.message, "nope");

        let (code, Json(body)) = reply(StatusCode::CREATED, "ok", Vec::new());
        assert_eq!(code, StatusCode::CREATED);
        assert_eq!(body.status, STATUS_OK);
    }

    #[test]
    fn completed_accepts_common_spellings() {
        assert_eq!(parse_completed(None).unwrap(), None);
        assert_eq!(parse_completed(Some("")).unwrap(), None);
        assert_eq!(parse_completed(Some("true")).unwrap(), Some(true));
        assert_eq!(parse_completed(Some("0")).unwrap(), Some(false));
        assert!(parse_completed(Some("maybe")).is_err());
    }

    #[test]
    fn images_are_stored_under_uploads() {
        let mut store = Store::default();
        let url = store_image(&mut store, Some(vec![1, 2, 3])).unwrap();
        assert!(url.starts_with("uploads/") && url.ends_with(".jpg"));
        assert_eq!(store.uploads.len(), 1);

        drop_image(&mut store, Some(url.as_str()));
        assert!(store.uploads.is_empty());
        assert!(store_image(&mut store, Some(Vec::new())).is_none());
    }
}
