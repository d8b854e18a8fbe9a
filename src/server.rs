// Local development backend: the record API over SQLite
// Routes live under /api so the client's default base URL works unchanged

use crate::db::{
    delete_interpretation, get_all_interpretations, get_interpretation, insert_interpretation,
    update_interpretation,
};
use crate::model::{Envelope, Interpretation, InterpretationDraft};
use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, ServerError> {
        self.db
            .lock()
            .map_err(|_| ServerError(anyhow::anyhow!("database lock poisoned")))
    }
}

/// Storage failure turned into a 500 response
pub struct ServerError(anyhow::Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %format!("{:#}", self.0), "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn not_found(id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("interpretation {id} not found") })),
    )
        .into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/interpretations
async fn list_interpretations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Interpretation>>, ServerError> {
    let conn = state.conn()?;
    Ok(Json(get_all_interpretations(&conn)?))
}

/// GET /api/interpretations/:id - wrapped as {"interpretation": {...}}
async fn fetch_interpretation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let conn = state.conn()?;

    Ok(match get_interpretation(&conn, &id)? {
        Some(record) => Json(Envelope {
            interpretation: record,
        })
        .into_response(),
        None => not_found(&id),
    })
}

/// POST /api/interpretations
async fn create_interpretation(
    State(state): State<AppState>,
    Json(draft): Json<InterpretationDraft>,
) -> Result<(StatusCode, Json<Interpretation>), ServerError> {
    let conn = state.conn()?;
    let record = insert_interpretation(&conn, &draft)?;
    tracing::info!(id = %record.id, "interpretation created");

    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/interpretations/:id
async fn replace_interpretation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<InterpretationDraft>,
) -> Result<Response, ServerError> {
    let conn = state.conn()?;

    Ok(match update_interpretation(&conn, &id, &draft)? {
        Some(record) => Json(record).into_response(),
        None => not_found(&id),
    })
}

/// DELETE /api/interpretations/:id
async fn remove_interpretation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let conn = state.conn()?;

    Ok(if delete_interpretation(&conn, &id)? {
        tracing::info!(id = %id, "interpretation deleted");
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found(&id)
    })
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route(
            "/interpretations",
            get(list_interpretations).post(create_interpretation),
        )
        .route(
            "/interpretations/:id",
            get(fetch_interpretation)
                .put(replace_interpretation)
                .delete(remove_interpretation),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, router(state))
        .await
        .context("Server stopped unexpectedly")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new(open_in_memory().unwrap()))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        // Extractor rejections come back as plain text
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_crud_flow() {
        let app = app();

        let (status, body) = send(&app, "GET", "/api/interpretations", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, created) = send(
            &app,
            "POST",
            "/api/interpretations",
            Some(json!({"term": "t", "interpretation": "i"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, "GET", &format!("/api/interpretations/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["interpretation"]["term"], "t");
        assert_eq!(body["interpretation"]["interpretation"], "i");

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/interpretations/{id}"),
            Some(json!({"term": "t2", "interpretation": "i2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id.as_str());
        assert_eq!(body["term"], "t2");

        let (status, body) = send(&app, "GET", "/api/interpretations", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["interpretation"], "i2");

        let (status, _) = send(&app, "DELETE", &format!("/api/interpretations/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "DELETE", &format!("/api/interpretations/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_record() {
        let app = app();

        let (status, body) = send(&app, "GET", "/api/interpretations/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));

        let (status, _) = send(
            &app,
            "PUT",
            "/api/interpretations/nope",
            Some(json!({"term": "t", "interpretation": "i"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let (status, _) = send(
            &app(),
            "POST",
            "/api/interpretations",
            Some(json!({"term": "only term"})),
        )
        .await;
        assert!(status.is_client_error());
    }
}
