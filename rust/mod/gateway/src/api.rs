use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tracing::warn;

use mdp_core::GatewayError;

use crate::model::{Action, ActionRequest, ReadQuery};
use crate::service::Gateway;

type GatewayState = Arc<Gateway>;

/// Largest POST body accepted. A larger body gets the uniform error shape.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Build the gateway router.
///
/// Routes:
/// - `GET  /?action=read&sheet=T`  read a table
/// - `POST /`                      save/add/delete/update, action in body
/// - `GET|POST /exec`              same as `/`, for script-style clients
/// - `GET  /meta/tables`           configured table schemas
pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/", get(handle_get).post(handle_post))
        .route("/exec", get(handle_get).post(handle_post))
        .route("/meta/tables", get(list_tables))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(gateway)
}

// ---------------------------------------------------------------------------
// GET ?action=read&sheet=T
// ---------------------------------------------------------------------------

async fn handle_get(
    State(gateway): State<GatewayState>,
    query: Result<Query<ReadQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(e) => return respond("read", Err(GatewayError::BadRequest(e.body_text()))),
    };
    let result = match query.action.as_deref().and_then(Action::parse) {
        Some(Action::Read) => match query.sheet.as_deref() {
            Some(sheet) => gateway.read(sheet).map(|rows| json!(rows)),
            None => Ok(json!([])),
        },
        _ => Err(GatewayError::InvalidAction),
    };
    respond("read", result)
}

// ---------------------------------------------------------------------------
// POST {action, sheet, ...}
// ---------------------------------------------------------------------------

// The body is taken as raw bytes: browser clients post JSON as text/plain.
async fn handle_post(
    State(gateway): State<GatewayState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(e) => return respond("post", Err(GatewayError::BadRequest(e.body_text()))),
    };
    let req = match ActionRequest::parse(&body) {
        Ok(req) => req,
        Err(e) => return respond("post", Err(e)),
    };
    let action = req.action.as_deref().and_then(Action::parse);
    let label = action.map(|a| a.as_str()).unwrap_or("unknown");
    respond(label, dispatch(&gateway, action, &req))
}

fn dispatch(
    gateway: &Gateway,
    action: Option<Action>,
    req: &ActionRequest,
) -> Result<Value, GatewayError> {
    match action {
        Some(Action::Save) => {
            let count = gateway.save(req.sheet()?, &req.data()?)?;
            Ok(json!({"success": true, "count": count}))
        }
        Some(Action::Add) => {
            gateway.add(req.sheet()?, req.row()?)?;
            Ok(json!({"success": true}))
        }
        Some(Action::Delete) => {
            gateway.delete(req.sheet()?, req.id()?)?;
            Ok(json!({"success": true}))
        }
        Some(Action::Update) => {
            gateway.update(req.sheet()?, req.id()?, req.row()?)?;
            Ok(json!({"success": true}))
        }
        Some(Action::Read) | None => Err(GatewayError::InvalidAction),
    }
}

// ---------------------------------------------------------------------------
// GET /meta/tables
// ---------------------------------------------------------------------------

async fn list_tables(State(gateway): State<GatewayState>) -> Json<Value> {
    Json(json!({
        "tables": gateway.schemas().tables(),
    }))
}

/// Render an outcome. Every error becomes a 200 JSON body.
fn respond(action: &str, result: Result<Value, GatewayError>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            warn!(action, code = e.error_code(), "{}", e);
            e.into_response()
        }
    }
}
