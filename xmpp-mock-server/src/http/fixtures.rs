use crate::context::ServerContext;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;

fn ok() -> u16 {
    200
}

#[derive(Deserialize)]
pub struct SetFixture {
    key: String,
    #[serde(default = "ok")]
    status: u16,
    #[serde(default)]
    headers: HashMap<String, String>,
    /// Strings are served as-is, anything else as serialized JSON.
    #[serde(default)]
    body: Value,
}

/// `POST /fixtures/set`
pub async fn set(
    State(context): State<ServerContext>,
    Json(fixture): Json<SetFixture>,
) -> impl IntoResponse {
    if StatusCode::from_u16(fixture.status).is_err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Invalid status: {}", fixture.status) })),
        );
    }

    let body = match fixture.body {
        Value::Null => String::new(),
        Value::String(body) => body,
        body => body.to_string(),
    };

    debug!("Injecting canned response for {}", fixture.key);
    context.fixtures.inject(
        &fixture.key,
        fixture.status,
        fixture.headers.into_iter().collect(),
        body,
    );

    (StatusCode::OK, Json(json!({ "key": fixture.key })))
}

/// `POST /fixtures/reset`
pub async fn reset(State(context): State<ServerContext>) -> impl IntoResponse {
    context.fixtures.reset();
    (StatusCode::OK, Json(json!({ "reset": true })))
}

/// `GET /canned/{*key}`
pub async fn canned(State(context): State<ServerContext>, Path(key): Path<String>) -> Response {
    let Some(canned) = context.fixtures.get(&key) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("No canned response for {key}") })),
        )
            .into_response();
    };

    let status = StatusCode::from_u16(canned.status).unwrap_or(StatusCode::OK);
    let mut response = (status, canned.body).into_response();

    for (name, value) in canned.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => warn!("Skipping invalid canned header {name}"),
        }
    }

    response
}
