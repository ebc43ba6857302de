use crate::admin::command::{BridgeReply, FriendAction, FriendCommand};
use crate::admin::generators::BulkAction;
use crate::admin::scheduler::Job;
use crate::context::ServerContext;
use crate::errors::bridge_error::BridgeError;
use crate::models::identity;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use log::{error, trace};
use serde_json::{Value, json};
use std::sync::Arc;

/// Request body as a JSON object; an empty body has no parameters.
fn params(body: &[u8]) -> Result<Value, BridgeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(params) if params.is_object() => Ok(params),
        Ok(_) => Err(BridgeError::InvalidParameters("expected an object".to_string())),
        Err(error) => Err(BridgeError::InvalidParameters(error.to_string())),
    }
}

fn status(error: &BridgeError) -> StatusCode {
    match error {
        BridgeError::UnhandledTarget(_) => StatusCode::NOT_FOUND,
        BridgeError::SessionGone => StatusCode::GONE,
        BridgeError::UnknownAction(_)
        | BridgeError::MissingParameter(_)
        | BridgeError::InvalidParameters(_)
        | BridgeError::InvalidIdentity(_) => StatusCode::BAD_REQUEST,
    }
}

async fn run_friend_command(
    context: &ServerContext,
    user: &str,
    contact: &str,
    action: &str,
    body: &[u8],
) -> Result<BridgeReply, BridgeError> {
    let action = FriendAction::parse(action, &params(body)?)?;
    if !identity::is_address(contact) {
        return Err(BridgeError::InvalidIdentity(contact.to_string()));
    }

    let handle = context
        .registry
        .lookup(user)
        .unwrap_or_else(|error| {
            error!("{error}");
            None
        })
        .ok_or_else(|| BridgeError::UnhandledTarget(user.to_string()))?;

    handle
        .bridge(FriendCommand {
            contact: contact.to_string(),
            action,
        })
        .await
}

/// `POST /admin/{user}/{contact}/{action}`
pub async fn friend_command(
    State(context): State<ServerContext>,
    Path((user, contact, action)): Path<(String, String, String)>,
    body: Bytes,
) -> impl IntoResponse {
    let user = identity::qualify(&user, &context.domain);
    let contact = identity::qualify(&contact, &context.domain);
    trace!("Admin: {user} {contact} {action}");

    let mut response = json!({ "user": user, "contact": contact, "action": action });
    match run_friend_command(&context, &user, &contact, &action, &body).await {
        Ok(BridgeReply::Done(summary)) => response["result"] = summary,
        Ok(BridgeReply::Ignored) => response["result"] = json!("ignored"),
        Ok(BridgeReply::Failed(error)) => response["error"] = json!(error.to_string()),
        Err(error) => {
            response["error"] = json!(error.to_string());
            return (status(&error), Json(response));
        }
    }

    (StatusCode::OK, Json(response))
}

async fn run_bulk_command(
    context: &ServerContext,
    user: &str,
    action: &str,
    body: &[u8],
) -> Result<Value, BridgeError> {
    match BulkAction::parse(action, &params(body)?)? {
        BulkAction::StopJobs => Ok(json!({ "stopped": context.scheduler.stop_all() })),

        BulkAction::Start {
            steps,
            interval,
            start,
            count,
        } => {
            if !matches!(context.registry.lookup(user), Ok(Some(_))) {
                return Err(BridgeError::UnhandledTarget(user.to_string()));
            }

            let running = context.scheduler.start(
                context.registry.clone(),
                Job {
                    user: Arc::new(user.to_string()),
                    steps,
                    interval,
                    start,
                    count,
                },
            );

            Ok(json!({ "running": running, "interval": interval.as_millis() as u64 }))
        }
    }
}

/// `POST /admin/{user}/{action}`, the session-wide generators.
pub async fn bulk_command(
    State(context): State<ServerContext>,
    Path((user, action)): Path<(String, String)>,
    body: Bytes,
) -> impl IntoResponse {
    let user = identity::qualify(&user, &context.domain);
    trace!("Admin: {user} {action}");

    let mut response = json!({ "user": user, "action": action });
    match run_bulk_command(&context, &user, &action, &body).await {
        Ok(result) => {
            response["result"] = result;
            (StatusCode::OK, Json(response))
        }
        Err(error) => {
            response["error"] = json!(error.to_string());
            (status(&error), Json(response))
        }
    }
}

/// `GET /admin/sessions`
pub async fn sessions(State(context): State<ServerContext>) -> impl IntoResponse {
    match context.registry.identities() {
        Ok(identities) => (StatusCode::OK, Json(json!({ "sessions": identities }))),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_has_no_parameters() {
        assert_eq!(params(b"").unwrap(), json!({}));
        assert_eq!(params(b" \n").unwrap(), json!({}));
    }

    #[test]
    fn body_must_be_an_object() {
        assert!(matches!(params(b"[1]"), Err(BridgeError::InvalidParameters(_))));
        assert!(matches!(params(b"{"), Err(BridgeError::InvalidParameters(_))));
        assert_eq!(params(br#"{"body":"hi"}"#).unwrap()["body"], "hi");
    }

    #[test]
    fn errors_map_to_statuses() {
        assert_eq!(status(&BridgeError::UnknownAction("x".to_string())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(&BridgeError::UnhandledTarget("a@mock".to_string())),
            StatusCode::NOT_FOUND
        );
    }
}
