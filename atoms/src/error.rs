use lambda_http::{Body, Error, Response};
use thiserror::Error;

/// Failure taxonomy shared by every board-facing operation.
///
/// `Forbidden` renders with the same 404 body as a missing board so callers
/// cannot probe which board ids exist.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Board not found or permission denied")]
    Forbidden,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Store(String),
}

impl ServiceError {
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) | ServiceError::Forbidden => 404,
            ServiceError::Conflict(_) | ServiceError::Validation(_) => 400,
            ServiceError::Store(_) => 500,
        }
    }

    /// JSON error response in the default envelope: validation failures
    /// report under `error`, everything else under `message`. Store errors
    /// log their detail and surface a generic body.
    pub fn response(&self) -> Result<Response<Body>, Error> {
        let field = match self {
            ServiceError::Validation(_) => "error",
            _ => "message",
        };
        self.build(field)
    }

    /// Same response but with every failure reported under `error`. The
    /// column and board-shape routes answer in this envelope.
    pub fn error_envelope_response(&self) -> Result<Response<Body>, Error> {
        self.build("error")
    }

    fn build(&self, field: &str) -> Result<Response<Body>, Error> {
        let text = match self {
            ServiceError::Store(detail) => {
                tracing::error!("{}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), serde_json::Value::String(text));
        let resp = Response::builder()
            .status(self.status())
            .header("content-type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(serde_json::Value::Object(body).to_string().into())
            .map_err(Box::new)?;
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_formats_entity_name() {
        assert_eq!(ServiceError::NotFound("Board").to_string(), "Board not found");
        assert_eq!(ServiceError::NotFound("Task").to_string(), "Task not found");
    }

    #[test]
    fn forbidden_collapses_to_the_permission_denied_message() {
        let err = ServiceError::Forbidden;
        assert_eq!(err.status(), 404);
        assert_eq!(err.to_string(), "Board not found or permission denied");
    }

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(ServiceError::NotFound("Board").status(), 404);
        assert_eq!(ServiceError::Conflict("dup".into()).status(), 400);
        assert_eq!(ServiceError::Validation("bad".into()).status(), 400);
        assert_eq!(ServiceError::Store("boom".into()).status(), 500);
    }

    #[test]
    fn validation_uses_the_error_field() {
        let resp = ServiceError::Validation("WIP Limit must be at least 1".into())
            .response()
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body = String::from_utf8(resp.body().to_vec()).unwrap();
        assert_eq!(
            body,
            r#"{"error":"WIP Limit must be at least 1"}"#
        );
    }

    #[test]
    fn conflict_uses_the_message_field() {
        let resp = ServiceError::Conflict("You are already a member of this board".into())
            .response()
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body = String::from_utf8(resp.body().to_vec()).unwrap();
        assert_eq!(
            body,
            r#"{"message":"You are already a member of this board"}"#
        );
    }

    #[test]
    fn store_detail_never_reaches_the_body() {
        let resp = ServiceError::Store("DynamoDB put_item error: timeout".into())
            .response()
            .unwrap();
        assert_eq!(resp.status(), 500);
        let body = String::from_utf8(resp.body().to_vec()).unwrap();
        assert!(!body.contains("timeout"));
        assert!(body.contains("Internal server error"));
    }

    #[test]
    fn error_envelope_forces_the_error_field() {
        let resp = ServiceError::NotFound("Column").error_envelope_response().unwrap();
        assert_eq!(resp.status(), 404);
        let body = String::from_utf8(resp.body().to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"Column not found"}"#);
    }
}
