use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use flowboard_atoms::boards::{
    Board, Column, CreateBoardPayload, JoinBoardPayload, UpdateColumnPayload,
};
use flowboard_atoms::tasks::{CreateTaskPayload, Task, UpdateTaskPayload, UpdateTaskResponse};
use flowboard_atoms::users::BoardMember;

/// Client-side view of a failed API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status. `message` carries the
    /// body's "message" or "error" field when one is present.
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(_) => None,
        }
    }
}

/// Everything the board screens need from the backend.
/// Real implementation: `HttpBoardsApi`. Tests substitute an in-memory fake.
#[async_trait]
pub trait BoardsApi: Send + Sync {
    async fn list_boards(&self) -> Result<Vec<Board>, ApiError>;

    async fn fetch_board(&self, board_id: &str) -> Result<Board, ApiError>;

    async fn create_board(&self, name: &str) -> Result<Board, ApiError>;

    async fn join_board(&self, code: &str) -> Result<Board, ApiError>;

    async fn delete_board(&self, board_id: &str) -> Result<(), ApiError>;

    async fn board_members(&self, board_id: &str) -> Result<Vec<BoardMember>, ApiError>;

    async fn create_task(
        &self,
        board_id: &str,
        payload: CreateTaskPayload,
    ) -> Result<Task, ApiError>;

    async fn update_task(
        &self,
        board_id: &str,
        task_id: &str,
        payload: UpdateTaskPayload,
    ) -> Result<UpdateTaskResponse, ApiError>;

    async fn delete_task(&self, board_id: &str, task_id: &str) -> Result<(), ApiError>;

    async fn update_column(
        &self,
        board_id: &str,
        column_id: &str,
        payload: UpdateColumnPayload,
    ) -> Result<Column, ApiError>;
}

/// `BoardsApi` over the REST endpoints, authenticated with a bearer token.
pub struct HttpBoardsApi {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl HttpBoardsApi {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> HttpBoardsApi {
        HttpBoardsApi {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = request
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }
        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl BoardsApi for HttpBoardsApi {
    async fn list_boards(&self) -> Result<Vec<Board>, ApiError> {
        self.execute(self.client.get(self.url("/boards"))).await
    }

    async fn fetch_board(&self, board_id: &str) -> Result<Board, ApiError> {
        self.execute(self.client.get(self.url(&format!("/boards/{}", board_id))))
            .await
    }

    async fn create_board(&self, name: &str) -> Result<Board, ApiError> {
        let payload = CreateBoardPayload {
            name: name.to_string(),
        };
        self.execute(self.client.post(self.url("/boards")).json(&payload))
            .await
    }

    async fn join_board(&self, code: &str) -> Result<Board, ApiError> {
        // The code rides in the path and the body; the server reads the body.
        let payload = JoinBoardPayload {
            code: code.to_string(),
        };
        self.execute(
            self.client
                .post(self.url(&format!("/boards/{}/join", code)))
                .json(&payload),
        )
        .await
    }

    async fn delete_board(&self, board_id: &str) -> Result<(), ApiError> {
        let _ack: serde_json::Value = self
            .execute(self.client.delete(self.url(&format!("/boards/{}", board_id))))
            .await?;
        Ok(())
    }

    async fn board_members(&self, board_id: &str) -> Result<Vec<BoardMember>, ApiError> {
        self.execute(
            self.client
                .get(self.url(&format!("/boards/{}/members", board_id))),
        )
        .await
    }

    async fn create_task(
        &self,
        board_id: &str,
        payload: CreateTaskPayload,
    ) -> Result<Task, ApiError> {
        self.execute(
            self.client
                .post(self.url(&format!("/boards/{}/tasks", board_id)))
                .json(&payload),
        )
        .await
    }

    async fn update_task(
        &self,
        board_id: &str,
        task_id: &str,
        payload: UpdateTaskPayload,
    ) -> Result<UpdateTaskResponse, ApiError> {
        self.execute(
            self.client
                .put(self.url(&format!("/boards/{}/tasks/{}", board_id, task_id)))
                .json(&payload),
        )
        .await
    }

    async fn delete_task(&self, board_id: &str, task_id: &str) -> Result<(), ApiError> {
        let _ack: serde_json::Value = self
            .execute(
                self.client
                    .delete(self.url(&format!("/boards/{}/tasks/{}", board_id, task_id))),
            )
            .await?;
        Ok(())
    }

    async fn update_column(
        &self,
        board_id: &str,
        column_id: &str,
        payload: UpdateColumnPayload,
    ) -> Result<Column, ApiError> {
        self.execute(
            self.client
                .put(self.url(&format!("/boards/{}/columns/{}", board_id, column_id)))
                .json(&payload),
        )
        .await
    }
}

/// Error bodies come back as either `{"message": ...}` or `{"error": ...}`
/// depending on the route.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_the_message_field() {
        let msg = error_message(
            StatusCode::NOT_FOUND,
            br#"{"message":"Board not found","error":"ignored"}"#,
        );
        assert_eq!(msg, "Board not found");
    }

    #[test]
    fn error_message_falls_back_to_the_error_field() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            br#"{"error":"WIP Limit must be at least 1"}"#,
        );
        assert_eq!(msg, "WIP Limit must be at least 1");
    }

    #[test]
    fn unparseable_bodies_report_the_status_code() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>"),
            "HTTP 500"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, b""), "HTTP 502");
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = HttpBoardsApi::new("https://api.example.test/", "tok");
        assert_eq!(
            api.url("/boards/b-1/tasks"),
            "https://api.example.test/boards/b-1/tasks"
        );
    }

    #[test]
    fn http_error_displays_its_message() {
        let err = ApiError::Http {
            status: 404,
            message: "Board not found".to_string(),
        };
        assert_eq!(err.to_string(), "Board not found");
        assert_eq!(err.status(), Some(404));
    }
}
