use aws_sdk_dynamodb::Client as DynamoClient;
use flowboard_atoms::tasks;
use flowboard_atoms::tasks::model::{CreateTaskPayload, UpdateTaskPayload, UpdateTaskResponse};
use lambda_http::{http::StatusCode, Body, Error, Response};

/// Create a task on a board
pub async fn create_task(
    client: &DynamoClient,
    table_name: &str,
    board_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateTaskPayload = serde_json::from_slice(body)?;

    match tasks::service::create_task(client, table_name, board_id, payload).await {
        Ok(task) => Ok(Response::builder()
            .status(StatusCode::CREATED)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(serde_json::to_string(&task)?.into())
            .map_err(Box::new)?),
        Err(e) => e.response(),
    }
}

/// Partial task update; answers with the persisted task
pub async fn update_task(
    client: &DynamoClient,
    table_name: &str,
    board_id: &str,
    task_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateTaskPayload = serde_json::from_slice(body)?;

    match tasks::service::update_task(client, table_name, board_id, task_id, payload).await {
        Ok(task) => {
            let response = UpdateTaskResponse {
                success: true,
                task,
            };
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(serde_json::to_string(&response)?.into())
                .map_err(Box::new)?)
        }
        Err(e) => e.response(),
    }
}

/// Delete a task from a board
pub async fn delete_task(
    client: &DynamoClient,
    table_name: &str,
    board_id: &str,
    task_id: &str,
) -> Result<Response<Body>, Error> {
    match tasks::service::delete_task(client, table_name, board_id, task_id).await {
        Ok(()) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(
                serde_json::json!({"message": "Task deleted successfully"})
                    .to_string()
                    .into(),
            )
            .map_err(Box::new)?),
        Err(e) => e.response(),
    }
}
