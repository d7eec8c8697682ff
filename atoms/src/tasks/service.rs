use aws_sdk_dynamodb::Client as DynamoClient;

use crate::boards::service::{get_board, save_board};
use crate::error::ServiceError;

use super::model::{CreateTaskPayload, Task, UpdateTaskPayload};

// Every task operation is a whole-board read-modify-write. Concurrent
// writers race at the document level and the last write wins.

/// Appends a new task to the board. Status and color fall back to their
/// defaults when absent.
pub async fn create_task(
    client: &DynamoClient,
    table_name: &str,
    board_id: &str,
    payload: CreateTaskPayload,
) -> Result<Task, ServiceError> {
    let mut board = get_board(client, table_name, board_id).await?;
    let task = Task::new(payload);
    board.tasks.push(task.clone());
    save_board(client, table_name, &board).await?;
    Ok(task)
}

/// Partial task update; returns the task as persisted.
pub async fn update_task(
    client: &DynamoClient,
    table_name: &str,
    board_id: &str,
    task_id: &str,
    payload: UpdateTaskPayload,
) -> Result<Task, ServiceError> {
    let mut board = get_board(client, table_name, board_id).await?;
    let task = board
        .task_mut(task_id)
        .ok_or(ServiceError::NotFound("Task"))?;
    task.apply_update(payload);
    let updated = task.clone();
    save_board(client, table_name, &board).await?;
    Ok(updated)
}

pub async fn delete_task(
    client: &DynamoClient,
    table_name: &str,
    board_id: &str,
    task_id: &str,
) -> Result<(), ServiceError> {
    let mut board = get_board(client, table_name, board_id).await?;
    board.remove_task(task_id)?;
    save_board(client, table_name, &board).await?;
    Ok(())
}
