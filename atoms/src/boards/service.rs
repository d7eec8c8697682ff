use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;

use crate::error::ServiceError;
use crate::tasks::model::Task;

use super::model::{Board, Column};

/// Rebuilds a board from its item. Returns None when the SK is not a
/// board key; columns and tasks are stored as JSON strings inside the
/// item so the document reads and writes as one unit.
fn board_from_item(item: &HashMap<String, AttributeValue>) -> Option<Board> {
    let sk = item.get("SK").and_then(|v| v.as_s().ok())?;
    let board_id = sk.strip_prefix("BOARD#")?.to_string();

    let columns: Vec<Column> = item
        .get("columns")
        .and_then(|v| v.as_s().ok())
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default();
    let tasks: Vec<Task> = item
        .get("tasks")
        .and_then(|v| v.as_s().ok())
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default();
    let members: Vec<String> = item
        .get("members")
        .and_then(|v| v.as_l().ok())
        .map(|list| {
            list.iter()
                .filter_map(|v| v.as_s().ok())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default();

    Some(Board {
        board_id,
        name: item
            .get("name")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        owner: item
            .get("owner")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        members,
        code: item
            .get("code")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        columns,
        tasks,
        created_at: item
            .get("created_at")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
    })
}

/// Writes the whole board document back. Last write wins; there is no
/// version token on the item.
pub async fn save_board(
    client: &DynamoClient,
    table_name: &str,
    board: &Board,
) -> Result<(), ServiceError> {
    let columns_json = serde_json::to_string(&board.columns)
        .map_err(|e| ServiceError::Store(format!("columns serialize error: {}", e)))?;
    let tasks_json = serde_json::to_string(&board.tasks)
        .map_err(|e| ServiceError::Store(format!("tasks serialize error: {}", e)))?;

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S("BOARD".to_string()))
        .item("SK", AttributeValue::S(format!("BOARD#{}", board.board_id)))
        .item("name", AttributeValue::S(board.name.clone()))
        .item("owner", AttributeValue::S(board.owner.clone()))
        .item("code", AttributeValue::S(board.code.clone()))
        .item(
            "members",
            AttributeValue::L(
                board
                    .members
                    .iter()
                    .map(|m| AttributeValue::S(m.clone()))
                    .collect(),
            ),
        )
        .item("columns", AttributeValue::S(columns_json))
        .item("tasks", AttributeValue::S(tasks_json))
        .item("created_at", AttributeValue::S(board.created_at.clone()))
        .send()
        .await
        .map_err(|e| ServiceError::Store(format!("DynamoDB put_item error: {}", e)))?;

    Ok(())
}

/// Creates and persists a fresh board owned by `owner`.
pub async fn create_board(
    client: &DynamoClient,
    table_name: &str,
    name: String,
    owner: &str,
) -> Result<Board, ServiceError> {
    let board = Board::new(name, owner);
    save_board(client, table_name, &board).await?;
    Ok(board)
}

pub async fn get_board(
    client: &DynamoClient,
    table_name: &str,
    board_id: &str,
) -> Result<Board, ServiceError> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("BOARD".to_string()))
        .key("SK", AttributeValue::S(format!("BOARD#{}", board_id)))
        .send()
        .await
        .map_err(|e| ServiceError::Store(format!("DynamoDB get_item error: {}", e)))?;

    result
        .item()
        .and_then(board_from_item)
        .ok_or(ServiceError::NotFound("Board"))
}

/// All boards the user owns or belongs to, oldest first. Single-partition
/// query over the BOARD namespace with client-side membership filtering.
pub async fn load_boards_for_user(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<Vec<Board>, ServiceError> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S("BOARD".to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("BOARD#".to_string()))
        .send()
        .await
        .map_err(|e| ServiceError::Store(format!("DynamoDB query error: {}", e)))?;

    let mut boards = Vec::new();
    for item in result.items() {
        if let Some(board) = board_from_item(item) {
            if board.owned_by(user_id) || board.is_member(user_id) {
                boards.push(board);
            }
        }
    }
    boards.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(boards)
}

/// Board carrying the given join code, if any.
pub async fn find_board_by_code(
    client: &DynamoClient,
    table_name: &str,
    code: &str,
) -> Result<Board, ServiceError> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S("BOARD".to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("BOARD#".to_string()))
        .send()
        .await
        .map_err(|e| ServiceError::Store(format!("DynamoDB query error: {}", e)))?;

    result
        .items()
        .iter()
        .filter_map(board_from_item)
        .find(|b| b.code == code)
        .ok_or(ServiceError::NotFound("Board"))
}

/// Owner-only delete. Non-owners get the same answer as a missing board
/// so ids cannot be probed.
pub async fn delete_board(
    client: &DynamoClient,
    table_name: &str,
    board_id: &str,
    user_id: &str,
) -> Result<(), ServiceError> {
    let board = match get_board(client, table_name, board_id).await {
        Ok(board) => board,
        Err(ServiceError::NotFound(_)) => return Err(ServiceError::Forbidden),
        Err(e) => return Err(e),
    };
    if !board.owned_by(user_id) {
        return Err(ServiceError::Forbidden);
    }

    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("BOARD".to_string()))
        .key("SK", AttributeValue::S(format!("BOARD#{}", board_id)))
        .send()
        .await
        .map_err(|e| ServiceError::Store(format!("DynamoDB delete_item error: {}", e)))?;

    Ok(())
}
