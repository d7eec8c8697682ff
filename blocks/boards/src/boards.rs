use aws_sdk_dynamodb::Client as DynamoClient;
use flowboard_atoms::boards;
use flowboard_atoms::boards::model::{CreateBoardPayload, JoinBoardPayload, UpdateBoardPayload};
use flowboard_atoms::ServiceError;
use lambda_http::{http::StatusCode, Body, Error, Response};

/// List the caller's boards (owned or joined)
pub async fn list_boards(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<Response<Body>, Error> {
    match boards::service::load_boards_for_user(client, table_name, user_id).await {
        Ok(list) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(serde_json::to_string(&list)?.into())
            .map_err(Box::new)?),
        Err(e) => e.response(),
    }
}

/// Create a board owned by the caller
pub async fn create_board(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateBoardPayload = serde_json::from_slice(body)?;

    match boards::service::create_board(client, table_name, payload.name, user_id).await {
        Ok(board) => Ok(Response::builder()
            .status(StatusCode::CREATED)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(serde_json::to_string(&board)?.into())
            .map_err(Box::new)?),
        Err(e) => e.response(),
    }
}

/// Fetch one board with its embedded tasks
pub async fn get_board(
    client: &DynamoClient,
    table_name: &str,
    board_id: &str,
) -> Result<Response<Body>, Error> {
    match boards::service::get_board(client, table_name, board_id).await {
        Ok(board) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(serde_json::to_string(&board)?.into())
            .map_err(Box::new)?),
        Err(e) => e.response(),
    }
}

/// Replace the board's column list
pub async fn update_board(
    client: &DynamoClient,
    table_name: &str,
    board_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateBoardPayload = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!("Failed to parse board update: {}", e);
            return Ok(Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .header("Content-Type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(
                    serde_json::json!({"error": "Update failed"})
                        .to_string()
                        .into(),
                )
                .map_err(Box::new)?);
        }
    };

    let mut board = match boards::service::get_board(client, table_name, board_id).await {
        Ok(board) => board,
        Err(e) => return e.error_envelope_response(),
    };
    board.replace_columns(payload.columns);

    match boards::service::save_board(client, table_name, &board).await {
        Ok(()) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(serde_json::to_string(&board)?.into())
            .map_err(Box::new)?),
        Err(e) => e.error_envelope_response(),
    }
}

/// Delete a board; only its owner may do this
pub async fn delete_board(
    client: &DynamoClient,
    table_name: &str,
    board_id: &str,
    user_id: &str,
) -> Result<Response<Body>, Error> {
    match boards::service::delete_board(client, table_name, board_id, user_id).await {
        Ok(()) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(
                serde_json::json!({"message": "Board deleted successfully"})
                    .to_string()
                    .into(),
            )
            .map_err(Box::new)?),
        Err(e) => e.response(),
    }
}

/// Join a board via its share code. The path id is not trusted; only the
/// code in the body decides which board is joined.
pub async fn join_board(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    // A missing code behaves like an unknown code
    let payload: JoinBoardPayload = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(_) => return ServiceError::NotFound("Board").response(),
    };

    let mut board = match boards::service::find_board_by_code(client, table_name, &payload.code)
        .await
    {
        Ok(board) => board,
        Err(e) => return e.response(),
    };

    if let Err(e) = board.join(user_id) {
        return e.response();
    }

    match boards::service::save_board(client, table_name, &board).await {
        Ok(()) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(serde_json::to_string(&board)?.into())
            .map_err(Box::new)?),
        Err(e) => e.response(),
    }
}
