use aws_sdk_dynamodb::Client as DynamoClient;
use flowboard_atoms::boards;
use flowboard_atoms::boards::model::UpdateColumnPayload;
use lambda_http::{http::StatusCode, Body, Error, Response};

/// Update one column's WIP limit and/or done rule. This route reports
/// every failure under an `error` field.
pub async fn update_column(
    client: &DynamoClient,
    table_name: &str,
    board_id: &str,
    column_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateColumnPayload = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!("Failed to parse column update: {}", e);
            return Ok(Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .header("Content-Type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(
                    serde_json::json!({"error": "Invalid request body"})
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

    let column = match board.update_column(column_id, payload) {
        Ok(column) => column,
        Err(e) => return e.error_envelope_response(),
    };

    match boards::service::save_board(client, table_name, &board).await {
        Ok(()) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(serde_json::to_string(&column)?.into())
            .map_err(Box::new)?),
        Err(e) => e.error_envelope_response(),
    }
}
