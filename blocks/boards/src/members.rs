use aws_sdk_dynamodb::Client as DynamoClient;
use flowboard_atoms::{boards, users};
use lambda_http::{http::StatusCode, Body, Error, Response};

/// List a board's members joined against their user profiles
pub async fn board_members(
    client: &DynamoClient,
    table_name: &str,
    board_id: &str,
) -> Result<Response<Body>, Error> {
    // 1) Load the board (404 when it does not exist)
    let board = match boards::service::get_board(client, table_name, board_id).await {
        Ok(board) => board,
        Err(e) => return e.response(),
    };

    // 2) Join member ids against user records; stale ids are skipped
    let members = match users::service::load_members(client, table_name, &board.members).await {
        Ok(members) => members,
        Err(e) => return e.response(),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&members)?.into())
        .map_err(Box::new)?)
}
