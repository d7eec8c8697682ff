use boards_block::{boards, columns, members, tasks};
use flowboard_shared::{auth, AppState};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};
use std::env;
use std::sync::Arc;

use lambda_http::http::header::{HeaderValue, VARY};

fn with_cors_headers(mut resp: Response<Body>, request_origin: Option<&str>) -> Response<Body> {
    let cors_origin = auth::get_cors_origin(request_origin);

    let headers = resp.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_str(&cors_origin).unwrap_or_else(|_| HeaderValue::from_static("*")),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,PUT,PATCH,DELETE,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type,Authorization"),
    );
    headers.append(VARY, HeaderValue::from_static("Origin"));

    resp
}

fn finalize_response(
    resp: Result<Response<Body>, Error>,
    request_origin: Option<&str>,
) -> Result<Response<Body>, Error> {
    resp.map(|r| with_cors_headers(r, request_origin))
}

/// Main Lambda handler - routes requests to auth or board endpoints
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();
    let request_origin = event.headers().get("Origin").and_then(|v| v.to_str().ok());
    tracing::info!("🚀 API Lambda invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == "OPTIONS" {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Body::Empty)
            .map_err(Box::new)?;
        return Ok(with_cors_headers(resp, request_origin));
    }

    let table_name = env::var("TABLE_NAME").unwrap_or_else(|_| "flowboard".to_string());
    let auth_secret = env::var("AUTH_SECRET").expect("AUTH_SECRET must be set");

    // Auth endpoints (no bearer token)
    if path == "/auth/login" {
        return match method {
            &Method::POST => finalize_response(
                auth::login(&state.dynamo_client, &table_name, &auth_secret, body).await,
                request_origin,
            ),
            _ => finalize_response(method_not_allowed(), request_origin),
        };
    }

    if path == "/auth/signup" {
        return match method {
            &Method::POST => finalize_response(
                auth::signup(&state.dynamo_client, &table_name, &auth_secret, body).await,
                request_origin,
            ),
            _ => finalize_response(method_not_allowed(), request_origin),
        };
    }

    // Everything below requires a valid bearer token
    let auth_ctx = match auth::authenticate_request(&event, &auth_secret) {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(with_cors_headers(resp, request_origin)),
    };
    let user_id = auth_ctx.user_id;

    // User routes
    if path.starts_with("/users") {
        let resp = match (method, path) {
            // GET /users/me - current profile
            (&Method::GET, "/users/me") => {
                auth::current_user(&state.dynamo_client, &table_name, &user_id).await
            }
            _ => not_found(),
        };
        return finalize_response(resp, request_origin);
    }

    // Boards routes
    if path.starts_with("/boards") {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let resp = match (method, parts.as_slice()) {
            // --- BOARDS ---
            // GET /boards - list the caller's boards
            (&Method::GET, ["boards"]) => {
                boards::list_boards(&state.dynamo_client, &table_name, &user_id).await
            }
            // POST /boards - create board
            (&Method::POST, ["boards"]) => {
                boards::create_board(&state.dynamo_client, &table_name, &user_id, body).await
            }
            // GET /boards/{id} - get board with embedded tasks
            (&Method::GET, ["boards", board_id]) => {
                boards::get_board(&state.dynamo_client, &table_name, board_id).await
            }
            // PUT /boards/{id} - replace the column list
            (&Method::PUT, ["boards", board_id]) => {
                boards::update_board(&state.dynamo_client, &table_name, board_id, body).await
            }
            // DELETE /boards/{id} - delete board (owner only)
            (&Method::DELETE, ["boards", board_id]) => {
                boards::delete_board(&state.dynamo_client, &table_name, board_id, &user_id).await
            }
            // POST /boards/{id}/join - join via the code in the body
            (&Method::POST, ["boards", _board_id, "join"]) => {
                boards::join_board(&state.dynamo_client, &table_name, &user_id, body).await
            }
            // GET /boards/{id}/members - member profiles
            (&Method::GET, ["boards", board_id, "members"]) => {
                members::board_members(&state.dynamo_client, &table_name, board_id).await
            }

            // --- TASKS ---
            // POST /boards/{id}/tasks - create task
            (&Method::POST, ["boards", board_id, "tasks"]) => {
                tasks::create_task(&state.dynamo_client, &table_name, board_id, body).await
            }
            // PUT /boards/{bid}/tasks/{tid} - partial update
            (&Method::PUT, ["boards", board_id, "tasks", task_id]) => {
                tasks::update_task(&state.dynamo_client, &table_name, board_id, task_id, body)
                    .await
            }
            // DELETE /boards/{bid}/tasks/{tid} - delete task
            (&Method::DELETE, ["boards", board_id, "tasks", task_id]) => {
                tasks::delete_task(&state.dynamo_client, &table_name, board_id, task_id).await
            }

            // --- COLUMNS ---
            // PUT /boards/{bid}/columns/{cid} - wip limit / done rule
            (&Method::PUT, ["boards", board_id, "columns", column_id]) => {
                columns::update_column(
                    &state.dynamo_client,
                    &table_name,
                    board_id,
                    column_id,
                    body,
                )
                .await
            }

            _ => not_found(),
        };

        return finalize_response(resp, request_origin);
    }

    // No matching route
    tracing::warn!("⚠️ No route matched - Method: {} Path: {}", method, path);
    finalize_response(not_found(), request_origin)
}

fn method_not_allowed() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "application/json")
        .body(
            serde_json::json!({"error": "Method not allowed"})
                .to_string()
                .into(),
        )
        .map_err(Box::new)?)
}

fn not_found() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::json!({"error": "Not found"}).to_string().into())
        .map_err(Box::new)?)
}
