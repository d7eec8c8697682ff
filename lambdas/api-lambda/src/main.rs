use lambda_http::{run, service_fn, Error};
use std::sync::Arc;

mod http_handler;
use http_handler::function_handler;

use flowboard_shared::AppState;

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_http::tracing::init_default_subscriber();

    let state = Arc::new(AppState::from_env().await);

    run(service_fn(move |event| {
        let state = state.clone();
        async move { function_handler(event, state).await }
    }))
    .await
}
