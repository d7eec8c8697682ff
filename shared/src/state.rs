use aws_sdk_dynamodb::Client as DynamoClient;

/// Shared SDK handles, built once at cold start and reused across
/// invocations.
pub struct AppState {
    pub dynamo_client: DynamoClient,
}

impl AppState {
    pub async fn from_env() -> AppState {
        let config = aws_config::load_from_env().await;
        AppState {
            dynamo_client: DynamoClient::new(&config),
        }
    }
}
