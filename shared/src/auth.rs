use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use lambda_http::http::StatusCode;
use lambda_http::{Body, Error, Request, Response};
use sha2::Sha256;

use flowboard_atoms::users::model::{LoginPayload, SignupPayload};
use flowboard_atoms::users::service as users;
use flowboard_atoms::ServiceError;

use aws_sdk_dynamodb::Client as DynamoClient;

type HmacSha256 = Hmac<Sha256>;

/// Authenticated caller of the current request.
#[derive(Debug)]
pub struct AuthContext {
    pub user_id: String,
}

/// Token lifetime: 12 hours.
pub const TOKEN_TTL_SECS: i64 = 43200;

fn sign(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(message.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

/// Bearer token: `<user_id>.<expiry unix>.<signature>`.
pub fn issue_token(secret: &str, user_id: &str, ttl_secs: i64) -> String {
    let expiry = chrono::Utc::now().timestamp() + ttl_secs;
    let message = format!("{}.{}", user_id, expiry);
    let signature = sign(secret, &message);
    format!("{}.{}", message, signature)
}

/// Returns the user id when the token is well formed, unexpired and
/// carries a valid signature.
pub fn verify_token(secret: &str, token: &str) -> Option<String> {
    let mut parts = token.split('.');
    let user_id = parts.next()?;
    let expiry = parts.next()?;
    let signature = parts.next()?;
    if parts.next().is_some() || user_id.is_empty() {
        return None;
    }

    let expiry_ts: i64 = expiry.parse().ok()?;
    if expiry_ts <= chrono::Utc::now().timestamp() {
        return None;
    }

    let message = format!("{}.{}", user_id, expiry);
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(message.as_bytes());
    let sig_bytes = URL_SAFE_NO_PAD.decode(signature).ok()?;
    mac.verify_slice(&sig_bytes).ok()?;
    Some(user_id.to_string())
}

/// Salted HMAC-SHA256 of the password; the salt is stored next to the hash.
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(salt.as_bytes()).expect("hmac accepts any key length");
    mac.update(password.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

pub fn verify_password(salt: &str, password: &str, stored_hash: &str) -> bool {
    let mut mac = match HmacSha256::new_from_slice(salt.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(password.as_bytes());
    let stored = match URL_SAFE_NO_PAD.decode(stored_hash) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    mac.verify_slice(&stored).is_ok()
}

/// Resolves the Authorization bearer header to a user id, or the 401
/// response to send straight back.
pub fn authenticate_request(event: &Request, secret: &str) -> Result<AuthContext, Response<Body>> {
    let token = event
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if let Some(user_id) = token.and_then(|t| verify_token(secret, t)) {
        return Ok(AuthContext { user_id });
    }
    Err(unauthorized_response())
}

fn unauthorized_response() -> Response<Body> {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header("content-type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(
            serde_json::json!({"message": "Authentication required"})
                .to_string()
                .into(),
        )
        .unwrap_or_default()
}

/// CORS origin echoed back to the browser. Localhost dev servers pass
/// through; anything else gets the configured frontend origin.
pub fn get_cors_origin(request_origin: Option<&str>) -> String {
    let configured = std::env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| "*".to_string());
    match request_origin {
        Some(origin)
            if origin.starts_with("http://localhost")
                || origin.starts_with("http://127.0.0.1") =>
        {
            origin.to_string()
        }
        _ => configured,
    }
}

/// POST /auth/login
pub async fn login(
    client: &DynamoClient,
    table_name: &str,
    secret: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: LoginPayload = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!("Failed to parse login request: {}", e);
            return bad_request("Invalid request body");
        }
    };

    let user = match users::get_user_by_email(client, table_name, &payload.email).await {
        Ok(user) => user,
        Err(ServiceError::NotFound(_)) => return invalid_credentials(),
        Err(e) => return e.response(),
    };

    if !verify_password(&user.password_salt, &payload.password, &user.password_hash) {
        return invalid_credentials();
    }

    let token = issue_token(secret, &user.user_id, TOKEN_TTL_SECS);
    tracing::info!("🔑 Login ok for user {}", user.user_id);
    let resp = Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(
            serde_json::json!({
                "token": token,
                "user": user.member_view(),
            })
            .to_string()
            .into(),
        )
        .map_err(Box::new)?;
    Ok(resp)
}

/// POST /auth/signup
pub async fn signup(
    client: &DynamoClient,
    table_name: &str,
    secret: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: SignupPayload = match serde_json::from_slice(body) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!("Failed to parse signup request: {}", e);
            return bad_request("Invalid request body");
        }
    };

    if payload.name.trim().is_empty()
        || payload.password.is_empty()
        || payload.email.is_empty()
        || !payload.email.contains('@')
    {
        return bad_request("Name, email and password are required");
    }

    let salt = uuid::Uuid::new_v4().simple().to_string();
    let hash = hash_password(&salt, &payload.password);

    let user = match users::create_user(
        client,
        table_name,
        payload.name.trim(),
        &payload.email,
        &salt,
        &hash,
    )
    .await
    {
        Ok(user) => user,
        Err(e) => return e.response(),
    };

    let token = issue_token(secret, &user.user_id, TOKEN_TTL_SECS);
    tracing::info!("🆕 Signup ok for user {}", user.user_id);
    let resp = Response::builder()
        .status(StatusCode::CREATED)
        .header("content-type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(
            serde_json::json!({
                "token": token,
                "user": user.member_view(),
            })
            .to_string()
            .into(),
        )
        .map_err(Box::new)?;
    Ok(resp)
}

/// GET /users/me
pub async fn current_user(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<Response<Body>, Error> {
    match users::get_user(client, table_name, user_id).await {
        Ok(user) => {
            let resp = Response::builder()
                .status(StatusCode::OK)
                .header("content-type", "application/json")
                .header("Access-Control-Allow-Origin", "*")
                .body(serde_json::to_string(&user.member_view())?.into())
                .map_err(Box::new)?;
            Ok(resp)
        }
        Err(e) => e.response(),
    }
}

fn bad_request(message: &str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::BAD_REQUEST)
        .header("content-type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::json!({"message": message}).to_string().into())
        .map_err(Box::new)?)
}

fn invalid_credentials() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header("content-type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(
            serde_json::json!({"message": "Invalid credentials"})
                .to_string()
                .into(),
        )
        .map_err(Box::new)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trips_to_the_issuing_user() {
        let token = issue_token(SECRET, "u-123", TOKEN_TTL_SECS);
        assert_eq!(verify_token(SECRET, &token).as_deref(), Some("u-123"));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let token = issue_token(SECRET, "u-123", -5);
        assert!(verify_token(SECRET, &token).is_none());
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let token = issue_token("other-secret", "u-123", TOKEN_TTL_SECS);
        assert!(verify_token(SECRET, &token).is_none());
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        for bad in ["", "abc", "a.b", "a.b.c.d", "u-1.notanumber.sig"] {
            assert!(verify_token(SECRET, bad).is_none(), "token {:?}", bad);
        }
    }

    #[test]
    fn password_hash_verifies_only_with_the_same_salt_and_password() {
        let hash = hash_password("salt-1", "hunter2");
        assert!(verify_password("salt-1", "hunter2", &hash));
        assert!(!verify_password("salt-1", "hunter3", &hash));
        assert!(!verify_password("salt-2", "hunter2", &hash));
    }

    #[test]
    fn bearer_header_resolves_to_the_user() {
        let token = issue_token(SECRET, "u-9", TOKEN_TTL_SECS);
        let req = lambda_http::http::Request::builder()
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::Empty)
            .unwrap();
        let ctx = authenticate_request(&req, SECRET).unwrap();
        assert_eq!(ctx.user_id, "u-9");
    }

    #[test]
    fn missing_or_mangled_bearer_headers_yield_401() {
        let no_header = lambda_http::http::Request::builder()
            .body(Body::Empty)
            .unwrap();
        let resp = authenticate_request(&no_header, SECRET).unwrap_err();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let wrong_scheme = lambda_http::http::Request::builder()
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(Body::Empty)
            .unwrap();
        assert!(authenticate_request(&wrong_scheme, SECRET).is_err());
    }
}
