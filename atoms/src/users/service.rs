use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use crate::error::ServiceError;

use super::model::{BoardMember, User};

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Stores a new user plus the EMAIL# lookup item. The duplicate check and
/// the two writes are not atomic; a racing duplicate signup is acceptable
/// at this scale.
pub async fn create_user(
    client: &DynamoClient,
    table_name: &str,
    name: &str,
    email: &str,
    password_salt: &str,
    password_hash: &str,
) -> Result<User, ServiceError> {
    let email = normalize_email(email);
    if find_user_id_by_email(client, table_name, &email)
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let pk = format!("USER#{}", user_id);

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(pk.clone()))
        .item("SK", AttributeValue::S(pk))
        .item("name", AttributeValue::S(name.to_string()))
        .item("email", AttributeValue::S(email.clone()))
        .item("password_salt", AttributeValue::S(password_salt.to_string()))
        .item("password_hash", AttributeValue::S(password_hash.to_string()))
        .item("created_at", AttributeValue::S(now.clone()))
        .send()
        .await
        .map_err(|e| ServiceError::Store(format!("DynamoDB put_item error: {}", e)))?;

    let email_key = format!("EMAIL#{}", email);
    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(email_key.clone()))
        .item("SK", AttributeValue::S(email_key))
        .item("user_id", AttributeValue::S(user_id.clone()))
        .send()
        .await
        .map_err(|e| ServiceError::Store(format!("DynamoDB put_item error: {}", e)))?;

    Ok(User {
        user_id,
        name: name.to_string(),
        email,
        password_salt: password_salt.to_string(),
        password_hash: password_hash.to_string(),
        created_at: now,
    })
}

pub async fn find_user_id_by_email(
    client: &DynamoClient,
    table_name: &str,
    email: &str,
) -> Result<Option<String>, ServiceError> {
    let email_key = format!("EMAIL#{}", normalize_email(email));
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(email_key.clone()))
        .key("SK", AttributeValue::S(email_key))
        .send()
        .await
        .map_err(|e| ServiceError::Store(format!("DynamoDB get_item error: {}", e)))?;

    Ok(result.item().and_then(|item| {
        item.get("user_id")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
    }))
}

pub async fn get_user(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<User, ServiceError> {
    let pk = format!("USER#{}", user_id);
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk.clone()))
        .key("SK", AttributeValue::S(pk))
        .send()
        .await
        .map_err(|e| ServiceError::Store(format!("DynamoDB get_item error: {}", e)))?;

    let item = result.item().ok_or(ServiceError::NotFound("User"))?;
    Ok(User {
        user_id: user_id.to_string(),
        name: item
            .get("name")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        email: item
            .get("email")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        password_salt: item
            .get("password_salt")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        password_hash: item
            .get("password_hash")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        created_at: item
            .get("created_at")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
    })
}

pub async fn get_user_by_email(
    client: &DynamoClient,
    table_name: &str,
    email: &str,
) -> Result<User, ServiceError> {
    let user_id = find_user_id_by_email(client, table_name, email)
        .await?
        .ok_or(ServiceError::NotFound("User"))?;
    get_user(client, table_name, &user_id).await
}

/// Profiles for a member list. Ids that no longer resolve are skipped
/// with a warning rather than failing the whole listing.
pub async fn load_members(
    client: &DynamoClient,
    table_name: &str,
    member_ids: &[String],
) -> Result<Vec<BoardMember>, ServiceError> {
    let mut members = Vec::new();
    for user_id in member_ids {
        match get_user(client, table_name, user_id).await {
            Ok(user) => members.push(user.member_view()),
            Err(ServiceError::NotFound(_)) => {
                tracing::warn!("board member {} has no user record", user_id);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(members)
}
