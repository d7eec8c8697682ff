use serde::{Deserialize, Serialize};

/// Account record backing the auth seam. Credentials never serialize.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_salt: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: String,
}

/// Public projection of a user, as shown to other board members.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BoardMember {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn member_view(&self) -> BoardMember {
        BoardMember {
            id: self.user_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignupPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_never_serialize() {
        let user = User {
            user_id: "u-1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_salt: "salt".to_string(),
            password_hash: "hash".to_string(),
            created_at: "2026-01-05T09:00:00+00:00".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_salt").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn member_view_projects_the_public_fields() {
        let user = User {
            user_id: "u-1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_salt: String::new(),
            password_hash: String::new(),
            created_at: String::new(),
        };
        assert_eq!(
            user.member_view(),
            BoardMember {
                id: "u-1".to_string(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            }
        );
    }
}
