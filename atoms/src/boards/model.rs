use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::tasks::model::Task;

use super::status::ColumnId;

/// One workflow column of a board.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(rename = "hasSubsections", default)]
    pub has_subsections: bool,
    #[serde(rename = "allowWipLimit", default)]
    pub allow_wip_limit: bool,
    #[serde(rename = "wipLimit", default)]
    pub wip_limit: Option<i64>,
    #[serde(rename = "doneRule", default)]
    pub done_rule: String,
}

impl Column {
    /// Catalog entry for one of the five fixed columns.
    pub fn fixed(id: ColumnId) -> Column {
        Column {
            id: id.as_str().to_string(),
            title: id.title().to_string(),
            has_subsections: id.has_subsections(),
            allow_wip_limit: id.allows_wip_limit(),
            wip_limit: None,
            done_rule: String::new(),
        }
    }
}

/// A board document: metadata, membership, columns and embedded tasks.
/// Persisted as a single item; every mutation rewrites the whole document.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Board {
    #[serde(rename = "id")]
    pub board_id: String,
    pub name: String,
    pub owner: String,
    pub members: Vec<String>,
    /// Shareable join code.
    pub code: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBoardPayload {
    pub name: String,
}

/// PUT /boards/:id body - replaces the column list wholesale.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateBoardPayload {
    pub columns: Vec<Column>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinBoardPayload {
    pub code: String,
}

/// Payload for PUT .../columns/:columnId. `wip_limit` distinguishes an
/// absent field (leave unchanged) from an explicit null (clear the limit).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateColumnPayload {
    #[serde(
        rename = "wipLimit",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub wip_limit: Option<Option<i64>>,
    #[serde(rename = "doneRule", default, skip_serializing_if = "Option::is_none")]
    pub done_rule: Option<String>,
}

/// Wraps a present field in `Some` so null survives as `Some(None)`;
/// absent fields stay `None` via `default`.
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl Board {
    /// New board owned by `owner`, who starts as the only member. Columns
    /// are the fixed five; the join code is shareable immediately.
    pub fn new(name: String, owner: &str) -> Board {
        Board {
            board_id: Uuid::new_v4().to_string(),
            name,
            owner: owner.to_string(),
            members: vec![owner.to_string()],
            code: generate_join_code(),
            columns: ColumnId::ALL.iter().map(|id| Column::fixed(*id)).collect(),
            tasks: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    pub fn owned_by(&self, user_id: &str) -> bool {
        self.owner == user_id
    }

    /// Adds `user_id` to the membership. Joining twice is a conflict and
    /// leaves the member list untouched.
    pub fn join(&mut self, user_id: &str) -> Result<(), ServiceError> {
        if self.is_member(user_id) {
            return Err(ServiceError::Conflict(
                "You are already a member of this board".to_string(),
            ));
        }
        self.members.push(user_id.to_string());
        Ok(())
    }

    /// Applies a WIP-limit / done-rule change to one column. A provided
    /// limit below 1 is rejected; an explicit null clears it.
    pub fn update_column(
        &mut self,
        column_id: &str,
        payload: UpdateColumnPayload,
    ) -> Result<Column, ServiceError> {
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .ok_or(ServiceError::NotFound("Column"))?;
        if let Some(limit) = payload.wip_limit {
            if let Some(n) = limit {
                if n < 1 {
                    return Err(ServiceError::Validation(
                        "WIP Limit must be at least 1".to_string(),
                    ));
                }
            }
            column.wip_limit = limit;
        }
        if let Some(rule) = payload.done_rule {
            column.done_rule = rule;
        }
        Ok(column.clone())
    }

    /// Replaces the whole column list. A zero limit means "no limit" on
    /// this path; rules and limits are normalized, not rejected.
    pub fn replace_columns(&mut self, mut columns: Vec<Column>) {
        for column in &mut columns {
            column.wip_limit = column.wip_limit.filter(|n| *n != 0);
        }
        self.columns = columns;
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.task_id == task_id)
    }

    pub fn remove_task(&mut self, task_id: &str) -> Result<Task, ServiceError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.task_id == task_id)
            .ok_or(ServiceError::NotFound("Task"))?;
        Ok(self.tasks.remove(idx))
    }
}

/// 12 uppercase hex characters from a fresh UUID.
pub fn generate_join_code() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..12].to_uppercase()
}
