use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::boards::status::TaskStatus;

/// Task domain model - a card on the board. Tasks are embedded in their
/// board document and never exist on their own.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    #[serde(rename = "id")]
    pub task_id: String,
    pub title: String,

    // FE expects a plain string (empty string = no description)
    #[serde(default)]
    pub description: String,

    /// Canonical status string ("Backlog", "Specification Active", ...).
    /// Kept loose on purpose: unknown values group to the backlog.
    pub status: String,

    /// Card color as a `#rrggbb` hex string.
    pub color: String,

    #[serde(rename = "assignedTo", default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTaskPayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "assignedTo", default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTaskPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "assignedTo", default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

/// Wire shape of a successful task update.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdateTaskResponse {
    pub success: bool,
    pub task: Task,
}

impl Task {
    /// New task from a create payload. Status defaults to "Backlog" and
    /// the color to a generated one; empty strings count as absent.
    pub fn new(payload: CreateTaskPayload) -> Task {
        Task {
            task_id: Uuid::new_v4().to_string(),
            title: payload.title,
            description: payload.description.unwrap_or_default(),
            status: payload
                .status
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| TaskStatus::Backlog.canonical().to_string()),
            color: payload
                .color
                .filter(|c| !c.is_empty())
                .unwrap_or_else(random_color),
            assigned_to: payload.assigned_to.filter(|a| !a.is_empty()),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Partial update. Absent fields and empty strings both mean "leave
    /// unchanged", so an assignment cannot be cleared through this path.
    pub fn apply_update(&mut self, payload: UpdateTaskPayload) {
        if let Some(title) = payload.title.filter(|v| !v.is_empty()) {
            self.title = title;
        }
        if let Some(description) = payload.description.filter(|v| !v.is_empty()) {
            self.description = description;
        }
        if let Some(status) = payload.status.filter(|v| !v.is_empty()) {
            self.status = status;
        }
        if let Some(color) = payload.color.filter(|v| !v.is_empty()) {
            self.color = color;
        }
        if let Some(assigned_to) = payload.assigned_to.filter(|v| !v.is_empty()) {
            self.assigned_to = Some(assigned_to);
        }
    }
}

/// Default card color when the creator does not pick one: three bytes of a
/// fresh UUID rendered as `#rrggbb`.
pub fn random_color() -> String {
    let bytes = *Uuid::new_v4().as_bytes();
    format!("#{:02x}{:02x}{:02x}", bytes[0], bytes[1], bytes[2])
}
