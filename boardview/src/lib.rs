pub mod api;
pub mod controller;
pub mod dashboard;
pub mod state;

#[cfg(test)]
mod support;

pub use api::{ApiError, BoardsApi, HttpBoardsApi};
pub use controller::{BoardView, DragEnd, DropTarget, PendingDrag, TASK_COLORS, ViewState};
pub use dashboard::{Dashboard, DeleteBoardError};
pub use state::GroupedTasks;
