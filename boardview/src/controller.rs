use uuid::Uuid;

use flowboard_atoms::boards::{Board, Column, ColumnId, DropZone, UpdateColumnPayload};
use flowboard_atoms::tasks::{CreateTaskPayload, Task, UpdateTaskPayload};
use flowboard_atoms::users::BoardMember;

use crate::api::{ApiError, BoardsApi};
use crate::state::GroupedTasks;

/// Card colors offered by the create form.
pub const TASK_COLORS: [&str; 6] = [
    "#FF9AA2", "#FFB7B2", "#FFDAC1", "#E2F0CB", "#B5EAD7", "#C7CEEA",
];

fn pick_color() -> &'static str {
    let byte = Uuid::new_v4().as_bytes()[0] as usize;
    TASK_COLORS[byte % TASK_COLORS.len()]
}

/// What the board screen is showing. A failed load stays in `Loading`.
#[derive(Debug)]
pub enum ViewState {
    Loading,
    Loaded { board: Board, tasks: GroupedTasks },
}

/// Destination of a completed drag: which lane, and where in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub zone: DropZone,
    pub index: usize,
}

/// A finished drag gesture as reported by the front end. `destination` is
/// `None` when the card was dropped outside every lane.
#[derive(Debug, Clone)]
pub struct DragEnd {
    pub task_id: String,
    pub source: DropZone,
    pub destination: Option<DropTarget>,
}

/// An optimistic move the server has not confirmed yet. Holds the pre-move
/// grouping so a failed confirmation restores it exactly.
#[derive(Debug)]
pub struct PendingDrag {
    snapshot: GroupedTasks,
    task_id: String,
    status: &'static str,
}

impl PendingDrag {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Canonical status the card is moving to.
    pub fn status(&self) -> &'static str {
        self.status
    }
}

/// Controller behind the board screen. Owns the loaded board, the grouped
/// tasks, and every interaction that talks to the API.
pub struct BoardView<A> {
    api: A,
    board_id: String,
    state: ViewState,
}

impl<A: BoardsApi> BoardView<A> {
    pub fn new(api: A, board_id: impl Into<String>) -> BoardView<A> {
        BoardView {
            api,
            board_id: board_id.into(),
            state: ViewState::Loading,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn board(&self) -> Option<&Board> {
        match &self.state {
            ViewState::Loaded { board, .. } => Some(board),
            ViewState::Loading => None,
        }
    }

    pub fn tasks(&self) -> Option<&GroupedTasks> {
        match &self.state {
            ViewState::Loaded { tasks, .. } => Some(tasks),
            ViewState::Loading => None,
        }
    }

    /// Fetches the board and groups its tasks. On failure the view stays in
    /// `Loading` and the error is handed back for display.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        match self.api.fetch_board(&self.board_id).await {
            Ok(mut board) => {
                let tasks = GroupedTasks::from_tasks(std::mem::take(&mut board.tasks));
                self.state = ViewState::Loaded { board, tasks };
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load board {}: {}", self.board_id, e);
                Err(e)
            }
        }
    }

    /// First half of a drag: moves the card locally and hands back the
    /// pending confirmation. Returns `None` when the drop was cancelled or
    /// referenced a card that is not in the claimed source lane. Every
    /// landed drop goes to the server, a drop back onto the same spot
    /// included; the persisted status is re-derived from the destination
    /// zone.
    pub fn apply_drag(&mut self, drag: &DragEnd) -> Option<PendingDrag> {
        let destination = drag.destination?;
        let tasks = match &mut self.state {
            ViewState::Loaded { tasks, .. } => tasks,
            ViewState::Loading => return None,
        };

        if tasks.position(drag.source, &drag.task_id).is_none() {
            tracing::warn!(
                "Ignoring drag for task {}: not in lane {}",
                drag.task_id,
                drag.source.id()
            );
            return None;
        }

        let snapshot = tasks.clone();
        let mut task = tasks.take(drag.source, &drag.task_id)?;
        let status = destination.zone.status().canonical();
        task.status = status.to_string();
        tasks.insert(destination.zone, destination.index, task);

        Some(PendingDrag {
            snapshot,
            task_id: drag.task_id.clone(),
            status,
        })
    }

    /// Second half of a drag: persists the status change. On failure the
    /// pre-drag grouping is restored and the error is handed back.
    pub async fn confirm_drag(&mut self, pending: PendingDrag) -> Result<(), ApiError> {
        let payload = UpdateTaskPayload {
            status: Some(pending.status.to_string()),
            ..Default::default()
        };
        match self
            .api
            .update_task(&self.board_id, &pending.task_id, payload)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::error!("Failed to move task {}, reverting: {}", pending.task_id, e);
                if let ViewState::Loaded { tasks, .. } = &mut self.state {
                    *tasks = pending.snapshot;
                }
                Err(e)
            }
        }
    }

    /// Applies and confirms a drag in one go. A drag with nothing to do is
    /// not an error.
    pub async fn handle_drag_end(&mut self, drag: DragEnd) -> Result<(), ApiError> {
        match self.apply_drag(&drag) {
            Some(pending) => self.confirm_drag(pending).await,
            None => Ok(()),
        }
    }

    /// Creates a card from the create form. The color comes from the fixed
    /// palette; the server files new cards under the backlog.
    pub async fn create_task(&mut self, title: &str, description: &str) -> Result<Task, ApiError> {
        let payload = CreateTaskPayload {
            title: title.to_string(),
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
            status: None,
            color: Some(pick_color().to_string()),
            assigned_to: None,
        };
        let task = self.api.create_task(&self.board_id, payload).await?;
        if let ViewState::Loaded { tasks, .. } = &mut self.state {
            tasks.push_backlog(task.clone());
        }
        Ok(task)
    }

    /// Persists edits from the task modal and swaps the server's copy in
    /// where the card sits. Edits never move a card; status travels through
    /// drags.
    pub async fn save_task_details(
        &mut self,
        task_id: &str,
        payload: UpdateTaskPayload,
    ) -> Result<Task, ApiError> {
        let resp = self.api.update_task(&self.board_id, task_id, payload).await?;
        if let ViewState::Loaded { tasks, .. } = &mut self.state {
            tasks.replace(resp.task.clone());
        }
        Ok(resp.task)
    }

    pub async fn delete_task(&mut self, task_id: &str) -> Result<(), ApiError> {
        self.api.delete_task(&self.board_id, task_id).await?;
        if let ViewState::Loaded { tasks, .. } = &mut self.state {
            tasks.remove(task_id);
        }
        Ok(())
    }

    /// Updates a column's WIP limit or done rule and folds the server's
    /// copy back into the board.
    pub async fn update_column(
        &mut self,
        column_id: &str,
        payload: UpdateColumnPayload,
    ) -> Result<Column, ApiError> {
        let column = self
            .api
            .update_column(&self.board_id, column_id, payload)
            .await?;
        if let ViewState::Loaded { board, .. } = &mut self.state {
            if let Some(slot) = board.columns.iter_mut().find(|c| c.id == column.id) {
                *slot = column.clone();
            }
        }
        Ok(column)
    }

    /// True when a column holds more cards than its WIP limit. Two-phase
    /// columns count only their active lane.
    pub fn wip_limit_exceeded(&self, column: ColumnId) -> bool {
        let (board, tasks) = match &self.state {
            ViewState::Loaded { board, tasks } => (board, tasks),
            ViewState::Loading => return false,
        };
        let limit = board
            .columns
            .iter()
            .find(|c| c.id == column.as_str())
            .and_then(|c| c.wip_limit);
        match limit {
            Some(limit) => {
                let zone = DropZone {
                    column,
                    section: None,
                };
                tasks.lane(zone).len() as i64 > limit
            }
            None => false,
        }
    }

    pub async fn members(&self) -> Result<Vec<BoardMember>, ApiError> {
        self.api.board_members(&self.board_id).await
    }
}
