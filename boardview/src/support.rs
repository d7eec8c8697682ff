use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use flowboard_atoms::boards::{Board, Column, UpdateColumnPayload};
use flowboard_atoms::tasks::{CreateTaskPayload, Task, UpdateTaskPayload, UpdateTaskResponse};
use flowboard_atoms::users::BoardMember;
use flowboard_atoms::ServiceError;

use crate::api::{ApiError, BoardsApi};

/// User every fake call acts as.
pub const CURRENT_USER: &str = "u-test";

/// In-memory `BoardsApi` running the same board logic the server runs, plus
/// switches for injecting failures and counters for asserting call counts.
pub struct InMemoryApi {
    boards: Mutex<Vec<Board>>,
    fail_task_updates: AtomicBool,
    task_update_calls: AtomicUsize,
    delete_board_calls: AtomicUsize,
}

impl InMemoryApi {
    pub fn new() -> InMemoryApi {
        InMemoryApi {
            boards: Mutex::new(Vec::new()),
            fail_task_updates: AtomicBool::new(false),
            task_update_calls: AtomicUsize::new(0),
            delete_board_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_board(board: Board) -> InMemoryApi {
        let api = InMemoryApi::new();
        api.seed(board);
        api
    }

    pub fn seed(&self, board: Board) {
        self.boards.lock().unwrap().push(board);
    }

    /// What the server currently holds for a board.
    pub fn stored_board(&self, board_id: &str) -> Board {
        self.boards
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.board_id == board_id)
            .cloned()
            .expect("board not seeded")
    }

    pub fn fail_task_updates(&self, fail: bool) {
        self.fail_task_updates.store(fail, Ordering::SeqCst);
    }

    pub fn task_update_calls(&self) -> usize {
        self.task_update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_board_calls(&self) -> usize {
        self.delete_board_calls.load(Ordering::SeqCst)
    }

    fn with_board_mut<T>(
        &self,
        board_id: &str,
        op: impl FnOnce(&mut Board) -> Result<T, ServiceError>,
    ) -> Result<T, ApiError> {
        let mut boards = self.boards.lock().unwrap();
        let board = boards
            .iter_mut()
            .find(|b| b.board_id == board_id)
            .ok_or(ServiceError::NotFound("Board"))
            .map_err(api_error)?;
        op(board).map_err(api_error)
    }
}

fn api_error(e: ServiceError) -> ApiError {
    ApiError::Http {
        status: e.status(),
        message: e.to_string(),
    }
}

#[async_trait]
impl BoardsApi for InMemoryApi {
    async fn list_boards(&self) -> Result<Vec<Board>, ApiError> {
        Ok(self.boards.lock().unwrap().clone())
    }

    async fn fetch_board(&self, board_id: &str) -> Result<Board, ApiError> {
        self.boards
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.board_id == board_id)
            .cloned()
            .ok_or_else(|| api_error(ServiceError::NotFound("Board")))
    }

    async fn create_board(&self, name: &str) -> Result<Board, ApiError> {
        let board = Board::new(name.to_string(), CURRENT_USER);
        self.seed(board.clone());
        Ok(board)
    }

    async fn join_board(&self, code: &str) -> Result<Board, ApiError> {
        let mut boards = self.boards.lock().unwrap();
        let board = boards
            .iter_mut()
            .find(|b| b.code == code)
            .ok_or_else(|| api_error(ServiceError::NotFound("Board")))?;
        board.join(CURRENT_USER).map_err(api_error)?;
        Ok(board.clone())
    }

    async fn delete_board(&self, board_id: &str) -> Result<(), ApiError> {
        self.delete_board_calls.fetch_add(1, Ordering::SeqCst);
        let mut boards = self.boards.lock().unwrap();
        let idx = boards
            .iter()
            .position(|b| b.board_id == board_id && b.owned_by(CURRENT_USER))
            .ok_or_else(|| api_error(ServiceError::Forbidden))?;
        boards.remove(idx);
        Ok(())
    }

    async fn board_members(&self, board_id: &str) -> Result<Vec<BoardMember>, ApiError> {
        let board = self.fetch_board(board_id).await?;
        Ok(board
            .members
            .iter()
            .map(|id| BoardMember {
                id: id.clone(),
                name: format!("User {}", id),
                email: format!("{}@example.test", id),
            })
            .collect())
    }

    async fn create_task(
        &self,
        board_id: &str,
        payload: CreateTaskPayload,
    ) -> Result<Task, ApiError> {
        self.with_board_mut(board_id, |board| {
            let task = Task::new(payload);
            board.tasks.push(task.clone());
            Ok(task)
        })
    }

    async fn update_task(
        &self,
        board_id: &str,
        task_id: &str,
        payload: UpdateTaskPayload,
    ) -> Result<UpdateTaskResponse, ApiError> {
        self.task_update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_task_updates.load(Ordering::SeqCst) {
            return Err(api_error(ServiceError::Store(
                "injected failure".to_string(),
            )));
        }
        self.with_board_mut(board_id, |board| {
            let task = board
                .task_mut(task_id)
                .ok_or(ServiceError::NotFound("Task"))?;
            task.apply_update(payload);
            Ok(UpdateTaskResponse {
                success: true,
                task: task.clone(),
            })
        })
    }

    async fn delete_task(&self, board_id: &str, task_id: &str) -> Result<(), ApiError> {
        self.with_board_mut(board_id, |board| {
            board.remove_task(task_id)?;
            Ok(())
        })
    }

    async fn update_column(
        &self,
        board_id: &str,
        column_id: &str,
        payload: UpdateColumnPayload,
    ) -> Result<Column, ApiError> {
        self.with_board_mut(board_id, |board| board.update_column(column_id, payload))
    }
}
