use thiserror::Error;

use flowboard_atoms::boards::Board;

use crate::api::{ApiError, BoardsApi};

/// Why a dashboard delete did not happen. Deletion is gated on retyping the
/// board's name; a mismatch never reaches the API.
#[derive(Debug, Error)]
pub enum DeleteBoardError {
    #[error("board name confirmation does not match")]
    ConfirmationMismatch,
    #[error("board is not on the dashboard")]
    UnknownBoard,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Controller behind the dashboard screen: the signed-in user's boards plus
/// create, join and delete.
pub struct Dashboard<A> {
    api: A,
    boards: Vec<Board>,
}

impl<A: BoardsApi> Dashboard<A> {
    pub fn new(api: A) -> Dashboard<A> {
        Dashboard {
            api,
            boards: Vec::new(),
        }
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.boards = self.api.list_boards().await?;
        Ok(())
    }

    pub async fn create_board(&mut self, name: &str) -> Result<Board, ApiError> {
        let board = self.api.create_board(name).await?;
        self.boards.push(board.clone());
        Ok(board)
    }

    /// Joins a board by its share code and adds it to the list.
    pub async fn join_board(&mut self, code: &str) -> Result<Board, ApiError> {
        let board = self.api.join_board(code).await?;
        if !self.boards.iter().any(|b| b.board_id == board.board_id) {
            self.boards.push(board.clone());
        }
        Ok(board)
    }

    /// Deletes a board once `confirm_name` matches its name exactly.
    pub async fn delete_board(
        &mut self,
        board_id: &str,
        confirm_name: &str,
    ) -> Result<(), DeleteBoardError> {
        let board = self
            .boards
            .iter()
            .find(|b| b.board_id == board_id)
            .ok_or(DeleteBoardError::UnknownBoard)?;
        if board.name != confirm_name {
            return Err(DeleteBoardError::ConfirmationMismatch);
        }
        self.api.delete_board(board_id).await?;
        self.boards.retain(|b| b.board_id != board_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::{InMemoryApi, CURRENT_USER};

    async fn loaded_dashboard(api: InMemoryApi) -> Dashboard<InMemoryApi> {
        let mut dashboard = Dashboard::new(api);
        dashboard.load().await.unwrap();
        dashboard
    }

    #[tokio::test]
    async fn load_lists_the_seeded_boards() {
        let api = InMemoryApi::new();
        api.seed(Board::new("Alpha".to_string(), CURRENT_USER));
        api.seed(Board::new("Beta".to_string(), CURRENT_USER));

        let dashboard = loaded_dashboard(api).await;
        let names: Vec<&str> = dashboard.boards().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Beta"]);
    }

    #[tokio::test]
    async fn created_boards_appear_on_the_dashboard() {
        let mut dashboard = loaded_dashboard(InMemoryApi::new()).await;
        let board = dashboard.create_board("Launch").await.unwrap();

        assert_eq!(board.owner, CURRENT_USER);
        assert_eq!(dashboard.boards().len(), 1);
        assert_eq!(dashboard.boards()[0].name, "Launch");
    }

    #[tokio::test]
    async fn joining_by_code_adds_the_board_once() {
        let api = InMemoryApi::new();
        let shared = Board::new("Shared".to_string(), "u-other");
        let code = shared.code.clone();
        api.seed(shared);

        let mut dashboard = loaded_dashboard(api).await;
        // The fake lists every stored board, so Shared is already there.
        assert_eq!(dashboard.boards().len(), 1);

        let joined = dashboard.join_board(&code).await.unwrap();
        assert!(joined.is_member(CURRENT_USER));
        assert_eq!(dashboard.boards().len(), 1);
    }

    #[tokio::test]
    async fn joining_with_an_unknown_code_is_not_found() {
        let mut dashboard = loaded_dashboard(InMemoryApi::new()).await;
        let err = dashboard.join_board("FFFFFFFFFFFF").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Board not found");
    }

    #[tokio::test]
    async fn delete_with_a_mismatched_name_never_reaches_the_api() {
        let api = InMemoryApi::new();
        let board = Board::new("Production".to_string(), CURRENT_USER);
        let board_id = board.board_id.clone();
        api.seed(board);

        let mut dashboard = loaded_dashboard(api).await;
        let err = dashboard
            .delete_board(&board_id, "Prod")
            .await
            .unwrap_err();

        assert!(matches!(err, DeleteBoardError::ConfirmationMismatch));
        assert_eq!(dashboard.boards().len(), 1);
        assert_eq!(dashboard.api.delete_board_calls(), 0);
    }

    #[tokio::test]
    async fn delete_with_the_exact_name_removes_the_board() {
        let api = InMemoryApi::new();
        let board = Board::new("Old project".to_string(), CURRENT_USER);
        let board_id = board.board_id.clone();
        api.seed(board);

        let mut dashboard = loaded_dashboard(api).await;
        dashboard
            .delete_board(&board_id, "Old project")
            .await
            .unwrap();

        assert!(dashboard.boards().is_empty());
        assert_eq!(dashboard.api.delete_board_calls(), 1);
    }

    #[tokio::test]
    async fn deleting_someone_elses_board_fails_and_keeps_it_listed() {
        let api = InMemoryApi::new();
        let mut board = Board::new("Team board".to_string(), "u-other");
        board.join(CURRENT_USER).unwrap();
        let board_id = board.board_id.clone();
        api.seed(board);

        let mut dashboard = loaded_dashboard(api).await;
        let err = dashboard
            .delete_board(&board_id, "Team board")
            .await
            .unwrap_err();

        match err {
            DeleteBoardError::Api(api_err) => {
                assert_eq!(api_err.status(), Some(404));
                assert_eq!(api_err.to_string(), "Board not found or permission denied");
            }
            other => panic!("expected an API error, got {:?}", other),
        }
        assert_eq!(dashboard.boards().len(), 1);
    }

    #[tokio::test]
    async fn deleting_an_unlisted_board_is_rejected_locally() {
        let mut dashboard = loaded_dashboard(InMemoryApi::new()).await;
        let err = dashboard.delete_board("b-ghost", "Ghost").await.unwrap_err();
        assert!(matches!(err, DeleteBoardError::UnknownBoard));
        assert_eq!(dashboard.api.delete_board_calls(), 0);
    }
}
