pub mod model;
pub mod service;
pub mod status;

pub use model::{
    Board, Column, CreateBoardPayload, JoinBoardPayload, UpdateBoardPayload, UpdateColumnPayload,
};
pub use service::*;
pub use status::{ColumnId, DropZone, Section, TaskStatus};
