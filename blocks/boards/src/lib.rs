pub mod boards;
pub mod columns;
pub mod members;
pub mod tasks;
