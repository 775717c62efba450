pub mod board;
pub mod validate;

pub use board::{Board, Card, Column, Snapshot};
