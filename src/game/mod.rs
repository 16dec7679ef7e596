//! Core Connect Four game logic: board representation, player types, and the
//! game engine that owns turn order, win/tie detection and the win tally.

mod board;
mod engine;
mod player;

pub use board::{Board, Cell, MoveError, WinLine, COLS, ROWS};
pub use engine::{DropResult, GameEngine, GameStatus};
pub use player::Player;
