//! # Connect Four
//!
//! A two-player Connect Four game with a terminal UI built with Ratatui and
//! win counts that persist between sessions.
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: board, player, game engine
//! - [`score`]: Win counts and their storage backends
//! - [`ui`]: Terminal UI: board view and key handling
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod score;
pub mod ui;
