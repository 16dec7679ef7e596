//! Terminal UI: the board view that drives a [`GameEngine`](crate::game::GameEngine)
//! from the keyboard and renders what it reports.

mod app;
mod game_view;

pub use app::App;
