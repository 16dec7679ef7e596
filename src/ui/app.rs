use crate::config::UiConfig;
use crate::error::GameError;
use crate::game::{DropResult, GameEngine, COLS};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::{Duration, Instant};

/// A message held back until the announce delay has passed
#[derive(Debug, Clone)]
struct Announcement {
    text: String,
    due: Instant,
}

pub struct App {
    engine: GameEngine,
    selected_column: usize,
    start_column: usize,
    announce_delay: Duration,
    should_quit: bool,
    message: Option<String>,
    pending: Option<Announcement>,
}

impl App {
    pub fn new(engine: GameEngine, ui: &UiConfig) -> Self {
        let start_column = ui.start_column.min(COLS - 1);
        App {
            engine,
            selected_column: start_column,
            start_column,
            announce_delay: ui.announce_delay(),
            should_quit: false,
            message: None,
            pending: None,
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            self.tick(Instant::now());
            terminal.draw(|f| self.render(f)).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn selected_column(&self) -> usize {
        self.selected_column
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Release a held-back announcement once its time has come
    pub fn tick(&mut self, now: Instant) {
        if self.pending.as_ref().is_some_and(|p| now >= p.due) {
            if let Some(announcement) = self.pending.take() {
                self.message = Some(announcement.text);
            }
        }
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                }
            }
            KeyCode::Right => {
                if self.selected_column < COLS - 1 {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece(self.selected_column);
            }
            KeyCode::Char(c @ '1'..='7') => {
                let column = c as usize - '1' as usize;
                self.selected_column = column;
                self.drop_piece(column);
            }
            KeyCode::Char('r') | KeyCode::Char('n') => {
                self.engine.reset();
                self.selected_column = self.start_column;
                self.pending = None;
                self.message = Some("New game started!".to_string());
            }
            _ => {}
        }
    }

    /// Drop piece in a column and react to what the engine reports
    fn drop_piece(&mut self, column: usize) {
        match self.engine.drop_piece(column) {
            Ok(DropResult::Placed { .. }) => {
                self.message = None;
            }
            Ok(DropResult::Win { winner, saved, .. }) => {
                let mut text = format!("{} won!", winner.name());
                if !saved {
                    text.push_str(" (score could not be saved)");
                }
                self.announce(text);
            }
            Ok(DropResult::Tie { .. }) => {
                self.announce("Wow! This game ends in a tie!".to_string());
            }
            Ok(DropResult::ColumnFull) => {
                self.message = Some("Column is full!".to_string());
            }
            Ok(DropResult::GameAlreadyOver) => {
                if self.pending.is_none() {
                    self.message = Some("Game over! Press 'r' for a new game.".to_string());
                }
            }
            Err(GameError::InvalidColumn(_)) | Err(GameError::InvalidPosition { .. }) => {
                self.message = Some("Invalid column!".to_string());
            }
        }
    }

    fn announce(&mut self, text: String) {
        self.message = None;
        self.pending = Some(Announcement {
            text,
            due: Instant::now() + self.announce_delay,
        });
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(frame, &self.engine, self.selected_column, &self.message);
    }
}
