use log::{debug, info, warn};

use super::board::{Board, Cell, MoveError, WinLine, COLS};
use super::player::Player;
use crate::error::{GameError, StoreError};
use crate::score::{MemoryStore, WinCountStore, WinCounts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Player),
    Tied,
}

impl GameStatus {
    /// Won or tied: no further placements until reset
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// What a call to [`GameEngine::drop_piece`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropResult {
    /// Piece landed and the turn passed to `next_player`.
    Placed {
        row: usize,
        column: usize,
        next_player: Player,
    },
    /// Piece landed and completed a four-in-a-row. `saved` is false when the
    /// updated win counts could not be persisted.
    Win {
        row: usize,
        column: usize,
        winner: Player,
        saved: bool,
    },
    /// Piece landed in the last empty cell without completing a line.
    Tie { row: usize, column: usize },
    /// Column had no room; nothing changed.
    ColumnFull,
    /// Game already finished; nothing changed.
    GameAlreadyOver,
}

/// Owns one game of Connect Four plus the running win tally.
///
/// Each instance is independent. The presentation layer drives it through
/// [`drop_piece`](Self::drop_piece) and [`reset`](Self::reset) and renders
/// from the read accessors.
#[derive(Debug)]
pub struct GameEngine {
    board: Board,
    current_player: Player,
    status: GameStatus,
    win_counts: WinCounts,
    store: Box<dyn WinCountStore>,
}

impl GameEngine {
    /// Create an engine, loading prior win counts from `store`
    pub fn new(store: Box<dyn WinCountStore>) -> Result<Self, StoreError> {
        let win_counts = store.load()?;
        info!(
            "loaded win counts: player 1 = {}, player 2 = {}",
            win_counts.get(Player::One),
            win_counts.get(Player::Two)
        );
        Ok(GameEngine {
            board: Board::new(),
            current_player: Player::One,
            status: GameStatus::InProgress,
            win_counts,
            store,
        })
    }

    /// Engine whose win counts live only as long as the process
    pub fn in_memory() -> Self {
        GameEngine {
            board: Board::new(),
            current_player: Player::One,
            status: GameStatus::InProgress,
            win_counts: WinCounts::default(),
            store: Box::new(MemoryStore::new()),
        }
    }

    /// Start a new game. Win counts are kept.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_player = Player::One;
        self.status = GameStatus::InProgress;
        debug!("board reset");
    }

    /// Drop the current player's piece into `column`
    pub fn drop_piece(&mut self, column: usize) -> Result<DropResult, GameError> {
        if self.status.is_terminal() {
            return Ok(DropResult::GameAlreadyOver);
        }

        let player = self.current_player;
        let row = match self.board.drop_piece(column, player) {
            Ok(row) => row,
            Err(MoveError::InvalidColumn) => return Err(GameError::InvalidColumn(column)),
            Err(MoveError::ColumnFull) => return Ok(DropResult::ColumnFull),
        };
        debug!("{} placed at ({}, {})", player, row, column);

        // Win is checked before tie: a last-cell win is still a win
        if self.board.has_win(player) {
            self.status = GameStatus::Won(player);
            let saved = self.record_win(player);
            info!("{} won", player);
            return Ok(DropResult::Win {
                row,
                column,
                winner: player,
                saved,
            });
        }

        if self.board.is_full() {
            self.status = GameStatus::Tied;
            info!("game tied");
            return Ok(DropResult::Tie { row, column });
        }

        self.current_player = player.other();
        Ok(DropResult::Placed {
            row,
            column,
            next_player: self.current_player,
        })
    }

    /// Bump the tally and persist it. The in-memory count is authoritative
    /// even if the write fails.
    fn record_win(&mut self, player: Player) -> bool {
        self.win_counts.record_win(player);
        match self.store.save(&self.win_counts) {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to save win counts: {e}");
                false
            }
        }
    }

    pub fn cell(&self, row: usize, column: usize) -> Result<Cell, GameError> {
        self.board
            .try_get(row, column)
            .ok_or(GameError::InvalidPosition { row, column })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn win_counts(&self) -> WinCounts {
        self.win_counts
    }

    /// The four cells that decided the game, if it was won
    pub fn winning_line(&self) -> Option<WinLine> {
        match self.status {
            GameStatus::Won(player) => self.board.winning_line(player),
            _ => None,
        }
    }

    /// Columns that can still take a piece
    pub fn open_columns(&self) -> Vec<usize> {
        if self.status.is_terminal() {
            return Vec::new();
        }
        (0..COLS)
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ROWS;

    /// Full 42-move game in which nobody ever connects four
    const TIE_GAME: [usize; 42] = [
        4, 1, 6, 2, 1, 0, 1, 4, 4, 2, 4, 1, 3, 6, 3, 3, 1, 0, 4, 6, 6, 1, 2, 3, 6, 0, 6, 4, 2,
        5, 5, 3, 3, 2, 5, 5, 0, 2, 0, 5, 5, 0,
    ];

    /// Full 42-move game whose final piece completes a line for player 2
    const LAST_MOVE_WIN: [usize; 42] = [
        4, 1, 6, 2, 1, 0, 1, 4, 4, 2, 4, 1, 3, 6, 3, 3, 1, 0, 4, 6, 6, 1, 2, 3, 6, 0, 6, 4, 2,
        5, 5, 3, 3, 2, 0, 5, 0, 5, 0, 5, 2, 5,
    ];

    #[derive(Debug)]
    struct FailingStore;

    impl WinCountStore for FailingStore {
        fn load(&self) -> Result<WinCounts, StoreError> {
            Ok(WinCounts::new(7, 2))
        }

        fn save(&mut self, _counts: &WinCounts) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk unavailable",
            )))
        }
    }

    /// Play all moves, asserting every one but the last is an ordinary placement
    fn play(engine: &mut GameEngine, moves: &[usize]) -> DropResult {
        let (last, rest) = moves.split_last().expect("at least one move");
        for &col in rest {
            let result = engine.drop_piece(col).unwrap();
            assert!(
                matches!(result, DropResult::Placed { .. }),
                "move in column {col} ended the game early: {result:?}"
            );
        }
        engine.drop_piece(*last).unwrap()
    }

    fn engine_with_store() -> (GameEngine, MemoryStore) {
        let store = MemoryStore::new();
        let engine = GameEngine::new(Box::new(store.clone())).unwrap();
        (engine, store)
    }

    #[test]
    fn test_initial_state() {
        let engine = GameEngine::in_memory();
        assert_eq!(engine.current_player(), Player::One);
        assert_eq!(engine.status(), GameStatus::InProgress);
        assert_eq!(engine.open_columns().len(), COLS);
        assert_eq!(engine.win_counts(), WinCounts::default());
        assert_eq!(engine.winning_line(), None);
    }

    #[test]
    fn test_first_drop_lands_at_bottom() {
        let mut engine = GameEngine::in_memory();
        for col in 0..COLS {
            let result = engine.drop_piece(col).unwrap();
            match result {
                DropResult::Placed { row, column, .. } => {
                    assert_eq!(row, ROWS - 1);
                    assert_eq!(column, col);
                }
                other => panic!("unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn test_placed_switches_player() {
        let mut engine = GameEngine::in_memory();
        let result = engine.drop_piece(3).unwrap();
        assert_eq!(
            result,
            DropResult::Placed {
                row: 5,
                column: 3,
                next_player: Player::Two,
            }
        );
        assert_eq!(engine.current_player(), Player::Two);
        assert_eq!(engine.cell(5, 3), Ok(Cell::Occupied(Player::One)));

        engine.drop_piece(3).unwrap();
        assert_eq!(engine.current_player(), Player::One);
        assert_eq!(engine.cell(4, 3), Ok(Cell::Occupied(Player::Two)));
    }

    #[test]
    fn test_full_column_is_noop() {
        let mut engine = GameEngine::in_memory();
        // 0,0,0,0,0,0 alternates players so nobody gets four vertically
        for _ in 0..ROWS {
            engine.drop_piece(0).unwrap();
        }
        let board_before = *engine.board();
        let player_before = engine.current_player();

        assert_eq!(engine.drop_piece(0).unwrap(), DropResult::ColumnFull);
        assert_eq!(*engine.board(), board_before);
        assert_eq!(engine.current_player(), player_before);
        assert_eq!(engine.status(), GameStatus::InProgress);
        assert!(!engine.open_columns().contains(&0));
    }

    #[test]
    fn test_invalid_column_is_rejected() {
        let mut engine = GameEngine::in_memory();
        engine.drop_piece(2).unwrap();
        let board_before = *engine.board();

        assert_eq!(engine.drop_piece(COLS), Err(GameError::InvalidColumn(COLS)));
        assert_eq!(engine.drop_piece(usize::MAX), Err(GameError::InvalidColumn(usize::MAX)));
        assert_eq!(*engine.board(), board_before);
        assert_eq!(engine.current_player(), Player::Two);
    }

    #[test]
    fn test_horizontal_win() {
        let mut engine = GameEngine::in_memory();
        // Player 2 stacks on top of player 1's pieces
        let result = play(&mut engine, &[0, 0, 1, 1, 2, 2, 3]);
        assert_eq!(
            result,
            DropResult::Win {
                row: 5,
                column: 3,
                winner: Player::One,
                saved: true,
            }
        );
        assert_eq!(engine.status(), GameStatus::Won(Player::One));
        assert_eq!(
            engine.winning_line(),
            Some([(5, 0), (5, 1), (5, 2), (5, 3)])
        );
    }

    #[test]
    fn test_vertical_win() {
        let mut engine = GameEngine::in_memory();
        let result = play(&mut engine, &[0, 1, 0, 1, 0, 1, 0]);
        assert!(matches!(
            result,
            DropResult::Win {
                row: 2,
                column: 0,
                winner: Player::One,
                ..
            }
        ));
    }

    #[test]
    fn test_diagonal_wins() {
        // Rising to the right
        let mut engine = GameEngine::in_memory();
        let result = play(&mut engine, &[0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3]);
        assert!(matches!(
            result,
            DropResult::Win {
                row: 2,
                column: 3,
                winner: Player::One,
                ..
            }
        ));

        // Rising to the left
        let mut engine = GameEngine::in_memory();
        let result = play(&mut engine, &[6, 5, 5, 4, 4, 3, 4, 3, 3, 0, 3]);
        assert!(matches!(
            result,
            DropResult::Win {
                row: 2,
                column: 3,
                winner: Player::One,
                ..
            }
        ));
    }

    #[test]
    fn test_player_two_can_win() {
        let (mut engine, store) = engine_with_store();
        let result = play(&mut engine, &[0, 1, 0, 1, 0, 1, 6, 1]);
        assert!(matches!(
            result,
            DropResult::Win {
                winner: Player::Two,
                ..
            }
        ));
        assert_eq!(engine.win_counts(), WinCounts::new(0, 1));
        assert_eq!(store.snapshot(), WinCounts::new(0, 1));
    }

    #[test]
    fn test_terminal_game_ignores_drops() {
        let mut engine = GameEngine::in_memory();
        play(&mut engine, &[0, 1, 0, 1, 0, 1, 0]);
        let board_before = *engine.board();

        assert_eq!(engine.drop_piece(4).unwrap(), DropResult::GameAlreadyOver);
        // Status is checked before the column
        assert_eq!(engine.drop_piece(99).unwrap(), DropResult::GameAlreadyOver);
        assert_eq!(*engine.board(), board_before);
        assert_eq!(engine.current_player(), Player::One);
        assert!(engine.open_columns().is_empty());
    }

    #[test]
    fn test_tie_only_on_last_move() {
        let mut engine = GameEngine::in_memory();
        let result = play(&mut engine, &TIE_GAME);
        assert_eq!(result, DropResult::Tie { row: 0, column: 0 });
        assert_eq!(engine.status(), GameStatus::Tied);
        assert!(engine.board().is_full());
        // The last mover stays current
        assert_eq!(engine.current_player(), Player::Two);
        assert_eq!(engine.win_counts(), WinCounts::default());
        assert_eq!(engine.winning_line(), None);
        assert_eq!(engine.drop_piece(0).unwrap(), DropResult::GameAlreadyOver);
    }

    #[test]
    fn test_win_beats_tie_on_last_cell() {
        let mut engine = GameEngine::in_memory();
        let result = play(&mut engine, &LAST_MOVE_WIN);
        assert!(engine.board().is_full());
        assert!(matches!(
            result,
            DropResult::Win {
                winner: Player::Two,
                ..
            }
        ));
        assert_eq!(engine.status(), GameStatus::Won(Player::Two));
    }

    #[test]
    fn test_win_counts_increment_and_persist() {
        let store = MemoryStore::with_counts(WinCounts::new(3, 4));
        let mut engine = GameEngine::new(Box::new(store.clone())).unwrap();
        assert_eq!(engine.win_counts(), WinCounts::new(3, 4));

        play(&mut engine, &[0, 0, 1, 1, 2, 2, 3]);
        assert_eq!(engine.win_counts(), WinCounts::new(4, 4));
        assert_eq!(store.snapshot(), WinCounts::new(4, 4));
        assert_eq!(store.save_count(), 1);

        engine.reset();
        assert_eq!(engine.win_counts(), WinCounts::new(4, 4));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_only_wins_are_saved() {
        let (mut engine, store) = engine_with_store();
        play(&mut engine, &TIE_GAME);
        engine.reset();
        engine.drop_piece(0).unwrap();
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_failed_save_still_counts_win() {
        let mut engine = GameEngine::new(Box::new(FailingStore)).unwrap();
        let result = play(&mut engine, &[0, 0, 1, 1, 2, 2, 3]);
        assert_eq!(
            result,
            DropResult::Win {
                row: 5,
                column: 3,
                winner: Player::One,
                saved: false,
            }
        );
        assert_eq!(engine.win_counts(), WinCounts::new(8, 2));
        assert_eq!(engine.status(), GameStatus::Won(Player::One));
    }

    #[test]
    fn test_reset_clears_board_and_turn() {
        let mut engine = GameEngine::in_memory();
        play(&mut engine, &[0, 1, 0, 1, 0, 1, 0]);
        engine.reset();

        assert_eq!(engine.status(), GameStatus::InProgress);
        assert_eq!(engine.current_player(), Player::One);
        assert_eq!(*engine.board(), Board::new());
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(engine.cell(row, col), Ok(Cell::Empty));
            }
        }
        assert_eq!(engine.win_counts(), WinCounts::new(1, 0));
    }

    #[test]
    fn test_reset_mid_game_switches_back_to_player_one() {
        let mut engine = GameEngine::in_memory();
        engine.drop_piece(3).unwrap();
        assert_eq!(engine.current_player(), Player::Two);
        engine.reset();
        assert_eq!(engine.current_player(), Player::One);
    }

    #[test]
    fn test_reads_do_not_mutate() {
        let mut engine = GameEngine::in_memory();
        play(&mut engine, &[3, 3, 4]);
        let board = *engine.board();

        for _ in 0..3 {
            assert_eq!(engine.cell(5, 3), Ok(Cell::Occupied(Player::One)));
            assert_eq!(engine.status(), GameStatus::InProgress);
            assert_eq!(engine.current_player(), Player::Two);
            assert_eq!(engine.win_counts(), WinCounts::default());
            assert_eq!(engine.winning_line(), None);
        }
        assert_eq!(*engine.board(), board);
    }

    #[test]
    fn test_cell_out_of_range() {
        let engine = GameEngine::in_memory();
        assert_eq!(
            engine.cell(ROWS, 0),
            Err(GameError::InvalidPosition { row: ROWS, column: 0 })
        );
        assert_eq!(
            engine.cell(0, COLS),
            Err(GameError::InvalidPosition { row: 0, column: COLS })
        );
    }

    #[test]
    fn test_engines_are_independent() {
        let mut a = GameEngine::in_memory();
        let b = GameEngine::in_memory();
        a.drop_piece(0).unwrap();
        assert_eq!(b.cell(5, 0), Ok(Cell::Empty));
        assert_eq!(b.current_player(), Player::One);
    }
}
