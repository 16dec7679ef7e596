use super::player::Player;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Number of pieces in a winning line
const LINE_LEN: usize = 4;

/// Row/column steps for the four line shapes anchored at a cell:
/// rightward, downward, down-right and down-left.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Four `(row, col)` coordinates forming a four-in-a-row
pub type WinLine = [(usize, usize); LINE_LEN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Occupied(Player),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    ColumnFull,
    InvalidColumn,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Like [`Board::get`], but `None` when the position is off the board
    pub fn try_get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Check if a column is full
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Lowest empty row in a column, scanning from the bottom up
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.cells[row][col].is_empty())
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, player: Player) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn);
        }

        let row = self.landing_row(col).ok_or(MoveError::ColumnFull)?;
        self.cells[row][col] = Cell::Occupied(player);
        Ok(row)
    }

    /// Check if every cell on the board is occupied
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }

    /// Number of cells held by `player`
    pub fn count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == Cell::Occupied(player))
            .count()
    }

    /// Scan the whole board for a line of four held by `player`.
    ///
    /// Every cell is tried as the anchor of a rightward, downward and both
    /// downward-diagonal lines. Candidates running off the board are skipped.
    /// The first matching line in row-major anchor order is returned.
    pub fn winning_line(&self, player: Player) -> Option<WinLine> {
        let target = Cell::Occupied(player);

        for row in 0..ROWS {
            for col in 0..COLS {
                for &(dr, dc) in &DIRECTIONS {
                    if let Some(line) = Self::line_from(row, col, dr, dc) {
                        if line.iter().all(|&(r, c)| self.cells[r][c] == target) {
                            return Some(line);
                        }
                    }
                }
            }
        }

        None
    }

    /// Check whether `player` has four in a row anywhere on the board
    pub fn has_win(&self, player: Player) -> bool {
        self.winning_line(player).is_some()
    }

    /// Coordinates of the line anchored at (row, col), or `None` if any of
    /// them falls outside the grid
    fn line_from(row: usize, col: usize, dr: isize, dc: isize) -> Option<WinLine> {
        let mut line = [(0, 0); LINE_LEN];
        for (step, slot) in line.iter_mut().enumerate() {
            let r = row.checked_add_signed(dr * step as isize)?;
            let c = col.checked_add_signed(dc * step as isize)?;
            if r >= ROWS || c >= COLS {
                return None;
            }
            *slot = (r, c);
        }
        Some(line)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
