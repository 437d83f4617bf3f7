use super::constants::MAX_BOARD_CELLS;
use super::types::{Cell, Occupant, Position};

/// Narrow view of the grid that snakes and food are driven through.
pub trait Occupancy {
    fn query(&self, pos: Position) -> Cell;
    /// Precondition: `query(pos)` is not an obstacle.
    fn claim(&mut self, pos: Position, occupant: Occupant) -> Cell;
    /// Clears `pos` only while it is still held by `occupant`.
    fn release(&mut self, pos: Position, occupant: Occupant);
}

#[derive(Debug, Clone)]
pub struct Board {
    width: i32,
    height: i32,
    cells: Vec<Option<Occupant>>,
}

impl Board {
    /// Dimensions that are not positive or exceed `MAX_BOARD_CELLS` yield an
    /// empty board where every query sees a wall.
    pub fn new(width: i32, height: i32) -> Self {
        let len = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .filter(|len| *len > 0 && *len <= MAX_BOARD_CELLS);
        let Some(len) = len else {
            tracing::error!(width, height, "unusable board size, creating an empty board");
            return Self {
                width: 0,
                height: 0,
                cells: Vec::new(),
            };
        };
        Self {
            width,
            height,
            cells: vec![None; len],
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn is_free(&self, pos: Position) -> bool {
        self.query(pos).is_empty()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    fn position_of(&self, index: usize) -> Position {
        let index = index as i32;
        Position::new(index % self.width, index / self.width)
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Position, Occupant)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.map(|occupant| (self.position_of(index), occupant)))
    }

    /// Row-major order.
    pub fn free_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| self.position_of(index))
    }

    pub fn free_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }
}

impl Occupancy for Board {
    fn query(&self, pos: Position) -> Cell {
        match self.index(pos) {
            Some(index) => Cell::from(self.cells[index]),
            None => Cell::Wall,
        }
    }

    fn claim(&mut self, pos: Position, occupant: Occupant) -> Cell {
        debug_assert!(self.contains(pos), "claim outside the board at {pos:?}");
        let Some(index) = self.index(pos) else { return Cell::Wall };
        let previous = Cell::from(self.cells[index].replace(occupant));
        debug_assert!(
            !previous.is_obstacle(),
            "{occupant:?} claimed {pos:?} while it was held by {previous:?}"
        );
        previous
    }

    fn release(&mut self, pos: Position, occupant: Occupant) {
        let Some(index) = self.index(pos) else { return };
        if self.cells[index] == Some(occupant) {
            self.cells[index] = None;
        }
    }
}
