use super::board::Occupancy;
use super::constants::MIN_TRAILING_LENGTH;
use super::types::{Cell, Direction, FoodId, Occupant, Position, SnakeId, SnakeView, Turn};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Destination was a wall or a snake body; the snake is now dead.
    Blocked,
    Moved,
    /// The head landed on this food and the tail stayed put.
    Ate(FoodId),
    /// The snake was already dead.
    Idle,
}

#[derive(Debug, Clone)]
pub struct Snake {
    id: SnakeId,
    color: String,
    /// Tail first, head last.
    path: VecDeque<Position>,
    heading: Direction,
    turned_this_tick: bool,
    pending_turn: Option<Turn>,
    alive: bool,
}

impl Snake {
    /// Claims `start` and returns a one-cell snake. Callers check the cell is free.
    pub fn new<B: Occupancy>(
        id: SnakeId,
        color: String,
        start: Position,
        heading: Direction,
        board: &mut B,
    ) -> Self {
        board.claim(start, Occupant::Snake(id));
        let mut path = VecDeque::with_capacity(4);
        path.push_back(start);
        Self {
            id,
            color,
            path,
            heading,
            turned_this_tick: false,
            pending_turn: None,
            alive: true,
        }
    }

    pub fn id(&self) -> SnakeId {
        self.id
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn pending_turn(&self) -> Option<Turn> {
        self.pending_turn
    }

    pub fn path(&self) -> impl Iterator<Item = Position> + '_ {
        self.path.iter().copied()
    }

    pub fn head(&self) -> Option<Position> {
        self.path.back().copied()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn advance<B: Occupancy>(&mut self, board: &mut B) -> MoveOutcome {
        if !self.alive {
            return MoveOutcome::Idle;
        }
        self.turned_this_tick = false;

        let Some(head) = self.head() else {
            self.alive = false;
            return MoveOutcome::Blocked;
        };
        let destination = head.step(self.heading);
        if board.query(destination).is_obstacle() {
            self.alive = false;
            return MoveOutcome::Blocked;
        }

        self.path.push_back(destination);
        let outcome = match board.claim(destination, Occupant::Snake(self.id)) {
            Cell::Food(food) => MoveOutcome::Ate(food),
            _ => {
                if self.path.len() > MIN_TRAILING_LENGTH {
                    if let Some(tail) = self.path.pop_front() {
                        board.release(tail, Occupant::Snake(self.id));
                    }
                }
                MoveOutcome::Moved
            }
        };

        if let Some(pending) = self.pending_turn.take() {
            self.turn(pending);
        }
        outcome
    }

    /// Rotates at most once per tick; a second request waits in the single
    /// pending slot, replacing whatever was there.
    pub fn turn(&mut self, turn: Turn) {
        if !self.alive {
            return;
        }
        if self.turned_this_tick {
            self.pending_turn = Some(turn);
        } else {
            self.turned_this_tick = true;
            self.heading = self.heading.turned(turn);
        }
    }

    pub fn turn_left(&mut self) {
        self.turn(Turn::Left);
    }

    pub fn turn_right(&mut self) {
        self.turn(Turn::Right);
    }

    pub fn release_all<B: Occupancy>(&mut self, board: &mut B) {
        for pos in self.path.drain(..) {
            board.release(pos, Occupant::Snake(self.id));
        }
    }

    pub fn view(&self) -> SnakeView {
        SnakeView {
            id: self.id,
            color: self.color.clone(),
            heading: self.heading,
            path: self.path().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Board;

    fn red_at(board: &mut Board, x: i32, y: i32, heading: Direction) -> Snake {
        Snake::new(1, "red".to_string(), Position::new(x, y), heading, board)
    }

    fn path_of(snake: &Snake) -> Vec<Position> {
        snake.path().collect()
    }

    #[test]
    fn straight_moves_keep_two_cells() {
        let mut board = Board::new(10, 10);
        let mut snake = red_at(&mut board, 2, 2, Direction::Right);
        for _ in 0..3 {
            assert_eq!(snake.advance(&mut board), MoveOutcome::Moved);
        }
        assert_eq!(path_of(&snake), vec![Position::new(4, 2), Position::new(5, 2)]);
        assert_eq!(snake.head(), Some(Position::new(5, 2)));
        assert_eq!(snake.heading(), Direction::Right);
        assert!(snake.is_alive());
        assert_eq!(board.query(Position::new(2, 2)), Cell::Empty);
        assert_eq!(board.query(Position::new(3, 2)), Cell::Empty);
        assert_eq!(board.query(Position::new(4, 2)), Cell::Snake(1));
        assert_eq!(board.query(Position::new(5, 2)), Cell::Snake(1));
    }

    #[test]
    fn short_snake_grows_to_two_before_trailing() {
        let mut board = Board::new(10, 10);
        let mut snake = red_at(&mut board, 0, 0, Direction::Down);
        assert_eq!(snake.len(), 1);
        snake.advance(&mut board);
        assert_eq!(snake.len(), 2);
        snake.advance(&mut board);
        assert_eq!(snake.len(), 2);
    }

    #[test]
    fn stepping_off_the_board_kills_without_touching_it() {
        let mut board = Board::new(10, 10);
        let mut snake = red_at(&mut board, 0, 2, Direction::Left);
        let before: Vec<_> = board.occupied().collect();
        assert_eq!(snake.advance(&mut board), MoveOutcome::Blocked);
        assert!(!snake.is_alive());
        assert_eq!(board.occupied().collect::<Vec<_>>(), before);
        assert_eq!(path_of(&snake), vec![Position::new(0, 2)]);
    }

    #[test]
    fn dead_snake_ignores_moves_and_turns() {
        let mut board = Board::new(3, 3);
        let mut snake = red_at(&mut board, 2, 0, Direction::Right);
        snake.advance(&mut board);
        assert!(!snake.is_alive());
        snake.turn_left();
        assert_eq!(snake.heading(), Direction::Right);
        assert_eq!(snake.pending_turn(), None);
        assert_eq!(snake.advance(&mut board), MoveOutcome::Idle);
    }

    #[test]
    fn second_turn_in_a_tick_is_buffered() {
        let mut board = Board::new(10, 10);
        let mut snake = red_at(&mut board, 5, 5, Direction::Right);
        snake.turn_left();
        snake.turn_right();
        assert_eq!(snake.heading(), Direction::Up);
        assert_eq!(snake.pending_turn(), Some(Turn::Right));

        snake.advance(&mut board);
        assert_eq!(snake.head(), Some(Position::new(5, 4)));
        assert_eq!(snake.heading(), Direction::Right);
        assert_eq!(snake.pending_turn(), None);

        snake.advance(&mut board);
        assert_eq!(snake.head(), Some(Position::new(6, 4)));
    }

    #[test]
    fn pending_slot_keeps_only_the_newest_request() {
        let mut board = Board::new(10, 10);
        let mut snake = red_at(&mut board, 5, 5, Direction::Right);
        snake.turn_left();
        snake.turn_left();
        snake.turn_right();
        assert_eq!(snake.pending_turn(), Some(Turn::Right));
        snake.advance(&mut board);
        assert_eq!(snake.heading(), Direction::Right);
    }

    #[test]
    fn buffered_turn_blocks_a_third_turn_in_the_same_tick() {
        let mut board = Board::new(10, 10);
        let mut snake = red_at(&mut board, 5, 5, Direction::Right);
        snake.turn_left();
        snake.turn_left();
        snake.advance(&mut board);
        // the buffered turn counts as this tick's turn
        snake.turn_left();
        assert_eq!(snake.heading(), Direction::Left);
        assert_eq!(snake.pending_turn(), Some(Turn::Left));
    }

    #[test]
    fn eating_keeps_the_tail() {
        let mut board = Board::new(10, 10);
        let mut snake = red_at(&mut board, 1, 1, Direction::Right);
        snake.advance(&mut board);
        board.claim(Position::new(3, 1), Occupant::Food(0));
        assert_eq!(snake.advance(&mut board), MoveOutcome::Ate(0));
        assert_eq!(snake.len(), 3);
        assert_eq!(board.query(Position::new(1, 1)), Cell::Snake(1));
        assert_eq!(board.query(Position::new(3, 1)), Cell::Snake(1));
    }

    #[test]
    fn running_into_own_body_is_fatal() {
        let mut board = Board::new(10, 10);
        let mut snake = red_at(&mut board, 1, 1, Direction::Right);
        for x in 2..6 {
            board.claim(Position::new(x, 1), Occupant::Food(0));
            snake.advance(&mut board);
        }
        assert_eq!(snake.len(), 5);
        snake.turn_right();
        snake.advance(&mut board);
        snake.turn_right();
        snake.advance(&mut board);
        snake.turn_right();
        assert_eq!(snake.advance(&mut board), MoveOutcome::Blocked);
        assert!(!snake.is_alive());
    }

    #[test]
    fn release_all_frees_the_path() {
        let mut board = Board::new(10, 10);
        let mut snake = red_at(&mut board, 1, 1, Direction::Right);
        snake.advance(&mut board);
        snake.release_all(&mut board);
        assert_eq!(board.free_count(), 100);
        assert_eq!(snake.len(), 0);
    }
}
