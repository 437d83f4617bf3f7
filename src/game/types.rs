use serde::{Deserialize, Serialize};

pub type SnakeId = u32;
pub type FoodId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Screen-space headings: `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    pub fn turned(self, turn: Turn) -> Self {
        match (turn, self) {
            (Turn::Left, Self::Up) => Self::Left,
            (Turn::Left, Self::Left) => Self::Down,
            (Turn::Left, Self::Down) => Self::Right,
            (Turn::Left, Self::Right) => Self::Up,
            (Turn::Right, Self::Up) => Self::Right,
            (Turn::Right, Self::Right) => Self::Down,
            (Turn::Right, Self::Down) => Self::Left,
            (Turn::Right, Self::Left) => Self::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupant {
    Snake(SnakeId),
    Food(FoodId),
}

/// What a board query sees at a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
    Snake(SnakeId),
    Food(FoodId),
}

impl Cell {
    pub fn is_obstacle(self) -> bool {
        matches!(self, Self::Wall | Self::Snake(_))
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Option<Occupant>> for Cell {
    fn from(value: Option<Occupant>) -> Self {
        match value {
            None => Self::Empty,
            Some(Occupant::Snake(id)) => Self::Snake(id),
            Some(Occupant::Food(id)) => Self::Food(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnakeView {
    pub id: SnakeId,
    pub color: String,
    pub heading: Direction,
    pub path: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoodView {
    pub id: FoodId,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub snakes: Vec<SnakeView>,
    pub foods: Vec<FoodView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoodEaten {
    #[serde(rename = "snakeId")]
    pub snake_id: SnakeId,
    #[serde(rename = "foodId")]
    pub food_id: FoodId,
    pub at: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub died: Vec<SnakeId>,
    pub eaten: Vec<FoodEaten>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_left_turns_return_to_start() {
        let mut heading = Direction::Right;
        for _ in 0..4 {
            heading = heading.turned(Turn::Left);
        }
        assert_eq!(heading, Direction::Right);
        assert_eq!(Direction::Right.turned(Turn::Left), Direction::Up);
        assert_eq!(Direction::Right.turned(Turn::Right), Direction::Down);
    }

    #[test]
    fn left_then_right_cancels() {
        for heading in [Direction::Up, Direction::Right, Direction::Down, Direction::Left] {
            assert_eq!(heading.turned(Turn::Left).turned(Turn::Right), heading);
        }
    }

    #[test]
    fn only_walls_and_snakes_block() {
        assert!(Cell::Wall.is_obstacle());
        assert!(Cell::Snake(1).is_obstacle());
        assert!(!Cell::Food(0).is_obstacle());
        assert!(!Cell::Empty.is_obstacle());
    }
}
