use super::board::Board;
use super::constants::MAX_SPAWN_ATTEMPTS;
use super::food::Food;
use super::snake::{MoveOutcome, Snake};
use super::types::{
  Direction, FoodEaten, FoodId, GameSnapshot, Position, SnakeId, TickReport, Turn,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Authoritative world: one board, the live snakes and the food.
///
/// Snakes are keyed by id and ids only grow, so map order is spawn order.
/// `tick` resolves snakes one after another in that order: the first snake
/// to claim a cell keeps it and any later snake heading there dies.
#[derive(Debug)]
pub struct Game {
  board: Board,
  snakes: BTreeMap<SnakeId, Snake>,
  foods: Vec<Food>,
  next_snake_id: SnakeId,
  tick_count: u64,
  rng: StdRng,
}

impl Game {
  pub fn new(width: i32, height: i32, seed: u64) -> Self {
    Self {
      board: Board::new(width, height),
      snakes: BTreeMap::new(),
      foods: Vec::new(),
      next_snake_id: 1,
      tick_count: 0,
      rng: StdRng::seed_from_u64(seed),
    }
  }

  pub fn board(&self) -> &Board {
    &self.board
  }

  pub fn tick_count(&self) -> u64 {
    self.tick_count
  }

  pub fn snake(&self, id: SnakeId) -> Option<&Snake> {
    self.snakes.get(&id)
  }

  pub fn snakes(&self) -> impl Iterator<Item = &Snake> {
    self.snakes.values()
  }

  pub fn snake_count(&self) -> usize {
    self.snakes.len()
  }

  pub fn foods(&self) -> &[Food] {
    &self.foods
  }

  /// Spawns a right-facing snake on a random cell whose right-hand neighbour
  /// is also free, falling back to the first such cell in row-major order.
  pub fn spawn_snake(&mut self, color: String) -> Option<SnakeId> {
    let heading = Direction::Right;
    let start = self.pick_spawn_cell(heading)?;
    self.spawn_snake_at(color, start, heading)
  }

  /// Places a snake on `start` and performs its first move right away.
  pub fn spawn_snake_at(
    &mut self,
    color: String,
    start: Position,
    heading: Direction,
  ) -> Option<SnakeId> {
    if !self.board.is_free(start) {
      return None;
    }
    let id = self.next_snake_id;
    self.next_snake_id += 1;

    let mut snake = Snake::new(id, color, start, heading, &mut self.board);
    let outcome = snake.advance(&mut self.board);
    let head = snake.head();
    self.snakes.insert(id, snake);

    match outcome {
      MoveOutcome::Ate(food_id) => self.relocate_food(food_id),
      MoveOutcome::Blocked => {
        tracing::debug!(snake_id = id, ?start, "snake blocked on its first move");
      }
      _ => {}
    }
    tracing::debug!(snake_id = id, ?head, ?heading, "snake spawned");
    Some(id)
  }

  pub fn spawn_foods(&mut self, count: usize) {
    for _ in 0..count {
      match pick_free_cell(&self.board, &mut self.rng) {
        Some(pos) => {
          self.place_food_at(pos);
        }
        None => {
          tracing::warn!("no free cell for new food, parking it");
          self.foods.push(Food::new(self.foods.len()));
        }
      }
    }
  }

  pub fn place_food_at(&mut self, pos: Position) -> Option<FoodId> {
    if !self.board.is_free(pos) {
      return None;
    }
    let id = self.foods.len();
    let mut food = Food::new(id);
    food.update_position(&mut self.board, pos);
    self.foods.push(food);
    Some(id)
  }

  pub fn tick(&mut self) -> TickReport {
    let mut report = TickReport::default();

    let order: Vec<SnakeId> = self.snakes.keys().copied().collect();
    for id in order {
      let Some(snake) = self.snakes.get_mut(&id) else { continue };
      match snake.advance(&mut self.board) {
        MoveOutcome::Ate(food_id) => {
          if let Some(at) = snake.head() {
            report.eaten.push(FoodEaten {
              snake_id: id,
              food_id,
              at,
            });
          }
          self.relocate_food(food_id);
        }
        MoveOutcome::Blocked => {
          tracing::debug!(snake_id = id, tick = self.tick_count, "snake collided");
        }
        MoveOutcome::Moved | MoveOutcome::Idle => {}
      }
    }

    report.died = self
      .snakes
      .values()
      .filter(|snake| !snake.is_alive())
      .map(Snake::id)
      .collect();
    for id in &report.died {
      if let Some(mut snake) = self.snakes.remove(id) {
        snake.release_all(&mut self.board);
      }
    }

    self.place_parked_foods();
    self.tick_count += 1;
    report
  }

  /// Returns false when the snake is unknown or already dead.
  pub fn turn(&mut self, id: SnakeId, turn: Turn) -> bool {
    match self.snakes.get_mut(&id) {
      Some(snake) if snake.is_alive() => {
        snake.turn(turn);
        true
      }
      _ => false,
    }
  }

  pub fn turn_left(&mut self, id: SnakeId) -> bool {
    self.turn(id, Turn::Left)
  }

  pub fn turn_right(&mut self, id: SnakeId) -> bool {
    self.turn(id, Turn::Right)
  }

  pub fn snapshot(&self) -> GameSnapshot {
    GameSnapshot {
      snakes: self
        .snakes
        .values()
        .filter(|snake| snake.is_alive())
        .map(Snake::view)
        .collect(),
      foods: self.foods.iter().filter_map(Food::view).collect(),
    }
  }

  fn pick_spawn_cell(&mut self, heading: Direction) -> Option<Position> {
    let spawnable =
      |board: &Board, pos: Position| board.is_free(pos) && board.is_free(pos.step(heading));
    for _ in 0..MAX_SPAWN_ATTEMPTS {
      let candidate = random_position(&self.board, &mut self.rng)?;
      if spawnable(&self.board, candidate) {
        return Some(candidate);
      }
    }
    let board = &self.board;
    board.free_cells().find(|pos| spawnable(board, *pos))
  }

  fn relocate_food(&mut self, food_id: FoodId) {
    let Some(food) = self.foods.get_mut(food_id) else { return };
    match pick_free_cell(&self.board, &mut self.rng) {
      Some(pos) => food.update_position(&mut self.board, pos),
      None => {
        tracing::warn!(food_id, "board is full, parking eaten food");
        food.unplace(&mut self.board);
      }
    }
  }

  fn place_parked_foods(&mut self) {
    for food in self.foods.iter_mut().filter(|food| food.position().is_none()) {
      let Some(pos) = pick_free_cell(&self.board, &mut self.rng) else { break };
      food.update_position(&mut self.board, pos);
    }
  }
}

fn random_position(board: &Board, rng: &mut StdRng) -> Option<Position> {
  if board.cell_count() == 0 {
    return None;
  }
  Some(Position::new(
    rng.gen_range(0..board.width()),
    rng.gen_range(0..board.height()),
  ))
}

fn pick_free_cell(board: &Board, rng: &mut StdRng) -> Option<Position> {
  for _ in 0..MAX_SPAWN_ATTEMPTS {
    let candidate = random_position(board, rng)?;
    if board.is_free(candidate) {
      return Some(candidate);
    }
  }
  let free: Vec<Position> = board.free_cells().collect();
  free.choose(rng).copied()
}
