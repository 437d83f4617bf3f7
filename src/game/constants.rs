pub const DEFAULT_BOARD_WIDTH: i32 = 50;
pub const DEFAULT_BOARD_HEIGHT: i32 = 50;
pub const MIN_BOARD_SIDE: i32 = 3;
/// Upper bound for the dense grid; bigger worlds need partitioning.
pub const MAX_BOARD_CELLS: usize = 1 << 20;
pub const DEFAULT_TICK_RATE: u32 = 15;
pub const DEFAULT_FOOD_COUNT: usize = 1;
pub const MAX_SPAWN_ATTEMPTS: usize = 32;
/// Path length below which a non-eating move does not drop the tail.
pub const MIN_TRAILING_LENGTH: usize = 2;

pub const COLOR_POOL: [&str; 8] = [
  "#ff6b6b",
  "#ffd166",
  "#06d6a0",
  "#4dabf7",
  "#f06595",
  "#845ef7",
  "#20c997",
  "#fcc419",
];
