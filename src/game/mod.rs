pub mod board;
pub mod constants;
pub mod food;
pub mod snake;
pub mod state;
pub mod types;

pub use state::Game;
