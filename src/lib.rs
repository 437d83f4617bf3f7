//! Authoritative server for a multiplayer grid snake game.
//!
//! [`game`] holds the deterministic simulation: a dense [`game::board::Board`]
//! of claimed cells, the snakes and food that move across it, and
//! [`game::Game`] which advances everything once per tick. [`hub`] connects
//! that simulation to remote sessions and drives the fixed-rate loop;
//! [`transport`] pumps WebSocket frames in and out of the hub.

pub mod app;
pub mod game;
pub mod hub;
pub mod protocol;
pub mod shared;
pub mod transport;
