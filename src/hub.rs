use crate::app::config::ServerConfig;
use crate::game::types::{SnakeId, Turn};
use crate::game::Game;
use crate::protocol::{self, ClientMessage, ServerMessage};
use crate::shared::color::sanitize_color;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{watch, Mutex};
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

mod session;

use session::SessionEntry;
pub use session::{LatestFrame, SessionIo, OUTBOUND_QUEUE_CAPACITY};

/// Boundary between the sockets and the simulation.
///
/// The game and all session bookkeeping sit behind one lock, so a tick never
/// interleaves with a spawn or a turn command.
#[derive(Debug)]
pub struct SessionHub {
  state: Mutex<HubState>,
  tick_period: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HubStats {
  pub sessions: usize,
  pub snakes: usize,
  pub tick: u64,
}

#[derive(Debug)]
struct HubState {
  game: Game,
  tick_rate: u32,
  sessions: HashMap<String, SessionEntry>,
  /// Which session steers each snake. Snakes of closed sessions drop out.
  controllers: HashMap<SnakeId, String>,
  next_seq: u64,
  spawn_count: usize,
}

impl SessionHub {
  pub fn new(config: &ServerConfig) -> Self {
    let mut game = Game::new(config.board_width, config.board_height, config.seed);
    game.spawn_foods(config.food_count);
    Self {
      state: Mutex::new(HubState::new(game, config.tick_rate)),
      tick_period: config.tick_period(),
    }
  }

  pub async fn add_session(&self) -> SessionIo {
    let (entry, outbound_rx, latest_state) = SessionEntry::open();
    let session_id = Uuid::new_v4().to_string();
    let mut state = self.state.lock().await;
    state.add_session(session_id.clone(), entry);
    SessionIo {
      session_id,
      outbound_rx,
      latest_state,
    }
  }

  pub async fn remove_session(&self, session_id: &str) {
    let mut state = self.state.lock().await;
    state.disconnect_session(session_id);
  }

  /// Returns false when the session is no longer registered.
  pub async fn handle_text_message(&self, session_id: &str, text: &str) -> bool {
    let Some(message) = protocol::decode_client_message(text) else {
      tracing::warn!(session_id, "ignoring malformed client message");
      return true;
    };
    let mut state = self.state.lock().await;
    state.handle_client_message(session_id, message)
  }

  /// One simulation step followed by its broadcast. Returns the tick sequence.
  pub async fn step(&self) -> u64 {
    let mut state = self.state.lock().await;
    state.step()
  }

  pub async fn stats(&self) -> HubStats {
    let state = self.state.lock().await;
    HubStats {
      sessions: state.sessions.len(),
      snakes: state.game.snake_count(),
      tick: state.next_seq,
    }
  }

  pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(self.tick_period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::info!(period = ?self.tick_period, "tick loop started");
    loop {
      tokio::select! {
        _ = interval.tick() => {
          self.step().await;
        }
        changed = shutdown.changed() => {
          if changed.is_err() || *shutdown.borrow() {
            break;
          }
        }
      }
    }
    tracing::info!("tick loop stopped");
  }
}

impl HubState {
  fn new(game: Game, tick_rate: u32) -> Self {
    Self {
      game,
      tick_rate,
      sessions: HashMap::new(),
      controllers: HashMap::new(),
      next_seq: 0,
      spawn_count: 0,
    }
  }

  fn add_session(&mut self, session_id: String, entry: SessionEntry) {
    let snapshot = self.game.snapshot();
    let init = ServerMessage::Init {
      session_id: &session_id,
      width: self.game.board().width(),
      height: self.game.board().height(),
      tick_rate: self.tick_rate,
      seq: self.next_seq,
      snakes: &snapshot.snakes,
      foods: &snapshot.foods,
    };
    if let Some(payload) = protocol::encode_server_message(&init) {
      let _ = entry.send(payload);
    }
    tracing::info!(session_id = %session_id, sessions = self.sessions.len() + 1, "session opened");
    self.sessions.insert(session_id, entry);
  }

  fn disconnect_session(&mut self, session_id: &str) {
    if self.sessions.remove(session_id).is_none() {
      return;
    }
    let before = self.controllers.len();
    self.controllers.retain(|_, owner| owner != session_id);
    tracing::info!(
      session_id,
      orphaned = before - self.controllers.len(),
      "session closed"
    );
  }

  fn handle_client_message(&mut self, session_id: &str, message: ClientMessage) -> bool {
    if !self.sessions.contains_key(session_id) {
      return false;
    }
    match message {
      ClientMessage::Spawn { color } => self.handle_spawn(session_id, color.as_deref()),
      ClientMessage::TurnLeft { id } => self.handle_turn(session_id, id, Turn::Left),
      ClientMessage::TurnRight { id } => self.handle_turn(session_id, id, Turn::Right),
    }
    true
  }

  fn handle_spawn(&mut self, session_id: &str, color: Option<&str>) {
    let color = sanitize_color(color, self.spawn_count);
    let Some(id) = self.game.spawn_snake(color.clone()) else {
      tracing::warn!(session_id, "board has no room for another snake");
      self.send_to(session_id, &ServerMessage::SpawnRejected);
      return;
    };
    self.spawn_count += 1;
    self.controllers.insert(id, session_id.to_string());
    tracing::info!(session_id, snake_id = id, color = %color, "snake spawned");
    self.broadcast(&ServerMessage::AddController { id, color: &color });
    self.send_to(session_id, &ServerMessage::Spawned { id });
  }

  fn handle_turn(&mut self, session_id: &str, id: SnakeId, turn: Turn) {
    if self.controllers.get(&id).map(String::as_str) != Some(session_id) {
      tracing::debug!(session_id, snake_id = id, "turn for a snake this session does not control");
      return;
    }
    if self.game.turn(id, turn) {
      self.broadcast(&ServerMessage::turn_echo(id, turn));
    }
  }

  fn step(&mut self) -> u64 {
    let report = self.game.tick();
    for id in &report.died {
      self.controllers.remove(id);
    }
    if !report.died.is_empty() {
      tracing::debug!(died = ?report.died, "snakes removed");
    }

    let seq = self.next_seq;
    self.next_seq += 1;
    self.broadcast(&ServerMessage::Tick { seq });
    let snapshot = self.game.snapshot();
    let update = ServerMessage::state(seq, &snapshot, &report.died);
    // snapshots bypass the queue: a slow reader only ever holds the newest one
    if let Some(payload) = protocol::encode_server_message(&update) {
      for entry in self.sessions.values() {
        entry.store_state(payload.clone());
      }
    }
    seq
  }

  fn send_to(&mut self, session_id: &str, message: &ServerMessage<'_>) {
    let Some(entry) = self.sessions.get(session_id) else { return };
    let Some(payload) = protocol::encode_server_message(message) else { return };
    if let Err(TrySendError::Full(_)) = entry.send(payload) {
      self.drop_stalled(&[session_id.to_string()]);
    }
  }

  /// Ordered frames go through each session's bounded queue; a session whose
  /// queue is full is closed.
  fn broadcast(&mut self, message: &ServerMessage<'_>) {
    let Some(payload) = protocol::encode_server_message(message) else { return };
    let mut stalled = Vec::new();
    for (session_id, entry) in &self.sessions {
      match entry.send(payload.clone()) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => stalled.push(session_id.clone()),
        Err(TrySendError::Closed(_)) => {
          tracing::trace!(session_id = %session_id, "dropping message for closing session");
        }
      }
    }
    self.drop_stalled(&stalled);
  }

  fn drop_stalled(&mut self, session_ids: &[String]) {
    for session_id in session_ids {
      tracing::warn!(session_id = %session_id, "session stopped reading, closing it");
      self.disconnect_session(session_id);
    }
  }
}
