use crate::game::types::{FoodView, GameSnapshot, SnakeId, SnakeView, Turn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
  #[serde(rename = "spawn")]
  Spawn { color: Option<String> },
  #[serde(rename = "turnLeft")]
  TurnLeft { id: SnakeId },
  #[serde(rename = "turnRight")]
  TurnRight { id: SnakeId },
}

pub fn decode_client_message(text: &str) -> Option<ClientMessage> {
  serde_json::from_str(text).ok()
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage<'a> {
  #[serde(rename = "init")]
  Init {
    #[serde(rename = "sessionId")]
    session_id: &'a str,
    width: i32,
    height: i32,
    #[serde(rename = "tickRate")]
    tick_rate: u32,
    seq: u64,
    snakes: &'a [SnakeView],
    foods: &'a [FoodView],
  },
  #[serde(rename = "tick")]
  Tick { seq: u64 },
  #[serde(rename = "state")]
  State {
    seq: u64,
    snakes: &'a [SnakeView],
    foods: &'a [FoodView],
    died: &'a [SnakeId],
  },
  #[serde(rename = "addController")]
  AddController { id: SnakeId, color: &'a str },
  #[serde(rename = "spawned")]
  Spawned { id: SnakeId },
  #[serde(rename = "spawnRejected")]
  SpawnRejected,
  #[serde(rename = "turnLeft")]
  TurnLeft { id: SnakeId },
  #[serde(rename = "turnRight")]
  TurnRight { id: SnakeId },
}

impl<'a> ServerMessage<'a> {
  pub fn turn_echo(id: SnakeId, turn: Turn) -> Self {
    match turn {
      Turn::Left => Self::TurnLeft { id },
      Turn::Right => Self::TurnRight { id },
    }
  }

  pub fn state(seq: u64, snapshot: &'a GameSnapshot, died: &'a [SnakeId]) -> Self {
    Self::State {
      seq,
      snakes: &snapshot.snakes,
      foods: &snapshot.foods,
      died,
    }
  }
}

pub fn encode_server_message(message: &ServerMessage<'_>) -> Option<String> {
  match serde_json::to_string(message) {
    Ok(text) => Some(text),
    Err(error) => {
      tracing::error!(?error, "failed to encode server message");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::{json, Value};

  #[test]
  fn decodes_spawn_with_and_without_color() {
    assert_eq!(
      decode_client_message(r##"{"type":"spawn","color":"#00ff00"}"##),
      Some(ClientMessage::Spawn {
        color: Some("#00ff00".to_string())
      })
    );
    assert_eq!(
      decode_client_message(r#"{"type":"spawn"}"#),
      Some(ClientMessage::Spawn { color: None })
    );
  }

  #[test]
  fn decodes_turns() {
    assert_eq!(
      decode_client_message(r#"{"type":"turnLeft","id":4}"#),
      Some(ClientMessage::TurnLeft { id: 4 })
    );
    assert_eq!(
      decode_client_message(r#"{"type":"turnRight","id":9}"#),
      Some(ClientMessage::TurnRight { id: 9 })
    );
  }

  #[test]
  fn rejects_garbage() {
    assert_eq!(decode_client_message("not json"), None);
    assert_eq!(decode_client_message(r#"{"type":"fly"}"#), None);
    assert_eq!(decode_client_message(r#"{"type":"turnLeft"}"#), None);
    assert_eq!(decode_client_message(r#"{"type":"turnLeft","id":-1}"#), None);
  }

  #[test]
  fn encodes_tagged_messages() {
    let text = encode_server_message(&ServerMessage::Tick { seq: 7 }).unwrap();
    assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), json!({"type": "tick", "seq": 7}));

    let text = encode_server_message(&ServerMessage::AddController {
      id: 2,
      color: "#fff",
    })
    .unwrap();
    assert_eq!(
      serde_json::from_str::<Value>(&text).unwrap(),
      json!({"type": "addController", "id": 2, "color": "#fff"})
    );

    let text = encode_server_message(&ServerMessage::turn_echo(5, Turn::Right)).unwrap();
    assert_eq!(
      serde_json::from_str::<Value>(&text).unwrap(),
      json!({"type": "turnRight", "id": 5})
    );
  }
}
