//! Protocol module - JSON messages exchanged with browser clients
//!
//! Every message is an object with a `type` tag; payload fields are camelCase.
//! Room events map one-to-one onto outbound messages, see [`event_message`].

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use royale_core::{ActiveSnapshot, BoardSnapshot};
use royale_room::{PlayerView, RoomEvent};

use crate::store::LeaderboardEntry;

// ============== Client -> Server Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameMessage {
    pub room_id: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

/// Raw action string; parsed case-exactly by the room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMessage {
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    JoinGame(JoinGameMessage),
    Input(InputMessage),
    RestartGame,
    Leave,
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitMessage {
    pub id: String,
    pub room_id: String,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackMessage {
    pub attacker_id: String,
    pub target_id: String,
    pub lines: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropData {
    pub x: i8,
    pub y: i8,
    #[serde(rename = "type")]
    pub kind: String,
    pub rotation: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerActionMessage {
    pub player_id: String,
    pub action: String,
    pub data: DropData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverMessage {
    pub player_id: String,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameWinnerMessage {
    pub winner_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceState {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: i8,
    pub y: i8,
    pub rotation: u8,
}

impl From<ActiveSnapshot> for PieceState {
    fn from(value: ActiveSnapshot) -> Self {
        Self {
            kind: value.kind.as_str().to_string(),
            x: value.column,
            y: value.row,
            rotation: value.rotation.index(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    /// Rows top to bottom, cell values 0..=8
    pub grid: Vec<Vec<u8>>,
    pub current_piece: Option<PieceState>,
    pub next_pieces: Vec<String>,
    pub hold_piece: Option<String>,
    pub is_game_over: bool,
    pub garbage_buffer: u32,
}

impl From<&BoardSnapshot> for BoardState {
    fn from(value: &BoardSnapshot) -> Self {
        Self {
            grid: value.grid.iter().map(|row| row.to_vec()).collect(),
            current_piece: value.active.map(PieceState::from),
            next_pieces: value.next.iter().map(|k| k.as_str().to_string()).collect(),
            hold_piece: value.hold.map(|k| k.as_str().to_string()),
            is_game_over: value.game_over,
            garbage_buffer: value.pending_garbage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub nickname: String,
    pub board: BoardState,
    pub target_id: Option<String>,
    pub badges: u32,
    pub ko_count: u32,
    pub targeted_by: Vec<String>,
    pub targeting_mode: String,
}

impl From<&PlayerView> for PlayerState {
    fn from(view: &PlayerView) -> Self {
        Self {
            nickname: view.name.clone(),
            board: BoardState::from(&view.board),
            target_id: view.target.as_ref().map(|t| t.as_str().to_string()),
            badges: view.badges,
            ko_count: view.kos,
            targeted_by: view
                .targeted_by
                .iter()
                .map(|id| id.as_str().to_string())
                .collect(),
            targeting_mode: view.mode.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateMessage {
    pub players: BTreeMap<String, PlayerState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardMessage {
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    Init(InitMessage),
    Attack(AttackMessage),
    PlayerAction(PlayerActionMessage),
    GameOver(GameOverMessage),
    GameWinner(GameWinnerMessage),
    GameRestarted,
    GameState(GameStateMessage),
    Leaderboard(LeaderboardMessage),
}

impl ServerMessage {
    /// Value of the `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::Init(_) => "init",
            ServerMessage::Attack(_) => "attack",
            ServerMessage::PlayerAction(_) => "playerAction",
            ServerMessage::GameOver(_) => "gameOver",
            ServerMessage::GameWinner(_) => "gameWinner",
            ServerMessage::GameRestarted => "gameRestarted",
            ServerMessage::GameState(_) => "gameState",
            ServerMessage::Leaderboard(_) => "leaderboard",
        }
    }
}

/// Wire form of a room event
pub fn event_message(event: &RoomEvent) -> ServerMessage {
    match event {
        RoomEvent::Attack {
            attacker,
            target,
            lines,
        } => ServerMessage::Attack(AttackMessage {
            attacker_id: attacker.as_str().to_string(),
            target_id: target.as_str().to_string(),
            lines: *lines,
        }),
        RoomEvent::HardDrop { player, drop } => ServerMessage::PlayerAction(PlayerActionMessage {
            player_id: player.as_str().to_string(),
            action: "hardDrop".to_string(),
            data: DropData {
                x: drop.column,
                y: drop.row,
                kind: drop.kind.as_str().to_string(),
                rotation: drop.rotation.index(),
            },
        }),
        RoomEvent::Eliminated { player, rank, .. } => ServerMessage::GameOver(GameOverMessage {
            player_id: player.as_str().to_string(),
            rank: *rank,
        }),
        RoomEvent::Winner { winner } => ServerMessage::GameWinner(GameWinnerMessage {
            winner_id: Some(winner.as_str().to_string()),
        }),
        RoomEvent::NoSurvivors => ServerMessage::GameWinner(GameWinnerMessage { winner_id: None }),
        RoomEvent::Restarted => ServerMessage::GameRestarted,
    }
}

/// `gameState` message for a room snapshot
pub fn state_message(views: &[PlayerView]) -> ServerMessage {
    let players = views
        .iter()
        .map(|view| (view.id.as_str().to_string(), PlayerState::from(view)))
        .collect();
    ServerMessage::GameState(GameStateMessage { players })
}

pub fn encode(message: &ServerMessage) -> Result<String> {
    serde_json::to_string(message).context("failed to encode server message")
}

pub fn decode_client(line: &str) -> Result<ClientMessage> {
    serde_json::from_str(line.trim()).with_context(|| format!("invalid client message: {line}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use royale_core::{Board, DropInfo};
    use royale_room::PlayerAgent;
    use royale_types::{PieceKind, PlayerId, Rotation};
    use serde_json::{json, Value};

    fn to_value(message: &ServerMessage) -> Value {
        serde_json::from_str(&encode(message).unwrap()).unwrap()
    }

    #[test]
    fn attack_event_shape() {
        let msg = event_message(&RoomEvent::Attack {
            attacker: PlayerId::from("a"),
            target: PlayerId::from("b"),
            lines: 4,
        });
        assert_eq!(
            to_value(&msg),
            json!({"type": "attack", "attackerId": "a", "targetId": "b", "lines": 4})
        );
    }

    #[test]
    fn hard_drop_becomes_player_action() {
        let msg = event_message(&RoomEvent::HardDrop {
            player: PlayerId::from("p"),
            drop: DropInfo {
                kind: PieceKind::T,
                column: 4,
                row: 18,
                rotation: Rotation::East,
            },
        });
        assert_eq!(
            to_value(&msg),
            json!({
                "type": "playerAction",
                "playerId": "p",
                "action": "hardDrop",
                "data": {"x": 4, "y": 18, "type": "T", "rotation": 1}
            })
        );
    }

    #[test]
    fn no_survivors_has_null_winner() {
        let msg = event_message(&RoomEvent::NoSurvivors);
        assert_eq!(to_value(&msg), json!({"type": "gameWinner", "winnerId": null}));
        let msg = event_message(&RoomEvent::Winner {
            winner: PlayerId::from("w"),
        });
        assert_eq!(to_value(&msg), json!({"type": "gameWinner", "winnerId": "w"}));
    }

    #[test]
    fn eliminated_becomes_game_over() {
        let msg = event_message(&RoomEvent::Eliminated {
            player: PlayerId::from("x"),
            rank: 3,
            killer: None,
        });
        assert_eq!(msg.kind(), "gameOver");
        assert_eq!(to_value(&msg), json!({"type": "gameOver", "playerId": "x", "rank": 3}));
        assert_eq!(
            to_value(&event_message(&RoomEvent::Restarted)),
            json!({"type": "gameRestarted"})
        );
    }

    #[test]
    fn game_state_carries_board_fields() {
        let agent = PlayerAgent::new(PlayerId::from("p1"), "Swift Fox", Board::with_seed(3));
        let msg = state_message(&[agent.view(false)]);
        let value = to_value(&msg);

        assert_eq!(value["type"], "gameState");
        let player = &value["players"]["p1"];
        assert_eq!(player["nickname"], "Swift Fox");
        assert_eq!(player["badges"], 0);
        assert_eq!(player["koCount"], 0);
        assert_eq!(player["targetingMode"], "Random");
        assert_eq!(player["targetId"], Value::Null);
        let board = &player["board"];
        assert_eq!(board["grid"].as_array().unwrap().len(), 20);
        assert_eq!(board["grid"][0].as_array().unwrap().len(), 10);
        assert_eq!(board["nextPieces"].as_array().unwrap().len(), 6);
        assert_eq!(board["isGameOver"], false);
        assert_eq!(board["garbageBuffer"], 0);
        assert_eq!(board["currentPiece"]["x"], 3);
        assert_eq!(board["currentPiece"]["y"], 0);
        assert_eq!(board["holdPiece"], Value::Null);
    }

    #[test]
    fn decodes_client_messages() {
        let join = decode_client(r#"{"type":"joinGame","roomId":"r1","nickname":"ann"}"#).unwrap();
        assert_eq!(
            join,
            ClientMessage::JoinGame(JoinGameMessage {
                room_id: "r1".to_string(),
                nickname: Some("ann".to_string()),
            })
        );
        let join = decode_client(r#"{"type":"joinGame","roomId":"r1"}"#).unwrap();
        assert!(matches!(join, ClientMessage::JoinGame(JoinGameMessage { nickname: None, .. })));

        let input = decode_client(r#"{"type":"input","action":"hardDrop"}"#).unwrap();
        assert_eq!(
            input,
            ClientMessage::Input(InputMessage {
                action: "hardDrop".to_string()
            })
        );
        assert_eq!(
            decode_client(r#"{"type":"restartGame"}"#).unwrap(),
            ClientMessage::RestartGame
        );
        assert!(decode_client(r#"{"type":"bogus"}"#).is_err());
        assert!(decode_client("not json").is_err());
    }
}
