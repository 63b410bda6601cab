//! Protocol tests - room output encoded for the wire

use serde_json::Value;

use royale_tetris::adapter::{decode_client, encode, event_message, state_message, ClientMessage};
use royale_tetris::room::{Room, RoomConfig};
use royale_tetris::types::{Difficulty, PlayerId, RoomId};

fn encode_value(message: &royale_tetris::adapter::ServerMessage) -> Value {
    serde_json::from_str(&encode(message).unwrap()).unwrap()
}

#[test]
fn test_every_event_encodes_with_type_tag() {
    let mut room = Room::new(RoomId::from("wire"), RoomConfig::with_seed(13));
    room.add_bot(PlayerId::from("a"), "A", Difficulty::High).unwrap();
    room.add_bot(PlayerId::from("b"), "B", Difficulty::High).unwrap();
    room.start();
    room.advance(5_000);
    room.simulate_attack(&PlayerId::from("a"), 2);

    let events = room.drain_events();
    assert!(!events.is_empty());
    for event in &events {
        let message = event_message(event);
        let value = encode_value(&message);
        assert_eq!(value["type"], message.kind());
    }
}

#[test]
fn test_game_state_lists_every_player() {
    let mut room = Room::new(RoomId::from("wire"), RoomConfig::with_seed(1));
    room.add_player(PlayerId::from("human"), "Brave Wolf").unwrap();
    room.add_bot(PlayerId::from("bot"), "Cool Hawk", Difficulty::Low).unwrap();

    let value = encode_value(&state_message(&room.snapshot()));
    let players = value["players"].as_object().unwrap();
    assert_eq!(players.len(), 2);
    assert_eq!(players["human"]["nickname"], "Brave Wolf");
    assert_eq!(players["bot"]["nickname"], "Cool Hawk");
    for player in players.values() {
        let board = &player["board"];
        let grid = board["grid"].as_array().unwrap();
        assert_eq!(grid.len(), 20);
        assert!(grid.iter().all(|row| row.as_array().unwrap().len() == 10));
        assert!(board["currentPiece"]["type"].is_string());
        assert!(player["targetedBy"].is_array());
    }
}

#[test]
fn test_client_input_round_trips_into_room() {
    let mut room = Room::new(RoomId::from("wire"), RoomConfig::with_seed(1));
    room.add_player(PlayerId::from("p"), "P").unwrap();

    let message = decode_client(r#"{"type":"input","action":"hardDrop"}"#).unwrap();
    let ClientMessage::Input(input) = message else {
        panic!("expected input, got {message:?}");
    };
    room.handle_raw_input(&PlayerId::from("p"), &input.action).unwrap();

    let events = room.drain_events();
    assert_eq!(events.len(), 1);
    let value = encode_value(&event_message(&events[0]));
    assert_eq!(value["type"], "playerAction");
    assert_eq!(value["playerId"], "p");
    assert_eq!(value["action"], "hardDrop");
    assert_eq!(value["data"]["y"].as_i64().map(|y| y > 10), Some(true));
}
