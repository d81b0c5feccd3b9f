//! Tests for config loading and the stored board shape.

use std::io::Write;

use tictac_engine::{Board, Cell, EngineConfig, Game, StrategyKind, Symbol};

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
default_size = 4
max_size = 8
bot_handle = "house"
bot_strategy = "first-available"
seed = 7
"#
    )
    .expect("write config");

    let config = EngineConfig::from_file(file.path()).expect("load config");

    assert_eq!(*config.default_size(), 4);
    assert_eq!(*config.min_size(), 1);
    assert_eq!(*config.max_size(), 8);
    assert_eq!(config.bot_handle(), "house");
    assert_eq!(*config.bot_strategy(), StrategyKind::FirstAvailable);
    assert_eq!(*config.seed(), Some(7));
}

#[test]
fn test_config_missing_file_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = EngineConfig::from_file(dir.path().join("absent.toml")).expect_err("no file");
    assert!(err.message.contains("Failed to read"));
}

#[test]
fn test_config_rejects_blank_bot_handle() {
    let err = EngineConfig::from_toml("bot_handle = \"  \"").expect_err("blank handle");
    assert_eq!(err.field, Some("bot_handle"));
}

#[test]
fn test_board_serializes_as_rows_of_strings() {
    let board: Board = serde_json::from_str(r#"[["","X",""],["","O",""],["","",""]]"#)
        .expect("square board");

    assert_eq!(board.size(), 3);
    assert_eq!(board.rows()[0][1], Cell::Occupied(Symbol::X));
    assert_eq!(board.rows()[1][1], Cell::Occupied(Symbol::O));
    assert_eq!(
        serde_json::to_string(&board).expect("serialize"),
        r#"[["","X",""],["","O",""],["","",""]]"#
    );
    assert_eq!(board.display(), ".|X|.\n-+-+-\n.|O|.\n-+-+-\n.|.|.");
}

#[test]
fn test_board_rejects_bad_shapes() {
    assert!(serde_json::from_str::<Board>(r#"[["",""],[""]]"#).is_err());
    assert!(serde_json::from_str::<Board>(r#"[["","",""]]"#).is_err());
    assert!(serde_json::from_str::<Board>(r#"[["Z"]]"#).is_err());
}

#[test]
fn test_game_status_stored_in_snake_case() {
    let json = r#"{
        "id": 9,
        "players": [1, 2],
        "multiplayer": true,
        "board": [["X",""],["","O"]],
        "status": "in_progress",
        "winner": null,
        "created_at": "2024-01-01T00:00:00Z"
    }"#;
    let game: Game = serde_json::from_str(json).expect("deserialize game");
    assert_eq!(game.size(), 2);
    assert_eq!(game.status().to_string(), "in_progress");

    let value = serde_json::to_value(&game).expect("serialize game");
    assert_eq!(value["status"], "in_progress");
    assert_eq!(value["board"][0][0], "X");
}
