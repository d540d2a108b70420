use std::path::PathBuf;
use std::time::Duration;

use gridquiz::config::{ConfigError, GameConfig, LaunchOptions, MAX_GRID_EDGE, MAX_WINDOW_EDGE};
use gridquiz::grid::{GridBounds, GridPosition};

// ── Defaults ─────────────────────────────────────────────────────────────────

#[test]
fn defaults_describe_the_stock_board() {
    let c = GameConfig::default();
    assert_eq!(c.bounds(), GridBounds::new(25, 19, 32));
    assert_eq!(c.start, GridPosition::new(12, 9));
    assert_eq!(c.cooldown(), Duration::from_millis(150));
    assert_eq!(c.spawn_margin, 3);
    assert_eq!(c.npc_count(), 3, "one NPC per stock challenge");
    assert_eq!(c.window_size(), (800, 608));
    assert!(c.validate().is_ok());
}

// ── JSON ─────────────────────────────────────────────────────────────────────

#[test]
fn empty_object_gives_defaults() {
    let c = GameConfig::from_json("{}").expect("empty config should parse");
    assert_eq!(c, GameConfig::default());
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let c = GameConfig::from_json(r#"{ "cooldown_ms": 90, "npc_count": 5, "start": {"x": 0, "y": 0} }"#)
        .expect("partial config should parse");
    assert_eq!(c.cooldown(), Duration::from_millis(90));
    assert_eq!(c.npc_count(), 5);
    assert_eq!(c.start, GridPosition::new(0, 0));
    assert_eq!(c.grid_width, 25);
}

#[test]
fn custom_challenges_replace_the_stock_set() {
    let c = GameConfig::from_json(r#"{ "challenges": [ {"text": "1 + 1 = ?", "answer": "2"} ] }"#)
        .expect("challenge list should parse");
    assert_eq!(c.challenges.len(), 1);
    assert_eq!(c.npc_count(), 1);
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(GameConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
}

#[test]
fn invalid_values_are_rejected() {
    for json in [
        r#"{ "grid_width": 0 }"#,
        r#"{ "tile_size": 0 }"#,
        r#"{ "start": {"x": 25, "y": 0} }"#,
        r#"{ "spawn_margin": 10 }"#,
        r#"{ "challenges": [] }"#,
        r#"{ "updates_per_second": 0 }"#,
    ] {
        assert!(
            matches!(GameConfig::from_json(json), Err(ConfigError::Invalid(_))),
            "{json} should be invalid"
        );
    }
}

#[test]
fn oversized_board_is_rejected_before_sizing_the_window() {
    let overflowing = r#"{ "grid_width": 200000, "grid_height": 19, "tile_size": 32768 }"#;
    assert!(
        matches!(GameConfig::from_json(overflowing), Err(ConfigError::Invalid(_))),
        "a board whose pixel width overflows u32 must not validate"
    );

    let too_many_cells = format!(r#"{{ "grid_width": {}, "tile_size": 1 }}"#, MAX_GRID_EDGE + 1);
    assert!(matches!(GameConfig::from_json(&too_many_cells), Err(ConfigError::Invalid(_))));

    let too_wide = r#"{ "grid_width": 100, "tile_size": 200 }"#;
    assert!(matches!(GameConfig::from_json(too_wide), Err(ConfigError::Invalid(_))));
}

#[test]
fn largest_allowed_board_validates() {
    let json = format!(
        r#"{{ "grid_width": {MAX_GRID_EDGE}, "grid_height": {MAX_GRID_EDGE}, "tile_size": {} }}"#,
        MAX_WINDOW_EDGE / MAX_GRID_EDGE
    );
    let c = GameConfig::from_json(&json).expect("board at the limits should validate");
    assert_eq!(c.window_size(), (MAX_WINDOW_EDGE, MAX_WINDOW_EDGE));
}

#[test]
fn pixel_size_saturates_instead_of_overflowing() {
    let huge = GridBounds::new(200_000, 19, 32_768);
    assert_eq!(huge.pixel_size(), (u32::MAX, 19 * 32_768));
}

#[test]
fn load_reads_file_and_reports_missing_path() {
    let dir = std::env::temp_dir().join(format!("gridquiz-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("board.json");
    std::fs::write(&path, r#"{ "title": "practice", "grid_width": 10, "grid_height": 10, "start": {"x": 5, "y": 5} }"#).unwrap();

    let c = GameConfig::load(&path).expect("config file should load");
    assert_eq!(c.title, "practice");
    assert_eq!(c.bounds(), GridBounds::new(10, 10, 32));

    let missing = dir.join("missing.json");
    assert!(matches!(GameConfig::load(&missing), Err(ConfigError::Io { .. })));

    std::fs::remove_dir_all(&dir).unwrap();
}

// ── Command line ─────────────────────────────────────────────────────────────

#[test]
fn no_arguments_means_defaults() {
    let opts = LaunchOptions::from_args(Vec::<String>::new()).unwrap();
    assert_eq!(opts, LaunchOptions::default());
    assert_eq!(opts.game_config().unwrap(), GameConfig::default());
}

#[test]
fn config_and_seed_flags_parse() {
    let opts = LaunchOptions::from_args(["--seed", "42", "--config", "board.json"]).unwrap();
    assert_eq!(opts.seed, Some(42));
    assert_eq!(opts.config, Some(PathBuf::from("board.json")));
}

#[test]
fn bad_flags_are_rejected() {
    for args in [vec!["--seed"], vec!["--seed", "abc"], vec!["--config"], vec!["--fast"]] {
        assert!(
            matches!(LaunchOptions::from_args(args.clone()), Err(ConfigError::Args(_))),
            "{args:?} should be rejected"
        );
    }
}
