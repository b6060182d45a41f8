//! Configuration file loading tests

use plexsync_cli::{AppConfig, Cli, CliError};
use plexsync_engine::{ConflictPolicy, SyncDirection, SyncItem};
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("plexsync.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_full_file() {
    let dir = TempDir::new().unwrap();
    let music = dir.path().join("music");
    fs::create_dir(&music).unwrap();

    let path = write_config(
        &dir,
        &format!(
            r#"
log_level = "debug"

[sync]
reverse = true
items = ["tracks", "playlists"]
conflicts = "preserve-target"
full = true
state_file = "state/ratings.json"

[plex]
url = "http://plex.local:32400"
token = "abc123"
section = "Music"

[local]
music_dir = "{}"
extensions = ["MP3", "flac"]

[matching]
min_score = 80.0
"#,
            music.display()
        ),
    );

    let config = AppConfig::load(Some(path.as_path())).unwrap();
    config.validate().unwrap();

    let options = config.sync_options().unwrap();
    assert_eq!(options.direction, SyncDirection::RemoteToLocal);
    assert!(options.syncs(SyncItem::Tracks));
    assert!(options.syncs(SyncItem::Playlists));
    assert_eq!(options.conflict_policy, ConflictPolicy::PreserveTarget);

    assert_eq!(config.log_level, "debug");
    assert!(config.sync.full);
    assert_eq!(config.state_file(), std::path::PathBuf::from("state/ratings.json"));
    assert_eq!(config.plex_config().section.as_deref(), Some("Music"));
    // Unset matching fields keep their defaults
    assert_eq!(config.matching.min_score, 80.0);
    assert_eq!(config.matching.title_weight, 0.6);

    let local = config.local_config().unwrap();
    assert_eq!(local.music_dir, music);
    assert_eq!(local.extensions, vec!["mp3".to_string(), "flac".to_string()]);
}

#[test]
fn test_load_minimal_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[plex]\nurl = \"http://plex.local:32400\"\n");

    let config = AppConfig::load(Some(path.as_path())).unwrap();

    assert_eq!(config.sync.items, vec!["tracks".to_string()]);
    assert_eq!(config.sync.conflicts, "source-wins");
    assert!(!config.sync.dry_run);
    assert!(config.local.music_dir.is_none());
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = AppConfig::load(Some(dir.path().join("absent.toml").as_path()));

    assert!(matches!(result, Err(CliError::Config(_))));
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[sync\nitems = ");

    assert!(matches!(AppConfig::load(Some(path.as_path())), Err(CliError::Config(_))));
}

#[test]
fn test_cli_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "[sync]\nconflicts = \"preserve-target\"\n\n[plex]\nurl = \"http://a:32400\"\n",
    );

    let mut config = AppConfig::load(Some(path.as_path())).unwrap();
    config.apply_cli(&Cli {
        conflicts: Some("source-wins".to_string()),
        server: Some("http://b:32400".to_string()),
        ..Cli::default()
    });

    assert_eq!(
        config.sync_options().unwrap().conflict_policy,
        ConflictPolicy::SourceWins
    );
    assert_eq!(config.plex.url.as_deref(), Some("http://b:32400"));
}

#[test]
fn test_validate_reports_missing_music_dir() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        &format!(
            "[plex]\nurl = \"http://a:32400\"\ntoken = \"t\"\n\n[local]\nmusic_dir = \"{}\"\n",
            dir.path().join("nowhere").display()
        ),
    );

    let config = AppConfig::load(Some(path.as_path())).unwrap();
    match config.validate() {
        Err(CliError::Config(msg)) => assert!(msg.contains("Music directory")),
        other => panic!("Expected config error, got {other:?}"),
    }
}
