/// Command line arguments
use clap::Parser;
use std::path::PathBuf;

/// Every flag overrides the matching configuration value.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "plexsync")]
#[command(version, about = "Synchronize ratings and playlists between a local music library and Plex", long_about = None)]
pub struct Cli {
    /// Configuration file (default: plexsync.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show what would change without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Use the Plex server as the source of truth
    #[arg(short, long)]
    pub reverse: bool,

    /// Propagate every rating, not only those changed since the last run
    #[arg(long)]
    pub full: bool,

    /// What to synchronize: tracks, playlists
    #[arg(long, num_args = 1.., value_name = "ITEM")]
    pub sync: Option<Vec<String>>,

    /// Rating conflict policy: source-wins, preserve-target
    #[arg(long, value_name = "POLICY")]
    pub conflicts: Option<String>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Plex server URL
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// Plex token
    #[arg(long)]
    pub token: Option<String>,

    /// plex.tv username, used when no token is configured
    #[arg(short, long)]
    pub username: Option<String>,

    /// plex.tv password
    #[arg(short, long)]
    pub password: Option<String>,

    /// Plex music library, by title or key
    #[arg(long)]
    pub section: Option<String>,

    /// Root of the local music library
    #[arg(long, value_name = "DIR")]
    pub music_dir: Option<PathBuf>,

    /// Directory holding local M3U playlists
    #[arg(long, value_name = "DIR")]
    pub playlists_dir: Option<PathBuf>,

    /// Minimum match score (0-100)
    #[arg(long, value_name = "SCORE")]
    pub min_score: Option<f64>,
}
