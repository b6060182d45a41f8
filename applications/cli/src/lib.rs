//! PlexSync command line application
//!
//! Loads configuration, opens the local library and the Plex server, runs one sync and
//! prints a summary. Source ratings are remembered in a state file so the next run only
//! propagates ratings that changed, unless `--full` is given.

pub mod cli;
pub mod config;
pub mod error;
pub mod state;
pub mod summary;

pub use cli::Cli;
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use state::SyncState;
