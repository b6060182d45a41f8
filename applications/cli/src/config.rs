/// Application configuration
use crate::cli::Cli;
use crate::error::{CliError, Result};
use plexsync_engine::{ConflictPolicy, MatchConfig, SyncDirection, SyncItem, SyncOptions};
use plexsync_local::LocalCatalogConfig;
use plexsync_plex::PlexConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "plexsync.toml";

/// Rating history file used when `sync.state_file` is not set
pub const DEFAULT_STATE_FILE: &str = ".plexsync-state.json";

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_sync")]
    pub sync: SyncSettings,

    #[serde(default)]
    pub plex: PlexSettings,

    #[serde(default)]
    pub local: LocalSettings,

    #[serde(default)]
    pub matching: MatchConfig,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncSettings {
    #[serde(default)]
    pub dry_run: bool,

    /// Plex is the source of truth
    #[serde(default)]
    pub reverse: bool,

    #[serde(default = "default_items")]
    pub items: Vec<String>,

    #[serde(default = "default_conflicts")]
    pub conflicts: String,

    /// Ignore the rating history and propagate every rating
    #[serde(default)]
    pub full: bool,

    /// Where source ratings are remembered between runs
    #[serde(default)]
    pub state_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlexSettings {
    pub url: Option<String>,
    pub token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub section: Option<String>,
    pub client_identifier: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LocalSettings {
    pub music_dir: Option<PathBuf>,
    pub playlists_dir: Option<PathBuf>,
    /// Audio extensions to scan; the library default when unset
    pub extensions: Option<Vec<String>>,
}

/// How to authenticate against Plex
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlexCredentials {
    Token,
    Password { username: String, password: String },
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `plexsync.toml` in the working
    /// directory is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. PLEXSYNC_PLEX__TOKEN
        settings = settings.add_source(
            config::Environment::with_prefix("PLEXSYNC")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("sync.items")
                .with_list_parse_key("local.extensions")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Apply command line overrides
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.dry_run {
            self.sync.dry_run = true;
        }
        if cli.reverse {
            self.sync.reverse = true;
        }
        if cli.full {
            self.sync.full = true;
        }
        if let Some(items) = &cli.sync {
            self.sync.items.clone_from(items);
        }
        if let Some(conflicts) = &cli.conflicts {
            self.sync.conflicts.clone_from(conflicts);
        }
        if let Some(level) = &cli.log {
            self.log_level.clone_from(level);
        }

        override_with(&mut self.plex.url, &cli.server);
        override_with(&mut self.plex.token, &cli.token);
        override_with(&mut self.plex.username, &cli.username);
        override_with(&mut self.plex.password, &cli.password);
        override_with(&mut self.plex.section, &cli.section);
        override_with(&mut self.local.music_dir, &cli.music_dir);
        override_with(&mut self.local.playlists_dir, &cli.playlists_dir);

        if let Some(min_score) = cli.min_score {
            self.matching.min_score = min_score;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(CliError::Config(format!(
                "Invalid log level '{}' (expected one of: {})",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        match &self.local.music_dir {
            None => {
                return Err(CliError::Config(
                    "Music directory is required (set --music-dir or local.music_dir)".to_string(),
                ))
            }
            Some(dir) if !dir.is_dir() => {
                return Err(CliError::Config(format!(
                    "Music directory not found at {:?}",
                    dir
                )))
            }
            Some(_) => {}
        }

        if let Some(dir) = &self.local.playlists_dir {
            if !dir.is_dir() {
                return Err(CliError::Config(format!(
                    "Playlist directory not found at {:?}",
                    dir
                )));
            }
        }

        if self.plex.url.as_deref().map_or(true, str::is_empty) {
            return Err(CliError::Config(
                "Plex server URL is required (set --server or plex.url)".to_string(),
            ));
        }
        self.plex_credentials()?;

        self.sync_options()?;
        self.matching.validate()?;

        Ok(())
    }

    /// Resolved engine options
    pub fn sync_options(&self) -> Result<SyncOptions> {
        Ok(SyncOptions {
            dry_run: self.sync.dry_run,
            direction: SyncDirection::from_reverse(self.sync.reverse),
            sync_items: SyncItem::parse_list(&self.sync.items)?,
            conflict_policy: self.sync.conflicts.parse::<ConflictPolicy>()?,
        })
    }

    /// A token wins over username and password
    pub fn plex_credentials(&self) -> Result<PlexCredentials> {
        if self.plex.token.as_deref().is_some_and(|token| !token.is_empty()) {
            return Ok(PlexCredentials::Token);
        }

        match (&self.plex.username, &self.plex.password) {
            (Some(username), Some(password)) => Ok(PlexCredentials::Password {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => Err(CliError::Config(
                "Plex token, or username and password, are required".to_string(),
            )),
        }
    }

    pub fn state_file(&self) -> PathBuf {
        self.sync
            .state_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
    }

    pub fn plex_config(&self) -> PlexConfig {
        let mut config = PlexConfig::new(self.plex.url.clone().unwrap_or_default());
        if let Some(token) = &self.plex.token {
            config = config.with_token(token.clone());
        }
        if let Some(section) = &self.plex.section {
            config = config.with_section(section.clone());
        }
        if let Some(identifier) = &self.plex.client_identifier {
            config = config.with_client_identifier(identifier.clone());
        }
        config
    }

    pub fn local_config(&self) -> Result<LocalCatalogConfig> {
        let music_dir = self
            .local
            .music_dir
            .clone()
            .ok_or_else(|| CliError::Config("Music directory is required".to_string()))?;

        let mut config = LocalCatalogConfig::new(music_dir);
        if let Some(dir) = &self.local.playlists_dir {
            config = config.with_playlists_dir(dir.clone());
        }
        if let Some(extensions) = &self.local.extensions {
            config.extensions = extensions.iter().map(|ext| ext.to_lowercase()).collect();
        }
        Ok(config)
    }
}

fn override_with<T: Clone>(value: &mut Option<T>, flag: &Option<T>) {
    if flag.is_some() {
        value.clone_from(flag);
    }
}

// Default values
fn default_sync() -> SyncSettings {
    SyncSettings {
        dry_run: false,
        reverse: false,
        items: default_items(),
        conflicts: default_conflicts(),
        full: false,
        state_file: None,
    }
}

fn default_items() -> Vec<String> {
    vec!["tracks".to_string()]
}

fn default_conflicts() -> String {
    "source-wins".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sync: default_sync(),
            plex: PlexSettings::default(),
            local: LocalSettings::default(),
            matching: MatchConfig::default(),
            log_level: default_log_level(),
        }
    }
}
