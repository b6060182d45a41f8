/// PlexSync - synchronize ratings and playlists between a local library and Plex
use anyhow::{anyhow, Context};
use clap::Parser;
use plexsync_cli::config::PlexCredentials;
use plexsync_cli::{summary, AppConfig, Cli, SyncState};
use plexsync_engine::SyncManager;
use plexsync_local::LocalCatalog;
use plexsync_plex::PlexCatalog;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);
    config.validate()?;

    // Initialize tracing; RUST_LOG wins over the configured level
    let level = config.log_level.to_lowercase();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "warn,plexsync={level},plexsync_cli={level},plexsync_engine={level},plexsync_local={level},plexsync_plex={level}"
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let options = config.sync_options()?;
    let mut manager = SyncManager::new(options.clone(), config.matching.clone())?;

    // A state file that cannot be read means a full run
    let state_path = config.state_file();
    let mut state = SyncState::load(&state_path).unwrap_or_else(|e| {
        tracing::warn!("Ignoring rating history: {e}");
        SyncState::default()
    });
    match state.history(options.direction) {
        Some(history) if !config.sync.full => {
            tracing::info!("Incremental sync against {} recorded ratings", history.len());
            manager = manager.with_history(history.clone());
        }
        _ => tracing::info!("Full sync"),
    }

    let local_config = config.local_config()?;
    tracing::info!("Opening local library at {:?}", local_config.music_dir);
    let mut local = LocalCatalog::open(local_config)
        .map_err(|e| anyhow!("Failed to open local library: {e}"))?;

    let plex_config = config.plex_config();
    tracing::info!("Connecting to Plex server at {}", plex_config.url);
    let mut remote = match config.plex_credentials()? {
        PlexCredentials::Token => PlexCatalog::connect(plex_config),
        PlexCredentials::Password { username, password } => {
            PlexCatalog::sign_in(plex_config, &username, &password)
        }
    }
    .context("Failed to connect to Plex")?;

    let report = manager.run(&mut local, &mut remote)?;
    println!("{}", summary::render(&report));

    if state.record(&report, &options) {
        state.save(&state_path).context("Failed to save rating history")?;
    }

    Ok(())
}
