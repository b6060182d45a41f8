/// Local catalog: a music directory and an optional playlist directory
use crate::error::{LocalCatalogError, Result};
use crate::playlists::{self, canonical, M3uPlaylist};
use crate::tags;
use plexsync_core::{CatalogReader, CatalogWriter, Playlist, StarRating, Track, TrackId};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Audio file extensions scanned by default
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "ogg", "opus", "m4a", "wav", "aiff", "ape", "wv",
];

/// Where the local library lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCatalogConfig {
    /// Root of the music library, scanned recursively
    pub music_dir: PathBuf,

    /// Directory holding `.m3u` / `.m3u8` playlists
    pub playlists_dir: Option<PathBuf>,

    /// Audio file extensions to include (lowercase)
    pub extensions: Vec<String>,
}

impl LocalCatalogConfig {
    pub fn new(music_dir: impl Into<PathBuf>) -> Self {
        Self {
            music_dir: music_dir.into(),
            playlists_dir: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect(),
        }
    }

    pub fn with_playlists_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.playlists_dir = Some(dir.into());
        self
    }
}

/// Catalog over audio files on disk.
///
/// Track ids are paths relative to the music directory with `/` separators. Every M3U
/// playlist is a user playlist named after its file stem.
#[derive(Debug)]
pub struct LocalCatalog {
    name: String,
    music_dir: PathBuf,
    playlists_dir: Option<PathBuf>,
    extensions: Vec<String>,
}

impl LocalCatalog {
    /// Open a catalog, checking that the configured directories exist
    pub fn open(config: LocalCatalogConfig) -> Result<Self> {
        if !config.music_dir.is_dir() {
            return Err(LocalCatalogError::NotADirectory(config.music_dir));
        }
        if let Some(dir) = &config.playlists_dir {
            if !dir.is_dir() {
                return Err(LocalCatalogError::NotADirectory(dir.clone()));
            }
        }

        let music_dir = config.music_dir.canonicalize()?;
        info!("Opened local library at {:?}", music_dir);

        Ok(Self {
            name: format!("local library ({})", music_dir.display()),
            music_dir,
            playlists_dir: config.playlists_dir,
            extensions: config.extensions,
        })
    }

    pub fn music_dir(&self) -> &Path {
        &self.music_dir
    }

    /// Audio files under the music directory, sorted by path
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.music_dir).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && self.is_audio_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!("Found {} audio files", files.len());
        Ok(files)
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
    }

    /// Track id for a file inside the music directory
    pub fn track_id_for(&self, path: &Path) -> Option<TrackId> {
        let relative = canonical(path).strip_prefix(&self.music_dir).ok()?.to_path_buf();
        let parts: Vec<&str> = relative
            .components()
            .map(|component| match component {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Option<_>>()?;

        if parts.is_empty() {
            return None;
        }
        Some(TrackId::new(parts.join("/")))
    }

    /// Absolute path of an existing track
    pub fn path_for(&self, id: &TrackId) -> Result<PathBuf> {
        let relative = Path::new(id.as_str());
        let escapes = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)));
        let path = self.music_dir.join(relative);

        if escapes || !path.is_file() {
            return Err(LocalCatalogError::UnknownTrack(id.to_string()));
        }
        Ok(path)
    }

    fn playlist_file(&self, name: &str) -> Result<Option<PathBuf>> {
        let dir = self.playlists_dir.as_ref().ok_or(LocalCatalogError::NoPlaylistDir)?;
        let existing = playlists::find_playlists(dir)?
            .into_iter()
            .find(|path| path.file_stem().and_then(|stem| stem.to_str()) == Some(name));
        Ok(existing)
    }

    fn read_track(&self, path: &Path) -> Option<Track> {
        let id = self.track_id_for(path)?;

        let tags = match tags::read_track_tags(path) {
            Ok(tags) => tags,
            Err(e) => {
                warn!("Skipping {:?}: {}", path, e);
                return None;
            }
        };

        Some(Track {
            id,
            title: tags.title.unwrap_or_default(),
            artist: tags.artist,
            album: tags.album,
            track_number: tags.track_number,
            duration_ms: tags.duration_ms,
            rating: tags.rating,
        })
    }

    fn read_playlist(&self, path: &Path) -> Result<Option<Playlist>> {
        let m3u = M3uPlaylist::load(path)?;
        let Some(name) = m3u.name() else {
            return Ok(None);
        };

        let mut track_ids = Vec::new();
        for entry in m3u.entries() {
            match self.track_id_for(&entry) {
                Some(id) if entry.is_file() => track_ids.push(id),
                _ => debug!("Ignoring playlist entry {:?} in {}", entry, name),
            }
        }

        Ok(Some(Playlist::new(name).with_tracks(track_ids)))
    }

    fn add_entry(&self, name: &str, id: &TrackId) -> Result<()> {
        let track_path = self.path_for(id)?;

        let mut m3u = match self.playlist_file(name)? {
            Some(path) => M3uPlaylist::load(path)?,
            None => {
                let dir = self.playlists_dir.as_ref().ok_or(LocalCatalogError::NoPlaylistDir)?;
                if name.is_empty() || name.contains(['/', '\\']) {
                    return Err(LocalCatalogError::InvalidPlaylistName(name.to_string()));
                }
                info!("Creating playlist '{}'", name);
                M3uPlaylist::create(dir.join(format!("{name}.m3u8")))
            }
        };

        if !m3u.contains(&track_path) {
            m3u.append(&track_path);
            m3u.save()?;
        }
        Ok(())
    }

    fn remove_entry(&self, name: &str, id: &TrackId) -> Result<()> {
        let track_path = self.path_for(id)?;
        let Some(path) = self.playlist_file(name)? else {
            return Ok(());
        };

        let mut m3u = M3uPlaylist::load(path)?;
        if m3u.remove(&track_path) > 0 {
            m3u.save()?;
        }
        Ok(())
    }
}

impl CatalogReader for LocalCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_tracks(&self) -> plexsync_core::Result<Vec<Track>> {
        let files = self.scan()?;
        let tracks: Vec<Track> = files.iter().filter_map(|path| self.read_track(path)).collect();

        info!("Read {} of {} audio files", tracks.len(), files.len());
        Ok(tracks)
    }

    fn list_playlists(&self) -> plexsync_core::Result<Vec<Playlist>> {
        let Some(dir) = &self.playlists_dir else {
            return Ok(Vec::new());
        };

        let mut result = Vec::new();
        for path in playlists::find_playlists(dir)? {
            if let Some(playlist) = self.read_playlist(&path)? {
                result.push(playlist);
            }
        }
        Ok(result)
    }
}

impl CatalogWriter for LocalCatalog {
    fn write_rating(&mut self, id: &TrackId, rating: StarRating) -> plexsync_core::Result<()> {
        let path = self.path_for(id)?;
        tags::write_rating(path, rating)?;
        Ok(())
    }

    fn add_to_playlist(&mut self, playlist: &str, id: &TrackId) -> plexsync_core::Result<()> {
        self.add_entry(playlist, id)?;
        Ok(())
    }

    fn remove_from_playlist(&mut self, playlist: &str, id: &TrackId) -> plexsync_core::Result<()> {
        self.remove_entry(playlist, id)?;
        Ok(())
    }
}
