//! M3U / M3U8 playlist files
//!
//! One path per line; lines starting with `#` are comments or extended-M3U directives
//! and are kept verbatim when the file is rewritten. Relative entries resolve against
//! the directory holding the playlist.

use crate::error::{LocalCatalogError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const HEADER: &str = "#EXTM3U";

/// Playlist file extensions
pub const PLAYLIST_EXTENSIONS: &[&str] = &["m3u", "m3u8"];

/// An M3U playlist held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct M3uPlaylist {
    path: PathBuf,
    lines: Vec<String>,
}

impl M3uPlaylist {
    /// Read a playlist file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LocalCatalogError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;
        let lines = content
            .trim_start_matches('\u{feff}')
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            lines,
        })
    }

    /// A new, empty playlist that will be written to `path`
    pub fn create<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lines: vec![HEADER.to_string()],
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Playlist name: the file stem
    pub fn name(&self) -> Option<&str> {
        self.path.file_stem().and_then(|stem| stem.to_str())
    }

    /// Entries resolved to paths, in playlist order
    pub fn entries(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.lines
            .iter()
            .filter(|line| is_entry(line))
            .map(|line| self.resolve(line))
    }

    /// Append an entry
    pub fn append(&mut self, entry: &Path) {
        self.lines.push(entry.display().to_string());
    }

    /// Drop every entry that resolves to `target`. Returns how many were removed.
    pub fn remove(&mut self, target: &Path) -> usize {
        let target = canonical(target);
        let before = self.lines.len();
        let base = self.base_dir();

        self.lines
            .retain(|line| !is_entry(line) || canonical(&base.join(line.trim())) != target);

        before - self.lines.len()
    }

    /// Whether any entry resolves to `target`
    pub fn contains(&self, target: &Path) -> bool {
        let target = canonical(target);
        self.entries().any(|entry| canonical(&entry) == target)
    }

    /// Write the playlist back to its file
    pub fn save(&self) -> Result<()> {
        let mut content = self.lines.join("\n");
        content.push('\n');
        fs::write(&self.path, content)?;

        debug!("Saved playlist {:?}", self.path);
        Ok(())
    }

    fn base_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    fn resolve(&self, line: &str) -> PathBuf {
        // Joining an absolute path replaces the base
        self.base_dir().join(line.trim())
    }
}

fn is_entry(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#')
}

/// Canonical form when the file exists, the path itself otherwise
pub(crate) fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Whether a path has a playlist extension
pub fn is_playlist_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PLAYLIST_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Playlist files directly inside `dir`, sorted by path
pub fn find_playlists(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_playlist_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
