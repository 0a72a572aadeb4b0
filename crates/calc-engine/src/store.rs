//! Key-value persistence for history and settings.
//!
//! The engine never touches storage. A [`CalculatorSession`] writes the
//! history array under [`HISTORY_KEY`] and the selected [`Theme`] under
//! [`THEME_KEY`] through a [`PersistenceStore`].
//!
//! [`CalculatorSession`]: crate::session::CalculatorSession

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Key holding the JSON history array
pub const HISTORY_KEY: &str = "calcHistory";

/// Key holding the selected theme
pub const THEME_KEY: &str = "calcTheme";

/// Errors from a persistence backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored value is not a known theme
    #[error("Unknown theme: '{0}'")]
    UnknownTheme(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// String key-value storage
pub trait PersistenceStore {
    /// Reads a value, `None` if the key was never written
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes a value; missing keys are not an error
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PersistenceStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store keeping one `<key>.json` file per key in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`; the directory is created on first write
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl PersistenceStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Background theme; opaque to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    /// Purple gradient
    #[default]
    Purple,
    /// Blue gradient
    Blue,
    /// Green gradient
    Green,
    /// Orange gradient
    Orange,
    /// Red gradient
    Red,
    /// Pink gradient
    Pink,
    /// Teal gradient
    Teal,
    /// Sunset gradient
    Sunset,
    /// Dark purple gradient
    DarkPurple,
    /// Dark blue gradient
    DarkBlue,
    /// Dark green gradient
    DarkGreen,
    /// Near-black gradient
    Midnight,
    /// Pure black
    Amoled,
}

impl Theme {
    /// All themes in menu order
    pub const ALL: [Theme; 13] = [
        Self::Purple,
        Self::Blue,
        Self::Green,
        Self::Orange,
        Self::Red,
        Self::Pink,
        Self::Teal,
        Self::Sunset,
        Self::DarkPurple,
        Self::DarkBlue,
        Self::DarkGreen,
        Self::Midnight,
        Self::Amoled,
    ];

    /// Identifier used in storage and the theme menu
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Purple => "purple",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Pink => "pink",
            Self::Teal => "teal",
            Self::Sunset => "sunset",
            Self::DarkPurple => "darkPurple",
            Self::DarkBlue => "darkBlue",
            Self::DarkGreen => "darkGreen",
            Self::Midnight => "midnight",
            Self::Amoled => "amoled",
        }
    }

    /// CSS background
    #[must_use]
    pub const fn background(&self) -> &'static str {
        match self {
            Self::Purple => "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
            Self::Blue => "linear-gradient(135deg, #4facfe 0%, #00f2fe 100%)",
            Self::Green => "linear-gradient(135deg, #43e97b 0%, #38f9d7 100%)",
            Self::Orange => "linear-gradient(135deg, #fa709a 0%, #fee140 100%)",
            Self::Red => "linear-gradient(135deg, #f85032 0%, #e73827 100%)",
            Self::Pink => "linear-gradient(135deg, #f093fb 0%, #f5576c 100%)",
            Self::Teal => "linear-gradient(135deg, #00c9ff 0%, #92fe9d 100%)",
            Self::Sunset => "linear-gradient(135deg, #ff6e7f 0%, #bfe9ff 100%)",
            Self::DarkPurple => "linear-gradient(135deg, #1a0033 0%, #0d001a 100%)",
            Self::DarkBlue => "linear-gradient(135deg, #0a1929 0%, #030b14 100%)",
            Self::DarkGreen => "linear-gradient(135deg, #0d1f1a 0%, #040a08 100%)",
            Self::Midnight => "linear-gradient(135deg, #1a1a1a 0%, #0a0a0a 100%)",
            Self::Amoled => "#000000",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.name() == s)
            .ok_or_else(|| StoreError::UnknownTheme(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get(THEME_KEY).unwrap(), None);

        store.set(THEME_KEY, "blue").unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("blue"));
        assert_eq!(store.len(), 1);

        store.remove(THEME_KEY).unwrap();
        store.remove(THEME_KEY).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);

        store.set(HISTORY_KEY, "[]").unwrap();
        assert!(store.path_for(HISTORY_KEY).ends_with("calcHistory.json"));
        assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));

        // a second handle on the same directory sees the value
        let other = FileStore::new(store.dir().to_path_buf());
        assert_eq!(other.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));

        store.remove(HISTORY_KEY).unwrap();
        store.remove(HISTORY_KEY).unwrap();
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_unwritable_dir() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // a regular file cannot act as the store directory
        let mut store = FileStore::new(file.path());
        assert!(matches!(store.set(THEME_KEY, "x"), Err(StoreError::Io(_))));
    }

    #[test]
    fn test_theme_names_round_trip() {
        for theme in Theme::ALL {
            assert_eq!(theme.name().parse::<Theme>().unwrap(), theme);
            let json = serde_json::to_string(&theme).unwrap();
            assert_eq!(json, format!("\"{}\"", theme.name()));
        }
    }

    #[test]
    fn test_theme_defaults_and_unknown() {
        assert_eq!(Theme::default(), Theme::Purple);
        assert_eq!(Theme::DarkPurple.to_string(), "darkPurple");
        assert_eq!(Theme::Amoled.background(), "#000000");
        assert!(matches!(
            "neon".parse::<Theme>(),
            Err(StoreError::UnknownTheme(name)) if name == "neon"
        ));
    }
}
