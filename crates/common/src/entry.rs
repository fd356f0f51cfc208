use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Backend-native metadata for a single child of a directory.
///
/// This is what a provider or store reports; [`Entry::classify`] turns it
/// into the value handed to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

impl RawEntry {
    pub fn new(name: impl Into<String>, is_dir: bool, size: u64) -> Self {
        Self {
            name: name.into(),
            is_dir,
            size,
        }
    }
}

/// A file or directory as presented to callers.
///
/// Entries are immutable: a new listing produces new values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Entry {
    // location the entry was listed under
    path: String,
    name: String,
    is_dir: bool,
    size: u64,
}

impl Entry {
    /// Create a file entry.
    pub fn file(path: impl Into<String>, name: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            is_dir: false,
            size,
        }
    }

    /// Create a directory entry. Directories always report a size of 0.
    pub fn dir(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            is_dir: true,
            size: 0,
        }
    }

    /// Build an entry from raw metadata listed under `path`.
    pub fn classify(path: impl Into<String>, raw: RawEntry) -> Self {
        if raw.is_dir {
            Self::dir(path, raw.name)
        } else {
            Self::file(path, raw.name, raw.size)
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub fn is_file(&self) -> bool {
        !self.is_dir
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Display order: directories first, then files, each by name.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        other
            .is_dir
            .cmp(&self.is_dir)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dir {
            write!(f, "{}/", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Sort entries in place for display.
///
/// Directories come before files and each group is ordered by name,
/// byte-wise and case-sensitively. The sort is stable; duplicates are kept.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(Entry::display_cmp);
}
