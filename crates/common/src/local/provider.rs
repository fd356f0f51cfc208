use std::io::{self, Read, Write};

use crate::entry::RawEntry;

/// Kind and size of an existing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub is_dir: bool,
    pub size: u64,
}

/// A pending write. Bytes written to the sink only become visible at the
/// target path once [`commit`](FileSink::commit) succeeds; dropping the sink
/// without committing discards them.
pub trait FileSink: Write + Send {
    fn commit(self: Box<Self>) -> io::Result<()>;
}

/// Hierarchical filesystem the local backend runs on.
///
/// Every path is absolute, cleaned and `/`-separated, interpreted relative
/// to the provider's own root. Absent paths are reported as
/// [`io::ErrorKind::NotFound`].
pub trait FsProvider: Send + Sync {
    /// Direct children of the directory at `path`
    fn read_dir(&self, path: &str) -> io::Result<Vec<RawEntry>>;

    /// Open the file at `path` for reading
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>>;

    /// Create or truncate the file at `path`
    fn create(&self, path: &str) -> io::Result<Box<dyn FileSink>>;

    /// Metadata of the path; follows symlinks
    fn stat(&self, path: &str) -> io::Result<Stat>;

    /// Create a single directory; the parent must exist
    fn create_dir(&self, path: &str) -> io::Result<()>;

    /// Remove a single file
    fn remove_file(&self, path: &str) -> io::Result<()>;
}
