//! Local filesystem backend
//!
//! [`LocalFs`] navigates any [`FsProvider`]: the host filesystem through
//! [`OsFs`], or an in-memory tree through [`MemFs`] for tests and previews.
//! The working directory is always an absolute, cleaned, `/`-separated path
//! in the provider's namespace.

mod memory;
mod os;
mod provider;

use std::io::{self, Read, Write};
use std::sync::Arc;

pub use memory::MemFs;
pub use os::OsFs;
pub use provider::{FileSink, FsProvider, Stat};

use crate::entry::{sort_entries, Entry};
use crate::error::{FsError, Result};
use crate::fs::FileSystem;
use crate::path::{self, ROOT};

/// [`FileSystem`] over a hierarchical filesystem provider.
pub struct LocalFs {
    // underlying filesystem (e.g. OsFs or MemFs)
    provider: Arc<dyn FsProvider>,
    // current working directory
    work_dir: String,
}

impl std::fmt::Debug for LocalFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFs")
            .field("work_dir", &self.work_dir)
            .finish_non_exhaustive()
    }
}

impl LocalFs {
    /// Create a backend over the host filesystem starting at `base_dir`.
    pub fn new(base_dir: &str) -> Self {
        Self::with_provider(Arc::new(OsFs::default()), base_dir)
    }

    /// Create a backend over `provider` starting at `base_dir`.
    ///
    /// Useful for testing, where a prepopulated [`MemFs`] can stand in for
    ///  the real filesystem. `base_dir` is cleaned and made absolute; it is
    ///  not checked for existence.
    pub fn with_provider(provider: Arc<dyn FsProvider>, base_dir: &str) -> Self {
        Self {
            provider,
            work_dir: path::join(ROOT, base_dir),
        }
    }

    pub fn work_dir(&self) -> &str {
        &self.work_dir
    }

    fn resolve(&self, target: &str) -> String {
        path::join(&self.work_dir, target)
    }

    // probes treat any lookup failure as "nothing there"
    fn stat(&self, resolved: &str) -> Option<Stat> {
        self.provider.stat(resolved).ok()
    }

    /// `None` when nothing exists at `resolved`; other lookup failures are errors.
    fn lookup(&self, resolved: &str) -> Result<Option<Stat>> {
        match self.provider.stat(resolved) {
            Ok(stat) => Ok(Some(stat)),
            Err(err) if is_absent(&err) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl FileSystem for LocalFs {
    fn name(&self) -> &'static str {
        "local"
    }

    fn location(&self) -> &str {
        &self.work_dir
    }

    fn is_at_root(&self) -> bool {
        self.work_dir == ROOT
    }

    fn list_contents(&self) -> Result<Vec<Entry>> {
        let raw_entries = self.provider.read_dir(&self.work_dir)?;

        let mut entries: Vec<Entry> = raw_entries
            .into_iter()
            .filter(|raw| raw.name != "." && raw.name != "..")
            .map(|raw| Entry::classify(self.work_dir.as_str(), raw))
            .collect();

        sort_entries(&mut entries);
        tracing::debug!(work_dir = %self.work_dir, count = entries.len(), "listed local directory");
        Ok(entries)
    }

    fn change_dir(&mut self, target: &str) -> Result<()> {
        let resolved = self.resolve(target);

        match self.lookup(&resolved)? {
            None => return Err(FsError::DirNotFound(resolved)),
            Some(stat) if !stat.is_dir => return Err(FsError::ExpectedDir(resolved)),
            Some(_) => {}
        }

        tracing::debug!(from = %self.work_dir, to = %resolved, "changed local directory");
        self.work_dir = resolved;
        Ok(())
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let resolved = self.resolve(name);

        match self.lookup(&resolved)? {
            None => return Err(FsError::FileNotFound(resolved)),
            Some(stat) if stat.is_dir => return Err(FsError::ExpectedFile(resolved)),
            Some(_) => {}
        }

        let mut reader = self.provider.open(&resolved)?;
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        Ok(content)
    }

    fn write_file(&self, name: &str, content: &[u8]) -> Result<()> {
        let resolved = self.resolve(name);

        if self.is_dir(name) {
            return Err(FsError::ExpectedFile(resolved));
        }

        let mut sink = self.provider.create(&resolved)?;
        sink.write_all(content)?;
        sink.commit()?;

        tracing::debug!(path = %resolved, size = content.len(), "wrote local file");
        Ok(())
    }

    fn is_file(&self, name: &str) -> bool {
        matches!(self.stat(&self.resolve(name)), Some(stat) if !stat.is_dir)
    }

    fn is_dir(&self, name: &str) -> bool {
        matches!(self.stat(&self.resolve(name)), Some(stat) if stat.is_dir)
    }

    fn path_exists(&self, name: &str) -> bool {
        self.stat(&self.resolve(name)).is_some()
    }

    fn create_dir(&self, name: &str) -> Result<()> {
        let resolved = self.resolve(name);

        if self.lookup(&resolved)?.is_some() {
            return Err(FsError::AlreadyExists(resolved));
        }
        let parent = path::parent(&resolved);
        if !matches!(self.lookup(&parent)?, Some(stat) if stat.is_dir) {
            return Err(FsError::DirNotFound(parent));
        }

        self.provider.create_dir(&resolved)?;
        tracing::debug!(path = %resolved, "created local directory");
        Ok(())
    }

    fn remove_file(&self, name: &str) -> Result<()> {
        let resolved = self.resolve(name);

        match self.lookup(&resolved)? {
            None => return Err(FsError::FileNotFound(resolved)),
            Some(stat) if stat.is_dir => return Err(FsError::ExpectedFile(resolved)),
            Some(_) => {}
        }

        self.provider.remove_file(&resolved)?;
        tracing::debug!(path = %resolved, "removed local file");
        Ok(())
    }
}

// a path below a regular file reports NotADirectory rather than NotFound
fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
