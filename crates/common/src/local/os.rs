use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::entry::RawEntry;
use crate::path::SEPARATOR;

use super::provider::{FileSink, FsProvider, Stat};

/// The host filesystem, rooted at a directory.
///
/// Provider paths are interpreted below `root`, so `/` is `root` itself and
/// nothing above it is reachable.
#[derive(Debug, Clone)]
pub struct OsFs {
    root: PathBuf,
}

impl OsFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn host_path(&self, path: &str) -> PathBuf {
        let relative = path.trim_start_matches(SEPARATOR);
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }
}

impl Default for OsFs {
    fn default() -> Self {
        Self::new("/")
    }
}

impl FsProvider for OsFs {
    fn read_dir(&self, path: &str) -> io::Result<Vec<RawEntry>> {
        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(self.host_path(path))? {
            let dir_entry = dir_entry?;
            // follow symlinks, but still list dangling ones
            let metadata = match fs::metadata(dir_entry.path()) {
                Ok(metadata) => metadata,
                Err(_) => dir_entry.metadata()?,
            };
            entries.push(RawEntry::new(
                dir_entry.file_name().to_string_lossy(),
                metadata.is_dir(),
                metadata.len(),
            ));
        }
        Ok(entries)
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        let file = File::open(self.host_path(path))?;
        Ok(Box::new(file))
    }

    fn create(&self, path: &str) -> io::Result<Box<dyn FileSink>> {
        let target = self.host_path(path);
        let dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        let file = NamedTempFile::new_in(dir)?;
        Ok(Box::new(OsSink { file, target }))
    }

    fn stat(&self, path: &str) -> io::Result<Stat> {
        let metadata = fs::metadata(self.host_path(path))?;
        Ok(Stat {
            is_dir: metadata.is_dir(),
            size: metadata.len(),
        })
    }

    fn create_dir(&self, path: &str) -> io::Result<()> {
        fs::create_dir(self.host_path(path))
    }

    fn remove_file(&self, path: &str) -> io::Result<()> {
        fs::remove_file(self.host_path(path))
    }
}

/// Writes into a temporary file next to the target and renames it into place.
struct OsSink {
    file: NamedTempFile,
    target: PathBuf,
}

impl Write for OsSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl FileSink for OsSink {
    fn commit(self: Box<Self>) -> io::Result<()> {
        let OsSink { mut file, target } = *self;
        file.flush()?;

        // temp files are created owner-only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&target)
                .map(|m| m.permissions().mode() & 0o7777)
                .unwrap_or(0o644);
            file.as_file()
                .set_permissions(fs::Permissions::from_mode(mode))?;
        }

        file.persist(&target).map_err(|e| e.error)?;
        Ok(())
    }
}
