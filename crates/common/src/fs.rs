//! The navigation contract every backend implements.

use crate::entry::Entry;
use crate::error::{FsError, Result};

/// Uniform view over a navigable store of files and directories.
///
/// A backend owns a single working location. Names passed to the
/// operations below are resolved against it lexically: `.`, `..`, a single
/// segment, or a multi-segment relative path are all accepted.
///
/// Instances are single-session: [`change_dir`](FileSystem::change_dir)
/// takes `&mut self`, so navigation cannot race. Callers that need several
/// independent locations create one backend per location.
///
/// ```rust,ignore
/// let mut fs: Box<dyn FileSystem> = Box::new(LocalFs::new("/home/me"));
/// fs.change_dir("projects")?;
/// for entry in fs.list_contents()? {
///     println!("{entry}");
/// }
/// ```
pub trait FileSystem: Send {
    /// Short identifier of the backend, for logs and error messages
    fn name(&self) -> &'static str;

    /// The current working location
    fn location(&self) -> &str;

    /// Whether the working location is the backend's root
    fn is_at_root(&self) -> bool;

    /// List the contents of the working location
    ///
    /// Entries are sorted with [`sort_entries`](crate::entry::sort_entries)
    /// and never include `.` or `..`.
    fn list_contents(&self) -> Result<Vec<Entry>>;

    /// Change the working location
    ///
    /// On error the working location is left exactly as it was.
    fn change_dir(&mut self, target: &str) -> Result<()>;

    /// Read the full contents of a file
    fn read_file(&self, name: &str) -> Result<Vec<u8>>;

    /// Create or overwrite a file
    ///
    /// Fails if `name` resolves to an existing directory.
    fn write_file(&self, name: &str, content: &[u8]) -> Result<()>;

    /// Whether anything exists at `name`. Lookup failures count as absent.
    fn path_exists(&self, name: &str) -> bool {
        self.is_file(name) || self.is_dir(name)
    }

    /// Whether `name` is an existing file. Lookup failures count as absent.
    fn is_file(&self, name: &str) -> bool;

    /// Whether `name` is an existing directory. Lookup failures count as absent.
    fn is_dir(&self, name: &str) -> bool;

    /// Create a single directory
    fn create_dir(&self, _name: &str) -> Result<()> {
        Err(FsError::unsupported(self.name(), "create_dir"))
    }

    /// Remove a single file
    fn remove_file(&self, _name: &str) -> Result<()> {
        Err(FsError::unsupported(self.name(), "remove_file"))
    }
}
