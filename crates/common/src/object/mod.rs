//! Object store backend
//!
//! An object store has no directories, only keys. [`ObjectStoreFs`] derives
//! them: a "directory" is any prefix ending in `/` that at least one key
//! shares, as reported by the store's common prefixes. Such a directory
//! cannot exist empty and disappears as soon as its last object is removed.
//!
//! The working location is kept as a key prefix without leading or trailing
//! separators; the bucket root is the empty string.

use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use store::{Context, StoreClient, StoreError, DELIMITER};

use crate::entry::{sort_entries, Entry};
use crate::error::{FsError, Result};
use crate::fs::FileSystem;
use crate::path::{self, ROOT};

/// Canonical representation of the bucket root.
pub const ROOT_PREFIX: &str = "";

/// [`FileSystem`] over a single bucket of an object store.
pub struct ObjectStoreFs {
    // client for accessing the store
    client: Arc<dyn StoreClient>,
    // bucket name
    bucket: String,
    // current working "directory"
    work_path: String,
    // context every store request is issued with
    ctx: Context,
}

impl std::fmt::Debug for ObjectStoreFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreFs")
            .field("bucket", &self.bucket)
            .field("work_path", &self.work_path)
            .field("ctx", &self.ctx)
            .finish_non_exhaustive()
    }
}

impl ObjectStoreFs {
    /// Create a backend over `bucket` starting at `work_path`.
    ///
    /// `work_path` is cleaned; `""`, `"/"` and `"."` all name the root.
    pub fn new(client: Arc<dyn StoreClient>, bucket: impl Into<String>, work_path: &str) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            work_path: Self::to_prefix(&path::join(ROOT, work_path)),
            ctx: Context::default(),
        }
    }

    /// Use `ctx` for every subsequent store request.
    pub fn with_context(mut self, ctx: Context) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn set_context(&mut self, ctx: Context) {
        self.ctx = ctx;
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn work_path(&self) -> &str {
        &self.work_path
    }

    /// Strip the leading separator of a cleaned absolute path.
    fn to_prefix(cleaned: &str) -> String {
        // everything that cleans to "/" is the root
        if cleaned == ROOT {
            return ROOT_PREFIX.to_string();
        }
        cleaned.trim_start_matches(DELIMITER).to_string()
    }

    /// Resolve `target` against the working prefix.
    fn resolve(&self, target: &str) -> String {
        // moving up from the root stays at the root
        if self.work_path == ROOT_PREFIX && target == ".." {
            return ROOT_PREFIX.to_string();
        }
        let joined = path::join(&format!("{ROOT}{}", self.work_path), target);
        Self::to_prefix(&joined)
    }

    /// The list prefix for a resolved directory key.
    fn dir_prefix(key: &str) -> String {
        if key == ROOT_PREFIX {
            ROOT_PREFIX.to_string()
        } else {
            format!("{key}{DELIMITER}")
        }
    }

    fn dir_exists(&self, key: &str) -> std::result::Result<bool, StoreError> {
        if key == ROOT_PREFIX {
            return Ok(true);
        }
        let listing = self
            .client
            .list_objects(&self.ctx, &self.bucket, &Self::dir_prefix(key))?;
        Ok(!listing.is_empty())
    }

    fn object_exists(&self, key: &str) -> std::result::Result<bool, StoreError> {
        if key == ROOT_PREFIX {
            return Ok(false);
        }
        let parent = Self::to_prefix(&path::parent(&format!("{ROOT}{key}")));
        let listing = self
            .client
            .list_objects(&self.ctx, &self.bucket, &Self::dir_prefix(&parent))?;
        Ok(listing.objects.iter().any(|object| object.key == key))
    }
}

impl FileSystem for ObjectStoreFs {
    fn name(&self) -> &'static str {
        "s3"
    }

    fn location(&self) -> &str {
        &self.work_path
    }

    fn is_at_root(&self) -> bool {
        self.work_path == ROOT_PREFIX
    }

    fn list_contents(&self) -> Result<Vec<Entry>> {
        let prefix = Self::dir_prefix(&self.work_path);
        let listing = self
            .client
            .list_objects(&self.ctx, &self.bucket, &prefix)?;

        let dirs = listing
            .common_prefixes
            .iter()
            .map(|common| path::base_name(common))
            .filter(|name| !name.is_empty())
            .map(|name| Entry::dir(prefix.as_str(), name));

        // a key equal to the prefix is a directory marker, not a file
        let files = listing
            .objects
            .iter()
            .filter(|object| object.key != prefix && !object.key.ends_with(DELIMITER))
            .map(|object| Entry::file(prefix.as_str(), path::base_name(&object.key), object.size));

        let mut entries: Vec<Entry> = dirs.chain(files).collect();
        sort_entries(&mut entries);

        tracing::debug!(bucket = %self.bucket, prefix = %prefix, count = entries.len(), "listed prefix");
        Ok(entries)
    }

    fn change_dir(&mut self, target: &str) -> Result<()> {
        let resolved = self.resolve(target);

        if !self.dir_exists(&resolved)? {
            if self.object_exists(&resolved)? {
                return Err(FsError::ExpectedDir(resolved));
            }
            return Err(FsError::DirNotFound(resolved));
        }

        tracing::debug!(bucket = %self.bucket, from = %self.work_path, to = %resolved, "changed prefix");
        self.work_path = resolved;
        Ok(())
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let key = self.resolve(name);
        if key == ROOT_PREFIX {
            return Err(FsError::ExpectedFile(ROOT.to_string()));
        }

        let mut body = match self.client.get_object(&self.ctx, &self.bucket, &key) {
            Ok(body) => body,
            Err(StoreError::NotFound(_)) => {
                if self.dir_exists(&key)? {
                    return Err(FsError::ExpectedFile(key));
                }
                return Err(FsError::FileNotFound(key));
            }
            Err(e) => return Err(e.into()),
        };

        let mut content = Vec::new();
        body.read_to_end(&mut content)?;
        Ok(content)
    }

    fn write_file(&self, name: &str, content: &[u8]) -> Result<()> {
        let key = self.resolve(name);
        if key == ROOT_PREFIX {
            return Err(FsError::ExpectedFile(ROOT.to_string()));
        }
        if self.dir_exists(&key)? {
            return Err(FsError::ExpectedFile(key));
        }

        self.client.put_object(
            &self.ctx,
            &self.bucket,
            &key,
            Bytes::copy_from_slice(content),
        )?;

        tracing::debug!(bucket = %self.bucket, key = %key, size = content.len(), "wrote object");
        Ok(())
    }

    fn is_file(&self, name: &str) -> bool {
        self.object_exists(&self.resolve(name)).unwrap_or(false)
    }

    fn is_dir(&self, name: &str) -> bool {
        self.dir_exists(&self.resolve(name)).unwrap_or(false)
    }

    fn remove_file(&self, name: &str) -> Result<()> {
        let key = self.resolve(name);
        if key == ROOT_PREFIX {
            return Err(FsError::ExpectedFile(ROOT.to_string()));
        }

        if !self.object_exists(&key)? {
            if self.dir_exists(&key)? {
                return Err(FsError::ExpectedFile(key));
            }
            return Err(FsError::FileNotFound(key));
        }

        self.client.delete_object(&self.ctx, &self.bucket, &key)?;
        tracing::debug!(bucket = %self.bucket, key = %key, "removed object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::ListResult;

    /// Client that must never be reached.
    struct Unreachable;

    impl StoreClient for Unreachable {
        fn list_objects(&self, _: &Context, _: &str, _: &str) -> store::Result<ListResult> {
            unreachable!("list_objects")
        }
        fn get_object(&self, _: &Context, _: &str, _: &str) -> store::Result<Box<dyn Read + Send>> {
            unreachable!("get_object")
        }
        fn put_object(&self, _: &Context, _: &str, _: &str, _: Bytes) -> store::Result<()> {
            unreachable!("put_object")
        }
        fn delete_object(&self, _: &Context, _: &str, _: &str) -> store::Result<()> {
            unreachable!("delete_object")
        }
    }

    fn fs_at(work_path: &str) -> ObjectStoreFs {
        ObjectStoreFs::new(Arc::new(Unreachable), "bucket", work_path)
    }

    #[test]
    fn test_root_spellings() {
        for root in ["", "/", ".", "//", "/.."] {
            let fs = fs_at(root);
            assert_eq!(fs.work_path(), ROOT_PREFIX, "{root:?}");
            assert!(fs.is_at_root());
        }
        assert_eq!(fs_at("/docs/2024/").work_path(), "docs/2024");
    }

    #[test]
    fn test_resolve() {
        let root = fs_at("");
        assert_eq!(root.resolve(".."), ROOT_PREFIX);
        assert_eq!(root.resolve("../.."), ROOT_PREFIX);
        assert_eq!(root.resolve("."), ROOT_PREFIX);
        assert_eq!(root.resolve("docs"), "docs");
        assert_eq!(root.resolve("docs/./2024/"), "docs/2024");

        let nested = fs_at("docs/2024");
        assert_eq!(nested.resolve(".."), "docs");
        assert_eq!(nested.resolve("../.."), ROOT_PREFIX);
        assert_eq!(nested.resolve("report.pdf"), "docs/2024/report.pdf");
    }

    #[test]
    fn test_top_level_prefix_is_not_root() {
        // a top-level prefix never collapses into the root sentinel
        let fs = fs_at("root");
        assert_eq!(fs.work_path(), "root");
        assert!(!fs.is_at_root());
        assert_eq!(fs.resolve(".."), ROOT_PREFIX);
    }

    #[test]
    fn test_dir_prefix() {
        assert_eq!(ObjectStoreFs::dir_prefix(""), "");
        assert_eq!(ObjectStoreFs::dir_prefix("a/b"), "a/b/");
    }

    #[test]
    fn test_create_dir_unsupported() {
        let fs = fs_at("");
        let err = fs.create_dir("new").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Unsupported);
        assert_eq!(
            err.to_string(),
            "create_dir is not supported by the s3 backend"
        );
    }
}
