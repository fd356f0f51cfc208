//! Store client backed by the `object_store` crate (S3/MinIO/local filesystem/memory).

use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::{Buf, Bytes};
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::runtime::{Builder, Runtime};
use url::Url;

use crate::client::{ListResult, ObjectInfo, StoreClient, DELIMITER};
use crate::context::Context;
use crate::error::{Result, StoreError};

/// Configuration for the object storage backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// In-memory storage (for testing)
    #[default]
    Memory,

    /// Local filesystem storage, one sub-directory per bucket
    Local {
        /// Path to the storage directory
        path: PathBuf,
    },

    /// S3-compatible storage (AWS S3, MinIO, etc.)
    ///
    /// Anything left unset is resolved by the AWS builder from the
    /// environment (`AWS_REGION`, `AWS_ACCESS_KEY_ID`, ...).
    S3 {
        /// S3 endpoint URL (e.g., "http://localhost:9000" for MinIO)
        #[serde(default)]
        endpoint: Option<Url>,
        /// Optional region
        #[serde(default)]
        region: Option<String>,
        /// Access key ID
        #[serde(default)]
        access_key: Option<String>,
        /// Secret access key
        #[serde(default)]
        secret_key: Option<String>,
    },
}

impl StoreConfig {
    /// Build a store scoped to `bucket`.
    fn build(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        let store: Arc<dyn ObjectStore> = match self {
            StoreConfig::Memory => Arc::new(InMemory::new()),

            StoreConfig::Local { path } => {
                let root = path.join(bucket);
                // Ensure directory exists
                std::fs::create_dir_all(&root)?;
                Arc::new(
                    LocalFileSystem::new_with_prefix(&root)
                        .map_err(|e| StoreError::InvalidConfig(e.to_string()))?,
                )
            }

            StoreConfig::S3 {
                endpoint,
                region,
                access_key,
                secret_key,
            } => {
                let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
                if let Some(endpoint) = endpoint {
                    builder = builder
                        .with_endpoint(endpoint.as_str())
                        .with_allow_http(endpoint.scheme() == "http");
                }
                if let Some(region) = region {
                    builder = builder.with_region(region);
                }
                if let Some(access_key) = access_key {
                    builder = builder.with_access_key_id(access_key);
                }
                if let Some(secret_key) = secret_key {
                    builder = builder.with_secret_access_key(secret_key);
                }

                Arc::new(
                    builder
                        .build()
                        .map_err(|e| StoreError::InvalidConfig(e.to_string()))?,
                )
            }
        };
        Ok(store)
    }
}

/// Blocking [`StoreClient`] over `object_store`.
///
/// Owns a private current-thread runtime and blocks on it for every request,
/// so it must not be called from inside another Tokio runtime.
pub struct ObjectStoreClient {
    config: StoreConfig,
    runtime: Runtime,
    // one store per bucket, built on first use
    stores: Mutex<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl std::fmt::Debug for ObjectStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreClient")
            .field("config", &self.config)
            .field("buckets", &self.stores.lock().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ObjectStoreClient {
    /// Create a new client from configuration.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            config,
            runtime,
            stores: Mutex::new(HashMap::new()),
        })
    }

    /// Create a client over in-memory buckets.
    pub fn memory() -> Result<Self> {
        Self::new(StoreConfig::Memory)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn store(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        let mut stores = self.stores.lock();
        if let Some(store) = stores.get(bucket) {
            return Ok(store.clone());
        }

        tracing::debug!(bucket, "building object store");
        let store = self.config.build(bucket)?;
        stores.insert(bucket.to_string(), store.clone());
        Ok(store)
    }

    // keys are taken verbatim; `ObjectPath::from` would percent-encode them
    fn object_path(key: &str) -> Result<ObjectPath> {
        ObjectPath::parse(key)
            .map_err(|source| StoreError::ObjectStore(object_store::Error::InvalidPath { source }))
    }

    /// Convert an S3-style prefix (`a/b/`) into an object path, `None` for the root.
    fn prefix_path(prefix: &str) -> Result<Option<ObjectPath>> {
        let trimmed = prefix.trim_end_matches(DELIMITER);
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Self::object_path(trimmed).map(Some)
        }
    }
}

impl StoreClient for ObjectStoreClient {
    fn list_objects(&self, ctx: &Context, bucket: &str, prefix: &str) -> Result<ListResult> {
        let store = self.store(bucket)?;
        let prefix_path = Self::prefix_path(prefix)?;

        let listing = self
            .runtime
            .block_on(ctx.run(store.list_with_delimiter(prefix_path.as_ref())))?;

        let common_prefixes = listing
            .common_prefixes
            .into_iter()
            .map(|p| format!("{}{}", p.as_ref(), DELIMITER))
            .collect();
        let objects = listing
            .objects
            .into_iter()
            .map(|meta| ObjectInfo::new(meta.location.as_ref(), meta.size as u64))
            .collect();

        Ok(ListResult {
            common_prefixes,
            objects,
        })
    }

    fn get_object(&self, ctx: &Context, bucket: &str, key: &str) -> Result<Box<dyn Read + Send>> {
        let store = self.store(bucket)?;
        let location = Self::object_path(key)?;

        let bytes = self.runtime.block_on(ctx.run(async {
            let result = store.get(&location).await?;
            result.bytes().await
        }))?;

        Ok(Box::new(bytes.reader()))
    }

    fn put_object(&self, ctx: &Context, bucket: &str, key: &str, body: Bytes) -> Result<()> {
        let store = self.store(bucket)?;
        let location = Self::object_path(key)?;
        let size = body.len();

        self.runtime
            .block_on(ctx.run(store.put(&location, body.into())))?;

        tracing::debug!(bucket, key, size, "object stored");
        Ok(())
    }

    fn delete_object(&self, ctx: &Context, bucket: &str, key: &str) -> Result<()> {
        let store = self.store(bucket)?;
        let location = Self::object_path(key)?;

        self.runtime.block_on(ctx.run(store.delete(&location)))?;

        tracing::debug!(bucket, key, "object deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(mut reader: Box<dyn Read + Send>) -> Vec<u8> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_memory_client() {
        let client = ObjectStoreClient::memory().unwrap();
        let ctx = Context::new();

        client
            .put_object(&ctx, "bucket", "dir/a.txt", Bytes::from("hello"))
            .unwrap();
        client
            .put_object(&ctx, "bucket", "b.txt", Bytes::from("world!"))
            .unwrap();

        // Root listing folds dir/ into a common prefix
        let listing = client.list_objects(&ctx, "bucket", "").unwrap();
        assert_eq!(listing.common_prefixes, vec!["dir/".to_string()]);
        assert_eq!(listing.objects, vec![ObjectInfo::new("b.txt", 6)]);

        let listing = client.list_objects(&ctx, "bucket", "dir/").unwrap();
        assert!(listing.common_prefixes.is_empty());
        assert_eq!(listing.objects, vec![ObjectInfo::new("dir/a.txt", 5)]);

        let body = read_all(client.get_object(&ctx, "bucket", "dir/a.txt").unwrap());
        assert_eq!(body, b"hello");

        client.delete_object(&ctx, "bucket", "dir/a.txt").unwrap();
        let listing = client.list_objects(&ctx, "bucket", "").unwrap();
        assert!(listing.common_prefixes.is_empty());
    }

    #[test]
    fn test_keys_are_not_encoded() {
        let client = ObjectStoreClient::memory().unwrap();
        let ctx = Context::new();

        client
            .put_object(&ctx, "bucket", "a [1].txt", Bytes::from("one"))
            .unwrap();
        client
            .put_object(&ctx, "bucket", "dir #2/100%.txt", Bytes::from("all"))
            .unwrap();

        let listing = client.list_objects(&ctx, "bucket", "").unwrap();
        assert_eq!(listing.common_prefixes, vec!["dir #2/".to_string()]);
        assert_eq!(listing.objects, vec![ObjectInfo::new("a [1].txt", 3)]);

        let listing = client.list_objects(&ctx, "bucket", "dir #2/").unwrap();
        assert_eq!(listing.objects, vec![ObjectInfo::new("dir #2/100%.txt", 3)]);

        let body = read_all(client.get_object(&ctx, "bucket", "dir #2/100%.txt").unwrap());
        assert_eq!(body, b"all");
    }

    #[test]
    fn test_invalid_key() {
        let client = ObjectStoreClient::memory().unwrap();
        let ctx = Context::new();

        let err = client.get_object(&ctx, "bucket", "a//b").err().unwrap();
        assert!(matches!(
            err,
            StoreError::ObjectStore(object_store::Error::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_buckets_are_isolated() {
        let client = ObjectStoreClient::memory().unwrap();
        let ctx = Context::new();

        client
            .put_object(&ctx, "one", "a.txt", Bytes::from("a"))
            .unwrap();

        assert!(client.list_objects(&ctx, "two", "").unwrap().is_empty());
        assert!(!client.list_objects(&ctx, "one", "").unwrap().is_empty());
    }

    #[test]
    fn test_get_missing_object() {
        let client = ObjectStoreClient::memory().unwrap();
        let ctx = Context::new();

        let err = client.get_object(&ctx, "bucket", "nope.txt").err().unwrap();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_cancelled_context() {
        let client = ObjectStoreClient::memory().unwrap();
        let ctx = Context::new();
        ctx.cancel();

        let err = client
            .put_object(&ctx, "bucket", "a.txt", Bytes::from("a"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Cancelled));

        // Nothing was written
        let listing = client.list_objects(&Context::new(), "bucket", "").unwrap();
        assert!(listing.is_empty());
    }

    #[test]
    fn test_local_client() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::Local {
            path: temp_dir.path().to_path_buf(),
        };
        let client = ObjectStoreClient::new(config).unwrap();
        let ctx = Context::new();

        client
            .put_object(&ctx, "bucket", "docs/readme.md", Bytes::from("# hi"))
            .unwrap();

        // Verify file exists on disk
        let file_path = temp_dir.path().join("bucket").join("docs").join("readme.md");
        assert!(file_path.exists());

        let listing = client.list_objects(&ctx, "bucket", "").unwrap();
        assert_eq!(listing.common_prefixes, vec!["docs/".to_string()]);
    }

    #[test]
    fn test_config_toml() {
        let config: StoreConfig = toml::from_str(
            r#"
            type = "s3"
            endpoint = "http://localhost:9000"
            region = "us-east-1"
            "#,
        )
        .unwrap();

        match config {
            StoreConfig::S3 {
                endpoint,
                region,
                access_key,
                secret_key,
            } => {
                assert_eq!(endpoint.unwrap().port(), Some(9000));
                assert_eq!(region.as_deref(), Some("us-east-1"));
                assert!(access_key.is_none());
                assert!(secret_key.is_none());
            }
            other => panic!("unexpected config: {other:?}"),
        }

        let config: StoreConfig = toml::from_str(r#"type = "memory""#).unwrap();
        assert_eq!(config, StoreConfig::Memory);
    }
}
