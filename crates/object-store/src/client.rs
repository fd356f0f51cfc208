//! The store client boundary.
//!
//! A deliberately small, blocking RPC surface over one object store: list a
//! prefix with a `/` delimiter, and get, put or delete a single key. Keys and
//! prefixes use S3 conventions: a prefix that names a "directory" ends with
//! `/`, and the empty prefix is the bucket root.

use std::io::Read;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::Result;

/// The key delimiter used for list requests.
pub const DELIMITER: char = '/';

/// One object returned by a list request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Full key of the object
    pub key: String,
    /// Size of the object in bytes
    pub size: u64,
}

impl ObjectInfo {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }
}

/// Response of a list-with-delimiter request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult {
    /// Prefixes shared by keys below the requested prefix, up to and
    ///  including the next delimiter
    pub common_prefixes: Vec<String>,
    /// Objects directly below the requested prefix
    pub objects: Vec<ObjectInfo>,
}

impl ListResult {
    pub fn is_empty(&self) -> bool {
        self.common_prefixes.is_empty() && self.objects.is_empty()
    }
}

/// Minimal RPC façade over an object store.
///
/// Every call carries a [`Context`]; implementations must fail with
/// [`StoreError::Cancelled`](crate::StoreError::Cancelled) or
/// [`StoreError::TimedOut`](crate::StoreError::TimedOut) rather than leave a
/// request half-applied. Implementations never retry on their callers'
/// behalf unless documented.
pub trait StoreClient: Send + Sync {
    /// List the common prefixes and objects directly below `prefix`.
    fn list_objects(&self, ctx: &Context, bucket: &str, prefix: &str) -> Result<ListResult>;

    /// Open the body of the object stored under `key`.
    fn get_object(&self, ctx: &Context, bucket: &str, key: &str) -> Result<Box<dyn Read + Send>>;

    /// Store `body` under `key`, replacing any existing object.
    fn put_object(&self, ctx: &Context, bucket: &str, key: &str, body: Bytes) -> Result<()>;

    /// Remove the object stored under `key`.
    fn delete_object(&self, ctx: &Context, bucket: &str, key: &str) -> Result<()>;
}
