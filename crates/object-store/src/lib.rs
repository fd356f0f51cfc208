//! Store client for ls3
//!
//! This crate defines the small, blocking RPC surface the object-store
//! backend navigates through ([`StoreClient`]), the per-request [`Context`]
//! carrying cancellation and timeouts, and a concrete client backed by the
//! `object_store` crate (S3/MinIO/local filesystem/memory).
//!
//! # Example
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use ls3_object_store::{Context, ObjectStoreClient, StoreClient};
//!
//! # fn example() -> Result<(), ls3_object_store::StoreError> {
//! let client = ObjectStoreClient::memory()?;
//! let ctx = Context::new();
//!
//! client.put_object(&ctx, "my-bucket", "docs/readme.md", Bytes::from("hello"))?;
//! let listing = client.list_objects(&ctx, "my-bucket", "")?;
//! assert_eq!(listing.common_prefixes, vec!["docs/".to_string()]);
//! # Ok(())
//! # }
//! ```

mod client;
mod context;
mod error;
mod storage;

pub use client::{ListResult, ObjectInfo, StoreClient, DELIMITER};
pub use context::Context;
pub use error::{Result, StoreError};
pub use storage::{ObjectStoreClient, StoreConfig};
