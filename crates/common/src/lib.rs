/**
 * Description of a single listing element
 *  and the order listings are presented in.
 */
pub mod entry;
pub mod error;
/**
 * The navigation contract shared by every backend:
 *  list, change directory, read and write.
 */
pub mod fs;
/**
 * Local filesystem backend, over the host
 *  filesystem or an in-memory tree.
 */
pub mod local;
/**
 * Object store backend. Emulates directories
 *  on top of flat, prefix-keyed storage.
 */
pub mod object;
pub mod path;

pub use store;

pub mod prelude {
    pub use crate::entry::{sort_entries, Entry, RawEntry};
    pub use crate::error::{ErrorKind, FsError};
    pub use crate::fs::FileSystem;
    pub use crate::local::{FsProvider, LocalFs, MemFs, OsFs};
    pub use crate::object::ObjectStoreFs;
    pub use store::{Context, ObjectStoreClient, StoreClient, StoreConfig, StoreError};
}
