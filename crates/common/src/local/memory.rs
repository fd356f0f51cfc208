use std::collections::BTreeMap;
use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::entry::RawEntry;
use crate::path::{self, ROOT, SEPARATOR};

use super::provider::{FileSink, FsProvider, Stat};

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(Bytes),
}

/// In-memory filesystem.
///
/// Cloning is cheap and every clone sees the same tree, so a test can keep
/// a handle after giving one to a backend.
#[derive(Debug, Clone)]
pub struct MemFs {
    nodes: Arc<RwLock<BTreeMap<String, Node>>>,
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(path: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{path}: no such file or directory"),
    )
}

fn not_a_dir(path: &str) -> io::Error {
    io::Error::other(format!("{path}: not a directory"))
}

fn is_a_dir(path: &str) -> io::Error {
    io::Error::other(format!("{path}: is a directory"))
}

impl MemFs {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(ROOT.to_string(), Node::Dir);
        Self {
            nodes: Arc::new(RwLock::new(nodes)),
        }
    }

    fn key(path: &str) -> String {
        path::clean(&format!("{ROOT}{path}"))
    }

    /// Create `path` and any missing parents.
    pub fn mkdir_all(&self, path: &str) -> io::Result<()> {
        let key = Self::key(path);
        let mut nodes = self.nodes.write();

        let mut current = String::new();
        for part in key.split(SEPARATOR).filter(|p| !p.is_empty()) {
            current.push(SEPARATOR);
            current.push_str(part);
            match nodes.get(&current) {
                Some(Node::Dir) => {}
                Some(Node::File(_)) => return Err(not_a_dir(&current)),
                None => {
                    nodes.insert(current.clone(), Node::Dir);
                }
            }
        }
        Ok(())
    }

    /// Write a file, creating missing parents.
    pub fn insert_file(&self, path: &str, data: impl Into<Bytes>) -> io::Result<()> {
        let key = Self::key(path);
        self.mkdir_all(&path::parent(&key))?;

        let mut nodes = self.nodes.write();
        if let Some(Node::Dir) = nodes.get(&key) {
            return Err(is_a_dir(&key));
        }
        nodes.insert(key, Node::File(data.into()));
        Ok(())
    }

    fn ensure_parent_dir(nodes: &BTreeMap<String, Node>, key: &str) -> io::Result<()> {
        let parent = path::parent(key);
        match nodes.get(&parent) {
            Some(Node::Dir) => Ok(()),
            Some(Node::File(_)) => Err(not_a_dir(&parent)),
            None => Err(not_found(&parent)),
        }
    }
}

impl FsProvider for MemFs {
    fn read_dir(&self, path: &str) -> io::Result<Vec<RawEntry>> {
        let key = Self::key(path);
        let nodes = self.nodes.read();

        match nodes.get(&key) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => return Err(not_a_dir(&key)),
            None => return Err(not_found(&key)),
        }

        let prefix = if key == ROOT {
            key
        } else {
            format!("{key}{SEPARATOR}")
        };

        let entries = nodes
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .filter_map(|(k, node)| {
                let name = &k[prefix.len()..];
                if name.is_empty() || name.contains(SEPARATOR) {
                    return None;
                }
                Some(match node {
                    Node::Dir => RawEntry::new(name, true, 0),
                    Node::File(data) => RawEntry::new(name, false, data.len() as u64),
                })
            })
            .collect();
        Ok(entries)
    }

    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        let key = Self::key(path);
        match self.nodes.read().get(&key) {
            Some(Node::File(data)) => Ok(Box::new(Cursor::new(data.clone()))),
            Some(Node::Dir) => Err(is_a_dir(&key)),
            None => Err(not_found(&key)),
        }
    }

    fn create(&self, path: &str) -> io::Result<Box<dyn FileSink>> {
        let key = Self::key(path);
        {
            let nodes = self.nodes.read();
            Self::ensure_parent_dir(&nodes, &key)?;
            if let Some(Node::Dir) = nodes.get(&key) {
                return Err(is_a_dir(&key));
            }
        }
        Ok(Box::new(MemSink {
            fs: self.clone(),
            key,
            buf: Vec::new(),
        }))
    }

    fn stat(&self, path: &str) -> io::Result<Stat> {
        let key = Self::key(path);
        match self.nodes.read().get(&key) {
            Some(Node::Dir) => Ok(Stat {
                is_dir: true,
                size: 0,
            }),
            Some(Node::File(data)) => Ok(Stat {
                is_dir: false,
                size: data.len() as u64,
            }),
            None => Err(not_found(&key)),
        }
    }

    fn create_dir(&self, path: &str) -> io::Result<()> {
        let key = Self::key(path);
        let mut nodes = self.nodes.write();
        if nodes.contains_key(&key) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{key}: already exists"),
            ));
        }
        Self::ensure_parent_dir(&nodes, &key)?;
        nodes.insert(key, Node::Dir);
        Ok(())
    }

    fn remove_file(&self, path: &str) -> io::Result<()> {
        let key = Self::key(path);
        let mut nodes = self.nodes.write();
        match nodes.get(&key) {
            Some(Node::File(_)) => {
                nodes.remove(&key);
                Ok(())
            }
            Some(Node::Dir) => Err(is_a_dir(&key)),
            None => Err(not_found(&key)),
        }
    }
}

/// Buffers the whole file and inserts it in one step on commit.
struct MemSink {
    fs: MemFs,
    key: String,
    buf: Vec<u8>,
}

impl Write for MemSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FileSink for MemSink {
    fn commit(self: Box<Self>) -> io::Result<()> {
        let MemSink { fs, key, buf } = *self;
        let mut nodes = fs.nodes.write();

        // the tree may have changed since the sink was opened
        MemFs::ensure_parent_dir(&nodes, &key)?;
        if let Some(Node::Dir) = nodes.get(&key) {
            return Err(is_a_dir(&key));
        }
        nodes.insert(key, Node::File(Bytes::from(buf)));
        Ok(())
    }
}
