//! Shared test utilities for backend integration tests
#![allow(dead_code)]

use std::error::Error;
use std::io::Read;

use bytes::Bytes;
use common::local::MemFs;
use common::store::{self, Context, ListResult, StoreClient};

pub const FIXTURE_DIRS: &[&str] = &["/.git", "/dir1", "/_dir2", "/dir3/subdir"];

pub const FIXTURE_FILES: &[&str] = &[
    "/_foo.txt",
    "/bar.json",
    "/.gitignore",
    "/_dir2/sub-file.txt",
    "/dir3/subdir/another_file",
];

/// Route backend logs to the test harness when RUST_LOG is set
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Consistent body for fixture files
pub fn file_body(name: &str) -> String {
    format!("This file is called {name:?}\n")
}

/// Set up an in-memory filesystem populated with the fixture tree
pub fn prepare_mem_fs() -> MemFs {
    init_tracing();
    let fs = MemFs::new();
    for dir in FIXTURE_DIRS {
        fs.mkdir_all(dir).unwrap();
    }
    for file in FIXTURE_FILES {
        fs.insert_file(file, file_body(file)).unwrap();
    }
    fs
}

/// Search the source chain of `err` for an error of type `T`
pub fn find_source<'a, T: Error + 'static>(err: &'a (dyn Error + 'static)) -> Option<&'a T> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(found) = e.downcast_ref::<T>() {
            return Some(found);
        }
        current = e.source();
    }
    None
}

/// Distinct error type used to check error identity survives wrapping
#[derive(Debug, thiserror::Error)]
#[error("something went wrong")]
pub struct SomethingWentWrong;

type ListFn = Box<dyn Fn(&Context, &str, &str) -> store::Result<ListResult> + Send + Sync>;
type GetFn = Box<dyn Fn(&Context, &str, &str) -> store::Result<Box<dyn Read + Send>> + Send + Sync>;
type PutFn = Box<dyn Fn(&Context, &str, &str, Bytes) -> store::Result<()> + Send + Sync>;
type DeleteFn = Box<dyn Fn(&Context, &str, &str) -> store::Result<()> + Send + Sync>;

/// Store client whose responses are scripted per call. Unscripted calls panic.
#[derive(Default)]
pub struct ScriptedClient {
    list: Option<ListFn>,
    get: Option<GetFn>,
    put: Option<PutFn>,
    delete: Option<DeleteFn>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_list<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, &str, &str) -> store::Result<ListResult> + Send + Sync + 'static,
    {
        self.list = Some(Box::new(f));
        self
    }

    pub fn on_get<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, &str, &str) -> store::Result<Box<dyn Read + Send>> + Send + Sync + 'static,
    {
        self.get = Some(Box::new(f));
        self
    }

    pub fn on_put<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, &str, &str, Bytes) -> store::Result<()> + Send + Sync + 'static,
    {
        self.put = Some(Box::new(f));
        self
    }

    pub fn on_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, &str, &str) -> store::Result<()> + Send + Sync + 'static,
    {
        self.delete = Some(Box::new(f));
        self
    }
}

impl StoreClient for ScriptedClient {
    fn list_objects(&self, ctx: &Context, bucket: &str, prefix: &str) -> store::Result<ListResult> {
        let f = self.list.as_ref().expect("unexpected list_objects call");
        f(ctx, bucket, prefix)
    }

    fn get_object(
        &self,
        ctx: &Context,
        bucket: &str,
        key: &str,
    ) -> store::Result<Box<dyn Read + Send>> {
        let f = self.get.as_ref().expect("unexpected get_object call");
        f(ctx, bucket, key)
    }

    fn put_object(&self, ctx: &Context, bucket: &str, key: &str, body: Bytes) -> store::Result<()> {
        let f = self.put.as_ref().expect("unexpected put_object call");
        f(ctx, bucket, key, body)
    }

    fn delete_object(&self, ctx: &Context, bucket: &str, key: &str) -> store::Result<()> {
        let f = self.delete.as_ref().expect("unexpected delete_object call");
        f(ctx, bucket, key)
    }
}
