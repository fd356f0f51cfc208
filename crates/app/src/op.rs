use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use common::prelude::*;

use crate::state::{AppConfig, AppState, Backend, StateError};

#[derive(Debug, Clone)]
pub struct OpContext {
    /// Optional custom config path (defaults to ~/.ls3)
    pub config_path: Option<PathBuf>,
    /// Backend chosen on the command line, ahead of the config file
    pub backend: Option<Backend>,
}

impl OpContext {
    pub fn new(config_path: Option<PathBuf>, backend: Option<Backend>) -> Self {
        Self {
            config_path,
            backend,
        }
    }

    /// Load the config and open the selected backend at its starting location.
    pub fn open_fs(&self) -> Result<Box<dyn FileSystem>, BackendError> {
        let state = AppState::load(self.config_path.clone())?;
        let backend = self.backend.unwrap_or(state.config.backend);
        open_fs(&state.config, backend)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to load config: {0}")]
    State(#[from] StateError),

    #[error("no bucket configured: set s3.bucket or BUCKET_NAME")]
    MissingBucket,

    #[error("failed to resolve current directory: {0}")]
    CurrentDir(#[from] std::io::Error),

    #[error("failed to create store client: {0}")]
    Store(#[from] StoreError),
}

/// Build `backend` from `config`.
pub fn open_fs(config: &AppConfig, backend: Backend) -> Result<Box<dyn FileSystem>, BackendError> {
    match backend {
        Backend::Local => {
            let base_dir = match &config.local.base_dir {
                Some(base_dir) => base_dir.clone(),
                None => base_dir_within(&config.local.root, &std::env::current_dir()?),
            };
            let provider = Arc::new(OsFs::new(&config.local.root));

            tracing::debug!(root = %config.local.root.display(), base_dir = %base_dir, "opening local backend");
            Ok(Box::new(LocalFs::with_provider(provider, &base_dir)))
        }
        Backend::S3 => {
            let s3 = &config.s3;
            if s3.bucket.is_empty() {
                return Err(BackendError::MissingBucket);
            }

            let client = ObjectStoreClient::new(s3.store.clone())?;
            let mut ctx = Context::new();
            if let Some(secs) = s3.timeout_secs {
                ctx = ctx.with_timeout(Duration::from_secs(secs));
            }

            tracing::debug!(bucket = %s3.bucket, prefix = %s3.prefix, "opening s3 backend");
            let fs = ObjectStoreFs::new(Arc::new(client), s3.bucket.as_str(), &s3.prefix)
                .with_context(ctx);
            Ok(Box::new(fs))
        }
    }
}

/// Starting directory for `cwd`, expressed below `root`.
///
/// Falls back to `/` when `cwd` is outside of `root`.
fn base_dir_within(root: &Path, cwd: &Path) -> String {
    match cwd.strip_prefix(root) {
        Ok(relative) => format!("/{}", relative.to_string_lossy()),
        Err(_) => {
            tracing::debug!(root = %root.display(), cwd = %cwd.display(), "current directory is outside the local root");
            "/".to_string()
        }
    }
}

pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::op::Op>::Error),
            )*
        }

        impl $crate::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            fn execute(&self, ctx: &$crate::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx)
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
