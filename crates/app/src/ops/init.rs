use clap::Args;

use crate::state::{AppConfig, AppState, Backend, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Bucket to browse with the s3 backend
    #[arg(long)]
    pub bucket: Option<String>,

    /// Host directory the local backend is confined to (default: /)
    #[arg(long)]
    pub root: Option<std::path::PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut config = AppConfig::default();
        if let Some(backend) = ctx.backend {
            config.backend = backend;
        }
        if let Some(bucket) = &self.bucket {
            config.s3.bucket = bucket.clone();
        }
        if let Some(root) = &self.root {
            config.local.root = root.clone();
        }

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let backend = match state.config.backend {
            Backend::Local => "local",
            Backend::S3 => "s3",
        };
        let bucket = if state.config.s3.bucket.is_empty() {
            "(unset, BUCKET_NAME is used)"
        } else {
            state.config.s3.bucket.as_str()
        };

        Ok(format!(
            "Initialized ls3 directory at: {}\n\
             - Config: {}\n\
             - Backend: {}\n\
             - Local root: {}\n\
             - Bucket: {}",
            state.config_dir.display(),
            state.config_path.display(),
            backend,
            state.config.local.root.display(),
            bucket
        ))
    }
}
