use std::path::PathBuf;

use clap::Args;
use common::prelude::*;

use crate::op::BackendError;

#[derive(Args, Debug, Clone)]
pub struct Put {
    /// Host file to upload
    pub source: PathBuf,

    /// Destination, relative to the starting location
    pub dest: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PutError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("failed to read {}: {source}", path.display())]
    Source {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("put failed: {0}")]
    Fs(#[from] FsError),
}

impl crate::op::Op for Put {
    type Error = PutError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let content = std::fs::read(&self.source).map_err(|source| PutError::Source {
            path: self.source.clone(),
            source,
        })?;

        let fs = ctx.open_fs()?;
        fs.write_file(&self.dest, &content)?;

        Ok(format!("Wrote {} bytes to {}", content.len(), self.dest))
    }
}
