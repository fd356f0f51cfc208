use clap::Args;
use common::prelude::*;

use crate::op::BackendError;

#[derive(Args, Debug, Clone)]
pub struct Mkdir {
    /// Directory to create, relative to the starting location
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MkdirError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("mkdir failed: {0}")]
    Fs(#[from] FsError),
}

impl crate::op::Op for Mkdir {
    type Error = MkdirError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let fs = ctx.open_fs()?;
        fs.create_dir(&self.path)?;
        Ok(format!("Created directory {}", self.path))
    }
}
