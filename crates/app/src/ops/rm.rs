use clap::Args;
use common::prelude::*;

use crate::op::BackendError;

#[derive(Args, Debug, Clone)]
pub struct Rm {
    /// File to remove, relative to the starting location
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RmError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("rm failed: {0}")]
    Fs(#[from] FsError),
}

impl crate::op::Op for Rm {
    type Error = RmError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let fs = ctx.open_fs()?;
        fs.remove_file(&self.path)?;
        Ok(format!("Removed {}", self.path))
    }
}
