use clap::Args;
use common::prelude::*;

use crate::op::BackendError;

#[derive(Args, Debug, Clone)]
pub struct Cat {
    /// File to print, relative to the starting location
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("cat failed: {0}")]
    Fs(#[from] FsError),
}

impl crate::op::Op for Cat {
    type Error = CatError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let fs = ctx.open_fs()?;
        let content = fs.read_file(&self.path)?;
        // binary content is shown lossily
        Ok(String::from_utf8_lossy(&content).into_owned())
    }
}
