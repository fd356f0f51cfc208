use clap::Args;
use common::prelude::*;

use crate::op::BackendError;

#[derive(Args, Debug, Clone)]
pub struct Ls {
    /// Directory to list, relative to the starting location
    pub path: Option<String>,

    /// Print entries as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum LsError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("ls failed: {0}")]
    Fs(#[from] FsError),
    #[error("failed to encode listing: {0}")]
    Json(#[from] serde_json::Error),
}

impl crate::op::Op for Ls {
    type Error = LsError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut fs = ctx.open_fs()?;
        if let Some(path) = &self.path {
            fs.change_dir(path)?;
        }

        let entries = fs.list_contents()?;
        if self.json {
            return Ok(serde_json::to_string_pretty(&entries)?);
        }

        Ok(entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::tests::local_ctx;
    use crate::op::Op;

    #[test]
    fn test_ls() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("root");
        std::fs::create_dir_all(root.join("b-dir/inner")).unwrap();
        std::fs::write(root.join("a.txt"), "a").unwrap();
        std::fs::write(root.join("b-dir/c.txt"), "cc").unwrap();
        let ctx = local_ctx(&temp_dir.path().join("config"), &root);

        let op = Ls {
            path: None,
            json: false,
        };
        assert_eq!(op.execute(&ctx).unwrap(), "b-dir/\na.txt");

        let op = Ls {
            path: Some("b-dir".to_string()),
            json: true,
        };
        let listing: serde_json::Value = serde_json::from_str(&op.execute(&ctx).unwrap()).unwrap();
        assert_eq!(listing[0]["name"], "inner");
        assert_eq!(listing[0]["is_dir"], true);
        assert_eq!(listing[1]["name"], "c.txt");
        assert_eq!(listing[1]["size"], 2);
        assert_eq!(listing[1]["path"], "/b-dir");
    }

    #[test]
    fn test_ls_missing_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let ctx = local_ctx(&temp_dir.path().join("config"), temp_dir.path());

        let op = Ls {
            path: Some("nope".to_string()),
            json: false,
        };
        let err = op.execute(&ctx).unwrap_err();
        assert!(matches!(&err, LsError::Fs(e) if e.kind() == ErrorKind::NotFound));
    }
}
