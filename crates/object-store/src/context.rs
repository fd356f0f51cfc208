//! Per-request cancellation and timeout.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{Result, StoreError};

/// Cancellation and deadline carried by every store request.
///
/// Clones share the same cancellation token, so a caller can hand one clone
/// to a backend and keep another to abort in-flight requests from a
/// different thread.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    timeout: Option<Duration>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound every request issued with this context.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use an existing token, e.g. one owned by the UI.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `fut` to completion unless the context is cancelled or the
    /// timeout elapses first.
    pub async fn run<F, T, E>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: Into<StoreError>,
    {
        if self.is_cancelled() {
            return Err(StoreError::Cancelled);
        }

        let bounded = async {
            match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, fut).await {
                    Ok(res) => res.map_err(Into::into),
                    Err(_) => Err(StoreError::TimedOut(limit)),
                },
                None => fut.await.map_err(Into::into),
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(StoreError::Cancelled),
            res = bounded => res,
        }
    }
}
