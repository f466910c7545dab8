//! Caller-driven cancellation for in-flight generative calls.
//!
//! A cancelled pipeline call aborts the generation request and surfaces
//! [`Error::Cancelled`](crate::Error::Cancelled) instead of degrading to
//! fallback output, so callers can distinguish "the model was unavailable"
//! from "I asked it to stop".

use tokio::sync::watch;

/// Create a connected cancel handle/token pair.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// The caller-side handle that triggers cancellation.
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation to every token cloned from this pair.
    pub fn cancel(&self) {
        // Receivers may already be gone; that is not an error.
        let _ = self.tx.send(true);
    }
}

/// The pipeline-side token observed inside generative calls.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// True once the paired handle has fired.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve when cancellation fires. Pends forever if the handle is
    /// dropped without cancelling, which makes this safe to race against a
    /// generation future in `tokio::select!`.
    pub async fn cancelled(&mut self) {
        if *self.rx.borrow() {
            return;
        }
        while self.rx.changed().await.is_ok() {
            if *self.rx.borrow() {
                return;
            }
        }
        std::future::pending::<()>().await;
    }
}
