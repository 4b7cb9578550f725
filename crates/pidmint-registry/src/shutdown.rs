//! Cooperative shutdown signaling
//!
//! A host that wants to abort in-progress retry backoff holds the
//! `ShutdownHandle` and hands the `ShutdownSignal` to the transport. The
//! default signal never fires.

use tokio::sync::watch;

/// Sender half; calling [`ShutdownHandle::shutdown`] wakes every signal.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

/// Receiver half, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl ShutdownSignal {
    /// A signal that never fires.
    pub fn none() -> Self {
        Self::default()
    }

    /// Resolves once shutdown has been requested. A dropped handle counts
    /// as "never", not as shutdown.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.rx else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                return std::future::pending().await;
            }
        }
    }
}

/// Create a connected handle/signal pair.
pub fn pair() -> (ShutdownHandle, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, ShutdownSignal { rx: Some(rx) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn signal_fires_after_shutdown() {
        let (handle, signal) = pair();
        handle.shutdown();
        tokio::time::timeout(Duration::from_secs(1), signal.cancelled())
            .await
            .expect("signal should fire");
    }

    #[tokio::test]
    async fn default_signal_never_fires() {
        let signal = ShutdownSignal::none();
        let fired = tokio::time::timeout(Duration::from_millis(20), signal.cancelled())
            .await
            .is_ok();
        assert!(!fired);
    }

    #[tokio::test]
    async fn dropped_handle_does_not_fire() {
        let (handle, signal) = pair();
        drop(handle);
        let fired = tokio::time::timeout(Duration::from_millis(20), signal.cancelled())
            .await
            .is_ok();
        assert!(!fired);
    }
}
