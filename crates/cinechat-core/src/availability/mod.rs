//! AI backend availability.
//!
//! `BackendAvailability` is the port the conversation layer reads from: a
//! replayable, latest-wins stream of [`BackendSnapshot`] values plus a
//! fire-and-forget retry trigger. `ModelAvailability` is the state-machine
//! implementation driven by a [`ModelInstaller`].

pub mod monitor;

use std::future::Future;

use cinechat_types::backend::BackendSnapshot;
use cinechat_types::error::InstallError;
use tokio::sync::watch;

pub use monitor::{DownloadProgress, ModelAvailability};

/// Source of AI backend availability snapshots.
pub trait BackendAvailability: Send + Sync {
    /// Subscribe to snapshots. The receiver starts at the current value and
    /// only ever observes the latest one; intermediate values may be skipped.
    fn snapshots(&self) -> watch::Receiver<BackendSnapshot>;

    /// Request a fresh check/download of the on-device model.
    fn retry_download(&self);

    /// The most recently published snapshot.
    fn current(&self) -> BackendSnapshot {
        self.snapshots().borrow().clone()
    }
}

/// Checks for and installs the on-device model artifact.
///
/// Implementations live in cinechat-infra (e.g., `FsModelInstaller`).
pub trait ModelInstaller: Send + Sync + 'static {
    /// Whether the model is already installed and usable.
    ///
    /// Returns `InstallError::Unsupported` when this device cannot run an
    /// on-device model at all.
    fn is_installed(&self) -> impl Future<Output = Result<bool, InstallError>> + Send;

    /// Download/install the model, reporting percent progress as it goes.
    fn install(
        &self,
        progress: &DownloadProgress,
    ) -> impl Future<Output = Result<(), InstallError>> + Send;
}
