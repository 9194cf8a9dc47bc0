//! Model availability state machine.
//!
//! `ModelAvailability` owns the [`BackendState`] lifecycle and publishes its
//! [`BackendSnapshot`] projection over a `tokio::sync::watch` channel. Each
//! check/download run is an "attempt" with its own child cancellation token;
//! starting a new attempt cancels the previous one, and a cancelled attempt
//! can no longer publish.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cinechat_types::backend::{BackendSnapshot, BackendState};
use cinechat_types::config::BackendConfig;
use cinechat_types::error::InstallError;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{BackendAvailability, ModelInstaller};

/// Progress handle passed to [`ModelInstaller::install`].
///
/// Reports are dropped once the owning attempt has been superseded or shut down.
#[derive(Clone)]
pub struct DownloadProgress {
    status: Arc<StatusCell>,
    attempt: CancellationToken,
}

impl DownloadProgress {
    /// Publish download progress as a percentage (clamped to 100).
    pub fn report(&self, percent: u8) {
        self.status.transition(
            &self.attempt,
            BackendState::Downloading {
                progress: Some(percent.min(100)),
            },
        );
    }

    /// Whether the attempt this handle belongs to has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.attempt.is_cancelled()
    }
}

impl std::fmt::Debug for DownloadProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadProgress")
            .field("cancelled", &self.attempt.is_cancelled())
            .finish()
    }
}

struct MonitorState {
    current: BackendState,
    last_error_code: Option<i32>,
    attempt: Option<CancellationToken>,
}

/// Current state plus the channel its snapshots are published on.
///
/// The mutex serialises transitions with attempt cancellation, so a stale
/// attempt cannot slip a write in after it has been superseded.
struct StatusCell {
    tx: watch::Sender<BackendSnapshot>,
    state: Mutex<MonitorState>,
}

impl StatusCell {
    fn new() -> Self {
        let initial = BackendState::Unknown;
        let (tx, _) = watch::channel(initial.snapshot(None));
        Self {
            tx,
            state: Mutex::new(MonitorState {
                current: initial,
                last_error_code: None,
                attempt: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, attempt: &CancellationToken, next: BackendState) -> bool {
        let mut state = self.lock();
        Self::apply(&self.tx, &mut state, attempt, next, None)
    }

    /// Record an install failure. `Unsupported` during the initial check
    /// degrades to the remote fallback; everything else is a failed download.
    fn fail(&self, attempt: &CancellationToken, err: &InstallError) -> bool {
        let mut state = self.lock();
        let next = match err {
            InstallError::Unsupported(_) if state.current == BackendState::Checking => {
                BackendState::RemoteFallback
            }
            _ => BackendState::OnDeviceFailed {
                error_code: err.code(),
            },
        };
        warn!(error = %err, code = err.code(), "on-device model attempt failed");
        Self::apply(&self.tx, &mut state, attempt, next, Some(err.code()))
    }

    fn apply(
        tx: &watch::Sender<BackendSnapshot>,
        state: &mut MonitorState,
        attempt: &CancellationToken,
        next: BackendState,
        error_code: Option<i32>,
    ) -> bool {
        if attempt.is_cancelled() {
            debug!(to = %next, "dropping transition from superseded attempt");
            return false;
        }
        if state.current == next {
            return true;
        }
        if !state.current.can_transition_to(&next) {
            warn!(from = %state.current, to = %next, "rejected backend transition");
            return false;
        }

        match (&state.current, &next) {
            (BackendState::Downloading { .. }, BackendState::Downloading { progress }) => {
                debug!(progress = ?progress, "download progress");
            }
            (from, to) => info!(from = %from, to = %to, "backend state changed"),
        }

        if error_code.is_some() {
            state.last_error_code = error_code;
        }
        state.current = next;
        tx.send_replace(state.current.snapshot(state.last_error_code));
        true
    }
}

struct Inner<I> {
    installer: I,
    status: Arc<StatusCell>,
    prefer_on_device: bool,
    shutdown: CancellationToken,
}

impl<I: ModelInstaller> Inner<I> {
    async fn run_attempt(&self, attempt: &CancellationToken) {
        let status = &self.status;

        if !self.prefer_on_device {
            status.transition(attempt, BackendState::RemoteFallback);
            return;
        }

        status.transition(attempt, BackendState::Checking);
        match self.installer.is_installed().await {
            Ok(true) => {
                status.transition(attempt, BackendState::OnDeviceReady);
                return;
            }
            Ok(false) => {}
            Err(err) => {
                status.fail(attempt, &err);
                return;
            }
        }

        status.transition(attempt, BackendState::Downloading { progress: None });
        let progress = DownloadProgress {
            status: Arc::clone(status),
            attempt: attempt.clone(),
        };
        match self.installer.install(&progress).await {
            Ok(()) => {
                status.transition(attempt, BackendState::OnDeviceReady);
            }
            Err(err) => {
                status.fail(attempt, &err);
            }
        }
    }
}

/// [`BackendAvailability`] implementation driven by a [`ModelInstaller`].
///
/// Spawns its attempts on the ambient Tokio runtime, so `start` and
/// `retry_download` must be called from within one. Dropping the monitor
/// cancels any running attempt.
pub struct ModelAvailability<I> {
    inner: Arc<Inner<I>>,
}

impl<I: ModelInstaller> ModelAvailability<I> {
    pub fn new(installer: I, config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                installer,
                status: Arc::new(StatusCell::new()),
                prefer_on_device: config.prefer_on_device,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Run the initial availability check (and download, if needed).
    pub fn start(&self) -> bool {
        self.begin_attempt("start")
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BackendState {
        self.inner.status.lock().current.clone()
    }

    pub fn installer(&self) -> &I {
        &self.inner.installer
    }

    /// Cancel any running attempt and refuse new ones.
    pub fn shutdown(&self) {
        let mut state = self.inner.status.lock();
        self.inner.shutdown.cancel();
        state.attempt = None;
    }

    fn begin_attempt(&self, trigger: &'static str) -> bool {
        let attempt = {
            let mut state = self.inner.status.lock();
            if self.inner.shutdown.is_cancelled() {
                debug!(trigger, "availability monitor shut down, ignoring");
                return false;
            }
            if state.current == BackendState::OnDeviceReady {
                debug!(trigger, "on-device model already ready, ignoring");
                return false;
            }
            if let Some(previous) = state.attempt.take() {
                debug!(trigger, "superseding running attempt");
                previous.cancel();
            }
            let token = self.inner.shutdown.child_token();
            state.attempt = Some(token.clone());
            token
        };

        info!(trigger, "starting on-device model attempt");
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::select! {
                _ = attempt.cancelled() => {
                    debug!("model attempt cancelled");
                }
                _ = inner.run_attempt(&attempt) => {}
            }
        });
        true
    }
}

impl<I: ModelInstaller> BackendAvailability for ModelAvailability<I> {
    fn snapshots(&self) -> watch::Receiver<BackendSnapshot> {
        self.inner.status.tx.subscribe()
    }

    fn retry_download(&self) {
        self.begin_attempt("retry");
    }
}

impl<I> Drop for ModelAvailability<I> {
    fn drop(&mut self) {
        self.inner.shutdown.cancel();
    }
}
