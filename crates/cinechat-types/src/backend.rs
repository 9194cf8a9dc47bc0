//! AI backend availability types.
//!
//! `BackendState` is the lifecycle of the on-device model (check, download,
//! ready, failed) plus the remote fallback. `BackendSnapshot` is the flat,
//! UI-facing projection of that state that gets published to observers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where AI requests are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    OnDevice,
    Remote,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::OnDevice => write!(f, "on_device"),
            ExecutionMode::Remote => write!(f, "remote"),
        }
    }
}

/// Lifecycle of the AI execution backend.
///
/// ```text
/// Unknown -> Checking -> OnDeviceReady
///                     -> Downloading(progress) -> OnDeviceReady | OnDeviceFailed | Checking (retry)
///                     -> OnDeviceFailed(code)  -> Checking (retry)
///                     -> RemoteFallback        -> Checking (retry)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BackendState {
    Unknown,
    Checking,
    OnDeviceReady,
    Downloading { progress: Option<u8> },
    OnDeviceFailed { error_code: i32 },
    RemoteFallback,
}

impl BackendState {
    /// Whether moving from `self` to `next` is a legal lifecycle transition.
    pub fn can_transition_to(&self, next: &BackendState) -> bool {
        use BackendState::*;
        matches!(
            (self, next),
            (Unknown, Checking | RemoteFallback)
                | (
                    Checking,
                    OnDeviceReady | Downloading { .. } | OnDeviceFailed { .. } | RemoteFallback
                )
                | (
                    Downloading { .. },
                    Downloading { .. } | OnDeviceReady | OnDeviceFailed { .. } | Checking
                )
                | (OnDeviceFailed { .. }, Checking)
                | (RemoteFallback, Checking)
        )
    }

    /// Mode that requests should be routed to while in this state.
    pub fn execution_mode(&self) -> ExecutionMode {
        match self {
            BackendState::OnDeviceReady => ExecutionMode::OnDevice,
            _ => ExecutionMode::Remote,
        }
    }

    /// Whether an operator-triggered retry makes sense from this state.
    pub fn can_retry(&self) -> bool {
        matches!(
            self,
            BackendState::Downloading { .. }
                | BackendState::OnDeviceFailed { .. }
                | BackendState::RemoteFallback
        )
    }

    /// Human-readable status line.
    pub fn status_text(&self) -> String {
        match self {
            BackendState::Unknown => "AI backend status unknown".to_string(),
            BackendState::Checking => "Checking on-device model".to_string(),
            BackendState::OnDeviceReady => "Using on-device model".to_string(),
            BackendState::Downloading { progress: Some(p) } => {
                format!("Downloading on-device model ({p}%)")
            }
            BackendState::Downloading { progress: None } => {
                "Downloading on-device model".to_string()
            }
            BackendState::OnDeviceFailed { error_code } => {
                format!("On-device model unavailable (error {error_code}), using cloud model")
            }
            BackendState::RemoteFallback => "Using cloud model".to_string(),
        }
    }

    /// Project this state into the published snapshot.
    ///
    /// `last_error_code` is carried separately because it survives a retry:
    /// the snapshot keeps reporting the most recent failure until a new one
    /// replaces it.
    pub fn snapshot(&self, last_error_code: Option<i32>) -> BackendSnapshot {
        let download_progress = match self {
            BackendState::Downloading { progress: Some(p) } => Some(format!("{p}%")),
            _ => None,
        };

        BackendSnapshot {
            using_on_device_model: self.execution_mode() == ExecutionMode::OnDevice,
            status_text: self.status_text(),
            is_downloading: matches!(self, BackendState::Downloading { .. }),
            download_progress,
            can_retry_download: self.can_retry(),
            last_error_code,
        }
    }
}

impl fmt::Display for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendState::Unknown => write!(f, "unknown"),
            BackendState::Checking => write!(f, "checking"),
            BackendState::OnDeviceReady => write!(f, "on_device_ready"),
            BackendState::Downloading { .. } => write!(f, "downloading"),
            BackendState::OnDeviceFailed { .. } => write!(f, "on_device_failed"),
            BackendState::RemoteFallback => write!(f, "remote_fallback"),
        }
    }
}

/// Flat, immutable view of the AI backend availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSnapshot {
    pub using_on_device_model: bool,
    pub status_text: String,
    pub is_downloading: bool,
    pub download_progress: Option<String>,
    pub can_retry_download: bool,
    pub last_error_code: Option<i32>,
}

impl Default for BackendSnapshot {
    fn default() -> Self {
        BackendState::Unknown.snapshot(None)
    }
}
