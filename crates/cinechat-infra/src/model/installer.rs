//! Filesystem model installer.
//!
//! "Downloads" the on-device model by copying it from a configured source
//! path into the data directory. The copy goes to a `*.partial` sibling in
//! fixed-size chunks, reporting percent progress after each one, and is
//! renamed into place only when complete, so an interrupted install never
//! looks installed.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use cinechat_core::availability::{DownloadProgress, ModelInstaller};
use cinechat_types::config::BackendConfig;
use cinechat_types::error::InstallError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};

pub struct FsModelInstaller {
    source: Option<PathBuf>,
    target: PathBuf,
    chunk_bytes: usize,
}

impl FsModelInstaller {
    /// `target` is the installed model path (see `filesystem::model_path`).
    pub fn new(target: PathBuf, config: &BackendConfig) -> Self {
        Self {
            source: config.model_source.clone(),
            target,
            chunk_bytes: config.download_chunk_bytes.max(1),
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    fn partial_path(&self) -> PathBuf {
        let mut name = self
            .target
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("model"));
        name.push(".partial");
        self.target.with_file_name(name)
    }

    fn unsupported() -> InstallError {
        InstallError::Unsupported("no on-device model source configured".to_string())
    }

    async fn copy_chunks(
        &self,
        source: &Path,
        partial: &Path,
        progress: &DownloadProgress,
    ) -> Result<(), InstallError> {
        let mut reader = match tokio::fs::File::open(source).await {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(InstallError::SourceMissing(source.display().to_string()));
            }
            Err(err) => return Err(io_error("open source", err)),
        };
        let total = reader
            .metadata()
            .await
            .map_err(|e| io_error("stat source", e))?
            .len();

        let mut writer = tokio::fs::File::create(partial)
            .await
            .map_err(|e| io_error("create partial file", e))?;
        let mut buf = vec![0u8; self.chunk_bytes];
        let mut copied: u64 = 0;

        loop {
            if progress.is_cancelled() {
                return Err(InstallError::Io("install cancelled".to_string()));
            }
            let n = reader
                .read(&mut buf)
                .await
                .map_err(|e| io_error("read source", e))?;
            if n == 0 {
                break;
            }
            writer
                .write_all(&buf[..n])
                .await
                .map_err(|e| io_error("write partial file", e))?;
            copied += n as u64;
            progress.report(percent(copied, total));
        }

        writer.flush().await.map_err(|e| io_error("flush partial file", e))?;
        writer.sync_all().await.map_err(|e| io_error("sync partial file", e))?;
        debug!(bytes = copied, "model copy complete");
        Ok(())
    }
}

fn percent(copied: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    (copied.saturating_mul(100) / total).min(100) as u8
}

fn io_error(action: &str, err: std::io::Error) -> InstallError {
    InstallError::Io(format!("{action}: {err}"))
}

impl ModelInstaller for FsModelInstaller {
    async fn is_installed(&self) -> Result<bool, InstallError> {
        match tokio::fs::metadata(&self.target).await {
            Ok(meta) if meta.is_file() => Ok(true),
            Ok(_) => Err(InstallError::Io(format!(
                "{} exists but is not a file",
                self.target.display()
            ))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                if self.source.is_none() {
                    return Err(Self::unsupported());
                }
                Ok(false)
            }
            Err(err) => Err(io_error("stat model", err)),
        }
    }

    async fn install(&self, progress: &DownloadProgress) -> Result<(), InstallError> {
        let Some(source) = &self.source else {
            return Err(Self::unsupported());
        };
        if let Some(parent) = self.target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create model dir", e))?;
        }

        let partial = self.partial_path();
        if let Err(err) = self.copy_chunks(source, &partial, progress).await {
            // Best effort; a leftover partial file is truncated by the next attempt.
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(err);
        }

        tokio::fs::rename(&partial, &self.target)
            .await
            .map_err(|e| io_error("rename partial file", e))?;
        info!(target = %self.target.display(), "on-device model installed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cinechat_core::availability::{BackendAvailability, ModelAvailability};
    use cinechat_types::backend::{BackendSnapshot, BackendState};
    use tempfile::TempDir;

    use super::*;

    fn config(source: Option<PathBuf>, chunk_bytes: usize) -> BackendConfig {
        BackendConfig {
            model_source: source,
            download_chunk_bytes: chunk_bytes,
            ..BackendConfig::default()
        }
    }

    async fn wait_for(
        availability: &impl BackendAvailability,
        pred: impl FnMut(&BackendSnapshot) -> bool,
    ) -> BackendSnapshot {
        let mut rx = availability.snapshots();
        let snapshot = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(pred))
            .await
            .expect("timed out waiting for snapshot")
            .expect("snapshot channel closed")
            .clone();
        snapshot
    }

    #[test]
    fn percent_is_bounded() {
        assert_eq!(percent(0, 0), 100);
        assert_eq!(percent(1, 4), 25);
        assert_eq!(percent(4, 4), 100);
        assert_eq!(percent(9, 4), 100);
    }

    #[test]
    fn partial_path_is_a_sibling() {
        let installer = FsModelInstaller::new(
            PathBuf::from("/data/models/cinechat.bin"),
            &BackendConfig::default(),
        );
        assert_eq!(
            installer.partial_path(),
            PathBuf::from("/data/models/cinechat.bin.partial")
        );
    }

    #[tokio::test]
    async fn no_source_and_no_model_is_unsupported() {
        let tmp = TempDir::new().unwrap();
        let installer = FsModelInstaller::new(tmp.path().join("model.bin"), &config(None, 8));
        assert!(matches!(
            installer.is_installed().await,
            Err(InstallError::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn existing_model_counts_as_installed_without_source() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("model.bin");
        tokio::fs::write(&target, b"weights").await.unwrap();

        let installer = FsModelInstaller::new(target, &config(None, 8));
        assert!(installer.is_installed().await.unwrap());
    }

    #[tokio::test]
    async fn install_copies_source_and_reaches_ready() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source.bin");
        let payload: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        tokio::fs::write(&source, &payload).await.unwrap();
        let target = tmp.path().join("models").join("model.bin");

        let installer = FsModelInstaller::new(target.clone(), &config(Some(source), 64));
        assert!(!installer.is_installed().await.unwrap());

        let availability = ModelAvailability::new(installer, &config(None, 64));
        assert!(availability.start());

        let ready = wait_for(&availability, |s| s.using_on_device_model).await;
        assert_eq!(ready.status_text, "Using on-device model");
        assert_eq!(availability.state(), BackendState::OnDeviceReady);

        assert_eq!(tokio::fs::read(&target).await.unwrap(), payload);
        assert!(!tokio::fs::try_exists(target.with_file_name("model.bin.partial")).await.unwrap());
        assert!(availability.installer().is_installed().await.unwrap());
    }

    #[tokio::test]
    async fn missing_source_fails_with_code() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("model.bin");
        let installer = FsModelInstaller::new(
            target.clone(),
            &config(Some(tmp.path().join("absent.bin")), 64),
        );

        let availability = ModelAvailability::new(installer, &BackendConfig::default());
        availability.start();

        let failed = wait_for(&availability, |s| s.last_error_code.is_some()).await;
        assert_eq!(failed.last_error_code, Some(InstallError::SourceMissing(String::new()).code()));
        assert!(failed.can_retry_download);
        assert!(!failed.using_on_device_model);
        assert!(!tokio::fs::try_exists(&target).await.unwrap());
    }

    #[tokio::test]
    async fn no_source_falls_back_to_remote() {
        let tmp = TempDir::new().unwrap();
        let installer = FsModelInstaller::new(tmp.path().join("model.bin"), &config(None, 64));

        let availability = ModelAvailability::new(installer, &BackendConfig::default());
        availability.start();

        let snapshot = wait_for(&availability, |s| s.status_text == "Using cloud model").await;
        assert!(!snapshot.using_on_device_model);
        assert_eq!(availability.state(), BackendState::RemoteFallback);
    }
}
