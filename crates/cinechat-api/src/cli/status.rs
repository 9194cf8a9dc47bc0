//! AI backend status command.

use std::time::Duration;

use anyhow::Result;
use cinechat_core::availability::BackendAvailability;
use cinechat_types::backend::BackendState;
use console::style;

use crate::cli::chat::renderer::format_backend;
use crate::state::AppState;

/// States that will not change without a retry.
fn is_settled(state: &BackendState) -> bool {
    matches!(
        state,
        BackendState::OnDeviceReady | BackendState::OnDeviceFailed { .. } | BackendState::RemoteFallback
    )
}

/// Wait (bounded) for the availability check to settle, then print it.
pub async fn status(state: &AppState, wait_secs: u64, json: bool) -> Result<()> {
    let availability = &state.availability;
    let mut updates = availability.snapshots();
    let settle = async {
        while !is_settled(&availability.state()) {
            if updates.changed().await.is_err() {
                break;
            }
        }
    };
    let settled = tokio::time::timeout(Duration::from_secs(wait_secs), settle)
        .await
        .is_ok();

    let snapshot = availability.current();
    let model = state.availability.installer().target().display().to_string();

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "settled": settled,
            "backend": snapshot,
            "state": availability.state(),
            "prefer_on_device": state.config.backend.prefer_on_device,
            "model_path": model,
            "catalog_path": state.catalog_path.display().to_string(),
            "catalog_entries": state.catalog_entries,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} cinechat v{}",
        style("🎬").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("{}", format_backend(&snapshot));
    if !settled {
        println!("  {}", style("(still settling, run again for the final state)").dim());
    }
    if let Some(code) = snapshot.last_error_code {
        println!("  {}  {}", style("Last error:").bold(), code);
    }
    println!();
    println!("  {}    {}", style("Data dir:").bold(), state.data_dir.display());
    println!("  {}       {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {}     {} ({} titles)",
        style("Catalog:").bold(),
        style(state.catalog_path.display()).dim(),
        state.catalog_entries
    );
    println!();

    Ok(())
}
