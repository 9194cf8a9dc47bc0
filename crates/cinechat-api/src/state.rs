//! Application state wiring all services together.
//!
//! AppState pins the core ports to the concrete infra implementations:
//! `FsModelInstaller` behind `ModelAvailability`, rule-based backends behind
//! `HybridAiBackend`, and `CatalogSearch` for recommendations.

use std::path::PathBuf;
use std::sync::Arc;

use cinechat_core::ai::{BoxAiBackend, HybridAiBackend};
use cinechat_core::availability::{BackendAvailability, ModelAvailability};
use cinechat_core::conversation::ConversationOrchestrator;
use cinechat_core::search::BoxSearchBackend;
use cinechat_infra::ai::create_backend_pair;
use cinechat_infra::config::load_global_config;
use cinechat_infra::filesystem::{catalog_path, model_path, resolve_data_dir};
use cinechat_infra::model::FsModelInstaller;
use cinechat_infra::search::CatalogSearch;
use cinechat_types::config::GlobalConfig;

pub type ConcreteAvailability = ModelAvailability<FsModelInstaller>;

pub struct AppState {
    pub data_dir: PathBuf,
    pub config: GlobalConfig,
    pub availability: Arc<ConcreteAvailability>,
    pub orchestrator: ConversationOrchestrator,
    pub catalog_path: PathBuf,
    pub catalog_entries: usize,
}

impl AppState {
    /// Load config, start the availability check, and wire the orchestrator.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;

        let model_path = model_path(&data_dir, &config);
        let installer = FsModelInstaller::new(model_path.clone(), &config.backend);
        let availability = Arc::new(ModelAvailability::new(installer, &config.backend));
        availability.start();

        let (on_device, remote) = create_backend_pair(&model_path, &config);
        let ai = HybridAiBackend::new(
            on_device,
            remote,
            Arc::clone(&availability) as Arc<dyn BackendAvailability>,
        );

        let catalog_path = catalog_path(&data_dir, &config);
        let catalog = match CatalogSearch::load(&catalog_path).await {
            Ok(catalog) => catalog,
            Err(err) => {
                tracing::warn!(error = %err, "no usable catalog, recommendations disabled");
                CatalogSearch::from_entries(Vec::new())
            }
        };
        let catalog_entries = catalog.len();

        let orchestrator = ConversationOrchestrator::new(
            BoxAiBackend::new(ai),
            BoxSearchBackend::new(catalog),
            Arc::clone(&availability) as Arc<dyn BackendAvailability>,
            config.conversation.clone(),
        );

        Ok(Self {
            data_dir,
            config,
            availability,
            orchestrator,
            catalog_path,
            catalog_entries,
        })
    }

    /// Stop in-flight queries and any running model attempt.
    pub async fn shutdown(&self) {
        self.orchestrator.shutdown().await;
        self.availability.shutdown();
    }
}
