//! On-device / remote routing.
//!
//! Routes each AI call to the on-device backend while the availability
//! snapshot says the local model is usable, and to the remote backend
//! otherwise. An on-device `ModelUnavailable` error fails over to the remote
//! backend once; any other error is returned as-is.
//!
//! The route is resolved per call, not per query. The two calls of one
//! fan-out can therefore land on different backends if the model becomes
//! ready between them. `OnDeviceReady` is terminal, so the only possible
//! split is remote for one call and on-device for the other.

use std::sync::Arc;

use cinechat_types::backend::ExecutionMode;
use cinechat_types::error::AiError;
use tracing::{debug, warn};

use super::backend::AiBackend;
use super::box_backend::BoxAiBackend;
use crate::availability::BackendAvailability;

pub struct HybridAiBackend {
    on_device: BoxAiBackend,
    remote: BoxAiBackend,
    availability: Arc<dyn BackendAvailability>,
}

impl HybridAiBackend {
    pub fn new(
        on_device: BoxAiBackend,
        remote: BoxAiBackend,
        availability: Arc<dyn BackendAvailability>,
    ) -> Self {
        Self {
            on_device,
            remote,
            availability,
        }
    }

    /// Mode the next call will be routed to.
    pub fn route(&self) -> ExecutionMode {
        if self.availability.current().using_on_device_model {
            ExecutionMode::OnDevice
        } else {
            ExecutionMode::Remote
        }
    }

    fn log_failover(&self, operation: &str, reason: &str) {
        warn!(
            operation,
            from = self.on_device.name(),
            to = self.remote.name(),
            reason,
            "on-device model unavailable, failing over"
        );
    }
}

impl AiBackend for HybridAiBackend {
    fn name(&self) -> &str {
        "hybrid"
    }

    async fn generate_reply(&self, query: &str) -> Result<String, AiError> {
        let mode = self.route();
        debug!(mode = %mode, "routing generate_reply");
        if mode == ExecutionMode::Remote {
            return self.remote.generate_reply(query).await;
        }
        match self.on_device.generate_reply(query).await {
            Err(AiError::ModelUnavailable(reason)) => {
                self.log_failover("generate_reply", &reason);
                self.remote.generate_reply(query).await
            }
            other => other,
        }
    }

    async fn extract_search_terms(&self, query: &str) -> Result<Vec<String>, AiError> {
        let mode = self.route();
        debug!(mode = %mode, "routing extract_search_terms");
        if mode == ExecutionMode::Remote {
            return self.remote.extract_search_terms(query).await;
        }
        match self.on_device.extract_search_terms(query).await {
            Err(AiError::ModelUnavailable(reason)) => {
                self.log_failover("extract_search_terms", &reason);
                self.remote.extract_search_terms(query).await
            }
            other => other,
        }
    }

    fn retry_download(&self) {
        self.availability.retry_download();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use cinechat_types::backend::BackendState;

    use super::*;
    use crate::test_support::{MockAi, MockAvailability, ReplyScript};

    fn hybrid(
        on_device: MockAi,
        remote: MockAi,
        availability: Arc<MockAvailability>,
    ) -> HybridAiBackend {
        HybridAiBackend::new(
            BoxAiBackend::new(on_device),
            BoxAiBackend::new(remote),
            availability,
        )
    }

    #[tokio::test]
    async fn routes_to_remote_until_model_ready() {
        let availability = Arc::new(MockAvailability::new());
        let backend = hybrid(
            MockAi::named("on-device").with_reply(ReplyScript::Fixed("local".to_string())),
            MockAi::named("remote").with_reply(ReplyScript::Fixed("cloud".to_string())),
            Arc::clone(&availability),
        );

        assert_eq!(backend.route(), ExecutionMode::Remote);
        assert_eq!(backend.generate_reply("q").await.unwrap(), "cloud");

        availability.publish(BackendState::OnDeviceReady.snapshot(None));
        assert_eq!(backend.route(), ExecutionMode::OnDevice);
        assert_eq!(backend.generate_reply("q").await.unwrap(), "local");
    }

    #[tokio::test]
    async fn model_unavailable_fails_over_to_remote() {
        let availability = Arc::new(MockAvailability::new());
        availability.publish(BackendState::OnDeviceReady.snapshot(None));
        let backend = hybrid(
            MockAi::named("on-device")
                .with_reply(ReplyScript::Fail(AiError::ModelUnavailable("evicted".to_string())))
                .with_terms(Err(AiError::ModelUnavailable("evicted".to_string()))),
            MockAi::named("remote")
                .with_reply(ReplyScript::Fixed("cloud".to_string()))
                .with_terms(Ok(vec!["noir".to_string()])),
            availability,
        );

        assert_eq!(backend.generate_reply("q").await.unwrap(), "cloud");
        assert_eq!(backend.extract_search_terms("q").await.unwrap(), vec!["noir"]);
    }

    #[tokio::test]
    async fn other_on_device_errors_are_not_masked() {
        let availability = Arc::new(MockAvailability::new());
        availability.publish(BackendState::OnDeviceReady.snapshot(None));
        let backend = hybrid(
            MockAi::named("on-device").with_reply(ReplyScript::Fail(AiError::InvalidResponse(
                "truncated".to_string(),
            ))),
            MockAi::named("remote"),
            availability,
        );

        let err = backend.generate_reply("q").await.unwrap_err();
        assert_eq!(err, AiError::InvalidResponse("truncated".to_string()));
    }

    #[tokio::test]
    async fn retry_download_forwards_to_availability() {
        let availability = Arc::new(MockAvailability::new());
        let backend = hybrid(MockAi::named("a"), MockAi::named("b"), Arc::clone(&availability));

        backend.retry_download();
        BoxAiBackend::new(backend).retry_download();
        assert_eq!(availability.retries.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn each_call_routes_on_the_snapshot_current_at_its_start() {
        let availability = Arc::new(MockAvailability::new());
        let backend = hybrid(
            MockAi::named("on-device")
                .with_reply(ReplyScript::Fixed("local".to_string()))
                .with_terms(Ok(vec!["local".to_string()])),
            MockAi::named("remote")
                .with_reply(ReplyScript::Fixed("cloud".to_string()))
                .with_terms(Ok(vec!["cloud".to_string()])),
            Arc::clone(&availability),
        );

        let reply = backend.generate_reply("q").await.unwrap();
        availability.publish(BackendState::OnDeviceReady.snapshot(None));
        let terms = backend.extract_search_terms("q").await.unwrap();

        assert_eq!(reply, "cloud");
        assert_eq!(terms, vec!["local"]);
    }
}
