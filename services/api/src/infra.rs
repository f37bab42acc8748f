use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use smartpack::advisor::{
    AdvisorError, AiOptimizationPlan, DisabledAdvisor, OpenAiAdvisor, PackagingAdvisor,
    ProductBrief,
};
use smartpack::auth::StaticTokenAuthenticator;
use smartpack::config::{AdvisorConfig, AuthConfig};
use smartpack::reports::{ReportBrief, ReportContent};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Advisor chosen at startup from the environment.
pub(crate) enum ConfiguredAdvisor {
    OpenAi(OpenAiAdvisor),
    Disabled(DisabledAdvisor),
}

impl ConfiguredAdvisor {
    pub(crate) fn from_config(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        match config.api_key.as_deref() {
            Some(key) => {
                let advisor = OpenAiAdvisor::new(key, config)?;
                info!(model = advisor.model(), "AI advisor enabled");
                Ok(Self::OpenAi(advisor))
            }
            None => {
                warn!("OPENAI_API_KEY not set; AI endpoints will answer 503");
                Ok(Self::Disabled(DisabledAdvisor))
            }
        }
    }
}

#[async_trait]
impl PackagingAdvisor for ConfiguredAdvisor {
    async fn recommend(
        &self,
        products: &[ProductBrief],
    ) -> Result<AiOptimizationPlan, AdvisorError> {
        match self {
            Self::OpenAi(advisor) => advisor.recommend(products).await,
            Self::Disabled(advisor) => advisor.recommend(products).await,
        }
    }

    async fn write_report(&self, brief: &ReportBrief) -> Result<ReportContent, AdvisorError> {
        match self {
            Self::OpenAi(advisor) => advisor.write_report(brief).await,
            Self::Disabled(advisor) => advisor.write_report(brief).await,
        }
    }
}

pub(crate) fn session_authenticator(config: &AuthConfig) -> StaticTokenAuthenticator {
    let sessions = StaticTokenAuthenticator::new(config.tokens.clone());
    if sessions.is_empty() {
        warn!("APP_API_TOKENS is empty; every /api request will be rejected");
    }
    sessions
}
