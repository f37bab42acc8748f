use super::prompt::{optimization_prompt, report_prompt, SYSTEM_PROMPT};
use super::{schema, AdvisorError, AiOptimizationPlan, PackagingAdvisor, ProductBrief};
use crate::config::AdvisorConfig;
use crate::reports::{ReportBrief, ReportContent};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Chat-completions client that requests schema-constrained JSON.
#[derive(Debug, Clone)]
pub struct OpenAiAdvisor {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiAdvisor {
    pub fn new(api_key: impl Into<String>, config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| AdvisorError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete<T: DeserializeOwned>(
        &self,
        schema_name: &str,
        schema: Value,
        prompt: String,
    ) -> Result<T, AdvisorError> {
        let request_body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt}
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {"name": schema_name, "schema": schema, "strict": true}
            }
        });

        let started = Instant::now();
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AdvisorError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, schema = schema_name, "AI provider request failed");
            return Err(match status.as_u16() {
                401 | 403 => AdvisorError::Authentication,
                429 => AdvisorError::RateLimited,
                _ => AdvisorError::Upstream(status.to_string()),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| AdvisorError::InvalidResponse(format!("body is not JSON: {err}")))?;
        debug!(
            schema = schema_name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "AI provider responded"
        );

        let content = payload
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| AdvisorError::InvalidResponse("no message content".to_string()))?;

        serde_json::from_str(content)
            .map_err(|err| AdvisorError::InvalidResponse(format!("content does not match schema: {err}")))
    }
}

#[async_trait]
impl PackagingAdvisor for OpenAiAdvisor {
    async fn recommend(
        &self,
        products: &[ProductBrief],
    ) -> Result<AiOptimizationPlan, AdvisorError> {
        let prompt = optimization_prompt(products)
            .map_err(|err| AdvisorError::InvalidResponse(err.to_string()))?;
        let plan: AiOptimizationPlan = self
            .complete("packaging_optimization", schema::optimization_plan(), prompt)
            .await?;
        plan.validate()?;
        Ok(plan)
    }

    async fn write_report(&self, brief: &ReportBrief) -> Result<ReportContent, AdvisorError> {
        let prompt =
            report_prompt(brief).map_err(|err| AdvisorError::InvalidResponse(err.to_string()))?;
        self.complete("packaging_report", schema::report_content(), prompt)
            .await
    }
}
