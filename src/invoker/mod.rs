//! Tiered model invocation — the retry/backoff/fallback core.
//!
//! One request walks a one-directional ladder: primary model, secondary
//! model, rule-based classifier. Both model tiers share a single
//! attempt-with-backoff routine and differ only in model identifier; the
//! rule-based floor never fails, which is what guarantees every request
//! terminates with a usable result.

pub mod rules;

pub use rules::RuleBasedClassifier;

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::GatewayConfig;
use crate::error::ModelError;
use crate::llm::{ChatMessage, ModelClient, Role, normalize};
use crate::tools::ToolCall;
use crate::tools::schema::ToolDefinition;

/// One ranked strategy for producing a classification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Primary,
    Secondary,
    RuleBased,
}

impl Tier {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::RuleBased => "rule_based",
        }
    }
}

/// Terminal artifact of one tiered invocation. Ownership transfers to the
/// caller, who is responsible for audit persistence.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationOutcome {
    /// Which tier produced the result.
    pub tier_used: Tier,
    /// Attempts made within the tier that succeeded (1 for rule_based).
    pub attempts: u32,
    /// Normalized tool invocations. Non-empty whenever
    /// `tier_used == RuleBased`.
    pub tool_calls: Vec<ToolCall>,
    /// Free-text content from the model, if any.
    pub raw_text: Option<String>,
    /// Wall-clock duration of the whole invocation, backoff included.
    pub elapsed: Duration,
}

/// What a single tier's attempt loop ended with.
struct TierResult {
    attempts: u32,
    response: Option<Value>,
}

/// The tiered invoker state machine.
pub struct TieredInvoker {
    client: Arc<dyn ModelClient>,
    classifier: RuleBasedClassifier,
    config: GatewayConfig,
}

impl TieredInvoker {
    pub fn new(client: Arc<dyn ModelClient>, config: GatewayConfig) -> Self {
        Self {
            client,
            classifier: RuleBasedClassifier::new(),
            config,
        }
    }

    /// Run the full tier ladder for one conversation.
    ///
    /// Never fails: if both model tiers are exhausted the rule-based
    /// classifier produces the result from the user message content.
    pub async fn invoke(
        &self,
        conversation: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> InvocationOutcome {
        let started = Instant::now();

        for tier in [Tier::Primary, Tier::Secondary] {
            let model_id = match tier {
                Tier::Primary => &self.config.primary_model_id,
                Tier::Secondary => &self.config.secondary_model_id,
                Tier::RuleBased => unreachable!("rule-based tier has no model"),
            };

            let result = self.try_tier(tier, model_id, conversation, tools).await;
            if let Some(raw) = result.response {
                let normalized = normalize(&raw);
                info!(
                    tier = tier.label(),
                    attempts = result.attempts,
                    tool_calls = normalized.tool_calls.len(),
                    "Model tier succeeded"
                );
                return InvocationOutcome {
                    tier_used: tier,
                    attempts: result.attempts,
                    tool_calls: normalized.tool_calls,
                    raw_text: normalized.raw_text,
                    elapsed: started.elapsed(),
                };
            }
            warn!(
                tier = tier.label(),
                attempts = result.attempts,
                "Tier exhausted, falling through"
            );
        }

        // Floor tier: deterministic, single attempt, always succeeds.
        error!("All model tiers failed, using rule-based classification");
        let call = self.classifier.classify(user_content(conversation));
        InvocationOutcome {
            tier_used: Tier::RuleBased,
            attempts: 1,
            tool_calls: vec![call],
            raw_text: None,
            elapsed: started.elapsed(),
        }
    }

    /// Attempt-with-backoff loop for one model tier.
    ///
    /// Before attempt k (k ≥ 2) the task suspends for
    /// `base_backoff * 2^(k-2)` — a scheduling point, other requests keep
    /// running. Transient failures spend the retry budget; a permission
    /// failure abandons the tier at once, since retrying it cannot succeed.
    async fn try_tier(
        &self,
        tier: Tier,
        model_id: &str,
        conversation: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> TierResult {
        let max_attempts = self.config.max_retries_per_tier.max(1);
        let mut attempts = 0;

        for attempt in 1..=max_attempts {
            if attempt >= 2 {
                let delay = self.config.base_backoff * 2u32.pow(attempt - 2);
                debug!(
                    tier = tier.label(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Backing off before retry"
                );
                tokio::time::sleep(delay).await;
            }
            attempts = attempt;

            debug!(tier = tier.label(), model = %model_id, attempt, max_attempts, "Invoking model");
            let outcome = match tokio::time::timeout(
                self.config.attempt_timeout,
                self.client
                    .invoke(model_id, conversation, tools, self.config.attempt_timeout),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(ModelError::Timeout {
                    model: model_id.to_string(),
                    timeout: self.config.attempt_timeout,
                }),
            };

            match outcome {
                Ok(raw) => {
                    return TierResult {
                        attempts,
                        response: Some(raw),
                    };
                }
                Err(e) if e.is_retryable() => {
                    warn!(
                        tier = tier.label(),
                        attempt,
                        kind = e.kind(),
                        error = %e,
                        "Attempt failed"
                    );
                }
                Err(e) => {
                    // Surfaced distinctly: this is a configuration problem,
                    // not transient load.
                    error!(
                        tier = tier.label(),
                        attempt,
                        error = %e,
                        "Non-retryable failure, abandoning tier"
                    );
                    return TierResult {
                        attempts,
                        response: None,
                    };
                }
            }
        }

        TierResult {
            attempts,
            response: None,
        }
    }
}

/// The user-message content the rule-based tier classifies.
fn user_content(conversation: &[ChatMessage]) -> &str {
    conversation
        .iter()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or("")
}
