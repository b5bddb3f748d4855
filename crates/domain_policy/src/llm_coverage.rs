//! Model-backed coverage check
//!
//! An alternate strategy to [`crate::coverage::check_coverage`]: the policy
//! and claim go to a chat model as JSON, together with the incident-type
//! glossary, and the model returns a coverage verdict.
//!
//! The check never errors. A failed call, a timeout, or output that is not
//! the expected JSON all fold into a not-covered [`CoverageResult`] whose
//! reason carries the failure, so a live intake conversation always gets a
//! usable answer. The rule-based path stays available regardless.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use core_kernel::PortError;
use domain_claims::vocabulary::incident_type_definitions;
use domain_claims::OperationalLiabilityClaim;

use crate::coverage::CoverageResult;
use crate::error::PolicyError;
use crate::policy::{Policy, PolicyDocument};

/// Default per-call budget for the model
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(30);

/// A single-turn chat completion capability
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends one user prompt and returns the assistant's text
    async fn complete(&self, prompt: &str) -> Result<String, PortError>;

    /// Model identifier, for logs
    fn model_name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct Verdict {
    #[serde(default)]
    is_covered: bool,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    required_evidence: Vec<serde_json::Value>,
    #[serde(default)]
    suggested_payout_cap: Option<Decimal>,
}

/// Coverage checker backed by a [`ChatModel`]
#[derive(Clone)]
pub struct LlmCoverageChecker {
    model: Arc<dyn ChatModel>,
    timeout: Duration,
}

impl LlmCoverageChecker {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            timeout: DEFAULT_LLM_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Asks the model for a verdict within the configured timeout
    pub async fn check(&self, claim: &OperationalLiabilityClaim, policy: &Policy) -> CoverageResult {
        self.check_with_timeout(claim, policy, self.timeout).await
    }

    /// Asks the model for a verdict within a caller-chosen timeout
    pub async fn check_with_timeout(
        &self,
        claim: &OperationalLiabilityClaim,
        policy: &Policy,
        timeout: Duration,
    ) -> CoverageResult {
        match self.try_check(claim, policy, timeout).await {
            Ok(result) => {
                debug!(
                    claim_id = %claim.claim_id,
                    model = self.model.model_name(),
                    is_covered = result.is_covered,
                    "LLM coverage verdict"
                );
                result
            }
            Err(e) => {
                warn!(
                    claim_id = %claim.claim_id,
                    model = self.model.model_name(),
                    error = %e,
                    "LLM coverage check failed"
                );
                CoverageResult::failure(format!("Coverage check failed: {}", e))
            }
        }
    }

    async fn try_check(
        &self,
        claim: &OperationalLiabilityClaim,
        policy: &Policy,
        timeout: Duration,
    ) -> Result<CoverageResult, PolicyError> {
        let prompt = build_prompt(claim, policy)?;
        let text = tokio::time::timeout(timeout, self.model.complete(&prompt))
            .await
            .map_err(|_| PortError::Timeout {
                operation: "chat_completion".to_string(),
                duration_ms: timeout.as_millis() as u64,
            })
            .and_then(|completion| completion)
            .map_err(|e| PolicyError::Llm(e.to_string()))?;
        parse_verdict(&text)
    }
}

/// Renders the coverage prompt: glossary, policy JSON, claim JSON, answer schema
pub fn build_prompt(claim: &OperationalLiabilityClaim, policy: &Policy) -> Result<String, PolicyError> {
    let policy_json = serde_json::to_string_pretty(&PolicyDocument::from(policy.clone()))?;
    let claim_json = serde_json::to_string_pretty(claim)?;
    let definitions = incident_type_definitions()
        .map(|(t, d)| format!("- {}: {}", t, d))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        r#"You are an insurance policy analyst. Determine whether the following claim is covered under the given policy. Use the full JSON policy and claim data below.

INCIDENT TYPE DEFINITIONS (for reference):
{definitions}

POLICY (JSON):
{policy_json}

CLAIM (JSON):
{claim_json}

Respond with a single JSON object only, no other text:
{{
  "is_covered": true or false,
  "reason": "Brief explanation for the coverage decision",
  "required_evidence": ["system_logs", "incident_report", "liability_assessment"],
  "suggested_payout_cap": number or null
}}

Rules:
- is_covered: true only if the claim clearly falls under what the policy covers (incident type and circumstances).
- required_evidence: what the policy requires for this type of claim (e.g. system_logs, incident_report, liability_assessment).
- suggested_payout_cap: maximum payout you infer from the policy for this claim, or null if not covered or unclear.
"#
    ))
}

/// Removes a surrounding markdown code fence, if any
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string ("json") on the opening fence line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Reads the model's answer into a coverage result
pub fn parse_verdict(text: &str) -> Result<CoverageResult, PolicyError> {
    let verdict: Verdict = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| PolicyError::Llm(format!("malformed model output: {}", e)))?;

    let suggested_payout_cap = match verdict.suggested_payout_cap {
        Some(cap) if cap < Decimal::ZERO => {
            warn!(%cap, "Discarding negative payout cap from model");
            None
        }
        other => other,
    };

    Ok(CoverageResult {
        is_covered: verdict.is_covered,
        reason: verdict.reason,
        required_evidence: verdict
            .required_evidence
            .into_iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        suggested_payout_cap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fence("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_verdict() {
        let result = parse_verdict(
            r#"{"is_covered": true, "reason": "Delay is covered", "required_evidence": ["system_logs"], "suggested_payout_cap": 2500}"#,
        )
        .unwrap();
        assert!(result.is_covered);
        assert_eq!(result.required_evidence, vec!["system_logs"]);
        assert_eq!(result.suggested_payout_cap, Some(dec!(2500)));
    }

    #[test]
    fn test_negative_cap_is_dropped() {
        let result = parse_verdict(r#"{"is_covered": true, "suggested_payout_cap": -5}"#).unwrap();
        assert_eq!(result.suggested_payout_cap, None);
    }

    #[test]
    fn test_prose_is_malformed() {
        let err = parse_verdict("I think it is probably covered.").unwrap_err();
        assert!(matches!(err, PolicyError::Llm(_)));
    }
}
