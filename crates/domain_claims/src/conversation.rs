//! Hints handed to the conversational intake agent

use serde::{Deserialize, Serialize};

use crate::checker::CheckReport;

/// How many missing fields the agent is shown at once
pub const MAX_MISSING_FIELDS_SHOWN: usize = 5;

/// State the agent needs to decide what to say next
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentContext {
    pub missing_fields: Vec<String>,
    pub next_question: Option<String>,
    /// "POLICY CHECK" message; the agent must clear this before anything else
    pub policy_issue: Option<String>,
}

impl AgentContext {
    pub fn from_report(report: &CheckReport, policy_issue: Option<String>) -> Self {
        Self {
            missing_fields: report
                .missing_required_evidence
                .iter()
                .take(MAX_MISSING_FIELDS_SHOWN)
                .cloned()
                .collect(),
            next_question: report.recommended_questions.first().cloned(),
            policy_issue,
        }
    }

    /// Policy problems block every other topic
    pub fn is_blocked_on_policy(&self) -> bool {
        self.policy_issue.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_first_five_fields_are_shown() {
        let report = CheckReport {
            completeness_score: 0.0,
            missing_required_evidence: (0..8).map(|i| format!("field_{}", i)).collect(),
            contradictions: vec![],
            recommended_questions: vec!["First?".into(), "Second?".into()],
        };
        let ctx = AgentContext::from_report(&report, None);
        assert_eq!(ctx.missing_fields.len(), 5);
        assert_eq!(ctx.next_question.as_deref(), Some("First?"));
        assert!(!ctx.is_blocked_on_policy());
    }
}
