//! Policy domain: coverage and resolution for AI-in-logistics liability claims
//!
//! A [`Policy`] names the incident types it covers, its limits and
//! deductible, conditional evidence requirements, and the gates a claim must
//! pass to be settled without human review. The rule-based engine in
//! [`coverage`] is a set of total functions over `(claim, policy)`;
//! [`CoverageService`] puts them behind a policy store and optionally a
//! chat model.
//!
//! # Decision flow
//!
//! ```text
//! claim + policy number
//!   -> lookup (exact, then digits only)
//!   -> verify claimant name
//!   -> check_coverage / compute_payout / get_required_extra_info
//!   -> decide: AutoResolve { payout } | HumanReview { reasons }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{CoverageService, InMemoryPolicyStore};
//!
//! let service = CoverageService::new(Arc::new(InMemoryPolicyStore::with_policies(policies)));
//! let policy = service.get_policy("POL-TT-987654").await?.expect("policy");
//! let name_ok = service.verify_claimant_name(&policy, &claim.claimant.name);
//! let decision = service.decide(&claim, &policy, name_ok, false);
//! ```

pub mod adapters;
pub mod condition;
pub mod coverage;
pub mod error;
pub mod llm_coverage;
pub mod policy;
pub mod ports;
pub mod seed;
pub mod services;

pub use adapters::{OpenAiChatModel, OpenAiConfig};
pub use condition::{CompareOp, ConditionField, RuleCondition};
pub use coverage::{
    can_auto_resolve, check_coverage, compute_payout, decide, get_required_extra_info,
    policy_issue_message, review_reasons, verify_claimant_name, CoverageResult, PolicyVerification,
};
pub use error::PolicyError;
pub use llm_coverage::{ChatModel, LlmCoverageChecker, DEFAULT_LLM_TIMEOUT};
pub use policy::{
    ExtraInfoRule, ExtraInfoRuleDocument, Policy, PolicyDocument, ResolutionRules,
    DEFAULT_AUTO_RESOLVE_MAX_AMOUNT, DEFAULT_LIMIT_AMOUNT,
};
pub use ports::{lookup_policy, InMemoryPolicyStore, PolicyPort};
pub use seed::{load_policies_from_file, load_policies_from_json, seed_store};
pub use services::{CoverageService, DEFAULT_LIST_LIMIT};
