//! Operational Liability Claims Domain
//!
//! This crate holds the claim record produced by extraction and the
//! completeness and consistency checker that runs over it.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Intake -> Evaluated (repeatable) -> AutoResolved | HumanReview
//! ```

pub mod vocabulary;
pub mod claim;
pub mod thresholds;
pub mod completeness;
pub mod consistency;
pub mod questions;
pub mod checker;
pub mod workflow;
pub mod conversation;
pub mod error;

pub use vocabulary::{AssetType, EvidenceKey, ImpactSeverity, IncidentType, SourceModality};
pub use claim::{
    ClaimantInfo, ConsistencyFlags, EvidenceChecklist, IncidentDate, IncidentInfo,
    OperationalImpactInfo, OperationalLiabilityClaim, Provenance,
};
pub use checker::{check, check_at, CheckReport};
pub use completeness::{score_tiers, Completeness, CompletenessItem, Tier};
pub use consistency::Contradiction;
pub use workflow::{ClaimProgress, ClaimStage, ResolutionDecision, ReviewReason};
pub use conversation::AgentContext;
pub use error::ClaimError;
