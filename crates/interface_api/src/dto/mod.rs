//! Request and response payloads
//!
//! Claims arrive as raw JSON from extraction. Vocabulary fields are read
//! leniently here, so a label the extractor got slightly wrong degrades to
//! `unknown` instead of rejecting the whole claim.

pub mod claims;
pub mod coverage;
pub mod policy;

pub use claims::{ClaimRequest, ClaimantRequest, ImpactRequest, IncidentRequest, ProvenanceRequest};
pub use coverage::{EvaluateRequest, EvaluateResponse, LlmCoverageRequest, LlmCoverageResponse};
pub use policy::{ListPoliciesQuery, PolicyListResponse};
