//! Policy payloads
//!
//! Policies travel as [`PolicyDocument`], the same shape as the seed files.

use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_policy::PolicyDocument;

/// Query string for `GET /policies`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListPoliciesQuery {
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PolicyListResponse {
    pub policies: Vec<PolicyDocument>,
    pub count: usize,
}

impl PolicyListResponse {
    pub fn new(policies: Vec<PolicyDocument>) -> Self {
        Self {
            count: policies.len(),
            policies,
        }
    }
}
