//! Loading policies from JSON seed documents

use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::error::PolicyError;
use crate::policy::{Policy, PolicyDocument};
use crate::ports::PolicyPort;

/// Parses a JSON array of policies, or a single policy object
///
/// # Errors
///
/// Fails on the first malformed entry: bad JSON, an unknown incident type or
/// evidence key, an unparseable rule condition, or a negative amount.
pub fn load_policies_from_json(json: &str) -> Result<Vec<Policy>, PolicyError> {
    let documents: Vec<PolicyDocument> = match serde_json::from_str::<Value>(json)? {
        Value::Array(entries) => entries
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()?,
        single => vec![serde_json::from_value(single)?],
    };
    documents.into_iter().map(Policy::try_from).collect()
}

/// Reads and parses a seed file
pub fn load_policies_from_file(path: impl AsRef<Path>) -> Result<Vec<Policy>, PolicyError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_policies_from_json(&json)
}

/// Saves every policy into the store, returning how many were written
pub async fn seed_store(store: &dyn PolicyPort, policies: &[Policy]) -> Result<usize, PolicyError> {
    for policy in policies {
        store.save(policy).await?;
    }
    info!(count = policies.len(), "Seeded policy store");
    Ok(policies.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::IncidentType;

    #[test]
    fn test_array_and_single_object() {
        let many = load_policies_from_json(
            r#"[{"policy_number": "A-1", "named_insured": "A"}, {"policy_number": "B-2", "named_insured": "B"}]"#,
        )
        .unwrap();
        assert_eq!(many.len(), 2);

        let one = load_policies_from_json(
            r#"{"policy_number": "C-3", "named_insured": "C", "covered_incident_types": ["system_outage"]}"#,
        )
        .unwrap();
        assert_eq!(one.len(), 1);
        assert!(one[0].covers(IncidentType::SystemOutage));
    }

    #[test]
    fn test_invalid_entry_fails_the_load() {
        let result = load_policies_from_json(
            r#"[{"policy_number": "A-1", "named_insured": "A",
                 "extra_info_rules": [{"condition": "when it feels big", "required_evidence": "system_logs"}]}]"#,
        );
        assert!(matches!(result, Err(PolicyError::InvalidCondition { .. })));
    }

    #[test]
    fn test_garbage_is_a_document_error() {
        assert!(matches!(load_policies_from_json("not json"), Err(PolicyError::Document(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_policies_from_file("/definitely/not/here.json");
        assert!(matches!(result, Err(PolicyError::Io { .. })));
    }
}
