//! Policy repository implementation
//!
//! One row per policy. Collections (covered types, per-type limits, rules)
//! are stored as JSON text and amounts as decimal strings, so a row decodes
//! back into a [`PolicyDocument`] and goes through the same validation as a
//! seed file.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

use domain_policy::{ExtraInfoRuleDocument, Policy, PolicyDocument, ResolutionRules};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

/// DDL for the policies table; safe to run repeatedly
pub const POLICY_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS policies (
    policy_number            TEXT PRIMARY KEY NOT NULL,
    named_insured            TEXT NOT NULL,
    effective_from           TEXT,
    effective_to             TEXT,
    coverage_description     TEXT,
    covered_incident_types   TEXT NOT NULL DEFAULT '[]',
    limit_amount             TEXT NOT NULL,
    deductible               TEXT NOT NULL DEFAULT '0',
    per_incident_type_limits TEXT,
    extra_info_rules         TEXT NOT NULL DEFAULT '[]',
    resolution_rules         TEXT NOT NULL DEFAULT '{}',
    created_at               TEXT NOT NULL,
    updated_at               TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_policies_named_insured ON policies (named_insured);
"#;

const SELECT_COLUMNS: &str = r#"
    policy_number,
    named_insured,
    effective_from,
    effective_to,
    coverage_description,
    covered_incident_types,
    limit_amount,
    deductible,
    per_incident_type_limits,
    extra_info_rules,
    resolution_rules,
    created_at,
    updated_at
"#;

/// Repository for policy records
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::repositories::PolicyRepository;
///
/// let repo = PolicyRepository::new(pool);
/// repo.ensure_schema().await?;
/// let policy = repo.find_by_number("POL-TT-987654").await?;
/// ```
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    pool: DatabasePool,
}

impl PolicyRepository {
    /// Creates a new PolicyRepository with the given connection pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Creates the table and index if they do not exist
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        sqlx::raw_sql(POLICY_SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::SchemaFailed(e.to_string()))?;
        Ok(())
    }

    /// Retrieves a policy by its exact number
    ///
    /// # Returns
    ///
    /// `None` when no row matches
    pub async fn find_by_number(&self, policy_number: &str) -> Result<Option<Policy>, DatabaseError> {
        let row = sqlx::query_as::<_, PolicyRow>(&format!(
            "SELECT {} FROM policies WHERE policy_number = ?",
            SELECT_COLUMNS
        ))
        .bind(policy_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        row.map(PolicyRow::into_policy).transpose()
    }

    /// Lists policies ordered by number
    pub async fn list(&self, limit: usize) -> Result<Vec<Policy>, DatabaseError> {
        let rows = sqlx::query_as::<_, PolicyRow>(&format!(
            "SELECT {} FROM policies ORDER BY policy_number LIMIT ?",
            SELECT_COLUMNS
        ))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        rows.into_iter().map(PolicyRow::into_policy).collect()
    }

    /// Inserts the policy or replaces every column of the existing row
    ///
    /// `created_at` survives a replace; `updated_at` is refreshed.
    pub async fn upsert(&self, policy: &Policy) -> Result<(), DatabaseError> {
        let columns = PolicyColumns::encode(policy)?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO policies (
                policy_number,
                named_insured,
                effective_from,
                effective_to,
                coverage_description,
                covered_incident_types,
                limit_amount,
                deductible,
                per_incident_type_limits,
                extra_info_rules,
                resolution_rules,
                created_at,
                updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (policy_number) DO UPDATE SET
                named_insured = excluded.named_insured,
                effective_from = excluded.effective_from,
                effective_to = excluded.effective_to,
                coverage_description = excluded.coverage_description,
                covered_incident_types = excluded.covered_incident_types,
                limit_amount = excluded.limit_amount,
                deductible = excluded.deductible,
                per_incident_type_limits = excluded.per_incident_type_limits,
                extra_info_rules = excluded.extra_info_rules,
                resolution_rules = excluded.resolution_rules,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&policy.policy_number)
        .bind(&policy.named_insured)
        .bind(policy.effective_from)
        .bind(policy.effective_to)
        .bind(&policy.coverage_description)
        .bind(columns.covered_incident_types)
        .bind(policy.limit_amount.to_string())
        .bind(policy.deductible.to_string())
        .bind(columns.per_incident_type_limits)
        .bind(columns.extra_info_rules)
        .bind(columns.resolution_rules)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        debug!(policy_number = %policy.policy_number, "Policy row written");
        Ok(())
    }

    /// Timestamps of a stored row, if present
    pub async fn timestamps(
        &self,
        policy_number: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>, DatabaseError> {
        sqlx::query_as::<_, (DateTime<Utc>, DateTime<Utc>)>(
            "SELECT created_at, updated_at FROM policies WHERE policy_number = ?",
        )
        .bind(policy_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM policies")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))
    }
}

/// Database row for a policy
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PolicyRow {
    pub policy_number: String,
    pub named_insured: String,
    pub effective_from: Option<DateTime<Utc>>,
    pub effective_to: Option<DateTime<Utc>>,
    pub coverage_description: Option<String>,
    pub covered_incident_types: String,
    pub limit_amount: String,
    pub deductible: String,
    pub per_incident_type_limits: Option<String>,
    pub extra_info_rules: String,
    pub resolution_rules: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PolicyRow {
    /// Decodes the JSON and decimal columns and validates the result
    pub fn into_policy(self) -> Result<Policy, DatabaseError> {
        let document = PolicyDocument {
            policy_number: self.policy_number,
            named_insured: self.named_insured,
            effective_from: self.effective_from,
            effective_to: self.effective_to,
            coverage_description: self.coverage_description,
            covered_incident_types: decode_json("covered_incident_types", &self.covered_incident_types)?,
            limit_amount: decode_decimal("limit_amount", &self.limit_amount)?,
            deductible: decode_decimal("deductible", &self.deductible)?,
            per_incident_type_limits: self
                .per_incident_type_limits
                .as_deref()
                .map(|raw| decode_json::<BTreeMap<String, Decimal>>("per_incident_type_limits", raw))
                .transpose()?,
            extra_info_rules: decode_json::<Vec<ExtraInfoRuleDocument>>("extra_info_rules", &self.extra_info_rules)?,
            resolution_rules: decode_json::<ResolutionRules>("resolution_rules", &self.resolution_rules)?,
        };
        Policy::try_from(document).map_err(|e| DatabaseError::SerializationError(e.to_string()))
    }
}

/// JSON-encoded columns of a policy
struct PolicyColumns {
    covered_incident_types: String,
    per_incident_type_limits: Option<String>,
    extra_info_rules: String,
    resolution_rules: String,
}

impl PolicyColumns {
    fn encode(policy: &Policy) -> Result<Self, DatabaseError> {
        let document = PolicyDocument::from(policy.clone());
        Ok(Self {
            covered_incident_types: encode_json("covered_incident_types", &document.covered_incident_types)?,
            per_incident_type_limits: document
                .per_incident_type_limits
                .as_ref()
                .map(|limits| encode_json("per_incident_type_limits", limits))
                .transpose()?,
            extra_info_rules: encode_json("extra_info_rules", &document.extra_info_rules)?,
            resolution_rules: encode_json("resolution_rules", &document.resolution_rules)?,
        })
    }
}

fn encode_json<T: serde::Serialize>(column: &str, value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::column(column, e))
}

fn decode_json<T: DeserializeOwned>(column: &str, raw: &str) -> Result<T, DatabaseError> {
    serde_json::from_str(raw).map_err(|e| DatabaseError::column(column, e))
}

fn decode_decimal(column: &str, raw: &str) -> Result<Decimal, DatabaseError> {
    Decimal::from_str(raw.trim()).map_err(|e| DatabaseError::column(column, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_decimal() {
        assert_eq!(decode_decimal("x", " 2500.50 ").unwrap(), Decimal::new(250050, 2));
        assert!(decode_decimal("x", "lots").is_err());
    }

    #[test]
    fn test_row_with_bad_rule_fails_to_decode() {
        let now = Utc::now();
        let row = PolicyRow {
            policy_number: "POL-1".to_string(),
            named_insured: "Acme".to_string(),
            effective_from: None,
            effective_to: None,
            coverage_description: None,
            covered_incident_types: r#"["delay"]"#.to_string(),
            limit_amount: "50000".to_string(),
            deductible: "0".to_string(),
            per_incident_type_limits: None,
            extra_info_rules: r#"[{"condition": "whenever", "required_evidence": "system_logs"}]"#.to_string(),
            resolution_rules: "{}".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(row.into_policy(), Err(DatabaseError::SerializationError(_))));
    }
}
