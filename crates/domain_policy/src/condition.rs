//! Extra-info rule conditions
//!
//! Conditions arrive as short text expressions in policy documents and are
//! parsed once, at load time, into a closed predicate type. Two shapes are
//! understood:
//!
//! ```text
//! incident_type == prediction_failure
//! estimated_liability_cost > 5000        (also: cost, >=, <, <=)
//! ```
//!
//! Anything else is rejected with [`PolicyError::InvalidCondition`].
//! Dotted field paths such as `operational_impact.estimated_liability_cost`
//! are accepted; only the last segment is significant.

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use domain_claims::{IncidentType, OperationalLiabilityClaim};

use crate::error::PolicyError;

/// Numeric comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
        }
    }

    pub fn apply(&self, lhs: Decimal, rhs: Decimal) -> bool {
        match self {
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
        }
    }
}

/// Numeric claim field a condition can compare against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionField {
    EstimatedLiabilityCost,
}

impl ConditionField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionField::EstimatedLiabilityCost => "estimated_liability_cost",
        }
    }

    /// Reads the field, treating an absent value as zero
    fn read(&self, claim: &OperationalLiabilityClaim) -> Decimal {
        match self {
            ConditionField::EstimatedLiabilityCost => claim.estimated_cost().unwrap_or(Decimal::ZERO),
        }
    }
}

/// A parsed extra-info rule condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleCondition {
    IncidentTypeEquals(IncidentType),
    Compare {
        field: ConditionField,
        op: CompareOp,
        threshold: Decimal,
    },
}

impl RuleCondition {
    /// Whether the condition holds for the claim
    pub fn evaluate(&self, claim: &OperationalLiabilityClaim) -> bool {
        match self {
            RuleCondition::IncidentTypeEquals(expected) => claim.incident_type() == *expected,
            RuleCondition::Compare { field, op, threshold } => op.apply(field.read(claim), *threshold),
        }
    }

    pub fn cost_above(threshold: Decimal) -> Self {
        RuleCondition::Compare {
            field: ConditionField::EstimatedLiabilityCost,
            op: CompareOp::Gt,
            threshold,
        }
    }
}

impl fmt::Display for RuleCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCondition::IncidentTypeEquals(t) => write!(f, "incident_type == {}", t),
            RuleCondition::Compare { field, op, threshold } => {
                write!(f, "{} {} {}", field.as_str(), op.symbol(), threshold)
            }
        }
    }
}

/// Finds the first operator in the expression; two-character forms win
fn split_operator(expr: &str) -> Option<(&str, &'static str, &str)> {
    const OPERATORS: [&str; 6] = ["==", ">=", "<=", "!=", ">", "<"];
    for (idx, _) in expr.char_indices() {
        let rest = &expr[idx..];
        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            return Some((&expr[..idx], *op, &rest[op.len()..]));
        }
    }
    None
}

impl FromStr for RuleCondition {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expr = s.trim().to_lowercase();
        let invalid = |reason: &str| PolicyError::invalid_condition(s.trim(), reason);

        let (lhs, op, rhs) = split_operator(&expr).ok_or_else(|| invalid("no comparison operator"))?;
        let field = lhs.trim().rsplit('.').next().unwrap_or_default().trim();
        let value = rhs.trim().trim_matches(|c| c == '"' || c == '\'');
        if field.is_empty() {
            return Err(invalid("missing field name"));
        }
        if value.is_empty() {
            return Err(invalid("missing value"));
        }

        match field {
            "incident_type" => {
                if op != "==" {
                    return Err(invalid("incident_type only supports =="));
                }
                let incident_type = value
                    .parse::<IncidentType>()
                    .map_err(|_| invalid("unknown incident type"))?;
                Ok(RuleCondition::IncidentTypeEquals(incident_type))
            }
            "cost" | "estimated_liability_cost" => {
                let op = match op {
                    ">" => CompareOp::Gt,
                    ">=" => CompareOp::Ge,
                    "<" => CompareOp::Lt,
                    "<=" => CompareOp::Le,
                    _ => return Err(invalid("cost only supports >, >=, < and <=")),
                };
                let cleaned: String = value
                    .chars()
                    .filter(|c| !matches!(c, '$' | ',' | '_'))
                    .collect();
                let threshold = Decimal::from_str(&cleaned).map_err(|_| invalid("threshold is not a number"))?;
                Ok(RuleCondition::Compare {
                    field: ConditionField::EstimatedLiabilityCost,
                    op,
                    threshold,
                })
            }
            other => Err(invalid(&format!("unsupported field '{}'", other))),
        }
    }
}

impl Serialize for RuleCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RuleCondition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::ClaimantInfo;
    use rust_decimal_macros::dec;

    fn claim_with(incident_type: IncidentType, cost: Option<Decimal>) -> OperationalLiabilityClaim {
        let mut claim = OperationalLiabilityClaim::new(ClaimantInfo::new("Acme Corp", "POL-1"));
        claim.incident.incident_type = incident_type;
        claim.operational_impact.estimated_liability_cost = cost;
        claim
    }

    #[test]
    fn test_parse_incident_type_equality() {
        let cond: RuleCondition = "incident_type == prediction_failure".parse().unwrap();
        assert_eq!(cond, RuleCondition::IncidentTypeEquals(IncidentType::PredictionFailure));

        let cond: RuleCondition = "Incident.Incident_Type=='DELAY'".parse().unwrap();
        assert_eq!(cond, RuleCondition::IncidentTypeEquals(IncidentType::Delay));
    }

    #[test]
    fn test_parse_cost_comparisons() {
        let cond: RuleCondition = "estimated_liability_cost > 5000".parse().unwrap();
        assert_eq!(cond, RuleCondition::cost_above(dec!(5000)));

        let cond: RuleCondition = "cost >= $10,000".parse().unwrap();
        assert_eq!(
            cond,
            RuleCondition::Compare {
                field: ConditionField::EstimatedLiabilityCost,
                op: CompareOp::Ge,
                threshold: dec!(10000),
            }
        );
    }

    #[test]
    fn test_malformed_conditions_fail_loudly() {
        for bad in [
            "incident_type is delay",
            "incident_type > delay",
            "incident_type == flood",
            "incident_type != delay",
            "cost == 100",
            "cost != 100",
            "cost > lots",
            "severity == critical",
            "> 5000",
            "",
        ] {
            let result = bad.parse::<RuleCondition>();
            assert!(
                matches!(result, Err(PolicyError::InvalidCondition { .. })),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_evaluate() {
        let cond = RuleCondition::cost_above(dec!(5000));
        assert!(cond.evaluate(&claim_with(IncidentType::Loss, Some(dec!(5000.01)))));
        assert!(!cond.evaluate(&claim_with(IncidentType::Loss, Some(dec!(5000)))));
        // absent cost reads as zero
        assert!(!cond.evaluate(&claim_with(IncidentType::Loss, None)));

        let le: RuleCondition = "cost <= 100".parse().unwrap();
        assert!(le.evaluate(&claim_with(IncidentType::Loss, None)));
    }

    #[test]
    fn test_text_form_round_trips() {
        let cond: RuleCondition = "cost>2500".parse().unwrap();
        assert_eq!(cond.to_string(), "estimated_liability_cost > 2500");
        let json = serde_json::to_string(&cond).unwrap();
        let back: RuleCondition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cond);
    }
}
