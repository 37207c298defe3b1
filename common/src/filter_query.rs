//! Filter-query fragment construction for the search backend.

use serde::{Deserialize, Serialize};


/// Required equality constraint restricting results to one result type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeConstraint {
    pub field: String,
    pub value: String,
}

impl TypeConstraint {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self { field: field.into(), value: value.into() }
    }
}

/// The "show all result types" setting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResultTypesPolicy {
    /// Restrict results to the base type.
    #[default]
    Restrict,
    ShowAll,
    /// Restrict results to this type instead of the base type.
    Only(String),
}

impl ResultTypesPolicy {
    /// Accepts the usual boolean spellings; anything else names a type.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.to_ascii_lowercase().as_str() {
            "" | "false" | "0" | "no" | "off" => Self::Restrict,
            "true" | "1" | "yes" | "on" => Self::ShowAll,
            _ => Self::Only(raw.to_string()),
        }
    }

    /// Constraint left after applying the policy to `base`.
    pub fn apply(&self, base: Option<&TypeConstraint>) -> Option<TypeConstraint> {
        let base = base?;
        match self {
            Self::Restrict => Some(base.clone()),
            Self::ShowAll => None,
            Self::Only(type_name) => Some(TypeConstraint::new(base.field.clone(), type_name.clone())),
        }
    }
}

/// Builds `field:"value" ... +type_field:type` from the active facet filters.
///
/// Values are embedded verbatim; quotes and backslashes inside a value are not
/// escaped. Callers that accept untrusted values must sanitize them upstream.
pub fn build_filter_query(
    facet_filters: &[(String, String)],
    base_type: Option<&TypeConstraint>,
    policy: &ResultTypesPolicy,
) -> String {
    let mut clauses = facet_filters
        .iter()
        .map(|(field, value)| format!("{field}:\"{value}\""))
        .collect::<Vec<_>>();

    if let Some(constraint) = policy.apply(base_type) {
        clauses.push(format!("+{}:{}", constraint.field, constraint.value));
    }

    clauses.join(" ")
}
