//! Structured search request parsed from raw query parameters.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::filter_query::{ResultTypesPolicy, TypeConstraint, build_filter_query};
use crate::param_codec::ParamMultiMap;
use crate::search_const::{
    EXTENSION_PREFIX, PARAM_PAGE, PARAM_QUERY, PARAM_SORT, facet_limit_param, is_reserved_param,
};


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    /// Empty means "use the backend default direction".
    pub direction: String,
}

impl SortField {
    pub fn new(field: impl Into<String>, direction: impl Into<String>) -> Self {
        Self { field: field.into(), direction: direction.into() }
    }

    /// `field direction`, or the bare field when no direction was given.
    pub fn render(&self) -> String {
        if self.direction.is_empty() {
            self.field.clone()
        } else {
            format!("{} {}", self.field, self.direction)
        }
    }
}

/// Value of an extension parameter: scalar when it occurred once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtensionValue {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub page: u64,
    pub sort_spec: Vec<SortField>,
    pub facet_filters: Vec<(String, String)>,
    pub facet_filters_grouped: IndexMap<String, Vec<String>>,
    pub extension_params: IndexMap<String, ExtensionValue>,
    /// Facet clauses only, until [`SearchRequest::constrain`] adds the type clause.
    pub filter_query_fragment: String,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            sort_spec: Vec::new(),
            facet_filters: Vec::new(),
            facet_filters_grouped: IndexMap::new(),
            extension_params: IndexMap::new(),
            filter_query_fragment: String::new(),
        }
    }
}

impl SearchRequest {
    /// Parses raw parameters. Never fails: bad input falls back to defaults.
    pub fn parse(params: &ParamMultiMap) -> Self {
        let query = params.get_first(PARAM_QUERY).unwrap_or_default().to_string();
        let page = parse_page(params.get_first(PARAM_PAGE));
        let sort_spec = params.get_first(PARAM_SORT).map(parse_sort).unwrap_or_default();

        let mut facet_filters = Vec::new();
        let mut facet_filters_grouped: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut extensions: IndexMap<String, Vec<String>> = IndexMap::new();

        for (key, value) in params.iter() {
            if key.starts_with(EXTENSION_PREFIX) {
                extensions.entry(key.to_string()).or_default().push(value.to_string());
                continue;
            }
            // empty string is not a valid filter value
            if is_reserved_param(key) || value.is_empty() {
                continue;
            }
            facet_filters.push((key.to_string(), value.to_string()));
            facet_filters_grouped.entry(key.to_string()).or_default().push(value.to_string());
        }

        let extension_params = extensions
            .into_iter()
            .map(|(key, mut values)| {
                let value = if values.len() == 1 {
                    ExtensionValue::Single(values.remove(0))
                } else {
                    ExtensionValue::Multiple(values)
                };
                (key, value)
            })
            .collect();

        let filter_query_fragment =
            build_filter_query(&facet_filters, None, &ResultTypesPolicy::default());

        Self {
            query,
            page,
            sort_spec,
            facet_filters,
            facet_filters_grouped,
            extension_params,
            filter_query_fragment,
        }
    }

    /// Rebuilds the filter-query fragment with the result-type constraint.
    pub fn constrain(mut self, base_type: Option<&TypeConstraint>, policy: &ResultTypesPolicy) -> Self {
        self.filter_query_fragment = build_filter_query(&self.facet_filters, base_type, policy);
        self
    }

    /// Sort spec in backend-native form, `None` when no sort was requested.
    pub fn rendered_sort(&self) -> Option<String> {
        if self.sort_spec.is_empty() {
            return None;
        }
        Some(render_sort(&self.sort_spec))
    }
}

/// Page numbers start at 1; anything unparseable or below 1 yields 1.
pub fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|p| p.trim().parse::<u64>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

/// Splits `field dir, field dir` into sort fields. Directions are not validated.
pub fn parse_sort(raw: &str) -> Vec<SortField> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once(char::is_whitespace) {
            Some((field, direction)) => SortField::new(field, direction.trim()),
            None => SortField::new(token, ""),
        })
        .collect()
}

pub fn render_sort(fields: &[SortField]) -> String {
    fields.iter().map(SortField::render).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchParamError {
    #[error("Parameter \"{parameter}\" is not an integer")]
    InvalidFacetLimit { parameter: String },
}

/// Display limit per facet field, read from `_<field>_limit`.
///
/// Unlike `page`, an unparseable limit is rejected.
pub fn parse_facet_limits<'a>(
    params: &ParamMultiMap,
    facet_fields: impl IntoIterator<Item = &'a str>,
    default_limit: u64,
) -> Result<IndexMap<String, u64>, SearchParamError> {
    let mut limits = IndexMap::new();
    for field in facet_fields {
        let parameter = facet_limit_param(field);
        let limit = match params.get_first(&parameter) {
            None => default_limit,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| SearchParamError::InvalidFacetLimit { parameter: parameter.clone() })?,
        };
        limits.insert(field.to_string(), limit);
    }
    Ok(limits)
}
