//! Input handed to the external search backend.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::facet_catalog::FacetMap;
use crate::filter_query::{ResultTypesPolicy, TypeConstraint, build_filter_query};
use crate::search_const::{
    DEFAULT_BASE_TYPE, DEFAULT_FACET_FETCH_LIMIT, DEFAULT_FACET_LIMIT, DEFAULT_ITEMS_PER_PAGE,
    DEFAULT_TYPE_FIELD,
};
use crate::search_request::{ExtensionValue, SearchRequest};


/// Host-supplied search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    pub items_per_page: u64,
    pub default_facet_limit: u64,
    /// Cap on facet values fetched when a facet lists every value.
    pub facet_fetch_limit: u64,
    pub show_all_types: ResultTypesPolicy,
    pub default_include_private: bool,
    /// `None` disables the type clause regardless of the policy.
    pub base_type: Option<TypeConstraint>,
    /// Overrides the built-in facet fields when set.
    pub facet_fields: Option<Vec<String>>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            default_facet_limit: DEFAULT_FACET_LIMIT,
            facet_fetch_limit: DEFAULT_FACET_FETCH_LIMIT,
            show_all_types: ResultTypesPolicy::default(),
            default_include_private: true,
            base_type: Some(TypeConstraint::new(DEFAULT_TYPE_FIELD, DEFAULT_BASE_TYPE)),
            facet_fields: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendQuery {
    pub q: String,
    pub fq: String,
    pub facet_fields: Vec<String>,
    pub facet_limit: u64,
    pub rows: u64,
    pub start: u64,
    pub sort: Option<String>,
    pub extras: IndexMap<String, ExtensionValue>,
    pub include_private: bool,
}

impl BackendQuery {
    pub fn assemble(
        request: &SearchRequest,
        facets: &FacetMap,
        facet_limits: &IndexMap<String, u64>,
        settings: &SearchSettings,
    ) -> Self {
        let rows = settings.items_per_page;
        let fq = build_filter_query(
            &request.facet_filters,
            settings.base_type.as_ref(),
            &settings.show_all_types,
        );
        Self {
            q: request.query.clone(),
            fq,
            facet_fields: facets.keys().cloned().collect(),
            facet_limit: fetch_limit(facet_limits, settings),
            rows,
            start: request.page.saturating_sub(1).saturating_mul(rows),
            sort: request.rendered_sort(),
            extras: request.extension_params.clone(),
            include_private: settings.default_include_private,
        }
    }
}

/// Facet values to request: one past the largest display limit so a cut list
/// is detectable, or at least the fetch cap once a limit is 0.
fn fetch_limit(facet_limits: &IndexMap<String, u64>, settings: &SearchSettings) -> u64 {
    let largest = facet_limits
        .values()
        .copied()
        .max()
        .unwrap_or(settings.default_facet_limit);
    let wanted = largest.saturating_add(1);
    if facet_limits.values().any(|limit| *limit == 0) {
        wanted.max(settings.facet_fetch_limit)
    } else {
        wanted
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet_catalog::default_facets;
    use crate::param_codec::ParamMultiMap;
    use pretty_assertions::assert_eq;

    #[test]
    fn assembles_backend_input() {
        let params = ParamMultiMap::decode(
            "q=river&page=3&sort=name+asc&organization=acme&tags=open&ext_bbox=1,2,3,4",
        );
        let request = SearchRequest::parse(&params);
        let facets = default_facets();
        let limits: IndexMap<String, u64> =
            [("tags".to_string(), 5), ("organization".to_string(), 50)].into_iter().collect();

        let query = BackendQuery::assemble(&request, &facets, &limits, &SearchSettings::default());

        assert_eq!(query.q, "river");
        assert_eq!(query.fq, "organization:\"acme\" tags:\"open\" +dataset_type:dataset");
        assert_eq!(query.rows, 20);
        assert_eq!(query.start, 40);
        assert_eq!(query.sort.as_deref(), Some("name asc"));
        assert_eq!(query.facet_limit, 51);
        assert_eq!(query.facet_fields.len(), 5);
        assert_eq!(query.extras["ext_bbox"], ExtensionValue::Single("1,2,3,4".into()));
        assert!(query.include_private);
    }

    #[test]
    fn first_page_starts_at_zero() {
        let request = SearchRequest::default();
        let settings = SearchSettings { items_per_page: 50, ..Default::default() };
        let query = BackendQuery::assemble(&request, &FacetMap::new(), &IndexMap::new(), &settings);
        assert_eq!(query.start, 0);
        assert_eq!(query.facet_limit, settings.default_facet_limit + 1);
        assert_eq!(query.sort, None);
    }

    #[test]
    fn show_every_value_fetches_up_to_cap() {
        let request = SearchRequest::default();
        let settings = SearchSettings { facet_fetch_limit: 200, ..Default::default() };
        let limits: IndexMap<String, u64> =
            [("tags".to_string(), 0), ("groups".to_string(), 10)].into_iter().collect();
        let query = BackendQuery::assemble(&request, &default_facets(), &limits, &settings);
        assert_eq!(query.facet_limit, 200);

        let limits: IndexMap<String, u64> =
            [("tags".to_string(), 0), ("groups".to_string(), 500)].into_iter().collect();
        let query = BackendQuery::assemble(&request, &default_facets(), &limits, &settings);
        assert_eq!(query.facet_limit, 501);
    }

    #[test]
    fn serializes_in_field_order() {
        let request = SearchRequest::parse(&ParamMultiMap::decode("ext_a=1&ext_a=2"));
        let query = BackendQuery::assemble(&request, &FacetMap::new(), &IndexMap::new(), &SearchSettings::default());
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["extras"]["ext_a"], serde_json::json!(["1", "2"]));
        assert_eq!(json["fq"], "+dataset_type:dataset");
    }
}
