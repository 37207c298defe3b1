//! Search request assembly and result-page navigation.

use common::facet_catalog::{default_facets, facets_for_fields};
use common::search_const::{DEFAULT_FACET_LIMIT, facet_limit_param};
use common::search_request::parse_facet_limits;
use common::{
    BackendQuery, FacetCatalog, FacetMap, LinkBuilder, ParamMultiMap, SearchParamError,
    SearchRequest, SearchSettings,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::api::search::search_outcome::{SearchBackend, SearchOutcome, settle_outcome};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterLink {
    pub field: String,
    pub value: String,
    pub remove_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPlan {
    pub request: SearchRequest,
    pub backend_query: BackendQuery,
    pub facets: FacetMap,
    pub facet_limits: IndexMap<String, u64>,
    pub current_url: String,
    pub active_filters: Vec<FilterLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetItemLink {
    pub name: String,
    pub count: u64,
    pub active: bool,
    /// Drill-down link, or the removal link for an active value.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetLinks {
    pub title: String,
    pub items: Vec<FacetItemLink>,
    pub show_all_url: Option<String>,
    pub show_fewer_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pager {
    pub page: u64,
    pub page_count: u64,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub plan: SearchPlan,
    pub outcome: SearchOutcome,
    pub facets: IndexMap<String, FacetLinks>,
    pub pager: Pager,
}

/// Parses the raw parameters and assembles everything the backend needs.
///
/// Fails only on an unparseable `_<facet>_limit` parameter.
pub fn build_search_plan(
    base_path: &str,
    params: &ParamMultiMap,
    settings: &SearchSettings,
    catalog: &FacetCatalog,
) -> Result<SearchPlan, SearchParamError> {
    let request = SearchRequest::parse(params)
        .constrain(settings.base_type.as_ref(), &settings.show_all_types);
    let defaults = match &settings.facet_fields {
        Some(fields) => facets_for_fields(fields.iter().map(String::as_str)),
        None => default_facets(),
    };
    let facets = catalog.resolve(defaults);
    let facet_limits = parse_facet_limits(
        params,
        facets.keys().map(String::as_str),
        settings.default_facet_limit,
    )?;
    let backend_query = BackendQuery::assemble(&request, &facets, &facet_limits, settings);

    let links = LinkBuilder::new(base_path, params);
    let active_filters = request
        .facet_filters
        .iter()
        .map(|(field, value)| FilterLink {
            field: field.clone(),
            value: value.clone(),
            remove_url: links.remove_field(field, Some(value.as_str()), None),
        })
        .collect();

    tracing::debug!(
        "search plan: q={:?} fq={:?} start={} rows={}",
        backend_query.q,
        backend_query.fq,
        backend_query.start,
        backend_query.rows
    );

    Ok(SearchPlan {
        request,
        backend_query,
        facets,
        facet_limits,
        current_url: links.current(),
        active_filters,
    })
}

pub async fn run_search<B: SearchBackend>(
    backend: &B,
    base_path: &str,
    params: &ParamMultiMap,
    plan: SearchPlan,
) -> SearchPage {
    let result = backend.search(&plan.backend_query).await;
    let outcome = settle_outcome(result, &plan.facets);
    let links = LinkBuilder::new(base_path, params);
    let facets = facet_links(&links, params, &plan, &outcome);
    let pager = pager(&links, plan.request.page, outcome.count, plan.backend_query.rows);
    SearchPage { plan, outcome, facets, pager }
}

fn facet_links(
    links: &LinkBuilder,
    params: &ParamMultiMap,
    plan: &SearchPlan,
    outcome: &SearchOutcome,
) -> IndexMap<String, FacetLinks> {
    plan.facets
        .iter()
        .map(|(field, title)| {
            let counts = outcome.facets.get(field).map(Vec::as_slice).unwrap_or_default();
            let limit = plan.facet_limits.get(field).copied().unwrap_or(DEFAULT_FACET_LIMIT);
            // a limit of 0 shows every value
            let truncated = limit > 0 && counts.len() as u64 > limit;
            let shown = if truncated { &counts[..limit as usize] } else { counts };

            let items = shown
                .iter()
                .map(|facet| {
                    let active = params.contains_pair(field, &facet.name);
                    let url = if active {
                        links.remove_field(field, Some(facet.name.as_str()), None)
                    } else {
                        links.drill_down(field, &facet.name)
                    };
                    FacetItemLink { name: facet.name.clone(), count: facet.count, active, url }
                })
                .collect();

            let show_all_url = truncated.then(|| links.set_facet_limit(field, Some(0)));
            let show_fewer_url = (params.get_first(&facet_limit_param(field)) == Some("0"))
                .then(|| links.set_facet_limit(field, None));

            let facet = FacetLinks { title: title.clone(), items, show_all_url, show_fewer_url };
            (field.clone(), facet)
        })
        .collect()
}

fn pager(links: &LinkBuilder, page: u64, count: u64, rows: u64) -> Pager {
    let page_count = count.div_ceil(rows.max(1));
    let previous_url = (page > 1).then(|| links.set_page(page - 1));
    let next_url = (page < page_count).then(|| links.set_page(page + 1));
    Pager { page, page_count, previous_url, next_url }
}
