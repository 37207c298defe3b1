//! Navigation links derived from the current search parameters.
//!
//! Every operation is a pure function of the base parameters and one
//! [`NavigationDelta`]. Untouched keys keep their relative order; `sort` and
//! `page` are removed and re-appended at the end when changed, while facet
//! additions and removals leave the survivors where they were.

use serde::{Deserialize, Serialize};

use crate::param_codec::ParamMultiMap;
use crate::search_const::{CACHE_PARAMETERS, PARAM_PAGE, PARAM_SORT, facet_limit_param};
use crate::search_request::{SortField, render_sort};


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationDelta {
    AddFacetValue {
        field: String,
        value: String,
    },
    /// Without `value` every occurrence of `field` is removed. With
    /// `replacement` the removed occurrences are substituted instead.
    RemoveFacetValue {
        field: String,
        value: Option<String>,
        replacement: Option<String>,
    },
    SetSort(Vec<SortField>),
    SetPage(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    base_path: String,
    params: ParamMultiMap,
}

impl LinkBuilder {
    /// Volatile cache parameters are dropped from `params` up front.
    pub fn new(base_path: impl Into<String>, params: &ParamMultiMap) -> Self {
        let mut params = params.clone();
        params.retain(|(k, _)| !CACHE_PARAMETERS.contains(&k.as_str()));
        Self { base_path: base_path.into(), params }
    }

    /// Splits `path?query#fragment`; the fragment is discarded.
    pub fn from_url(url: &str) -> Self {
        let url = url.split_once('#').map_or(url, |(before, _)| before);
        match url.split_once('?') {
            Some((path, query)) => Self::new(path, &ParamMultiMap::decode(query)),
            None => Self::new(url, &ParamMultiMap::new()),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn params(&self) -> &ParamMultiMap {
        &self.params
    }

    pub fn apply(&self, delta: &NavigationDelta) -> ParamMultiMap {
        let mut params = self.params.clone();
        match delta {
            NavigationDelta::AddFacetValue { field, value } => {
                params.push(field.clone(), value.clone());
            }
            NavigationDelta::RemoveFacetValue { field, value, replacement } => {
                remove_pairs(&mut params, field, value.as_deref(), replacement.as_deref());
            }
            NavigationDelta::SetSort(fields) => {
                params.remove_key(PARAM_PAGE);
                params.remove_key(PARAM_SORT);
                params.push(PARAM_SORT, render_sort(fields));
            }
            NavigationDelta::SetPage(page) => {
                params.remove_key(PARAM_PAGE);
                params.push(PARAM_PAGE, page.to_string());
            }
        }
        params
    }

    pub fn url_for(&self, params: &ParamMultiMap) -> String {
        if params.is_empty() {
            self.base_path.clone()
        } else {
            format!("{}?{}", self.base_path, params.encode())
        }
    }

    pub fn current(&self) -> String {
        self.url_for(&self.params)
    }

    /// Keeps the current page.
    pub fn drill_down(&self, field: &str, value: &str) -> String {
        self.url_for(&self.apply(&NavigationDelta::AddFacetValue {
            field: field.to_string(),
            value: value.to_string(),
        }))
    }

    pub fn remove_field(&self, field: &str, value: Option<&str>, replacement: Option<&str>) -> String {
        self.url_for(&self.apply(&NavigationDelta::RemoveFacetValue {
            field: field.to_string(),
            value: value.map(str::to_string),
            replacement: replacement.map(str::to_string),
        }))
    }

    /// Always resets pagination.
    pub fn set_sort(&self, fields: &[SortField]) -> String {
        self.url_for(&self.apply(&NavigationDelta::SetSort(fields.to_vec())))
    }

    pub fn set_page(&self, page: u64) -> String {
        self.url_for(&self.apply(&NavigationDelta::SetPage(page)))
    }

    /// Replaces `_<field>_limit` in place, or drops it when `limit` is `None`.
    pub fn set_facet_limit(&self, field: &str, limit: Option<u64>) -> String {
        let replacement = limit.map(|l| l.to_string());
        self.remove_field(&facet_limit_param(field), None, replacement.as_deref())
    }
}

fn remove_pairs(params: &mut ParamMultiMap, field: &str, value: Option<&str>, replacement: Option<&str>) {
    let matches = |k: &str, v: &str| k == field && value.is_none_or(|value| v == value);
    let pairs = params.pairs_mut();
    let first = pairs.iter().position(|(k, v)| matches(k.as_str(), v.as_str()));
    pairs.retain(|(k, v)| !matches(k.as_str(), v.as_str()));

    if let Some(replacement) = replacement {
        let at = first.unwrap_or(pairs.len());
        pairs.insert(at, (field.to_string(), replacement.to_string()));
    }
}
