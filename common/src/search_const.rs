//! Reserved parameter names and search defaults.

/// Free-text query term.
pub const PARAM_QUERY: &str = "q";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_SORT: &str = "sort";

/// Structural keys that never become facet filters.
pub const RESERVED_PARAMS: [&str; 3] = [PARAM_QUERY, PARAM_PAGE, PARAM_SORT];

/// Pass-through parameters forwarded opaquely to the search backend.
pub const EXTENSION_PREFIX: &str = "ext_";

/// Control parameters such as `_tags_limit`.
pub const CONTROL_PREFIX: &str = "_";

/// Cache-control parameters that must not leak into generated links.
pub const CACHE_PARAMETERS: [&str; 2] = ["__cache", "__no_cache__"];

pub const DEFAULT_ITEMS_PER_PAGE: u64 = 20;
pub const DEFAULT_FACET_LIMIT: u64 = 10;
/// Values fetched per facet when a facet lists every value.
pub const DEFAULT_FACET_FETCH_LIMIT: u64 = 50;

pub const DEFAULT_TYPE_FIELD: &str = "dataset_type";
pub const DEFAULT_BASE_TYPE: &str = "dataset";

/// Facet field used when no contributor changes the defaults, with its label.
pub const DEFAULT_FACETS: [(&str, &str); 5] = [
    ("organization", "Organizations"),
    ("groups", "Groups"),
    ("tags", "Tags"),
    ("res_format", "Formats"),
    ("license_id", "Licenses"),
];

/// Name of the control parameter holding the display limit of one facet.
pub fn facet_limit_param(field: &str) -> String {
    format!("{CONTROL_PREFIX}{field}_limit")
}

/// True for keys that are structural, control or volatile.
pub fn is_reserved_param(key: &str) -> bool {
    RESERVED_PARAMS.contains(&key) || key.starts_with(CONTROL_PREFIX)
}
