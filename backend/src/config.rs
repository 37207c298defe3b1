//! Server and search settings read from the environment.

use common::{ResultTypesPolicy, SearchSettings, TypeConstraint};
use common::search_const::{
    DEFAULT_BASE_TYPE, DEFAULT_FACET_FETCH_LIMIT, DEFAULT_FACET_LIMIT, DEFAULT_ITEMS_PER_PAGE,
    DEFAULT_TYPE_FIELD,
};
use tracing::warn;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8983/search";


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub backend_url: String,
    pub search: SearchSettings,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Missing keys take their defaults; bad numbers are logged and defaulted.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let items_per_page = positive_or(&lookup, "SEARCH_ITEMS_PER_PAGE", DEFAULT_ITEMS_PER_PAGE);
        let default_facet_limit = positive_or(&lookup, "SEARCH_FACETS_DEFAULT", DEFAULT_FACET_LIMIT);
        let facet_fetch_limit = positive_or(&lookup, "SEARCH_FACETS_LIMIT", DEFAULT_FACET_FETCH_LIMIT);

        let show_all_types = lookup("SEARCH_SHOW_ALL_TYPES")
            .map(|raw| ResultTypesPolicy::parse(&raw))
            .unwrap_or_default();

        let default_include_private = match lookup("SEARCH_DEFAULT_INCLUDE_PRIVATE") {
            None => true,
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                warn!("SEARCH_DEFAULT_INCLUDE_PRIVATE: not a boolean: {:?}, using true", raw);
                true
            }),
        };

        let type_field = lookup("SEARCH_TYPE_FIELD").unwrap_or(DEFAULT_TYPE_FIELD.to_string());
        let base_type = lookup("SEARCH_BASE_TYPE").unwrap_or(DEFAULT_BASE_TYPE.to_string());
        let base_type = if type_field.trim().is_empty() || base_type.trim().is_empty() {
            None
        } else {
            Some(TypeConstraint::new(type_field.trim(), base_type.trim()))
        };

        let facet_fields = lookup("SEARCH_FACETS")
            .map(|raw| raw.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|fields| !fields.is_empty());

        Self {
            bind_addr: lookup("SEARCH_BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR.to_string()),
            backend_url: lookup("SEARCH_BACKEND_URL").unwrap_or(DEFAULT_BACKEND_URL.to_string()),
            search: SearchSettings {
                items_per_page,
                default_facet_limit,
                facet_fetch_limit,
                show_all_types,
                default_include_private,
                base_type,
                facet_fields,
            },
        }
    }
}

fn positive_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => value,
        _ => {
            warn!("{}: expected a positive integer, got {:?}, using {}", key, raw, default);
            default
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
