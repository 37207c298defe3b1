//! Faceted-search query model shared by the server and its clients.
//!
//! Raw query parameters are decoded into a [`ParamMultiMap`], parsed into a
//! [`SearchRequest`] and turned into a [`BackendQuery`] for the search
//! backend. [`LinkBuilder`] derives navigation links from the same raw
//! parameters without going through the request.

pub mod search_const;
pub mod param_codec;
pub mod search_request;
pub mod filter_query;
pub mod link_builder;
pub mod facet_catalog;
pub mod backend_query;

pub use backend_query::{BackendQuery, SearchSettings};
pub use facet_catalog::{FacetCatalog, FacetContributor, FacetMap};
pub use filter_query::{ResultTypesPolicy, TypeConstraint, build_filter_query};
pub use link_builder::{LinkBuilder, NavigationDelta};
pub use param_codec::ParamMultiMap;
pub use search_request::{ExtensionValue, SearchParamError, SearchRequest, SortField};
