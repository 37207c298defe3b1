//! Search API: plan assembly, backend seam and module exports.

pub mod search_outcome;
pub use search_outcome::{FacetCount, SearchBackend, SearchBackendError, SearchOutcome, settle_outcome};

pub mod search_plan;
pub use search_plan::{SearchPage, SearchPlan, build_search_plan, run_search};
