//! Search API and module exports.

pub mod search;
