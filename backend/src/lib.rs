//! Search server: settings, search plans, backend client and HTTP routes.

pub mod api;
pub mod config;
pub mod db_utils;
pub mod server_extra;
