pub mod search_backend_client;
