pub mod access_gate;
pub mod edit_service;
pub mod import_service;
pub mod query_service;
