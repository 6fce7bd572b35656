pub mod google;
pub mod import;
pub mod sqlite;
