pub mod client;
pub mod credentials;
pub mod token;
