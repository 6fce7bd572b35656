pub mod board;
pub mod edit;
pub mod layout;
pub mod session;
