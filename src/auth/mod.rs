pub mod extractor;
pub mod flow;
pub mod handlers;
pub mod password;
pub mod session;
