pub mod attendance;
pub mod credential;
pub mod session;
