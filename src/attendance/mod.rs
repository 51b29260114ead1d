pub mod cache;
pub mod classify;
pub mod format;
pub mod loader;
