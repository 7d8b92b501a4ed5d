pub mod browse;
pub mod configure;
pub mod drag;
pub mod export;
pub mod library;
pub mod query;
pub mod script;
