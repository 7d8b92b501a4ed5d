#[cfg(feature = "http-api")]
pub mod api;
pub mod error;
pub mod format;
pub mod library;
pub mod model;
pub mod paths;
pub mod registry;
pub mod reorder;
pub mod settings;
pub mod state;
pub mod storage;
