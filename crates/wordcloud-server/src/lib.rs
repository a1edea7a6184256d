//! `wordcloud-server` crate (library surface).
//!
//! The primary entrypoint is the `wordcloud` binary (HTTP server + CLI). The router and config
//! live here so integration tests can mount them in-process.

pub mod api;
pub mod config;
pub mod observability;

pub use api::{build_router, AnalyzeRequest, AnalyzeResponse, ApiError, AppState};
pub use config::ServerConfig;
pub use wordcloud_core as core;
