//! Runtime configuration.
//!
//! Values come from CLI flags with `WORDCLOUD_*` environment fallbacks (see `main.rs`). An
//! optional env file (`WORDCLOUD_ENV_FILE`) can pre-populate those variables.

use std::net::SocketAddr;
use wordcloud_core::{KeywordConfig, DEFAULT_MAX_FEATURES};
use wordcloud_local::AnalyzeConfig;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_BYTES: u64 = 5_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub fetch_timeout_ms: u64,
    pub max_bytes: u64,
    pub max_features: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            max_bytes: DEFAULT_MAX_BYTES,
            max_features: DEFAULT_MAX_FEATURES,
        }
    }
}

impl ServerConfig {
    pub fn analyze_config(&self) -> AnalyzeConfig {
        AnalyzeConfig {
            keywords: KeywordConfig {
                max_features: self.max_features,
            },
            timeout_ms: Some(self.fetch_timeout_ms),
            max_bytes: Some(self.max_bytes),
        }
    }
}

/// Parse `KEY=VALUE` lines. Blank lines, `#` comments and lines without `=` are skipped.
pub fn parse_env_file(txt: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in txt.lines() {
        let s = raw.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let Some((k, v)) = s.split_once('=') else {
            continue;
        };
        let k = k.trim();
        if k.is_empty() {
            continue;
        }
        out.push((k.to_string(), v.trim().to_string()));
    }
    out
}

/// Load `WORDCLOUD_ENV_FILE` if set.
///
/// - sets vars only if not already set in the process environment
/// - a missing or unreadable file is ignored
/// - never logs values
///
/// Call before spawning any threads.
pub fn load_env_file() {
    let Ok(p) = std::env::var("WORDCLOUD_ENV_FILE") else {
        return;
    };
    let p = p.trim();
    if p.is_empty() {
        return;
    }
    let Ok(txt) = std::fs::read_to_string(p) else {
        return;
    };
    for (k, v) in parse_env_file(&txt) {
        if std::env::var_os(&k).is_none() {
            std::env::set_var(k, v);
        }
    }
}
