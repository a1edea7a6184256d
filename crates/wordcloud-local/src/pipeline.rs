//! Fetch → extract → score.

use crate::extract::extract_main_text;
use serde::Serialize;
use wordcloud_core::{
    extract_keywords_tfidf, parse_http_url, Error, FetchBackend, FetchRequest, KeywordConfig,
    KeywordEntry, Result,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzeConfig {
    pub keywords: KeywordConfig,
    /// Per-request fetch timeout; the fetcher default applies when unset.
    pub timeout_ms: Option<u64>,
    /// Cap on downloaded body bytes.
    pub max_bytes: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Keywords {
    pub text_chars: usize,
    pub words: Vec<KeywordEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub url: String,
    pub final_url: String,
    pub truncated: bool,
    pub text_chars: usize,
    pub words: Vec<KeywordEntry>,
}

/// Score already-extracted text. An empty ranking is `Error::InsufficientText`.
pub fn analyze_text(text: &str, keywords: &KeywordConfig) -> Result<Vec<KeywordEntry>> {
    let words = extract_keywords_tfidf(text, keywords.max_features);
    tracing::debug!(keywords = words.len(), "scored");
    if words.is_empty() {
        return Err(Error::InsufficientText);
    }
    Ok(words)
}

/// Extract the main text of `html` and score it.
pub fn analyze_html(html: &str, keywords: &KeywordConfig) -> Result<Keywords> {
    let text = extract_main_text(html);
    let text_chars = text.chars().count();
    tracing::debug!(text_chars, "extracted main text");
    let words = analyze_text(&text, keywords)?;
    Ok(Keywords { text_chars, words })
}

/// Fetch `url` with `fetcher`, extract its main text and rank its keywords.
pub async fn analyze<F>(fetcher: &F, url: &str, cfg: &AnalyzeConfig) -> Result<Analysis>
where
    F: FetchBackend + ?Sized,
{
    let url = parse_http_url(url)?.to_string();
    let mut req = FetchRequest::new(url.clone());
    req.timeout_ms = cfg.timeout_ms;
    req.max_bytes = cfg.max_bytes;

    let resp = match fetcher.fetch(&req).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(%url, code = e.code(), error = %e, "fetch failed");
            return Err(e);
        }
    };
    let html = resp.text();
    let Keywords { text_chars, words } = analyze_html(&html, &cfg.keywords)?;
    tracing::info!(
        %url,
        final_url = %resp.final_url,
        text_chars,
        keywords = words.len(),
        "analyzed"
    );
    Ok(Analysis {
        url,
        final_url: resp.final_url,
        truncated: resp.truncated,
        text_chars,
        words,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use wordcloud_core::FetchResponse;

    /// Serves one canned body and records the requests it saw.
    struct CannedFetcher {
        body: Result<String>,
        seen: Mutex<Vec<FetchRequest>>,
    }

    impl CannedFetcher {
        fn ok(body: &str) -> Self {
            Self {
                body: Ok(body.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl FetchBackend for CannedFetcher {
        async fn fetch(&self, req: &FetchRequest) -> Result<FetchResponse> {
            self.seen.lock().unwrap().push(req.clone());
            match &self.body {
                Ok(b) => Ok(FetchResponse {
                    url: req.url.clone(),
                    final_url: req.url.clone(),
                    status: 200,
                    content_type: Some("text/html".to_string()),
                    bytes: b.clone().into_bytes(),
                    truncated: false,
                    timings_ms: BTreeMap::new(),
                }),
                Err(e) => Err(Error::Fetch(e.to_string())),
            }
        }
    }

    const ARTICLE: &str = r#"<html><body>
        <p>Rust ownership makes memory safety practical, and ownership is checked at compile time.</p>
        <script>var tracking = "ownership ownership ownership";</script>
        <p>Ownership rules let the compiler reason about memory without garbage collection.</p>
        </body></html>"#;

    #[tokio::test]
    async fn analyze_ranks_extracted_paragraph_text() {
        let fetcher = CannedFetcher::ok(ARTICLE);
        let cfg = AnalyzeConfig {
            timeout_ms: Some(1_234),
            max_bytes: Some(9_999),
            ..AnalyzeConfig::default()
        };
        let a = analyze(&fetcher, "https://example.com/post", &cfg)
            .await
            .unwrap();
        assert_eq!(a.url, "https://example.com/post");
        assert_eq!(a.words[0].term, "ownership");
        assert_eq!(a.words[0].weight, 1.0);
        assert!(a.words.iter().any(|w| w.term == "memory"));
        assert!(!a.words.iter().any(|w| w.term == "tracking"));
        assert!(a.text_chars > 0);

        let seen = fetcher.seen.lock().unwrap();
        assert_eq!(seen[0].timeout_ms, Some(1_234));
        assert_eq!(seen[0].max_bytes, Some(9_999));
    }

    #[tokio::test]
    async fn analyze_rejects_invalid_url_before_fetching() {
        let fetcher = CannedFetcher::ok(ARTICLE);
        let err = analyze(&fetcher, "javascript:alert(1)", &AnalyzeConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_url");
        assert!(fetcher.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn analyze_propagates_fetch_errors() {
        let fetcher = CannedFetcher {
            body: Err(Error::Fetch("connection refused".to_string())),
            seen: Mutex::new(Vec::new()),
        };
        let err = analyze(&fetcher, "https://example.com/", &AnalyzeConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "fetch_failed");
    }

    #[tokio::test]
    async fn analyze_reports_insufficient_text() {
        let fetcher = CannedFetcher::ok("<p>too short</p><div>lots of words outside paragraphs here</div>");
        let err = analyze(&fetcher, "https://example.com/", &AnalyzeConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientText));
    }

    #[test]
    fn analyze_html_respects_feature_cap() {
        let cfg = KeywordConfig { max_features: 3 };
        let k = analyze_html(ARTICLE, &cfg).unwrap();
        assert_eq!(k.words.len(), 3);
    }

    #[test]
    fn analyze_text_empty_is_insufficient() {
        let err = analyze_text("", &KeywordConfig::default()).unwrap_err();
        assert_eq!(err.code(), "insufficient_text");
    }
}
