use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub mod extract;
pub mod keywords;
pub mod stopwords;
pub mod textprep;

pub use extract::{extract_main_text_with, MarkupEvent, MarkupParser, MarkupTree};
pub use keywords::{extract_keywords_tfidf, KeywordConfig, DEFAULT_MAX_FEATURES, MIN_WORDS};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("not enough text to analyze")]
    InsufficientText,
}

impl Error {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidUrl(_) => "invalid_url",
            Error::Fetch(_) => "fetch_failed",
            Error::InsufficientText => "insufficient_text",
        }
    }

    /// True when the caller supplied something unusable (as opposed to an upstream failure).
    pub fn is_client_input(&self) -> bool {
        matches!(self, Error::InvalidUrl(_) | Error::InsufficientText)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parse `raw` and require an `http`/`https` scheme.
pub fn parse_http_url(raw: &str) -> Result<url::Url> {
    let u = url::Url::parse(raw.trim()).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?;
    match u.scheme() {
        "http" | "https" => Ok(u),
        other => Err(Error::InvalidUrl(format!("unsupported scheme: {other}"))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRequest {
    pub url: String,
    /// Timeout for the whole request; the backend default applies when unset.
    pub timeout_ms: Option<u64>,
    /// Hard cap on bytes read from the response body.
    pub max_bytes: Option<u64>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_ms: None,
            max_bytes: None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    pub url: String,
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub truncated: bool,
    pub timings_ms: BTreeMap<String, u128>,
}

impl FetchResponse {
    /// The `charset` parameter of `content_type`, if any (unquoted, as written).
    pub fn charset(&self) -> Option<&str> {
        let ct = self.content_type.as_deref()?;
        ct.split(';').skip(1).find_map(|param| {
            let (k, v) = param.split_once('=')?;
            k.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| v.trim().trim_matches('"'))
        })
    }

    /// Body decoded with the declared charset, falling back to UTF-8 when the charset is
    /// missing or unknown. A byte-order mark wins over the header. Invalid sequences become
    /// U+FFFD.
    pub fn text(&self) -> String {
        let encoding = self
            .charset()
            .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
            .unwrap_or(encoding_rs::UTF_8);
        let (text, _, _) = encoding.decode(&self.bytes);
        text.into_owned()
    }
}

#[async_trait::async_trait]
pub trait FetchBackend: Send + Sync {
    async fn fetch(&self, req: &FetchRequest) -> Result<FetchResponse>;
}

/// One ranked keyword. Serialized as `{"word": ..., "weight": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEntry {
    #[serde(rename = "word")]
    pub term: String,
    /// In `[0, 1]`; the top entry of a non-empty ranking is 1.0.
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_entry_wire_shape_uses_word() {
        let e = KeywordEntry {
            term: "borrow checker".to_string(),
            weight: 0.5,
        };
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v, serde_json::json!({"word": "borrow checker", "weight": 0.5}));
    }

    #[test]
    fn parse_http_url_rejects_other_schemes() {
        assert!(parse_http_url("https://example.com/a").is_ok());
        assert!(parse_http_url("  http://example.com  ").is_ok());
        let e = parse_http_url("ftp://example.com").unwrap_err();
        assert_eq!(e.code(), "invalid_url");
        assert!(matches!(parse_http_url("not a url"), Err(Error::InvalidUrl(_))));
    }

    fn response(content_type: Option<&str>, bytes: &[u8]) -> FetchResponse {
        FetchResponse {
            url: "https://example.com/".to_string(),
            final_url: "https://example.com/".to_string(),
            status: 200,
            content_type: content_type.map(str::to_string),
            bytes: bytes.to_vec(),
            truncated: false,
            timings_ms: BTreeMap::new(),
        }
    }

    #[test]
    fn text_decodes_declared_latin1() {
        let r = response(
            Some("text/html; charset=ISO-8859-1"),
            b"<p>Caf\xe9 r\xe9sum\xe9 na\xefve</p>",
        );
        assert_eq!(r.charset(), Some("ISO-8859-1"));
        assert_eq!(r.text(), "<p>Café résumé naïve</p>");
    }

    #[test]
    fn text_accepts_quoted_charset_and_defaults_to_utf8() {
        let r = response(Some(r#"text/html;Charset="windows-1252""#), b"na\xefve");
        assert_eq!(r.text(), "naïve");

        let utf8 = "naïve".as_bytes();
        assert_eq!(response(None, utf8).text(), "naïve");
        assert_eq!(response(Some("text/html"), utf8).text(), "naïve");
        assert_eq!(response(Some("text/html; charset=bogus"), utf8).text(), "naïve");
    }

    #[test]
    fn text_replaces_invalid_utf8() {
        assert_eq!(response(None, b"caf\xe9").text(), "caf\u{fffd}");
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(Error::Fetch("x".into()).code(), "fetch_failed");
        assert!(!Error::Fetch("x".into()).is_client_input());
        assert!(Error::InsufficientText.is_client_input());
        assert_eq!(Error::InsufficientText.to_string(), "not enough text to analyze");
    }
}
