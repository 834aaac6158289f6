//! Tool for reading web pages

use crate::error::StockError;
use async_trait::async_trait;
use crew_tools::{Result, Tool};
use regex::Regex;
use reqwest::{Client, Response};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

const MAX_RESPONSE_BYTES: usize = 200_000;
const MAX_TEXT_CHARS: usize = 8_000;

static HIDDEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|svg|head)\b.*?</(script|style|noscript|svg|head)\s*>")
        .unwrap_or_else(|e| panic!("invalid hidden-block pattern: {e}"))
});
static COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->").unwrap_or_else(|e| panic!("invalid comment pattern: {e}"))
});
static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(p|div|br|li|tr|h[1-6]|section|article|header|footer)\b[^>]*>")
        .unwrap_or_else(|e| panic!("invalid block-tag pattern: {e}"))
});
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap_or_else(|e| panic!("invalid tag pattern: {e}")));
static SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\f\v]+").unwrap_or_else(|e| panic!("invalid space pattern: {e}")));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap_or_else(|e| panic!("invalid line pattern: {e}")));

/// Fetches a page and returns its readable text
pub struct ScrapeWebsiteTool {
    http: Client,
}

impl ScrapeWebsiteTool {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Tool for ScrapeWebsiteTool {
    fn name(&self) -> &str {
        "Read website content"
    }

    fn usage_doc(&self) -> &str {
        "A tool that can be used to read a website content. The input should be a full URL, for example https://example.com/article."
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        let url = parse_url(input)?;
        debug!(url = %url, "Reading website");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(StockError::from)?
            .error_for_status()
            .map_err(StockError::from)?;
        let body = read_capped(response, MAX_RESPONSE_BYTES).await?;

        let text = page_text(&String::from_utf8_lossy(&body));
        if text.is_empty() {
            return Ok(format!("No readable content found at {url}."));
        }
        Ok(text)
    }
}

/// Read at most `cap` bytes of the body; the rest is never downloaded
async fn read_capped(
    mut response: Response,
    cap: usize,
) -> std::result::Result<Vec<u8>, StockError> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if append_capped(&mut body, &chunk, cap) {
            debug!(cap = cap, "Response body truncated");
            break;
        }
    }
    Ok(body)
}

/// Returns true once `body` holds `cap` bytes
fn append_capped(body: &mut Vec<u8>, chunk: &[u8], cap: usize) -> bool {
    let room = cap.saturating_sub(body.len());
    body.extend_from_slice(&chunk[..chunk.len().min(room)]);
    body.len() >= cap
}

fn parse_url(input: &str) -> std::result::Result<Url, StockError> {
    let raw = input.trim().trim_matches(|c| c == '"' || c == '\'' || c == '`');
    let url = Url::parse(raw).map_err(|e| StockError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(StockError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Strip markup down to visible text, capped at `MAX_TEXT_CHARS`
fn page_text(html: &str) -> String {
    let text = COMMENT.replace_all(html, "");
    let text = HIDDEN.replace_all(&text, "");
    let text = BLOCK_TAG.replace_all(&text, "\n");
    let text = TAG.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = SPACES.replace_all(&text, " ");
    let text = BLANK_LINES.replace_all(&text, "\n");

    let text: String = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((cut, _)) => format!("{}\n[content truncated]", &text[..cut]),
        None => text,
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        assert_eq!(
            parse_url(" \"https://example.com/a?b=1\" ").unwrap().as_str(),
            "https://example.com/a?b=1"
        );
        assert!(matches!(
            parse_url("file:///etc/passwd"),
            Err(StockError::InvalidUrl { .. })
        ));
        assert!(matches!(parse_url("AAPL"), Err(StockError::InvalidUrl { .. })));
    }

    #[test]
    fn test_body_stops_at_cap() {
        let mut body = Vec::new();
        assert!(!append_capped(&mut body, b"hello ", 10));
        assert!(append_capped(&mut body, b"world!", 10));
        assert_eq!(body, b"hello worl");
        assert!(append_capped(&mut body, b"more", 10));
        assert_eq!(body.len(), 10);
    }

    #[test]
    fn test_page_text() {
        let html = r#"<html><head><title>t</title><style>p { color: red; }</style></head>
            <body><!-- nav --><script>var x = 1;</script>
            <h1>Apple &amp; the market</h1>
            <p>Shares rose   3%&nbsp;today.</p><p>Analysts were &quot;cautious&quot;.</p>
            </body></html>"#;
        assert_eq!(
            page_text(html),
            "Apple & the market\nShares rose 3% today.\nAnalysts were \"cautious\"."
        );
    }

    #[test]
    fn test_page_text_truncates() {
        let html = format!("<p>{}</p>", "a".repeat(MAX_TEXT_CHARS + 10));
        let text = page_text(&html);
        assert!(text.ends_with("[content truncated]"));
        let (kept, _) = text.split_once('\n').unwrap();
        assert_eq!(kept.len(), MAX_TEXT_CHARS);
    }

    #[tokio::test]
    async fn test_invalid_url_is_invalid_input() {
        let tool = ScrapeWebsiteTool::new(Client::new());
        let err = tool.invoke("ftp://example.com").await.unwrap_err();
        assert!(matches!(err, crew_tools::ToolError::InvalidInput(_)));
    }
}
