//! Web pages: fetch over HTTP, strip page chrome, collapse to text.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html};
use tracing::debug;
use url::Url;

use answerfill_shared::{AnswerFillError, ExtractionConfig, ExtractionError, Result, SourceKind};

use crate::Extractor;

/// Runs of two or more spaces separate independent text fragments.
static MULTI_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("invalid multi-space regex"));

/// Fetches a URL and returns the visible text of the page.
pub struct WebExtractor {
    client: Client,
    timeout_secs: u64,
    stripped_tags: &'static [&'static str],
}

impl WebExtractor {
    /// Build the HTTP client from extraction settings.
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.url_timeout_secs))
            .build()
            .map_err(|e| AnswerFillError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout_secs: config.url_timeout_secs,
            stripped_tags: config.html_profile.stripped_tags(),
        })
    }
}

#[async_trait]
impl Extractor for WebExtractor {
    fn kind(&self) -> SourceKind {
        SourceKind::Url
    }

    async fn extract(&self, locator: &str) -> std::result::Result<String, ExtractionError> {
        let url = Url::parse(locator)
            .map_err(|e| ExtractionError::fetch(locator, format!("invalid URL: {e}")))?;

        debug!(%url, "fetching page");

        let response = self.client.get(url.as_str()).send().await.map_err(|e| {
            if e.is_timeout() {
                ExtractionError::fetch(locator, format!("timed out after {}s", self.timeout_secs))
            } else {
                ExtractionError::fetch(locator, e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::fetch(locator, format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::fetch(locator, format!("body read failed: {e}")))?;

        debug!(%url, bytes = body.len(), "page fetched");
        Ok(html_to_text(&body, self.stripped_tags))
    }
}

// ---------------------------------------------------------------------------
// HTML → text
// ---------------------------------------------------------------------------

/// Collect the text of an HTML document, dropping `stripped_tags` subtrees.
///
/// Each line is trimmed and split on runs of two or more spaces; empty
/// fragments are dropped and the rest joined with newlines.
pub fn html_to_text(html: &str, stripped_tags: &[&str]) -> String {
    let doc = Html::parse_document(html);
    let mut raw = String::new();
    collect_text(doc.root_element(), stripped_tags, &mut raw);

    raw.lines()
        .flat_map(|line| MULTI_SPACE_RE.split(line.trim()))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, stripped_tags: &[&str], out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(el) = ElementRef::wrap(child) {
            if stripped_tags.contains(&el.value().name()) {
                continue;
            }
            collect_text(el, stripped_tags, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answerfill_shared::{ErrorKind, HtmlProfile};

    const PAGE: &str = r#"<html><head><style>body { color: red; }</style></head><body>
<header>Site Header</header>
<nav>Home | About</nav>
<main>
  <h2>## A1. Use TLS</h2>
  <p>Always    encrypt traffic.</p>
</main>
<script>var tracking = 1;</script>
<footer>Copyright</footer>
</body></html>"#;

    #[test]
    fn strip_chrome_drops_navigation() {
        let text = html_to_text(PAGE, HtmlProfile::StripChrome.stripped_tags());
        assert_eq!(text, "## A1. Use TLS\nAlways\nencrypt traffic.");
    }

    #[test]
    fn scripts_only_keeps_navigation() {
        let text = html_to_text(PAGE, HtmlProfile::ScriptsOnly.stripped_tags());
        assert!(text.contains("Site Header"));
        assert!(text.contains("Home | About"));
        assert!(text.contains("Copyright"));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color: red"));
    }

    #[tokio::test]
    async fn fetches_and_collapses_page() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/answers"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let extractor = WebExtractor::new(&ExtractionConfig::default()).unwrap();
        let text = extractor
            .extract(&format!("{}/answers", server.uri()))
            .await
            .unwrap();
        assert!(text.starts_with("## A1. Use TLS"));
        assert!(!text.contains("Site Header"));
    }

    #[tokio::test]
    async fn non_success_status_is_fetch_error() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let extractor = WebExtractor::new(&ExtractionConfig::default()).unwrap();
        let err = extractor
            .extract(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FetchError);
        assert!(err.to_string().contains("404"));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(PAGE)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = ExtractionConfig {
            url_timeout_secs: 1,
            ..ExtractionConfig::default()
        };
        let extractor = WebExtractor::new(&config).unwrap();
        let err = extractor.extract(&server.uri()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FetchError);
        assert!(err.to_string().contains("timed out"));
    }
}
