use anyhow::{Context, Result};
use rand::Rng;
use std::time::Duration;

/// Stenoprotocol archive of the 2021 electoral term.
pub const STENPROT_BASE: &str = "https://www.psp.cz/eknih/2021ps/stenprot";

/// The site serves windows-1250; pages are decoded to UTF-8 on arrival so
/// everything cached on disk is plain UTF-8.
const PAGE_CHARSET: &str = "windows-1250";

pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36")
        .build()
        .context("failed to build HTTP client")
}

/// Overview page listing the speeches of one part of a session.
pub fn overview_url(session: u32, part: u32) -> String {
    format!("{STENPROT_BASE}/{session}schuz/{session}-{part}.htm")
}

/// Transcript page, addressed by the file name the overview links to.
pub fn transcript_url(session: u32, file: &str) -> String {
    format!("{STENPROT_BASE}/{session}schuz/{file}")
}

/// Polite GET of one archive page.
///
/// Sleeps the politeness delay (plus jitter) before the request. A 404 or a
/// non-HTML response means the page does not exist, which ends pagination,
/// so it comes back as `Ok(None)` rather than an error. There is no retry:
/// a failed page is the caller's problem to log and move past.
pub async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
    delay: Duration,
) -> Result<Option<String>> {
    politeness_pause(delay).await;
    tracing::debug!(url, "fetching page");
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?;
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !response.status().is_success() {
        anyhow::bail!("{url} returned HTTP {}", response.status());
    }
    let is_html = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("html"));
    if !is_html {
        return Ok(None);
    }
    let text = response
        .text_with_charset(PAGE_CHARSET)
        .await
        .with_context(|| format!("failed to read body of {url}"))?;
    Ok(Some(text))
}

/// Fixed base delay plus up to half of it in random jitter, so request
/// timing does not look mechanical to the archive.
async fn politeness_pause(base: Duration) {
    if base.is_zero() {
        return;
    }
    let jitter = rand::thread_rng().gen_range(0..=base.as_millis() as u64 / 2);
    tokio::time::sleep(base + Duration::from_millis(jitter)).await;
}
