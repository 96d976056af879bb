//! HTTP endpoint discovery.
//!
//! The browser exposes an HTTP side channel next to the WebSocket: version
//! info (including the browser WebSocket URL), the target list, and tab
//! creation.

use std::time::Duration;

use tracing::debug;
use url::Url;

use cdp_protocol::types::{BrowserVersion, PageInfo};

use crate::error::CdpError;

fn http_client(timeout: Duration) -> Result<reqwest::Client, CdpError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CdpError::Http(e.to_string()))
}

fn endpoint_url(endpoint: &str, path: &str) -> Result<Url, CdpError> {
    let base = Url::parse(endpoint)?;
    Ok(base.join(path)?)
}

/// Fetch `/json/version` from the debugging endpoint.
pub async fn browser_version(
    endpoint: &str,
    timeout: Duration,
) -> Result<BrowserVersion, CdpError> {
    let url = endpoint_url(endpoint, "json/version")?;
    debug!("fetching browser version from {url}");

    let version: BrowserVersion = http_client(timeout)?
        .get(url)
        .send()
        .await
        .map_err(|e| CdpError::BrowserNotAvailable(format!("{endpoint}: {e}")))?
        .json()
        .await
        .map_err(|e| CdpError::BrowserNotAvailable(format!("{endpoint}: {e}")))?;

    debug!("discovered browser: {}", version.browser);
    Ok(version)
}

/// List all inspectable pages via `/json/list`.
pub async fn list_pages(endpoint: &str, timeout: Duration) -> Result<Vec<PageInfo>, CdpError> {
    let url = endpoint_url(endpoint, "json/list")?;
    let pages: Vec<PageInfo> = http_client(timeout)?.get(url).send().await?.json().await?;
    Ok(pages)
}

/// Create a new page/tab via `/json/new`.
///
/// Chrome requires the PUT method for this endpoint.
pub async fn new_page(
    endpoint: &str,
    url: Option<&str>,
    timeout: Duration,
) -> Result<PageInfo, CdpError> {
    let mut create_url = endpoint_url(endpoint, "json/new")?;
    create_url.set_query(url);

    let page: PageInfo = http_client(timeout)?
        .put(create_url)
        .send()
        .await?
        .json()
        .await?;
    debug!("created new page: {} - {}", page.id, page.url);
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_join() {
        let url = endpoint_url("http://127.0.0.1:9222", "json/version").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9222/json/version");

        // A trailing slash must not double up.
        let url = endpoint_url("http://127.0.0.1:9222/", "json/list").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9222/json/list");
    }

    #[test]
    fn test_endpoint_url_rejects_garbage() {
        let err = endpoint_url("not a url", "json/version").unwrap_err();
        assert!(matches!(err, CdpError::ConnectionFailed(_)));
    }
}
