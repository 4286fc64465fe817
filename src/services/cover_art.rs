//! Best-effort cover-art lookup against the Steam CDN.

/// Header image URL for an app, if the CDN reports one exists.
///
/// Issues a single HEAD request; any network failure or non-success status
/// yields `None`. Purely cosmetic — this must never fail or block a discovery
/// pass beyond its own await.
pub async fn fetch_cover_art(app_id: u32) -> Option<String> {
    let cover_url = format!(
        "https://cdn.akamai.steamstatic.com/steam/apps/{}/header.jpg",
        app_id
    );

    match reqwest::Client::new().head(&cover_url).send().await {
        Ok(response) if response.status().is_success() => Some(cover_url),
        Ok(response) => {
            tracing::debug!("No cover art for app {}: HTTP {}", app_id, response.status());
            None
        }
        Err(e) => {
            tracing::debug!("Failed to fetch cover art for app {}: {}", app_id, e);
            None
        }
    }
}
