//! Periodic keep-alive ping, used to keep an idle-suspending host awake.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Send one keep-alive request
pub async fn ping_once(http: &reqwest::Client, url: &str) -> Result<(), reqwest::Error> {
    http.get(url).send().await?.error_for_status()?;
    Ok(())
}

/// Ping `url` every `interval` until the task is aborted. Failures are only logged.
pub fn spawn_keep_alive(http: reqwest::Client, url: String, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match ping_once(&http, &url).await {
                Ok(()) => tracing::debug!("Keep-alive ping to {} succeeded", url),
                Err(e) => tracing::warn!("Keep-alive ping to {} failed: {}", url, e),
            }
        }
    })
}
