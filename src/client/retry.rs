use std::time::Duration;

use crate::app::{EstuaryError, Result};
use crate::client::PageFetch;
use crate::domain::InboxItem;

pub const FETCH_ATTEMPTS: u32 = 3;
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Fetches one remote page, retrying transient network failures with a
/// linearly growing delay so scrolling does not surface every hiccup as a
/// hard error. Anything other than a network failure surfaces immediately.
pub async fn fetch_page_with_retry(
    fetch: &dyn PageFetch,
    page: u32,
    limit: u32,
    force: bool,
) -> Result<Vec<InboxItem>> {
    let mut attempt = 1;
    loop {
        match fetch.fetch_page(page, limit, force).await {
            Ok(items) => return Ok(items),
            Err(EstuaryError::Network(reason)) if attempt < FETCH_ATTEMPTS => {
                tracing::debug!(
                    "Fetch of remote page {} failed (attempt {}/{}): {}",
                    page,
                    attempt,
                    FETCH_ATTEMPTS,
                    reason
                );
                tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
