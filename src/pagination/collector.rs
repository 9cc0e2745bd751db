//! Sequential page collector

use super::types::PageSource;
use crate::error::Result;
use tracing::{debug, info};

/// Fetch every page of `source` in order and concatenate the records
///
/// Exactly one metadata probe is made, followed by one request per page.
/// Page `n + 1` is not requested until page `n` has been received. Errors
/// from the probe or any page are returned as-is; nothing is retried here.
pub async fn collect_pages<T, S>(source: &S) -> Result<Vec<T>>
where
    T: Send,
    S: PageSource<T> + ?Sized,
{
    let total_pages = source.metadata().await?.page_count()?;
    debug!(total_pages, "collecting pages");

    let mut records = Vec::new();
    for page in 1..=total_pages {
        match source.fetch_page(page).await? {
            Some(batch) => {
                debug!(page, records = batch.len(), "fetched page");
                records.extend(batch);
            }
            None => debug!(page, "page returned no body"),
        }
    }

    info!(total_pages, records = records.len(), "collection complete");
    Ok(records)
}
