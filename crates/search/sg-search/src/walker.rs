//! Lazy, paginated listing of the objects under a prefix.

use async_stream::try_stream;
use futures::{Stream, StreamExt, pin_mut};
use sg_error::Result;
use tracing::{debug, trace};

use crate::location::is_directory_marker;
use crate::store::ObjectStore;

/// List the keys under `prefix`, skipping directory markers.
///
/// Pages are fetched on demand: the next page is requested only after every
/// key of the current one has been consumed. Dropping the stream stops the
/// listing without further requests. Keys come out in the store's listing
/// order.
///
/// # Example
///
/// ```ignore
/// use futures::{StreamExt, pin_mut};
///
/// let entries = list_entries(&store, "my-bucket", "logs/");
/// pin_mut!(entries);
///
/// while let Some(key) = entries.next().await {
///     println!("Found: {}", key?);
/// }
/// ```
pub fn list_entries<'a, S>(
    store: &'a S,
    bucket: &'a str,
    prefix: &'a str,
) -> impl Stream<Item = Result<String>> + 'a
where
    S: ObjectStore + ?Sized,
{
    try_stream! {
        let mut continuation: Option<String> = None;
        let mut page_number = 0usize;

        loop {
            let page = store.list_page(bucket, prefix, continuation.take()).await?;
            page_number += 1;

            debug!(
                bucket = %bucket,
                prefix = %prefix,
                page = page_number,
                keys = page.keys.len(),
                "Fetched listing page"
            );

            for key in page.keys {
                if is_directory_marker(&key) {
                    trace!(key = %key, "Skipping directory marker");
                    continue;
                }

                yield key;
            }

            match page.next_continuation {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }
    }
}

/// Visit every key under `prefix` until `visit` returns `false`.
///
/// Each visit completes before the next key is produced. Returning `false`
/// is a normal stop, not an error, and no further pages are fetched. A failed
/// page fetch is returned as-is; keys visited before it stay visited.
pub async fn walk<S, F>(store: &S, bucket: &str, prefix: &str, mut visit: F) -> Result<()>
where
    S: ObjectStore + ?Sized,
    F: AsyncFnMut(&str) -> bool,
{
    let entries = list_entries(store, bucket, prefix);
    pin_mut!(entries);

    while let Some(key) = entries.next().await {
        let key = key?;

        if !visit(&key).await {
            debug!(key = %key, "Walk stopped by visitor");
            break;
        }
    }

    Ok(())
}
