//! Exhaustive paginated download of one collection.

use crate::Error;
use crate::routes::CollectionKind;
use crate::store::{DocumentStore, PageCursor, RawDocument};

/// Scan `kind`'s collection to exhaustion, yielding `(route key, document)`
/// pairs in store order.
///
/// The cursor is carried as loop state: a full page continues strictly
/// after its last document, a short page ends the scan. A query failure
/// aborts the scan and propagates; partial results are dropped by the
/// caller. Every document must be keyable - a missing slug fails the scan
/// rather than silently dropping a route.
pub(crate) async fn download_collection(
    store: &dyn DocumentStore, kind: CollectionKind, page_size: usize,
) -> Result<Vec<(String, RawDocument)>, Error> {
    let collection = kind.collection();
    let mut entries: Vec<(String, RawDocument)> = Vec::new();
    let mut cursor: Option<PageCursor> = None;

    loop {
        let page = store.query_page(collection, page_size, cursor.as_ref()).await?;
        let fetched = page.docs.len();

        for doc in page.docs {
            let key = match doc.slug() {
                Some(slug) => kind.route_key(slug),
                None => {
                    return Err(Error::MalformedDocument {
                        route: doc.name.clone(),
                        reason: "missing slug field".into(),
                    });
                }
            };
            entries.push((key, doc));
        }

        if fetched < page_size {
            break;
        }
        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    tracing::debug!(collection, documents = entries.len(), "collection scan complete");
    Ok(entries)
}
