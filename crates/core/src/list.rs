//! Bucket listing
//!
//! Follows continuation tokens until the store reports the last page, so a
//! listing is never silently cut off at the store's page size.

use crate::error::Result;
use crate::traits::{ListOptions, ObjectEntry, ObjectStore};

/// List every object in `bucket`, optionally restricted to `prefix`
pub async fn list_all<S>(
    store: &S,
    bucket: &str,
    prefix: Option<&str>,
    page_size: Option<i32>,
) -> Result<Vec<ObjectEntry>>
where
    S: ObjectStore + ?Sized,
{
    let mut entries = Vec::new();
    let mut continuation_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let options = ListOptions {
            prefix: prefix.map(str::to_string),
            max_keys: page_size,
            continuation_token: continuation_token.take(),
        };

        let page = store.list_objects(bucket, options).await?;
        pages += 1;
        entries.extend(page.entries);

        if !page.truncated {
            break;
        }

        match page.continuation_token {
            Some(token) => continuation_token = Some(token),
            None => {
                tracing::warn!(
                    bucket,
                    pages,
                    "store reported a truncated listing without a continuation token"
                );
                break;
            }
        }
    }

    tracing::debug!(bucket, pages, objects = entries.len(), "listing complete");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::traits::{ListPage, MockObjectStore};
    use mockall::Sequence;

    fn page(keys: &[&str], next: Option<&str>) -> ListPage {
        ListPage {
            entries: keys.iter().map(|k| ObjectEntry::new(*k)).collect(),
            truncated: next.is_some(),
            continuation_token: next.map(str::to_string),
        }
    }

    fn keys(entries: &[ObjectEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[tokio::test]
    async fn test_single_page() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .withf(|bucket, opts| {
                bucket.to_string() == "photos" && opts.continuation_token.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(page(&["a.png", "b.png"], None)));

        let entries = list_all(&store, "photos", None, None).await.unwrap();
        assert_eq!(keys(&entries), vec!["a.png", "b.png"]);
    }

    #[tokio::test]
    async fn test_follows_every_page() {
        let mut store = MockObjectStore::new();
        let mut seq = Sequence::new();

        store
            .expect_list_objects()
            .withf(|_, opts| opts.continuation_token.is_none())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["a", "b"], Some("t1"))));
        store
            .expect_list_objects()
            .withf(|_, opts| opts.continuation_token.as_deref() == Some("t1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["c", "d"], Some("t2"))));
        store
            .expect_list_objects()
            .withf(|_, opts| opts.continuation_token.as_deref() == Some("t2"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["e"], None)));

        let entries = list_all(&store, "photos", None, Some(2)).await.unwrap();
        assert_eq!(keys(&entries), vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_prefix_and_page_size_forwarded() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .withf(|_, opts| {
                opts.prefix.as_deref() == Some("2024/") && opts.max_keys == Some(100)
            })
            .times(1)
            .returning(|_, _| Ok(page(&["2024/a"], None)));

        let entries = list_all(&store, "photos", Some("2024/"), Some(100))
            .await
            .unwrap();
        assert_eq!(keys(&entries), vec!["2024/a"]);
    }

    #[tokio::test]
    async fn test_truncated_without_token_stops() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().times(1).returning(|_, _| {
            Ok(ListPage {
                entries: vec![ObjectEntry::new("a")],
                truncated: true,
                continuation_token: None,
            })
        });

        let entries = list_all(&store, "photos", None, None).await.unwrap();
        assert_eq!(keys(&entries), vec!["a"]);
    }

    #[tokio::test]
    async fn test_failure_is_propagated_not_empty() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .times(1)
            .returning(|_, _| Err(Error::NotFound("Bucket not found: photos".into())));

        let err = list_all(&store, "photos", None, None).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_failure_on_later_page_is_propagated() {
        let mut store = MockObjectStore::new();
        let mut seq = Sequence::new();
        store
            .expect_list_objects()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["a"], Some("t1"))));
        store
            .expect_list_objects()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(Error::Network("timed out".into())));

        let result = list_all(&store, "photos", None, None).await;
        assert!(matches!(result, Err(Error::Network(_))));
    }
}
