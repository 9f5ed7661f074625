//! Lazy row stream over a cursor

use super::{RowValue, Rows};
use crate::{Error, Result};
use futures::stream::{self, Stream};

/// Stream every row of `rows`, decoded, in cursor order
///
/// The stream ends after the first error: a failed fetch yields
/// [`Error::Query`], a failed decode yields [`Error::Decode`] with the 0-based
/// row position. The cursor is borrowed, not closed; the caller releases it.
pub fn row_stream<R>(rows: &mut R) -> impl Stream<Item = Result<RowValue>> + '_
where
    R: Rows + ?Sized,
{
    stream::try_unfold((rows, 0usize), |(rows, position)| async move {
        if !rows.next().await.map_err(Error::Query)? {
            return Ok(None);
        }

        let value = rows
            .scan()
            .map_err(|source| Error::decode(position, source))?;

        Ok::<_, Error>(Some((value, (rows, position + 1))))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::memory::{CallLog, Script};
    use crate::driver::DriverResult;
    use async_trait::async_trait;
    use futures::{StreamExt, TryStreamExt};
    use serde_json::json;

    struct Counting {
        remaining: usize,
    }

    #[async_trait]
    impl Rows for Counting {
        async fn next(&mut self) -> DriverResult<bool> {
            if self.remaining == 0 {
                return Ok(false);
            }
            self.remaining -= 1;
            Ok(true)
        }

        fn scan(&mut self) -> DriverResult<RowValue> {
            Ok(json!(self.remaining))
        }

        async fn close(&mut self) -> DriverResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_stream_yields_rows_in_order() {
        let mut rows = Counting { remaining: 3 };
        let values: Vec<RowValue> = row_stream(&mut rows).try_collect().await.unwrap();
        assert_eq!(values, vec![json!(2), json!(1), json!(0)]);
    }

    #[tokio::test]
    async fn test_stream_empty() {
        let mut rows = Counting { remaining: 0 };
        let values: Vec<RowValue> = row_stream(&mut rows).try_collect().await.unwrap();
        assert!(values.is_empty());
    }

    #[tokio::test]
    async fn test_stream_stops_after_decode_error() {
        let script = Script::new().rows(["1", "{broken", "3"]);
        let mut rows = script.cursor(CallLog::new());

        let items: Vec<Result<RowValue>> = row_stream(&mut rows).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), &json!(1));
        assert!(matches!(items[1], Err(Error::Decode { row: 1, .. })));
    }

    #[tokio::test]
    async fn test_stream_fetch_error_is_query_error() {
        let script = Script::new().rows(["1", "2"]).fail_fetch_at(1, "lost connection");
        let mut rows = script.cursor(CallLog::new());

        let items: Vec<Result<RowValue>> = row_stream(&mut rows).collect().await;
        assert_eq!(items.len(), 2);
        assert!(matches!(items[1], Err(Error::Query(_))));
    }
}
