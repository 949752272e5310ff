//! Push-based live queries.
//!
//! Every repository write reports the tables it touched to a [`ChangeNotifier`].
//! A [`LiveQuery`] re-runs its query whenever one of its tables changes, so a
//! subscriber always holds the latest committed result rather than a snapshot.

use futures_util::Stream;
use tokio::sync::{broadcast, watch};

use crate::errors::AppError;

/// Buffered change events per subscriber before it is considered lagging.
const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Tables that can be observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Accounts,
    Sessions,
    GridPositions,
    Polygons,
    NineLiners,
}

/// Fan-out of committed table changes.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<Table>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Announce that `tables` changed. Call only after the write has committed.
    pub fn notify(&self, tables: &[Table]) {
        for table in tables {
            // No receivers just means nobody is observing right now.
            let _ = self.tx.send(*table);
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Table> {
        self.tx.subscribe()
    }
}

/// A continuously refreshed query result.
#[derive(Debug)]
pub struct LiveQuery<T> {
    rx: watch::Receiver<Vec<T>>,
}

impl<T> Clone for LiveQuery<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T: Clone> LiveQuery<T> {
    pub(crate) const fn new(rx: watch::Receiver<Vec<T>>) -> Self {
        Self { rx }
    }

    /// The latest result.
    #[must_use]
    pub fn current(&self) -> Vec<T> {
        self.rx.borrow().clone()
    }

    /// Number of rows in the latest result.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.borrow().is_empty()
    }

    /// Wait for the next refresh and return it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] once the refresh task has stopped.
    pub async fn changed(&mut self) -> Result<Vec<T>, AppError> {
        self.rx
            .changed()
            .await
            .map_err(|_| AppError::Internal("live query closed".to_string()))?;
        Ok(self.rx.borrow_and_update().clone())
    }

    /// Wait until the latest result satisfies `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the query closes first.
    pub async fn wait_for<P>(&mut self, mut predicate: P) -> Result<Vec<T>, AppError>
    where
        P: FnMut(&[T]) -> bool,
    {
        loop {
            {
                let rows = self.rx.borrow_and_update();
                if predicate(rows.as_slice()) {
                    return Ok(rows.clone());
                }
            }
            self.changed().await?;
        }
    }

    /// Stream of results: the current one first, then every refresh.
    pub fn into_stream(self) -> impl Stream<Item = Vec<T>> {
        futures_util::stream::unfold((self, true), |(mut query, first)| async move {
            if first {
                let rows = query.rx.borrow_and_update().clone();
                return Some((rows, (query, false)));
            }
            query.changed().await.ok().map(|rows| (rows, (query, false)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notify_reaches_subscribers() {
        let notifier = ChangeNotifier::new();
        let mut rx = notifier.subscribe();
        notifier.notify(&[Table::Sessions, Table::GridPositions]);
        assert_eq!(rx.recv().await.ok(), Some(Table::Sessions));
        assert_eq!(rx.recv().await.ok(), Some(Table::GridPositions));
    }

    #[test]
    fn test_notify_without_subscribers_is_harmless() {
        ChangeNotifier::new().notify(&[Table::Polygons]);
    }

    #[tokio::test]
    async fn test_changed_sees_new_value() {
        let (tx, rx) = watch::channel(vec![1]);
        let mut query = LiveQuery::new(rx);
        assert_eq!(query.current(), vec![1]);
        let _ = tx.send(vec![1, 2]);
        assert_eq!(query.changed().await.unwrap_or_default(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_changed_errors_when_closed() {
        let (tx, rx) = watch::channel(Vec::<i32>::new());
        let mut query = LiveQuery::new(rx);
        drop(tx);
        assert!(query.changed().await.is_err());
    }

    #[tokio::test]
    async fn test_stream_yields_current_first() {
        use futures_util::StreamExt;

        let (tx, rx) = watch::channel(vec!["a"]);
        let mut stream = Box::pin(LiveQuery::new(rx).into_stream());
        assert_eq!(stream.next().await, Some(vec!["a"]));
        let _ = tx.send(vec!["a", "b"]);
        assert_eq!(stream.next().await, Some(vec!["a", "b"]));
        drop(tx);
        assert_eq!(stream.next().await, None);
    }
}
