//! Change hub and live subscriptions
//!
//! The hosted-store listener model becomes an in-process change hub:
//! writers publish a `Change` after their write settles, and each live
//! subscription re-queries its slice of state when a matching change
//! arrives. Dropping a `Subscription` aborts its refresh task, so a new
//! session never inherits a previous user's listener. Cancellation is
//! cooperative; an in-flight re-query finishes but its result is discarded
//! with the channel.

use std::future::Future;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::utils::errors::Result;

/// Granularity of invalidation events flowing through the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Colleges,
    CollegeSettings { college_id: String },
    Profile { uid: String },
    Registrations { user_id: String },
}

/// Broadcast fan-out of settled writes.
#[derive(Debug, Clone)]
pub struct ChangeHub {
    tx: broadcast::Sender<Change>,
}

impl ChangeHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Publish a settled change. Send errors mean no live subscribers,
    /// which is fine.
    pub fn publish(&self, change: Change) {
        debug!(change = ?change, "Publishing change");
        let _ = self.tx.send(change);
    }

    fn subscribe(&self) -> broadcast::Receiver<Change> {
        self.tx.subscribe()
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

/// A cancellable live view of one query.
///
/// Holds the latest value; `changed` resolves whenever a fresh value lands.
/// Dropping the handle tears the refresh task down.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T: Clone> Subscription<T> {
    /// Spawn a subscription seeded with `initial`, re-running `reload`
    /// whenever the hub delivers a change matching `filter`.
    pub(crate) fn spawn<F, Fut>(
        hub: &ChangeHub,
        initial: T,
        filter: impl Fn(&Change) -> bool + Send + 'static,
        reload: F,
    ) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send,
    {
        let (tx, rx) = watch::channel(initial);
        let mut changes = hub.subscribe();

        let task = tokio::spawn(async move {
            loop {
                let refresh = match changes.recv().await {
                    Ok(change) => filter(&change),
                    // Dropped events may include a matching one, so
                    // re-query unconditionally.
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped = skipped, "Subscription lagged behind change hub");
                        true
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                if !refresh {
                    continue;
                }

                match reload().await {
                    Ok(value) => {
                        if tx.send(value).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        // Keep the last good value; the next settled write
                        // corrects the view.
                        warn!(error = %e, "Failed to refresh subscription");
                    }
                }
            }
        });

        Self { rx, task }
    }

    /// Latest value seen by the subscription.
    pub fn current(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Wait until a fresh value lands. Returns `false` once the feeding
    /// task is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Stop receiving updates. Equivalent to dropping the handle.
    pub fn cancel(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn counting_reload(counter: Arc<AtomicUsize>) -> impl Fn() -> std::pin::Pin<Box<dyn Future<Output = Result<usize>> + Send>> {
        move || {
            let counter = counter.clone();
            Box::pin(async move { Ok(counter.fetch_add(1, Ordering::SeqCst) + 1) })
        }
    }

    #[tokio::test]
    async fn test_subscription_refreshes_on_matching_change() {
        let hub = ChangeHub::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let mut sub = Subscription::spawn(
            &hub,
            0usize,
            |change| matches!(change, Change::Colleges),
            counting_reload(counter.clone()),
        );

        assert_eq!(sub.current(), 0);
        hub.publish(Change::Colleges);
        assert!(timeout(Duration::from_secs(1), sub.changed()).await.unwrap());
        assert_eq!(sub.current(), 1);
    }

    #[tokio::test]
    async fn test_subscription_ignores_unrelated_changes() {
        let hub = ChangeHub::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let mut sub = Subscription::spawn(
            &hub,
            0usize,
            |change| matches!(change, Change::Registrations { user_id } if user_id == "u1"),
            counting_reload(counter.clone()),
        );

        hub.publish(Change::Registrations {
            user_id: "someone-else".to_string(),
        });
        hub.publish(Change::Colleges);
        hub.publish(Change::Registrations {
            user_id: "u1".to_string(),
        });

        assert!(timeout(Duration::from_secs(1), sub.changed()).await.unwrap());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_stops_refreshes() {
        let hub = ChangeHub::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let sub = Subscription::spawn(
            &hub,
            0usize,
            |change| matches!(change, Change::Colleges),
            counting_reload(counter.clone()),
        );

        sub.cancel();
        // Give the aborted task a chance to observe the publish if it were
        // still alive.
        hub.publish(Change::Colleges);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
