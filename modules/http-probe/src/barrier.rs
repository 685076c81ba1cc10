use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Counts probes that have been submitted but not yet finished.
#[derive(Debug, Default)]
pub struct CompletionBarrier {
    pending: AtomicUsize,
    idle: Notify,
}

/// Registration for one probe. Dropping it marks the probe finished.
#[derive(Debug)]
#[must_use = "dropping a ticket marks the probe finished"]
pub struct Ticket {
    barrier: Arc<CompletionBarrier>,
}

impl CompletionBarrier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn register(self: &Arc<Self>) -> Ticket {
        self.pending.fetch_add(1, Ordering::AcqRel);
        Ticket { barrier: self.clone() }
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Resolves once every ticket issued so far has been dropped.
    pub async fn wait(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        if self.barrier.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.barrier.idle.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn empty_barrier_is_open() {
        let b = CompletionBarrier::new();
        timeout(Duration::from_secs(1), b.wait()).await.unwrap();
    }

    #[tokio::test]
    async fn waits_for_every_ticket() {
        let b = CompletionBarrier::new();
        let t1 = b.register();
        let t2 = b.register();
        assert_eq!(b.pending(), 2);

        let waiter = {
            let b = b.clone();
            tokio::spawn(async move { b.wait().await })
        };
        drop(t1);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(t2);
        timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
        assert_eq!(b.pending(), 0);
    }

    #[tokio::test]
    async fn tickets_dropped_on_other_tasks() {
        let b = CompletionBarrier::new();
        for i in 0..50u64 {
            let t = b.register();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(i % 7)).await;
                drop(t);
            });
        }
        timeout(Duration::from_secs(2), b.wait()).await.unwrap();
        assert_eq!(b.pending(), 0);
    }
}
