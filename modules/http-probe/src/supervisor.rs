use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OwnedSemaphorePermit;

use crate::executor::{ProbeError, Prober};
use crate::handles::{HandlePool, Outcome};

/// Run one probe under a hard deadline.
///
/// The network call runs in its own task and owns `permit` until it really
/// finishes, so calls abandoned on timeout still count against the concurrency
/// limit. The supervisor returns as soon as either the result or the deadline
/// arrives; a timed-out call is left to finish on its own and its result is dropped.
pub async fn supervise<P: Prober>(
    prober: Arc<P>,
    pool: &HandlePool,
    url: Arc<str>,
    permit: OwnedSemaphorePermit,
    deadline: Duration,
) -> Outcome {
    let mut handle = pool.acquire();
    let tx = handle.sender();
    tokio::spawn(async move {
        let res = prober.probe(&url).await;
        let _ = tx.try_send(res);
        drop(permit);
    });

    handle.arm(deadline);
    // The handle keeps its own sender, so `recv` never yields `None`; a network task
    // that dies without reporting is caught by the timer.
    let outcome = tokio::select! {
        biased;
        Some(res) = handle.rx.recv() => res,
        _ = handle.timer.as_mut() => Err(ProbeError::TimedOut(deadline)),
    };

    if !matches!(outcome, Err(ProbeError::TimedOut(_))) {
        pool.release(handle);
    }
    outcome
}
