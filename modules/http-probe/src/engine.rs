//! Fixed-capacity probing engine.

use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::time::Instant;
use tracing::debug;

use liveprobe_core::ProbeConfig;

use crate::barrier::CompletionBarrier;
use crate::executor::{ClientOptions, HttpProber, ProbeError, Prober};
use crate::handles::HandlePool;
use crate::supervisor::supervise;

/// A candidate that answered within the deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub url: String,
    pub status: u16,
    pub elapsed: Duration,
}

#[derive(Debug, Default)]
struct Counters {
    submitted: AtomicU64,
    reachable: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub submitted: u64,
    pub reachable: u64,
    pub failed: u64,
    pub timed_out: u64,
}

/// Owns the prober, the concurrency limit, and the completion barrier.
///
/// At most `concurrency` network calls are in flight at once, counting calls
/// abandoned on timeout that have not finished yet.
pub struct Engine<P: Prober = HttpProber> {
    prober: Arc<P>,
    limiter: Arc<Semaphore>,
    handles: Arc<HandlePool>,
    barrier: Arc<CompletionBarrier>,
    counters: Arc<Counters>,
    hits: mpsc::UnboundedSender<Hit>,
    timeout: Duration,
}

impl Engine<HttpProber> {
    pub fn new(
        concurrency: usize,
        timeout: Duration,
        client: &ClientOptions,
        hits: mpsc::UnboundedSender<Hit>,
    ) -> Result<Self> {
        Ok(Engine::with_prober(HttpProber::new(client)?, concurrency, timeout, hits))
    }

    /// Engine sized and timed by a resolved probe configuration.
    pub fn from_config(
        cfg: &ProbeConfig,
        client: &ClientOptions,
        hits: mpsc::UnboundedSender<Hit>,
    ) -> Result<Self> {
        Engine::new(cfg.concurrency, cfg.timeout, client, hits)
    }
}

impl<P: Prober> Engine<P> {
    pub fn with_prober(
        prober: P,
        concurrency: usize,
        timeout: Duration,
        hits: mpsc::UnboundedSender<Hit>,
    ) -> Self {
        let concurrency = concurrency.max(1);
        Engine {
            prober: Arc::new(prober),
            limiter: Arc::new(Semaphore::new(concurrency)),
            handles: Arc::new(HandlePool::new(concurrency)),
            barrier: CompletionBarrier::new(),
            counters: Arc::new(Counters::default()),
            hits,
            timeout,
        }
    }

    /// Schedule one probe. Waits while all slots are busy.
    pub async fn submit(&self, url: String) {
        let ticket = self.barrier.register();
        self.counters.submitted.fetch_add(1, Ordering::Relaxed);
        let permit = match self.limiter.clone().acquire_owned().await {
            Ok(p) => p,
            // The limiter is never closed.
            Err(_) => return,
        };

        let prober = self.prober.clone();
        let handles = self.handles.clone();
        let counters = self.counters.clone();
        let hits = self.hits.clone();
        let deadline = self.timeout;
        tokio::spawn(async move {
            let started = Instant::now();
            let url: Arc<str> = url.into();
            match supervise(prober, &handles, url.clone(), permit, deadline).await {
                Ok(status) => {
                    counters.reachable.fetch_add(1, Ordering::Relaxed);
                    let _ = hits.send(Hit { url: url.to_string(), status, elapsed: started.elapsed() });
                }
                Err(ProbeError::TimedOut(d)) => {
                    counters.timed_out.fetch_add(1, Ordering::Relaxed);
                    debug!(url = %url, timeout_ms = d.as_millis() as u64, "probe timed out");
                }
                Err(e) => {
                    counters.failed.fetch_add(1, Ordering::Relaxed);
                    debug!(url = %url, error = %e, "probe failed");
                }
            }
            drop(hits);
            drop(ticket);
        });
    }

    /// Resolves once every probe submitted so far has finished and emitted its hit.
    pub async fn await_all(&self) {
        self.barrier.wait().await;
    }

    pub fn pending(&self) -> usize {
        self.barrier.pending()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            submitted: self.counters.submitted.load(Ordering::Relaxed),
            reachable: self.counters.reachable.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            timed_out: self.counters.timed_out.load(Ordering::Relaxed),
        }
    }
}
