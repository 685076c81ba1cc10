//! Reusable per-probe result slots and timers.

use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, Sleep};

use crate::executor::ProbeError;

pub type Outcome = Result<u16, ProbeError>;

/// A one-slot result channel plus a resettable deadline timer.
///
/// The slot holds exactly one value, so the network task can always hand off
/// its result without blocking, even after the supervisor has given up on it.
pub struct ProbeHandle {
    pub(crate) tx: mpsc::Sender<Outcome>,
    pub(crate) rx: mpsc::Receiver<Outcome>,
    pub(crate) timer: Pin<Box<Sleep>>,
}

impl ProbeHandle {
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(1);
        ProbeHandle { tx, rx, timer: Box::pin(tokio::time::sleep(Duration::ZERO)) }
    }

    pub fn sender(&self) -> mpsc::Sender<Outcome> {
        self.tx.clone()
    }

    /// Re-arm the timer to fire `after` from now.
    pub fn arm(&mut self, after: Duration) {
        self.timer.as_mut().reset(Instant::now() + after);
    }
}

impl Default for ProbeHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Free list of handles shared by all workers.
pub struct HandlePool {
    free: Mutex<Vec<ProbeHandle>>,
    max_idle: usize,
}

impl HandlePool {
    pub fn new(max_idle: usize) -> Self {
        HandlePool { free: Mutex::new(Vec::with_capacity(max_idle)), max_idle }
    }

    pub fn acquire(&self) -> ProbeHandle {
        let reused = self.free.lock().unwrap_or_else(PoisonError::into_inner).pop();
        reused.unwrap_or_default()
    }

    /// Return a handle after its probe completed normally. Never call this for a
    /// handle whose probe timed out: its network task may still write to it.
    pub fn release(&self, handle: ProbeHandle) {
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.max_idle {
            free.push(handle);
        }
    }

    pub fn idle(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
