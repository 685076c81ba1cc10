//! Concurrent HTTP(S) liveness probing with a hard per-probe deadline.

mod barrier;
mod engine;
mod executor;
mod handles;
mod supervisor;

pub use barrier::{CompletionBarrier, Ticket};
pub use engine::{Engine, Hit, Stats};
pub use executor::{ClientOptions, HttpProber, ProbeError, Prober};
pub use handles::{HandlePool, ProbeHandle};
pub use supervisor::supervise;
