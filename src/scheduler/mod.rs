//! Process-pool scheduler.
//!
//! - [`Pool`]: slot allocation, spawn tracking, reaping and the periodic tick
//! - [`Slot`]: one occupied capacity unit and its timeout escalation
//! - [`ExitStats`]: exit-code histogram of a run

pub mod job;
pub mod pool;
pub mod slot;
pub mod stats;

pub use job::Job;
pub use pool::Pool;
pub use slot::{escalation_signal, Slot, DONE_MARKER};
pub use stats::{ExitOutcome, ExitStats, SPAWN_FAILURE_CODE};
