//! Job process creation.
//!
//! - [`CommandTemplate`]: argv template with a placeholder for the argument
//! - [`JobExecutor`]: spawns `argv` with its output redirected to the job's
//!   result files
//!
//! Waiting on and signalling the spawned processes is the pool's business,
//! see [`crate::scheduler::Pool`].

pub mod command;
pub mod executor;

pub use command::CommandTemplate;
pub use executor::JobExecutor;
