pub mod args;
pub mod config;
pub mod display;
pub mod error;
pub mod output;
pub mod runner;
pub mod scheduler;
pub mod shutdown;
pub mod worker;
