use std::io;

use nix::sys::signal::Signal;
use tokio::signal::unix::{signal, Signal as SignalStream, SignalKind};

/// SIGINT and SIGTERM listeners for pxargs itself.
///
/// Once installed the default action (terminate without unwinding) is
/// replaced, so a run interrupted from the keyboard still drops its display
/// and restores the terminal.
pub struct ShutdownSignals {
    sigint: SignalStream,
    sigterm: SignalStream,
}

impl ShutdownSignals {
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for the next SIGINT or SIGTERM.
    pub async fn recv(&mut self) -> Signal {
        tokio::select! {
            _ = self.sigint.recv() => {
                tracing::info!("Received SIGINT, leaving the run");
                Signal::SIGINT
            }
            _ = self.sigterm.recv() => {
                tracing::info!("Received SIGTERM, leaving the run");
                Signal::SIGTERM
            }
        }
    }
}
