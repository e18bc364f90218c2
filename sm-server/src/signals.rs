//! SIGINT/SIGTERM handling.

use crate::{Result as SupervisorResult, ShutdownCoordinator, SupervisorError};

use log::info;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

/// Trigger `coordinator` on the first SIGINT or SIGTERM.
///
/// Registration happens before the listening thread starts, so a failure is
/// reported to the caller.
pub fn install(coordinator: ShutdownCoordinator) -> SupervisorResult<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])
        .map_err(|e| SupervisorError::io("register signal handlers", e))?;

    std::thread::Builder::new()
        .name("sm-signals".to_string())
        .spawn(move || {
            if let Some(sig) = signals.forever().next() {
                info!("Received signal {sig}, shutting down...");
                coordinator.shutdown();
            }
        })
        .map_err(|e| SupervisorError::io("start signal thread", e))?;

    Ok(())
}
