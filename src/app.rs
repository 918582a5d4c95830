//! Main read → decode → dispatch loop.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::controller::{ControllerError, DeviceReader, Streaming};
use crate::executor::CommandExecutor;
use crate::mapping::{DispatchOutcome, Dispatcher};

/// Why a run ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The device stream reached end-of-file on a record boundary
    StreamClosed,
    /// Shutdown was requested through the cancellation token
    Interrupted,
}

/// Counters for one run, logged on exit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub events: u64,
    pub fired: u64,
}

/// Drives `reader` into `dispatcher` until the stream ends or `shutdown` fires.
///
/// Decode and stream errors end the run and are returned; executor failures
/// never surface here.
pub async fn run<E: CommandExecutor>(
    reader: &mut DeviceReader<Streaming>,
    dispatcher: &mut Dispatcher<E>,
    shutdown: &CancellationToken,
) -> Result<(RunOutcome, RunStats), ControllerError> {
    info!("Listening on {}", reader.path().display());
    let mut stats = RunStats::default();

    loop {
        let next = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                info!("Shutdown requested after {} events", stats.events);
                return Ok((RunOutcome::Interrupted, stats));
            }
            next = reader.next_event() => next?,
        };

        let Some(event) = next else {
            return Ok((RunOutcome::StreamClosed, stats));
        };

        stats.events += 1;
        let outcome = dispatcher.dispatch(&event);
        debug!("{:?} -> {:?}", event, outcome);
        if outcome == DispatchOutcome::Fired {
            stats.fired += 1;
        }
    }
}
