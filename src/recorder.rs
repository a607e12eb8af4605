//! Host lifecycle adapter.
//!
//! The host simulation wires its own tick and shutdown events to the two
//! entry points here. Nothing in this module is allowed to take the host
//! down: sink failures are logged and the affected tick's output is
//! dropped, with the next tick as the retry.

use std::path::Path;

use crate::sampling::params::Params;
use crate::sampling::sampler::Sampler;
use crate::sampling::snapshot::PerceptionSnapshot;
use crate::sampling::world::WorldView;
use crate::sink::CsvSink;

/// Couples a [`Sampler`] with a [`CsvSink`] behind the host's lifecycle.
pub struct Recorder {
    sampler: Sampler,
    sink: CsvSink,
}

impl Recorder {
    /// Creates a recorder writing to `path` with the given parameters.
    pub fn new(params: Params, path: impl AsRef<Path>) -> Self {
        Self {
            sampler: Sampler::new(params),
            sink: CsvSink::new(path),
        }
    }

    /// Returns the underlying sampler.
    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Called by the host once per simulation tick.
    ///
    /// Samples every roster agent, persists the batch, and returns the
    /// snapshots for any in-process consumer.
    pub fn on_tick(&mut self, world: &dyn WorldView) -> Vec<PerceptionSnapshot> {
        let snapshots = self.sampler.sample_tick(world);
        if let Err(err) = self.sink.write_batch(&snapshots) {
            log::error!(
                "dropping {} snapshot(s) for this tick, sink write failed: {}",
                snapshots.len(),
                err
            );
        }
        snapshots
    }

    /// Called by the host when the session shuts down.
    ///
    /// Closes the sink; a later tick (a new session) reopens it cleanly.
    pub fn on_shutdown(&mut self) {
        self.sink.close();
        log::info!("perception log closed");
    }
}
