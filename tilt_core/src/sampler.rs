//! Background accelerometer reader.
//!
//! Spawns a thread that owns the `Accelerometer` and forwards every decoded
//! event to the control loop. The thread is shut down and joined when the
//! `Sampler` is dropped.
use crossbeam_channel as xch;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tilt_traits::Accelerometer;

use crate::error::CoreError;
use crate::hw_error::map_hw_error;
use crate::runner::Message;

/// Pause after a read error other than a short read.
const ERROR_BACKOFF: Duration = Duration::from_millis(250);

pub struct Sampler {
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Sampler {
    /// Start reading `sensor`. `timeout` bounds each blocking read so the
    /// thread can observe shutdown.
    pub fn spawn<S: Accelerometer + Send + 'static>(
        mut sensor: S,
        tx: xch::Sender<Message>,
        timeout: Duration,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let join_handle = std::thread::spawn(move || {
            while !shutdown_clone.load(Ordering::Relaxed) {
                match sensor.read_event(timeout) {
                    Ok(Some(ev)) => {
                        if tx.send(Message::Event(ev)).is_err() {
                            tracing::debug!("sampler consumer disconnected, exiting thread");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => match map_hw_error(&*e) {
                        CoreError::ShortRead { got, expected } => {
                            tracing::warn!(got, expected, "short sensor read; record discarded");
                        }
                        other => {
                            tracing::warn!(error = %other, "sensor read failed");
                            std::thread::sleep(ERROR_BACKOFF);
                        }
                    },
                }
            }
            tracing::trace!("sampler thread exiting cleanly");
        });

        Self {
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.join_handle
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Exits after the current read returns, bounded by the read timeout.
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("sampler thread joined"),
                Err(e) => tracing::warn!(?e, "sampler thread panicked during shutdown"),
            }
        }
    }
}
