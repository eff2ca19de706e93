//! Stand-in devices for bench runs and for channels that failed to open.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tilt_traits::{ABS_X, ABS_Y, ABS_Z, Accelerometer, Actuator, BoxError, InputEvent};
use tracing::{debug, trace};

/// Channel that accepts and discards every write.
#[derive(Debug, Clone)]
pub struct InertChannel {
    label: String,
}

impl InertChannel {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Actuator for InertChannel {
    fn write_level(&mut self, level: i32) -> Result<(), BoxError> {
        trace!(channel = %self.label, level, "inert channel write discarded");
        Ok(())
    }
}

/// Simulated channel that records every level written to it.
///
/// Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct SimulatedChannel {
    label: String,
    writes: Arc<Mutex<Vec<i32>>>,
}

impl SimulatedChannel {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            writes: Arc::default(),
        }
    }

    pub fn history(&self) -> Vec<i32> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<i32> {
        self.writes.lock().ok().and_then(|w| w.last().copied())
    }
}

impl Actuator for SimulatedChannel {
    fn write_level(&mut self, level: i32) -> Result<(), BoxError> {
        if let Ok(mut w) = self.writes.lock() {
            w.push(level);
        }
        debug!(channel = %self.label, level, "simulated channel write");
        Ok(())
    }
}

/// Simulated accelerometer emitting X/Y/Z updates followed by a sync marker.
///
/// Samples come from a fixed pattern (cycled) or, by default, a slow
/// deterministic wobble around zero. One sample is produced per `period`.
pub struct SimulatedAccelerometer {
    pattern: Vec<(i32, i32, i32)>,
    period: Duration,
    tick: u64,
    queue: VecDeque<InputEvent>,
}

impl SimulatedAccelerometer {
    pub fn new(rate_hz: u32) -> Self {
        let period = Duration::from_micros(1_000_000 / u64::from(rate_hz.max(1)));
        Self {
            pattern: Vec::new(),
            period,
            tick: 0,
            queue: VecDeque::new(),
        }
    }

    /// Cycle through the given raw samples instead of the wobble.
    pub fn with_pattern(mut self, pattern: Vec<(i32, i32, i32)>) -> Self {
        self.pattern = pattern;
        self
    }

    fn next_sample(&mut self) -> (i32, i32, i32) {
        let t = self.tick;
        self.tick = self.tick.wrapping_add(1);
        if !self.pattern.is_empty() {
            return self.pattern[(t % self.pattern.len() as u64) as usize];
        }
        let phase = t as f64 * 0.05;
        (
            (phase.sin() * 8.0).round() as i32,
            (phase.cos() * 6.0).round() as i32,
            64,
        )
    }

    fn enqueue_sample(&mut self) {
        let (x, y, z) = self.next_sample();
        self.queue.extend([
            InputEvent::abs(ABS_X, x),
            InputEvent::abs(ABS_Y, y),
            InputEvent::abs(ABS_Z, z),
            InputEvent::sync(),
        ]);
    }
}

impl Accelerometer for SimulatedAccelerometer {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>, BoxError> {
        if self.queue.is_empty() {
            if timeout < self.period {
                std::thread::sleep(timeout);
                return Ok(None);
            }
            std::thread::sleep(self.period);
            self.enqueue_sample();
        }
        Ok(self.queue.pop_front())
    }
}
