//! Test and helper doubles for tilt_core.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tilt_traits::{Actuator, BoxError, MotorId, StatusSink};

/// Channel spy recording every written level; can be switched to fail.
///
/// Clones share state, so a test can keep one handle while a `Motor` owns another.
#[derive(Debug, Clone, Default)]
pub struct SpyChannel {
    writes: Arc<Mutex<Vec<i32>>>,
    failing: Arc<AtomicBool>,
}

impl SpyChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    pub fn writes(&self) -> Vec<i32> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<i32> {
        self.writes.lock().ok().and_then(|w| w.last().copied())
    }

    pub fn clear(&self) {
        if let Ok(mut w) = self.writes.lock() {
            w.clear();
        }
    }
}

impl Actuator for SpyChannel {
    fn write_level(&mut self, level: i32) -> Result<(), BoxError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(Box::new(std::io::Error::other("spy channel failing")));
        }
        if let Ok(mut w) = self.writes.lock() {
            w.push(level);
        }
        Ok(())
    }
}

/// `(motor, controller power, trimmed power, factor)`.
pub type MotorEvent = (MotorId, i32, i32, f64);

/// Sink recording everything it is shown. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    motors: Arc<Mutex<Vec<MotorEvent>>>,
    powers: Arc<Mutex<Vec<i32>>>,
}

impl RecordingSink {
    pub fn motor_events(&self) -> Vec<MotorEvent> {
        self.motors.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn power_events(&self) -> Vec<i32> {
        self.powers.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl StatusSink for RecordingSink {
    fn motor(&self, id: MotorId, power: i32, trimmed: i32, factor: f64) {
        if let Ok(mut m) = self.motors.lock() {
            m.push((id, power, trimmed, factor));
        }
    }

    fn power(&self, power: i32) {
        if let Ok(mut p) = self.powers.lock() {
            p.push(power);
        }
    }
}

/// Four spy channels in motor order (x1, x2, y1, y2).
#[derive(Debug, Clone, Default)]
pub struct SpyRig {
    pub x1: SpyChannel,
    pub x2: SpyChannel,
    pub y1: SpyChannel,
    pub y2: SpyChannel,
}

impl SpyRig {
    pub fn channels(&self) -> crate::builder::RigChannels<SpyChannel> {
        crate::builder::RigChannels {
            x1: self.x1.clone(),
            x2: self.x2.clone(),
            y1: self.y1.clone(),
            y2: self.y2.clone(),
        }
    }

    /// Last level written per channel, in motor order.
    pub fn last_levels(&self) -> [Option<i32>; 4] {
        [
            self.x1.last(),
            self.x2.last(),
            self.y1.last(),
            self.y2.last(),
        ]
    }
}
