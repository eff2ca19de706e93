//! Builder for `Rig`.
//!
//! Channels are mandatory; tuning, window, and sink fall back to defaults.
//! `try_build()` validates the tuning before any motor is opened.

use tilt_traits::{Actuator, MotorId, StatusSink};

use crate::axis::Axis;
use crate::config::Tuning;
use crate::controller::Controller;
use crate::error::{BuildError, Result};
use crate::motor::Motor;
use crate::rig::Rig;

/// Default moving-average window length.
pub const DEFAULT_WINDOW: usize = 10;

/// The four output channels, in motor order.
#[derive(Debug, Clone)]
pub struct RigChannels<A> {
    pub x1: A,
    pub x2: A,
    pub y1: A,
    pub y2: A,
}

struct NullSink;

impl StatusSink for NullSink {
    fn motor(&self, _id: MotorId, _power: i32, _trimmed: i32, _factor: f64) {}
    fn power(&self, _power: i32) {}
}

pub struct RigBuilder<A: Actuator> {
    channels: Option<RigChannels<A>>,
    tuning: Option<Tuning>,
    window: Option<usize>,
    sink: Option<Box<dyn StatusSink + Send>>,
}

impl<A: Actuator> Default for RigBuilder<A> {
    fn default() -> Self {
        Self {
            channels: None,
            tuning: None,
            window: None,
            sink: None,
        }
    }
}

impl<A: Actuator> RigBuilder<A> {
    pub fn with_channels(mut self, channels: RigChannels<A>) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = Some(tuning);
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn StatusSink + Send>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn try_build(self) -> Result<Rig<A>> {
        let channels = self
            .channels
            .ok_or_else(|| eyre::Report::new(BuildError::MissingChannels))?;
        let tuning = self.tuning.unwrap_or_default();
        let window = self.window.unwrap_or(DEFAULT_WINDOW);
        validate(&tuning, window)?;

        let range = tuning.range;
        let x = Axis::new(
            Motor::open(MotorId::X1, channels.x1, range),
            Motor::open(MotorId::X2, channels.x2, range),
        );
        let y = Axis::new(
            Motor::open(MotorId::Y1, channels.y1, range),
            Motor::open(MotorId::Y2, channels.y2, range),
        );
        let sink = self.sink.unwrap_or_else(|| Box::new(NullSink));
        let controller = Controller::new(x, y, range, sink);
        Ok(Rig::new(controller, tuning, window))
    }
}

fn validate(t: &Tuning, window: usize) -> Result<()> {
    let r = &t.range;
    if r.power_max <= r.power_min {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "power_max must be > power_min",
        )));
    }
    if r.motor_max < r.motor_min {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "motor_max must be >= motor_min",
        )));
    }
    if !(t.tilt_step.is_finite() && t.tilt_step > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "tilt_step must be finite and > 0",
        )));
    }
    if !(t.linear_gain.is_finite() && t.derivative_gain.is_finite()) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "correction gains must be finite",
        )));
    }
    if window == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "window must be >= 1",
        )));
    }
    Ok(())
}
