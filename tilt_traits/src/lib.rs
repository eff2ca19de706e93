pub mod event;

pub use event::{ABS_X, ABS_Y, ABS_Z, EV_ABS, EV_SYN, InputEvent};

use std::time::Duration;

/// Error type used at every trait boundary in this crate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One physical output channel (a PWM duty sink).
pub trait Actuator {
    /// Write a device-level output value. One call is one write.
    fn write_level(&mut self, level: i32) -> Result<(), BoxError>;
}

/// Source of accelerometer input events.
pub trait Accelerometer {
    /// Wait up to `timeout` for the next event.
    ///
    /// Returns `Ok(None)` when no event arrived in time. Short or malformed
    /// records are reported as errors; callers skip them and keep reading.
    fn read_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>, BoxError>;
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn write_level(&mut self, level: i32) -> Result<(), BoxError> {
        (**self).write_level(level)
    }
}

impl<S: Accelerometer + ?Sized> Accelerometer for Box<S> {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>, BoxError> {
        (**self).read_event(timeout)
    }
}

/// Position of a motor on the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotorId {
    X1,
    X2,
    Y1,
    Y2,
}

impl MotorId {
    pub const ALL: [MotorId; 4] = [MotorId::X1, MotorId::X2, MotorId::Y1, MotorId::Y2];

    pub fn name(self) -> &'static str {
        match self {
            MotorId::X1 => "x1",
            MotorId::X2 => "x2",
            MotorId::Y1 => "y1",
            MotorId::Y2 => "y2",
        }
    }
}

impl std::fmt::Display for MotorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Presentation sink fed on every actuation.
///
/// Implementations must not block and cannot fail the control path.
pub trait StatusSink {
    /// Per-motor update: controller power, logical power after trim, and the
    /// trim factor.
    fn motor(&self, id: MotorId, power: i32, trimmed: i32, factor: f64);
    /// Overall controller power after a broadcast.
    fn power(&self, power: i32);
}
