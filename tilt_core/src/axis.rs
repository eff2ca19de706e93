//! A pair of opposing motors sharing one tilt value.

use tilt_traits::{Actuator, StatusSink};

use crate::error::CoreError;
use crate::motor::Motor;

/// Two opposing motors. Tilt is derived from their factors, never stored.
#[derive(Debug)]
pub struct Axis<A: Actuator> {
    a: Motor<A>,
    b: Motor<A>,
}

impl<A: Actuator> Axis<A> {
    pub fn new(a: Motor<A>, b: Motor<A>) -> Self {
        Self { a, b }
    }

    /// `factor(a) - factor(b)`, in [-1, 1].
    pub fn tilt(&self) -> f64 {
        self.a.factor() - self.b.factor()
    }

    /// Trim one side of the pair so that `tilt()` reads back `tilt`.
    ///
    /// Negative values throttle motor A, positive values throttle motor B;
    /// the other motor stays at full factor. Not clamped here: out-of-range
    /// input saturates at the motor factor bounds.
    pub fn set_tilt(&mut self, tilt: f64) {
        if tilt < 0.0 {
            self.a.set_factor(1.0 + tilt);
            self.b.set_factor(1.0);
        } else if tilt > 0.0 {
            self.a.set_factor(1.0);
            self.b.set_factor(1.0 - tilt);
        } else {
            self.a.set_factor(1.0);
            self.b.set_factor(1.0);
        }
    }

    /// Actuate both motors at `power`. Both are attempted; when both fail the
    /// error carries both causes.
    pub fn set_power(&mut self, power: i32, sink: &dyn StatusSink) -> Result<(), CoreError> {
        let ra = self.a.actuate(power, sink);
        let rb = self.b.actuate(power, sink);
        match (ra, rb) {
            (Ok(_), Ok(_)) => Ok(()),
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
            (Err(first), Err(second)) => Err(CoreError::PairActuation {
                first: Box::new(first),
                second: Box::new(second),
            }),
        }
    }

    pub fn a(&self) -> &Motor<A> {
        &self.a
    }

    pub fn b(&self) -> &Motor<A> {
        &self.b
    }
}
