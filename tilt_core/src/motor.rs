//! One output channel with a trim factor.

use tilt_traits::{Actuator, MotorId, StatusSink};
use tracing::{trace, warn};

use crate::config::PowerRange;
use crate::error::CoreError;
use crate::hw_error::map_hw_error;

/// Logical power written when a motor is opened and closed.
const STOPPED: i32 = 0;

/// A motor channel. Writes the stopped level when created and when dropped.
pub struct Motor<A: Actuator> {
    id: MotorId,
    channel: A,
    factor: f64,
    range: PowerRange,
    // Last device level that reached the channel; None after a failed write.
    applied: Option<i32>,
}

impl<A: Actuator> core::fmt::Debug for Motor<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Motor")
            .field("id", &self.id)
            .field("factor", &self.factor)
            .field("applied", &self.applied)
            .finish()
    }
}

impl<A: Actuator> Motor<A> {
    /// Take ownership of `channel` and drive it to the stopped level.
    ///
    /// A failed initial write is logged; the motor is still usable.
    pub fn open(id: MotorId, channel: A, range: PowerRange) -> Self {
        let mut motor = Self {
            id,
            channel,
            factor: 1.0,
            range,
            applied: None,
        };
        if let Err(e) = motor.write(STOPPED) {
            warn!(motor = %id, error = %e, "motor open: stop write failed");
        }
        motor
    }

    pub fn id(&self) -> MotorId {
        self.id
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Store the trim factor, clamped to [0, 1]. Does not write.
    pub fn set_factor(&mut self, factor: f64) {
        self.factor = if factor.is_nan() {
            0.0
        } else {
            factor.clamp(0.0, 1.0)
        };
    }

    /// Last device level successfully written, if the latest write succeeded.
    pub fn applied(&self) -> Option<i32> {
        self.applied
    }

    /// Trimmed logical power for a given controller power.
    #[inline]
    pub fn trimmed(&self, power: i32) -> i32 {
        (self.factor * f64::from(power)).round() as i32
    }

    /// Apply `power` scaled by the trim factor and write it to the channel.
    ///
    /// Returns the trimmed logical power.
    pub fn actuate(&mut self, power: i32, sink: &dyn StatusSink) -> Result<i32, CoreError> {
        let pwr = self.trimmed(power);
        sink.motor(self.id, power, pwr, self.factor);
        self.write(pwr)?;
        Ok(pwr)
    }

    fn write(&mut self, logical: i32) -> Result<(), CoreError> {
        let level = self.range.to_output(logical);
        match self.channel.write_level(level) {
            Ok(()) => {
                trace!(motor = %self.id, logical, level, "actuated");
                self.applied = Some(level);
                Ok(())
            }
            Err(e) => {
                self.applied = None;
                Err(CoreError::Actuation {
                    motor: self.id,
                    reason: map_hw_error(&*e).to_string(),
                })
            }
        }
    }
}

impl<A: Actuator> Drop for Motor<A> {
    fn drop(&mut self) {
        if let Err(e) = self.write(STOPPED) {
            warn!(motor = %self.id, error = %e, "motor close: stop write failed");
        }
    }
}
