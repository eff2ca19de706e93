//! Runtime configuration types for the rig.
//!
//! These are separate from the TOML-deserialized config in `tilt_config`;
//! `conversions` bridges the two.

/// Factor applied by the `(`, `[`, `{` commands; the paired commands divide by it.
pub const RESCALE_FACTOR: f64 = 0.9;

/// Logical power bounds and the device output range they map onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerRange {
    pub power_min: i32,
    pub power_max: i32,
    pub motor_min: i32,
    pub motor_max: i32,
}

impl Default for PowerRange {
    fn default() -> Self {
        Self {
            power_min: 0,
            power_max: 100,
            motor_min: 48,
            motor_max: 72,
        }
    }
}

impl PowerRange {
    /// Clamp a logical power value into `[power_min, power_max]`.
    #[inline]
    pub fn clamp(&self, power: i32) -> i32 {
        power.clamp(self.power_min, self.power_max)
    }

    /// Linear remap of a logical power value onto the device range.
    ///
    /// The fractional part is truncated, and the result never leaves
    /// `[motor_min, motor_max]`.
    pub fn to_output(&self, power: i32) -> i32 {
        let span = i64::from(self.power_max) - i64::from(self.power_min);
        if span <= 0 {
            return self.motor_min;
        }
        let out_span = i64::from(self.motor_max) - i64::from(self.motor_min);
        let offset = (i64::from(power) - i64::from(self.power_min)) * out_span / span;
        let out = i64::from(self.motor_min) + offset;
        let hi = i64::from(self.motor_max.max(self.motor_min));
        out.clamp(i64::from(self.motor_min), hi) as i32
    }
}

/// Mutable tuning state shared by the correction pipeline and the command decoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Tilt change per nudge command.
    pub tilt_step: f64,
    /// Gain on (average - baseline).
    pub linear_gain: f64,
    /// Gain on (average - previous average).
    pub derivative_gain: f64,
    pub power_step_small: i32,
    pub power_step_big: i32,
    pub range: PowerRange,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tilt_step: 0.02,
            linear_gain: -0.02,
            derivative_gain: -0.005,
            power_step_small: 1,
            power_step_big: 5,
            range: PowerRange::default(),
        }
    }
}
