//! `From` implementations bridging `tilt_config` types to `tilt_core` types.

use crate::config::{PowerRange, Tuning};

// ── PowerRange ───────────────────────────────────────────────────────────────

impl From<&tilt_config::Power> for PowerRange {
    fn from(c: &tilt_config::Power) -> Self {
        Self {
            power_min: c.power_min,
            power_max: c.power_max,
            motor_min: c.motor_min,
            motor_max: c.motor_max,
        }
    }
}

// ── Tuning ───────────────────────────────────────────────────────────────────

impl From<&tilt_config::Config> for Tuning {
    fn from(c: &tilt_config::Config) -> Self {
        Self {
            tilt_step: c.tuning.tilt_step,
            linear_gain: c.tuning.accel_linear,
            derivative_gain: c.tuning.accel_derivative,
            power_step_small: c.tuning.power_step_small,
            power_step_big: c.tuning.power_step_big,
            range: (&c.power).into(),
        }
    }
}
