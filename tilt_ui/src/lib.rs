#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Presentation sinks for the rig.
//!
//! A readout's background blends from its idle colour toward green as power
//! rises. Per-motor readouts split that blend between green and red by trim
//! factor, so a throttled motor shows red at high power.

use tilt_traits::{MotorId, StatusSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::new(0xf0, 0xf0, 0xf0)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[inline]
fn channel(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// Background colour for the readouts at a given power level.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub base: Rgb,
    pub power_min: i32,
    pub power_max: i32,
}

impl Palette {
    pub fn new(power_min: i32, power_max: i32) -> Self {
        Self {
            base: Rgb::default(),
            power_min,
            power_max,
        }
    }

    /// 1.0 at minimum power, 0.0 at maximum.
    fn idle_share(&self, power: i32) -> f64 {
        let span = f64::from(self.power_max) - f64::from(self.power_min);
        if span <= 0.0 {
            return 1.0;
        }
        (1.0 - (f64::from(power) - f64::from(self.power_min)) / span).clamp(0.0, 1.0)
    }

    /// Controller readout: idle colour blended toward pure green.
    pub fn power(&self, power: i32) -> Rgb {
        let s = self.idle_share(power);
        let b = self.base;
        Rgb {
            r: channel(f64::from(b.r) * s),
            g: channel(f64::from(b.g) * s + 255.0 * (1.0 - s)),
            b: channel(f64::from(b.b) * s),
        }
    }

    /// Motor readout: the green share is scaled by `factor`, the rest goes red.
    ///
    /// `power` is the controller power, not the motor's trimmed power.
    pub fn motor(&self, power: i32, factor: f64) -> Rgb {
        let s = self.idle_share(power);
        let f = factor.clamp(0.0, 1.0);
        let b = self.base;
        Rgb {
            r: channel(f64::from(b.r) * s + 255.0 * (1.0 - s) * (1.0 - f)),
            g: channel(f64::from(b.g) * s + 255.0 * (1.0 - s) * f),
            b: channel(f64::from(b.b) * s),
        }
    }
}

/// Discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl StatusSink for NoopSink {
    fn motor(&self, _id: MotorId, _power: i32, _trimmed: i32, _factor: f64) {}
    fn power(&self, _power: i32) {}
}

/// Emits each readout update, with its colour, as a `trace` event.
#[derive(Debug, Clone, Copy)]
pub struct TraceSink {
    palette: Palette,
}

impl TraceSink {
    pub fn new(power_min: i32, power_max: i32) -> Self {
        Self {
            palette: Palette::new(power_min, power_max),
        }
    }

    pub fn with_base(mut self, base: Rgb) -> Self {
        self.palette.base = base;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

impl StatusSink for TraceSink {
    fn motor(&self, id: MotorId, power: i32, trimmed: i32, factor: f64) {
        // saturation follows the controller power; the readout shows the trimmed value
        let colour = self.palette.motor(power, factor);
        tracing::trace!(target: "tilt_ui", motor = %id, power = trimmed, factor, %colour, "motor readout");
    }

    fn power(&self, power: i32) {
        let colour = self.palette.power(power);
        tracing::trace!(target: "tilt_ui", power, %colour, "power readout");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Rgb::new(0xf0, 0xf0, 0xf0))]
    #[case(100, Rgb::new(0, 0xff, 0))]
    #[case(50, Rgb::new(0x78, 0xf7, 0x78))]
    fn power_readout_turns_green(#[case] power: i32, #[case] colour: Rgb) {
        assert_eq!(Palette::new(0, 100).power(power), colour);
    }

    #[test]
    fn throttled_motor_turns_red_at_full_power() {
        let p = Palette::new(0, 100);
        assert_eq!(p.motor(100, 0.0), Rgb::new(0xff, 0, 0));
        assert_eq!(p.motor(100, 1.0), Rgb::new(0, 0xff, 0));
        assert_eq!(p.motor(0, 0.0), Rgb::default());
    }

    #[test]
    fn degenerate_range_stays_idle() {
        assert_eq!(Palette::new(10, 10).power(10), Rgb::default());
    }

    #[test]
    fn colour_displays_as_hex() {
        assert_eq!(Rgb::new(1, 0xab, 0xff).to_string(), "#01abff");
    }

    #[test]
    fn sinks_accept_updates() {
        let sinks: [Box<dyn StatusSink>; 2] = [Box::new(NoopSink), Box::new(TraceSink::new(0, 100))];
        for s in &sinks {
            s.power(42);
            s.motor(MotorId::X2, 42, 41, 0.98);
        }
    }
}
