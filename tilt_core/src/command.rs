//! Single-byte remote commands.

use crate::config::{RESCALE_FACTOR, Tuning};

/// Direction of a ×0.9 / ÷0.9 rescale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rescale {
    Down,
    Up,
}

impl Rescale {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rescale::Down => value * RESCALE_FACTOR,
            Rescale::Up => value / RESCALE_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerStep {
    DownMax,
    DownBig,
    DownSmall,
    UpSmall,
    UpBig,
    UpMax,
}

impl PowerStep {
    /// Power delta for this step under the current tuning.
    pub fn delta(self, tuning: &Tuning) -> i32 {
        let max = tuning.range.power_max;
        match self {
            PowerStep::DownMax => -max,
            PowerStep::DownBig => -tuning.power_step_big,
            PowerStep::DownSmall => -tuning.power_step_small,
            PowerStep::UpSmall => tuning.power_step_small,
            PowerStep::UpBig => tuning.power_step_big,
            PowerStep::UpMax => max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Tilt nudge; each component is -1, 0 or +1 tilt steps.
    Nudge { x: i8, y: i8 },
    /// Zero both axes.
    Center,
    Power(PowerStep),
    TiltStep(Rescale),
    LinearGain(Rescale),
    DerivativeGain(Rescale),
    ShrinkWindow,
    GrowWindow,
    CaptureBaseline,
    Verbose(bool),
}

impl Command {
    /// Decode a command byte. Unknown bytes yield `None`.
    ///
    /// Digits follow the numeric keypad: `8` is +Y, `6` is +X, `5` centers.
    pub fn decode(byte: u8) -> Option<Self> {
        let cmd = match byte {
            b'1' => Command::Nudge { x: -1, y: -1 },
            b'2' => Command::Nudge { x: 0, y: -1 },
            b'3' => Command::Nudge { x: 1, y: -1 },
            b'4' => Command::Nudge { x: -1, y: 0 },
            b'5' => Command::Center,
            b'6' => Command::Nudge { x: 1, y: 0 },
            b'7' => Command::Nudge { x: -1, y: 1 },
            b'8' => Command::Nudge { x: 0, y: 1 },
            b'9' => Command::Nudge { x: 1, y: 1 },
            b'Z' => Command::Power(PowerStep::DownMax),
            b'z' => Command::Power(PowerStep::DownBig),
            b'x' => Command::Power(PowerStep::DownSmall),
            b'c' => Command::Power(PowerStep::UpSmall),
            b'v' => Command::Power(PowerStep::UpBig),
            b'V' => Command::Power(PowerStep::UpMax),
            b'(' => Command::TiltStep(Rescale::Down),
            b')' => Command::TiltStep(Rescale::Up),
            b'[' => Command::LinearGain(Rescale::Down),
            b']' => Command::LinearGain(Rescale::Up),
            b'{' => Command::DerivativeGain(Rescale::Down),
            b'}' => Command::DerivativeGain(Rescale::Up),
            b'<' => Command::ShrinkWindow,
            b'>' => Command::GrowWindow,
            b'_' => Command::CaptureBaseline,
            b'I' => Command::Verbose(true),
            b'i' => Command::Verbose(false),
            _ => return None,
        };
        Some(cmd)
    }
}
