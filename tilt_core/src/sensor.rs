//! Accelerometer event decoding and the tilt correction pipeline.
//!
//! Axis updates accumulate into a pending sample; a sync marker closes the
//! sample and hands it to the `Corrector`, which filters X and Y separately
//! and turns each moving average into a tilt correction.

use tilt_traits::{ABS_X, ABS_Y, ABS_Z, EV_ABS, EV_SYN, InputEvent};

use crate::config::Tuning;
use crate::filter::RollingWindow;

/// One complete raw accelerometer reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sample {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Collects axis updates until a sync marker arrives.
///
/// Axes that were not updated since the last sync keep their previous value.
#[derive(Debug, Default)]
pub struct SampleAssembler {
    pending: Sample,
}

impl SampleAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event; returns the completed sample on sync.
    pub fn feed(&mut self, ev: &InputEvent) -> Option<Sample> {
        match ev.kind {
            EV_ABS => {
                match ev.code {
                    ABS_X => self.pending.x = ev.value,
                    ABS_Y => self.pending.y = ev.value,
                    ABS_Z => self.pending.z = ev.value,
                    _ => {}
                }
                None
            }
            EV_SYN => Some(self.pending),
            _ => None,
        }
    }

    pub fn pending(&self) -> Sample {
        self.pending
    }
}

/// Filter and correction state for one axis.
#[derive(Debug, Clone)]
struct AxisFilter {
    window: RollingWindow,
    last_avg: f64,
    baseline: f64,
}

impl AxisFilter {
    fn new(window: usize) -> Self {
        Self {
            window: RollingWindow::new(window),
            last_avg: 0.0,
            baseline: 0.0,
        }
    }

    fn correct(&mut self, raw: i32, tuning: &Tuning) -> f64 {
        let avg = self.window.update(f64::from(raw));
        let correction = tuning.linear_gain * (avg - self.baseline)
            + tuning.derivative_gain * (avg - self.last_avg);
        self.last_avg = avg;
        correction
    }
}

/// Per-axis moving averages, baselines, and the linear/derivative correction.
#[derive(Debug, Clone)]
pub struct Corrector {
    x: AxisFilter,
    y: AxisFilter,
}

impl Corrector {
    pub fn new(window: usize) -> Self {
        Self {
            x: AxisFilter::new(window),
            y: AxisFilter::new(window),
        }
    }

    /// Filter a sample and return the (x, y) tilt corrections.
    pub fn apply(&mut self, sample: &Sample, tuning: &Tuning) -> (f64, f64) {
        (
            self.x.correct(sample.x, tuning),
            self.y.correct(sample.y, tuning),
        )
    }

    /// Use the latest moving averages as the new zero reference.
    pub fn capture_baseline(&mut self) {
        self.x.baseline = self.x.last_avg;
        self.y.baseline = self.y.last_avg;
    }

    pub fn grow_window(&mut self) {
        self.x.window.grow();
        self.y.window.grow();
    }

    /// Shrink both windows by one; false when already at one sample.
    pub fn shrink_window(&mut self) -> bool {
        let sx = self.x.window.shrink();
        let sy = self.y.window.shrink();
        sx && sy
    }

    pub fn window_len(&self) -> usize {
        self.x.window.capacity()
    }

    pub fn last_avg(&self) -> (f64, f64) {
        (self.x.last_avg, self.y.last_avg)
    }

    pub fn baseline(&self) -> (f64, f64) {
        (self.x.baseline, self.y.baseline)
    }
}
