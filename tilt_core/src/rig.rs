//! The rig engine: controller, tuning, and correction state behind one owner.
//!
//! Sensor events and command bytes are both applied here, one at a time.

use tilt_traits::{Actuator, InputEvent};
use tracing::{debug, trace};

use crate::builder::RigBuilder;
use crate::command::Command;
use crate::config::Tuning;
use crate::controller::Controller;
use crate::sensor::{Corrector, Sample, SampleAssembler};

pub struct Rig<A: Actuator> {
    controller: Controller<A>,
    tuning: Tuning,
    assembler: SampleAssembler,
    corrector: Corrector,
    verbose: bool,
    last_sample: Option<Sample>,
}

impl<A: Actuator> core::fmt::Debug for Rig<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rig")
            .field("controller", &self.controller)
            .field("tuning", &self.tuning)
            .field("window", &self.corrector.window_len())
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl<A: Actuator> Rig<A> {
    pub fn builder() -> RigBuilder<A> {
        RigBuilder::default()
    }

    /// Assemble a rig and broadcast the initial power to every motor.
    pub fn new(controller: Controller<A>, tuning: Tuning, window: usize) -> Self {
        let mut rig = Self {
            controller,
            tuning,
            assembler: SampleAssembler::new(),
            corrector: Corrector::new(window),
            verbose: false,
            last_sample: None,
        };
        rig.controller.adjust_power(0);
        rig
    }

    pub fn controller(&self) -> &Controller<A> {
        &self.controller
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn corrector(&self) -> &Corrector {
        &self.corrector
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn last_sample(&self) -> Option<Sample> {
        self.last_sample
    }

    /// Feed one accelerometer event.
    ///
    /// On a completed sample the tilt correction is applied; when verbose
    /// mode is on, the telemetry line for that sample is returned.
    pub fn on_event(&mut self, ev: &InputEvent) -> Option<String> {
        let sample = self.assembler.feed(ev)?;
        let (cx, cy) = self.corrector.apply(&sample, &self.tuning);
        trace!(x = sample.x, y = sample.y, z = sample.z, cx, cy, "sample");
        self.controller.adjust_tilt(cx, cy);
        self.last_sample = Some(sample);
        self.verbose.then(|| self.telemetry_line(&sample))
    }

    /// Apply one command byte and return the status line to send back.
    ///
    /// Unknown bytes change nothing but still produce a status line.
    pub fn on_command(&mut self, byte: u8) -> String {
        match Command::decode(byte) {
            Some(cmd) => {
                debug!(?cmd, "command");
                self.apply(cmd);
            }
            None => trace!(byte, "ignored command byte"),
        }
        self.status_line()
    }

    pub fn apply(&mut self, cmd: Command) {
        let t = &mut self.tuning;
        match cmd {
            Command::Nudge { x, y } => {
                let step = t.tilt_step;
                self.controller
                    .adjust_tilt(f64::from(x) * step, f64::from(y) * step);
            }
            Command::Center => {
                self.controller.set_tilt_x(0.0);
                self.controller.set_tilt_y(0.0);
            }
            Command::Power(step) => {
                let delta = step.delta(t);
                self.controller.adjust_power(delta);
            }
            Command::TiltStep(r) => t.tilt_step = r.apply(t.tilt_step),
            Command::LinearGain(r) => t.linear_gain = r.apply(t.linear_gain),
            Command::DerivativeGain(r) => t.derivative_gain = r.apply(t.derivative_gain),
            Command::ShrinkWindow => {
                if !self.corrector.shrink_window() {
                    debug!("window already at one sample");
                }
            }
            Command::GrowWindow => self.corrector.grow_window(),
            Command::CaptureBaseline => self.corrector.capture_baseline(),
            Command::Verbose(on) => self.verbose = on,
        }
    }

    pub fn status_line(&self) -> String {
        let (ax, ay) = self.corrector.last_avg();
        let (bx, by) = self.corrector.baseline();
        format!(
            "accel linear {:.6}, derivative {:.6}, tilt step {:.6}, window {}, last x={ax:.3} y={ay:.3}, normal x={bx:.3} y={by:.3}, power {}",
            self.tuning.linear_gain,
            self.tuning.derivative_gain,
            self.tuning.tilt_step,
            self.corrector.window_len(),
            self.controller.power(),
        )
    }

    fn telemetry_line(&self, s: &Sample) -> String {
        let (ax, ay) = self.corrector.last_avg();
        format!(
            "sample x={} y={} z={}, avg x={ax:.3} y={ay:.3}",
            s.x, s.y, s.z
        )
    }
}
