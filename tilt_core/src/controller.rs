//! Power and tilt state for both axes.
//!
//! Every mutation is followed by a broadcast of the current power to both
//! axes, so the channels always reflect the latest commanded state.

use tilt_traits::{Actuator, StatusSink};
use tracing::{debug, warn};

use crate::axis::Axis;
use crate::config::PowerRange;

pub struct Controller<A: Actuator> {
    x: Axis<A>,
    y: Axis<A>,
    power: i32,
    range: PowerRange,
    sink: Box<dyn StatusSink + Send>,
}

impl<A: Actuator> core::fmt::Debug for Controller<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("power", &self.power)
            .field("tilt_x", &self.tilt_x())
            .field("tilt_y", &self.tilt_y())
            .finish()
    }
}

impl<A: Actuator> Controller<A> {
    /// Assemble a controller at the lowest power the range allows.
    ///
    /// Nothing is written until the first mutation.
    pub fn new(x: Axis<A>, y: Axis<A>, range: PowerRange, sink: Box<dyn StatusSink + Send>) -> Self {
        Self {
            x,
            y,
            power: range.clamp(0),
            range,
            sink,
        }
    }

    pub fn power(&self) -> i32 {
        self.power
    }

    pub fn range(&self) -> &PowerRange {
        &self.range
    }

    pub fn tilt_x(&self) -> f64 {
        self.x.tilt()
    }

    pub fn tilt_y(&self) -> f64 {
        self.y.tilt()
    }

    pub fn axis_x(&self) -> &Axis<A> {
        &self.x
    }

    pub fn axis_y(&self) -> &Axis<A> {
        &self.y
    }

    /// Add to both tilts, clamp each to [-1, 1], then re-broadcast power.
    pub fn adjust_tilt(&mut self, dx: f64, dy: f64) {
        let tx = clamp_tilt(self.x.tilt() + dx);
        let ty = clamp_tilt(self.y.tilt() + dy);
        self.x.set_tilt(tx);
        self.y.set_tilt(ty);
        self.broadcast();
    }

    /// Set the X tilt absolutely (clamped) and re-broadcast power.
    pub fn set_tilt_x(&mut self, tilt: f64) {
        self.x.set_tilt(clamp_tilt(tilt));
        self.broadcast();
    }

    /// Set the Y tilt absolutely (clamped) and re-broadcast power.
    pub fn set_tilt_y(&mut self, tilt: f64) {
        self.y.set_tilt(clamp_tilt(tilt));
        self.broadcast();
    }

    /// Add `delta` to power, clamp to the range, and re-broadcast.
    pub fn adjust_power(&mut self, delta: i32) {
        self.power = self.range.clamp(self.power.saturating_add(delta));
        debug!(power = self.power, delta, "power adjusted");
        self.broadcast();
    }

    fn broadcast(&mut self) {
        let power = self.power;
        self.sink.power(power);
        for axis in [&mut self.x, &mut self.y] {
            if let Err(e) = axis.set_power(power, &*self.sink) {
                warn!(error = %e, power, "actuation failed; output left unapplied");
            }
        }
    }
}

#[inline]
fn clamp_tilt(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(-1.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::Motor;
    use crate::mocks::{RecordingSink, SpyRig};
    use proptest::prelude::*;
    use tilt_traits::MotorId;

    fn controller(rig: &SpyRig, sink: RecordingSink) -> Controller<crate::mocks::SpyChannel> {
        let r = PowerRange::default();
        let ch = rig.channels();
        Controller::new(
            Axis::new(
                Motor::open(MotorId::X1, ch.x1, r),
                Motor::open(MotorId::X2, ch.x2, r),
            ),
            Axis::new(
                Motor::open(MotorId::Y1, ch.y1, r),
                Motor::open(MotorId::Y2, ch.y2, r),
            ),
            r,
            Box::new(sink),
        )
    }

    #[test]
    fn tilt_sum_is_clamped() {
        let rig = SpyRig::default();
        let mut c = controller(&rig, RecordingSink::default());
        c.adjust_tilt(0.8, -0.8);
        c.adjust_tilt(0.8, -0.8);
        assert_eq!(c.tilt_x(), 1.0);
        assert_eq!(c.tilt_y(), -1.0);
    }

    #[test]
    fn every_mutation_actuates_all_motors() {
        let rig = SpyRig::default();
        let sink = RecordingSink::default();
        let mut c = controller(&rig, sink.clone());
        c.adjust_power(100);
        assert_eq!(rig.last_levels(), [Some(72); 4]);

        c.set_tilt_x(0.5);
        // x2 trimmed to 50 -> 60; others at full power
        assert_eq!(rig.last_levels(), [Some(72), Some(60), Some(72), Some(72)]);
        assert_eq!(sink.power_events(), vec![100, 100]);
        assert_eq!(sink.motor_events().len(), 8);
    }

    #[test]
    fn failing_motor_does_not_stop_the_others() {
        let rig = SpyRig::default();
        let mut c = controller(&rig, RecordingSink::default());
        rig.y1.set_failing(true);
        c.adjust_power(50);
        assert_eq!(rig.x1.last(), Some(60));
        assert_eq!(rig.y2.last(), Some(60));
        assert_eq!(c.axis_y().a().applied(), None);
    }

    proptest! {
        #[test]
        fn power_stays_in_range(deltas in proptest::collection::vec(-250i32..250, 1..40)) {
            let rig = SpyRig::default();
            let mut c = controller(&rig, RecordingSink::default());
            for d in deltas {
                c.adjust_power(d);
                prop_assert!((0..=100).contains(&c.power()));
                let before = c.power();
                c.adjust_power(0);
                prop_assert_eq!(c.power(), before);
            }
        }
    }
}
