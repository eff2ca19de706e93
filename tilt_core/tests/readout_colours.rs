//! Motor readout colours as produced by a live controller.

use std::sync::{Arc, Mutex};

use rstest::rstest;
use tilt_core::axis::Axis;
use tilt_core::controller::Controller;
use tilt_core::mocks::{SpyChannel, SpyRig};
use tilt_core::motor::Motor;
use tilt_core::PowerRange;
use tilt_traits::{MotorId, StatusSink};
use tilt_ui::{Palette, Rgb};

#[derive(Clone)]
struct ColourSink {
    palette: Palette,
    seen: Arc<Mutex<Vec<(MotorId, Rgb)>>>,
}

impl ColourSink {
    fn new(range: &PowerRange) -> Self {
        Self {
            palette: Palette::new(range.power_min, range.power_max),
            seen: Arc::default(),
        }
    }

    fn last(&self, id: MotorId) -> Option<Rgb> {
        let seen = self.seen.lock().unwrap();
        seen.iter().rev().find(|(m, _)| *m == id).map(|&(_, c)| c)
    }
}

impl StatusSink for ColourSink {
    fn motor(&self, id: MotorId, power: i32, _trimmed: i32, factor: f64) {
        let colour = self.palette.motor(power, factor);
        self.seen.lock().unwrap().push((id, colour));
    }

    fn power(&self, _power: i32) {}
}

fn controller(spy: &SpyRig, sink: ColourSink, range: PowerRange) -> Controller<SpyChannel> {
    let ch = spy.channels();
    Controller::new(
        Axis::new(
            Motor::open(MotorId::X1, ch.x1, range),
            Motor::open(MotorId::X2, ch.x2, range),
        ),
        Axis::new(
            Motor::open(MotorId::Y1, ch.y1, range),
            Motor::open(MotorId::Y2, ch.y2, range),
        ),
        range,
        Box::new(sink),
    )
}

#[rstest]
#[case::fully_throttled(-1.0, Rgb::new(0xff, 0, 0))]
#[case::half_throttled(-0.5, Rgb::new(0x7f, 0x7f, 0))]
#[case::level(0.0, Rgb::new(0, 0xff, 0))]
fn throttled_motor_colour_follows_controller_power(#[case] tilt: f64, #[case] x1: Rgb) {
    let range = PowerRange::default();
    let spy = SpyRig::default();
    let sink = ColourSink::new(&range);
    let mut c = controller(&spy, sink.clone(), range);
    c.adjust_power(100);
    c.set_tilt_x(tilt);

    assert_eq!(sink.last(MotorId::X1), Some(x1));
    assert_eq!(sink.last(MotorId::X2), Some(Rgb::new(0, 0xff, 0)));
}

#[test]
fn idle_rig_shows_base_colour() {
    let range = PowerRange::default();
    let spy = SpyRig::default();
    let sink = ColourSink::new(&range);
    let mut c = controller(&spy, sink.clone(), range);
    c.set_tilt_y(1.0);
    assert_eq!(sink.last(MotorId::Y2), Some(Rgb::default()));
}
