//! Sampler thread start-up, delivery, and cleanup.

use crossbeam_channel as xch;
use std::time::Duration;
use tilt_core::{Message, Sampler};
use tilt_hardware::SimulatedAccelerometer;
use tilt_traits::{Accelerometer, BoxError, InputEvent};

#[test]
fn sampler_forwards_simulated_events() {
    let (tx, rx) = xch::unbounded();
    let acc = SimulatedAccelerometer::new(500).with_pattern(vec![(1, 2, 64)]);
    let sampler = Sampler::spawn(acc, tx, Duration::from_millis(20));

    let mut events = Vec::new();
    while events.len() < 4 {
        match rx.recv_timeout(Duration::from_secs(2)) {
            Ok(Message::Event(ev)) => events.push(ev),
            Ok(other) => panic!("unexpected message: {other:?}"),
            Err(e) => panic!("no event from sampler: {e}"),
        }
    }
    assert!(events[3].is_sync());
    assert!(sampler.is_running());
    drop(sampler);
}

#[test]
fn sampler_thread_exits_on_drop() {
    for _ in 0..10 {
        let (tx, _rx) = xch::unbounded();
        let sampler = Sampler::spawn(SimulatedAccelerometer::new(1), tx, Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(5));
        drop(sampler);
    }
}

#[test]
fn sampler_exits_when_consumer_disconnects() {
    let (tx, rx) = xch::unbounded();
    let sampler = Sampler::spawn(SimulatedAccelerometer::new(1000), tx, Duration::from_millis(20));
    drop(rx);
    for _ in 0..100 {
        if !sampler.is_running() {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(!sampler.is_running());
}

struct Flaky {
    calls: u32,
}

impl Accelerometer for Flaky {
    fn read_event(&mut self, _timeout: Duration) -> Result<Option<InputEvent>, BoxError> {
        self.calls += 1;
        if self.calls % 2 == 1 {
            Err(Box::new(tilt_hardware::HwError::ShortRead {
                got: 3,
                expected: 24,
            }))
        } else {
            Ok(Some(InputEvent::sync()))
        }
    }
}

#[test]
fn short_reads_are_skipped() {
    let (tx, rx) = xch::unbounded();
    let sampler = Sampler::spawn(Flaky { calls: 0 }, tx, Duration::from_millis(10));
    let got = rx.recv_timeout(Duration::from_secs(2));
    assert!(matches!(got, Ok(Message::Event(ev)) if ev.is_sync()));
    drop(sampler);
}
