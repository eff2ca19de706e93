#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use tilt_core::Rig;
use tilt_core::mocks::SpyRig;
use tilt_traits::InputEvent;

#[derive(Debug, Arbitrary)]
enum Input {
    Byte(u8),
    Event { kind: u16, code: u16, value: i32 },
}

fuzz_target!(|inputs: Vec<Input>| {
    let spy = SpyRig::default();
    let Ok(mut rig) = Rig::builder().with_channels(spy.channels()).try_build() else {
        return;
    };
    for input in inputs {
        match input {
            Input::Byte(b) => {
                let _ = rig.on_command(b);
            }
            Input::Event { kind, code, value } => {
                let _ = rig.on_event(&InputEvent::new(kind, code, value));
            }
        }
        let c = rig.controller();
        assert!((0..=100).contains(&c.power()));
        assert!(!(c.tilt_x().abs() > 1.0));
        assert!(!(c.tilt_y().abs() > 1.0));
        assert!(rig.corrector().window_len() >= 1);
        for level in spy.last_levels().into_iter().flatten() {
            assert!((48..=72).contains(&level));
        }
    }
});
