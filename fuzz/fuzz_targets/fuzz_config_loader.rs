#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = tilt_config::load_toml(data)
        && cfg.validate().is_ok()
    {
        // a valid config must convert into runtime tuning
        let tuning: tilt_core::Tuning = (&cfg).into();
        assert!(tuning.range.power_max > tuning.range.power_min);
    }
});
