use rstest::rstest;
use tilt_hardware::{HwError, InertChannel, SimulatedChannel, SysfsChannel};
use tilt_traits::Actuator;

#[rstest]
#[case("ehrpwm.0:0")]
#[case("ehrpwm.1:1")]
fn boxed_sysfs_channel_writes_decimal_line(#[case] name: &str) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, "0\n").unwrap();

    let mut ch: Box<dyn Actuator> = Box::new(SysfsChannel::open(&path).unwrap());
    ch.write_level(-5).unwrap();
    ch.write_level(60).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "60\n");
}

#[test]
fn unavailable_channel_names_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("duty_percent");
    let err = SysfsChannel::open(&path).expect_err("missing attribute");
    assert!(matches!(err, HwError::Unavailable { .. }));
    assert!(err.to_string().contains("duty_percent"));
}

#[test]
fn stand_in_channels_never_fail() {
    let mut inert = InertChannel::new("x1");
    let sim = SimulatedChannel::new("y2");
    let mut writer = sim.clone();
    for level in [48, 72, 60] {
        inert.write_level(level).unwrap();
        writer.write_level(level).unwrap();
    }
    assert_eq!(sim.history(), vec![48, 72, 60]);
}
