//! Device backends for the tilt rig.
//!
//! - `sysfs`: PWM duty outputs written through sysfs attribute files.
//! - `evdev`: accelerometer input events (Linux only).
//! - `sim`: inert and simulated devices for bench runs and degraded startup.
pub mod error;
#[cfg(target_os = "linux")]
pub mod evdev;
pub mod sim;
pub mod sysfs;

pub use error::HwError;
#[cfg(target_os = "linux")]
pub use evdev::EvdevAccelerometer;
pub use sim::{InertChannel, SimulatedAccelerometer, SimulatedChannel};
pub use sysfs::SysfsChannel;
