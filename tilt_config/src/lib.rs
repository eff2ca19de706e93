#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the tilt rig.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every section has defaults, so an empty file yields a usable rig config.
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output channel and sensor device paths.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Channels {
    pub x1: String,
    pub x2: String,
    pub y1: String,
    pub y2: String,
    /// evdev node of the accelerometer
    pub accel: String,
}

impl Default for Channels {
    fn default() -> Self {
        Self {
            x1: "/sys/devices/platform/ehrpwm.0/pwm/ehrpwm.0:0/duty_percent".into(),
            x2: "/sys/devices/platform/ehrpwm.0/pwm/ehrpwm.0:1/duty_percent".into(),
            y1: "/sys/devices/platform/ehrpwm.1/pwm/ehrpwm.1:0/duty_percent".into(),
            y2: "/sys/devices/platform/ehrpwm.1/pwm/ehrpwm.1:1/duty_percent".into(),
            accel: "/dev/copter_accel".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 4000,
        }
    }
}

/// Logical power range and the physical output range it maps onto.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct Power {
    pub power_min: i32,
    pub power_max: i32,
    /// Device value written for `power_min`
    pub motor_min: i32,
    /// Device value written for `power_max`
    pub motor_max: i32,
}

impl Default for Power {
    fn default() -> Self {
        Self {
            power_min: 0,
            power_max: 100,
            motor_min: 48,
            motor_max: 72,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct Tuning {
    /// Tilt change per nudge command
    pub tilt_step: f64,
    pub power_step_small: i32,
    pub power_step_big: i32,
    /// Gain on (average - baseline)
    pub accel_linear: f64,
    /// Gain on (average - previous average)
    pub accel_derivative: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tilt_step: 0.02,
            power_step_small: 1,
            power_step_big: 5,
            accel_linear: -0.02,
            accel_derivative: -0.005,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterCfg {
    /// Rolling average window in samples
    pub window: usize,
}

impl Default for FilterCfg {
    fn default() -> Self {
        Self { window: 10 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub channels: Channels,
    pub server: Server,
    pub power: Power,
    pub tuning: Tuning,
    pub filter: FilterCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Power
        let p = &self.power;
        if p.power_max <= p.power_min {
            eyre::bail!("power.power_max must be > power.power_min");
        }
        if p.motor_max < p.motor_min {
            eyre::bail!("power.motor_max must be >= power.motor_min");
        }

        // Tuning
        let t = &self.tuning;
        if !(t.tilt_step.is_finite() && t.tilt_step > 0.0 && t.tilt_step <= 1.0) {
            eyre::bail!("tuning.tilt_step must be in (0.0, 1.0]");
        }
        if t.power_step_small <= 0 || t.power_step_big <= 0 {
            eyre::bail!("tuning.power_step_small and tuning.power_step_big must be >= 1");
        }
        if !t.accel_linear.is_finite() {
            eyre::bail!("tuning.accel_linear must be finite");
        }
        if !t.accel_derivative.is_finite() {
            eyre::bail!("tuning.accel_derivative must be finite");
        }

        // Filter
        if self.filter.window == 0 {
            eyre::bail!("filter.window must be >= 1");
        }

        // Server
        if self.server.port == 0 {
            eyre::bail!("server.port must be > 0");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
