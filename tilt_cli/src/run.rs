//! Hardware assembly and the `run` command.

use crossbeam_channel as xch;
use eyre::WrapErr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tilt_config::Config;
use tilt_core::{CommandServer, Rig, RigChannels, Runner, Sampler, Tuning};
use tilt_hardware::{InertChannel, SimulatedAccelerometer, SimulatedChannel, SysfsChannel};
use tilt_traits::{Accelerometer, Actuator, MotorId};
use tilt_ui::TraceSink;

use crate::error_fmt::BIND_CONTEXT;

/// Per-read timeout for the sensor thread; bounds shutdown latency.
const SENSOR_TIMEOUT: Duration = Duration::from_millis(100);
/// Sample rate of the simulated accelerometer.
const SIM_RATE_HZ: u32 = 50;

pub type Channel = Box<dyn Actuator + Send>;
pub type Sensor = Box<dyn Accelerometer + Send>;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOpts {
    pub port: Option<u16>,
    pub sim: bool,
    pub max_run_ms: Option<u64>,
}

pub fn channel_path(cfg: &Config, id: MotorId) -> &str {
    match id {
        MotorId::X1 => &cfg.channels.x1,
        MotorId::X2 => &cfg.channels.x2,
        MotorId::Y1 => &cfg.channels.y1,
        MotorId::Y2 => &cfg.channels.y2,
    }
}

/// Open one output channel. A device that cannot be opened is replaced by an
/// inert channel so the rest of the rig keeps working.
fn open_channel(cfg: &Config, id: MotorId, sim: bool) -> Channel {
    if sim {
        return Box::new(SimulatedChannel::new(id.name()));
    }
    let path = channel_path(cfg, id);
    match SysfsChannel::open(path) {
        Ok(ch) => {
            tracing::info!(motor = %id, path, "output channel opened");
            Box::new(ch)
        }
        Err(e) => {
            tracing::warn!(motor = %id, error = %e, "output channel unavailable; using inert channel");
            Box::new(InertChannel::new(id.name()))
        }
    }
}

/// Open the accelerometer, or `None` when it is unavailable.
fn open_sensor(cfg: &Config, sim: bool) -> Option<Sensor> {
    if sim {
        return Some(Box::new(SimulatedAccelerometer::new(SIM_RATE_HZ)));
    }
    open_evdev(&cfg.channels.accel)
}

#[cfg(target_os = "linux")]
fn open_evdev(path: &str) -> Option<Sensor> {
    match tilt_hardware::EvdevAccelerometer::open(path) {
        Ok(acc) => {
            tracing::info!(path, "accelerometer opened");
            Some(Box::new(acc))
        }
        Err(e) => {
            tracing::warn!(error = %e, "accelerometer unavailable; running without tilt correction");
            None
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn open_evdev(path: &str) -> Option<Sensor> {
    tracing::warn!(path, "evdev input is Linux-only; running without tilt correction");
    None
}

pub fn build_rig(cfg: &Config, sim: bool) -> eyre::Result<Rig<Channel>> {
    let tuning: Tuning = cfg.into();
    let channels = RigChannels {
        x1: open_channel(cfg, MotorId::X1, sim),
        x2: open_channel(cfg, MotorId::X2, sim),
        y1: open_channel(cfg, MotorId::Y1, sim),
        y2: open_channel(cfg, MotorId::Y2, sim),
    };
    Rig::builder()
        .with_channels(channels)
        .with_tuning(tuning)
        .with_window(cfg.filter.window)
        .with_sink(Box::new(TraceSink::new(
            tuning.range.power_min,
            tuning.range.power_max,
        )))
        .try_build()
}

pub fn run(cfg: &Config, opts: RunOpts, shutdown: Arc<AtomicBool>) -> eyre::Result<()> {
    let rig = build_rig(cfg, opts.sim)?;

    let (tx, rx) = xch::unbounded();
    let port = opts.port.unwrap_or(cfg.server.port);
    let server = CommandServer::bind((cfg.server.bind.as_str(), port), tx.clone())
        .wrap_err_with(|| format!("{BIND_CONTEXT} on {}:{port}", cfg.server.bind))?;
    println!("listening on {}", server.local_addr());

    let sampler = open_sensor(cfg, opts.sim).map(|s| Sampler::spawn(s, tx.clone(), SENSOR_TIMEOUT));
    drop(tx);

    if let Some(ms) = opts.max_run_ms {
        let flag = shutdown.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(ms));
            flag.store(true, Ordering::Relaxed);
        });
    }

    let mut runner = Runner::new(rig, rx, shutdown);
    runner.run();

    drop(sampler);
    drop(server);
    let power = runner.rig().controller().power();
    // dropping the rig writes the stopped level to every motor
    drop(runner);
    println!("stopped (last power {power})");
    Ok(())
}
