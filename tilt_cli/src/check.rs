//! `self-check`: probe every configured device path.

use serde_json::json;
use tilt_config::Config;
use tilt_hardware::SysfsChannel;
use tilt_traits::MotorId;

use crate::run::channel_path;

#[derive(Debug)]
pub struct Probe {
    pub name: &'static str,
    pub path: String,
    pub error: Option<String>,
}

pub fn probe_all(cfg: &Config) -> Vec<Probe> {
    let mut out: Vec<Probe> = MotorId::ALL
        .iter()
        .map(|&id| {
            let path = channel_path(cfg, id).to_string();
            let error = SysfsChannel::open(&path).err().map(|e| e.to_string());
            Probe {
                name: id.name(),
                path,
                error,
            }
        })
        .collect();

    #[cfg(target_os = "linux")]
    let accel_error = tilt_hardware::EvdevAccelerometer::open(&cfg.channels.accel)
        .err()
        .map(|e| e.to_string());
    #[cfg(not(target_os = "linux"))]
    let accel_error = Some("evdev input is Linux-only".to_string());

    out.push(Probe {
        name: "accel",
        path: cfg.channels.accel.clone(),
        error: accel_error,
    });
    out
}

pub fn self_check(cfg: &Config, json: bool) {
    let probes = probe_all(cfg);
    let failed = probes.iter().filter(|p| p.error.is_some()).count();
    for p in &probes {
        match &p.error {
            None => tracing::debug!(device = p.name, path = %p.path, "probe ok"),
            Some(e) => tracing::warn!(device = p.name, error = %e, "probe failed"),
        }
    }

    if json {
        let devices: Vec<_> = probes
            .iter()
            .map(|p| json!({ "device": p.name, "path": p.path, "ok": p.error.is_none(), "error": p.error }))
            .collect();
        println!("{}", json!({ "config": "ok", "devices": devices, "unavailable": failed }));
        return;
    }

    println!("config: ok");
    for p in &probes {
        match &p.error {
            None => println!("{:<5} ok           {}", p.name, p.path),
            Some(e) => println!("{:<5} unavailable  {e}", p.name),
        }
    }
    if failed == 0 {
        println!("self-check ok");
    } else {
        println!("self-check: {failed} device(s) unavailable");
    }
}
