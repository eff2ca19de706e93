//! Tracing subscriber setup: console (pretty or JSON) plus an optional JSON log file.

use std::path::Path;
use tilt_config::Logging;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::FILE_GUARD;

/// Console filter: `--log-level`, then `RUST_LOG`, then `[logging] level`, then `info`.
fn console_filter(cli_level: Option<&str>, logging: &Logging) -> eyre::Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::try_new(level)?);
    }
    if let Ok(f) = EnvFilter::try_from_default_env() {
        return Ok(f);
    }
    Ok(EnvFilter::try_new(logging.level.as_deref().unwrap_or("info"))?)
}

fn rotation(name: Option<&str>) -> Rotation {
    match name {
        Some("daily") => Rotation::DAILY,
        Some("hourly") => Rotation::HOURLY,
        _ => Rotation::NEVER,
    }
}

pub fn init(json: bool, cli_level: Option<&str>, logging: &Logging) -> eyre::Result<()> {
    let filter = console_filter(cli_level, logging)?;

    let console = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let file = match logging.file.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let prefix = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "tiltrig.log".to_string());
            let appender = RollingFileAppender::builder()
                .rotation(rotation(logging.rotation.as_deref()))
                .filename_prefix(prefix)
                .build(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().json().with_writer(writer).boxed())
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .with(filter)
        .try_init()?;
    Ok(())
}
