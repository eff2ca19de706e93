use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tilt_traits::{Actuator, BoxError};
use tracing::trace;

use crate::error::{HwError, Result};

/// PWM duty sink exposed as a sysfs attribute file.
///
/// Every write reopens the attribute with truncation and writes a single
/// newline-terminated decimal value.
#[derive(Debug)]
pub struct SysfsChannel {
    path: PathBuf,
}

impl SysfsChannel {
    /// Check that the attribute exists and is writable. Does not write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(|source| HwError::Unavailable {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_value(&self, level: i32) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        file.write_all(format!("{level}\n").as_bytes())
            .map_err(|e| HwError::Write(format!("{}: {e}", self.path.display())))?;
        trace!(path = %self.path.display(), level, "sysfs write");
        Ok(())
    }
}

impl Actuator for SysfsChannel {
    fn write_level(&mut self, level: i32) -> std::result::Result<(), BoxError> {
        self.write_value(level).map_err(Into::into)
    }
}
