//! Accelerometer input via a Linux evdev node.
//!
//! Records are `struct input_event` in native layout: a `timeval` followed by
//! `u16 type`, `u16 code`, `i32 value`. Reads are exact-size; anything else is
//! reported as a short read and the record is dropped.

use std::fs::File;
use std::io::Read;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tilt_traits::{Accelerometer, BoxError, InputEvent};
use tracing::trace;

use crate::error::{HwError, Result};

/// Size of one kernel event record.
pub const RECORD_SIZE: usize = std::mem::size_of::<libc::input_event>();
const TIME_SIZE: usize = std::mem::size_of::<libc::timeval>();

/// Decode one record. `buf` must hold exactly `RECORD_SIZE` bytes.
pub fn decode_record(buf: &[u8]) -> Result<InputEvent> {
    if buf.len() != RECORD_SIZE {
        return Err(HwError::ShortRead {
            got: buf.len(),
            expected: RECORD_SIZE,
        });
    }
    let body = &buf[TIME_SIZE..];
    let kind = u16::from_ne_bytes([body[0], body[1]]);
    let code = u16::from_ne_bytes([body[2], body[3]]);
    let value = i32::from_ne_bytes([body[4], body[5], body[6], body[7]]);
    Ok(InputEvent { kind, code, value })
}

/// Encode an event into a native record with a zero timestamp.
pub fn encode_record(ev: &InputEvent) -> [u8; RECORD_SIZE] {
    let mut out = [0u8; RECORD_SIZE];
    out[TIME_SIZE..TIME_SIZE + 2].copy_from_slice(&ev.kind.to_ne_bytes());
    out[TIME_SIZE + 2..TIME_SIZE + 4].copy_from_slice(&ev.code.to_ne_bytes());
    out[TIME_SIZE + 4..TIME_SIZE + 8].copy_from_slice(&ev.value.to_ne_bytes());
    out
}

pub struct EvdevAccelerometer {
    file: File,
    path: PathBuf,
}

impl EvdevAccelerometer {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| HwError::Unavailable {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for readability. Returns false on timeout or signal interruption.
    fn wait_readable(&self, timeout: Duration) -> Result<bool> {
        let mut pfd = libc::pollfd {
            fd: self.file.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let ms = timeout.as_millis().min(i32::MAX as u128) as libc::c_int;
        // SAFETY: pfd is a valid pollfd for the lifetime of the call and nfds is 1.
        let rc = unsafe { libc::poll(&mut pfd, 1, ms) };
        if rc < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(err.into());
        }
        Ok(rc > 0)
    }

    fn next_record(&mut self, timeout: Duration) -> Result<Option<InputEvent>> {
        if !self.wait_readable(timeout)? {
            return Ok(None);
        }
        let mut buf = [0u8; RECORD_SIZE];
        let n = self.file.read(&mut buf)?;
        if n == 0 {
            // device went away, or a plain file ran out
            return Err(HwError::Io(std::io::ErrorKind::UnexpectedEof.into()));
        }
        let ev = decode_record(&buf[..n])?;
        trace!(kind = ev.kind, code = ev.code, value = ev.value, "accel event");
        Ok(Some(ev))
    }
}

impl Accelerometer for EvdevAccelerometer {
    fn read_event(&mut self, timeout: Duration) -> std::result::Result<Option<InputEvent>, BoxError> {
        self.next_record(timeout).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tilt_traits::{ABS_X, ABS_Z};

    #[test]
    fn record_layout_matches_kernel_struct() {
        let ev = InputEvent::abs(ABS_Z, -321);
        let buf = encode_record(&ev);
        assert_eq!(decode_record(&buf).unwrap(), ev);
    }

    #[test]
    fn truncated_record_is_short_read() {
        let buf = encode_record(&InputEvent::sync());
        let err = decode_record(&buf[..RECORD_SIZE - 1]).expect_err("short");
        assert!(matches!(err, HwError::ShortRead { got, expected } if got == RECORD_SIZE - 1 && expected == RECORD_SIZE));
    }

    #[test]
    fn reads_records_from_a_file_then_reports_short_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accel");
        let mut f = File::create(&path).unwrap();
        f.write_all(&encode_record(&InputEvent::abs(ABS_X, 42))).unwrap();
        f.write_all(&encode_record(&InputEvent::sync())).unwrap();
        f.write_all(&[1, 2, 3]).unwrap();
        drop(f);

        let mut acc = EvdevAccelerometer::open(&path).unwrap();
        let t = Duration::from_millis(10);
        assert_eq!(
            acc.read_event(t).unwrap(),
            Some(InputEvent::abs(ABS_X, 42))
        );
        assert_eq!(acc.read_event(t).unwrap(), Some(InputEvent::sync()));
        let short = acc.read_event(t).expect_err("short tail");
        assert!(matches!(short.downcast_ref::<HwError>(), Some(HwError::ShortRead { got: 3, .. })));
        let eof = acc.read_event(t).expect_err("end of file");
        assert!(matches!(eof.downcast_ref::<HwError>(), Some(HwError::Io(_))));
    }

    #[test]
    fn missing_device_is_unavailable() {
        let err = EvdevAccelerometer::open("/nonexistent/copter_accel")
            .err()
            .expect("should fail");
        assert!(matches!(err, HwError::Unavailable { .. }));
    }
}
