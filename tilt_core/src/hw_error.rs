//! Maps `Box<dyn Error>` from trait boundaries to typed `CoreError`.
//!
//! The traits in `tilt_traits` use `Box<dyn Error + Send + Sync>`; this module
//! converts those to our typed error enum, with an optional feature-gated path
//! for `tilt_hardware::HwError` downcasting.

use crate::error::CoreError;

/// Map a trait-boundary error to a typed `CoreError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> CoreError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<tilt_hardware::HwError>() {
            return match hw {
                tilt_hardware::HwError::ShortRead { got, expected } => CoreError::ShortRead {
                    got: *got,
                    expected: *expected,
                },
                tilt_hardware::HwError::Unavailable { path, .. } => {
                    CoreError::Unavailable(path.clone())
                }
                tilt_hardware::HwError::Io(io) => CoreError::Io(io.to_string()),
                other => CoreError::Hardware(other.to_string()),
            };
        }
    }

    if let Some(io) = e.downcast_ref::<std::io::Error>() {
        return CoreError::Io(io.to_string());
    }
    CoreError::Hardware(e.to_string())
}
