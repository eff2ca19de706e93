//! Input event records as delivered by a Linux evdev device.

/// Synchronization marker: one complete sample has been reported.
pub const EV_SYN: u16 = 0x00;
/// Absolute axis update.
pub const EV_ABS: u16 = 0x03;

pub const ABS_X: u16 = 0x00;
pub const ABS_Y: u16 = 0x01;
pub const ABS_Z: u16 = 0x02;

/// A decoded `{type, code, value}` triple. The kernel timestamp is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl InputEvent {
    #[inline]
    pub fn new(kind: u16, code: u16, value: i32) -> Self {
        Self { kind, code, value }
    }

    /// Absolute axis update for `code`.
    #[inline]
    pub fn abs(code: u16, value: i32) -> Self {
        Self::new(EV_ABS, code, value)
    }

    /// Sync marker closing a sample.
    #[inline]
    pub fn sync() -> Self {
        Self::new(EV_SYN, 0, 0)
    }

    #[inline]
    pub fn is_sync(&self) -> bool {
        self.kind == EV_SYN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_kind() {
        assert_eq!(InputEvent::abs(ABS_Y, -7).kind, EV_ABS);
        assert_eq!(InputEvent::abs(ABS_Y, -7).code, ABS_Y);
        assert!(InputEvent::sync().is_sync());
        assert!(!InputEvent::abs(ABS_X, 1).is_sync());
    }
}
