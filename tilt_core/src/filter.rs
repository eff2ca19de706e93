//! Fixed-capacity moving average over raw sensor samples.

use std::collections::VecDeque;

/// FIFO window of recent samples. Always holds exactly `capacity()` values;
/// it starts zero-filled and never shrinks below one sample.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: VecDeque<f64>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: std::iter::repeat_n(0.0, capacity.max(1)).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Evict the oldest sample, append `sample`, and return the new mean.
    pub fn update(&mut self, sample: f64) -> f64 {
        self.samples.pop_front();
        self.samples.push_back(sample);
        self.average()
    }

    pub fn average(&self) -> f64 {
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Grow by one. The new slot holds a zero sample at the oldest end.
    pub fn grow(&mut self) {
        self.samples.push_front(0.0);
    }

    /// Shrink by one, dropping the oldest sample. Returns false at capacity 1.
    pub fn shrink(&mut self) -> bool {
        if self.samples.len() <= 1 {
            return false;
        }
        self.samples.pop_front();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn averages_over_full_window() {
        let mut w = RollingWindow::new(3);
        for _ in 0..3 {
            w.update(10.0);
        }
        let avg = w.update(20.0);
        assert!((avg - 40.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn shrinking_to_one_tracks_latest_sample() {
        let mut w = RollingWindow::new(3);
        for s in [10.0, 10.0, 20.0] {
            w.update(s);
        }
        assert!(w.shrink());
        assert!(w.shrink());
        assert!(!w.shrink());
        assert_eq!(w.capacity(), 1);
        assert_eq!(w.update(5.0), 5.0);
    }

    #[test]
    fn starts_zero_filled() {
        let mut w = RollingWindow::new(4);
        assert_eq!(w.update(8.0), 2.0);
    }

    #[test]
    fn growth_inserts_zero_sample() {
        let mut w = RollingWindow::new(2);
        w.update(6.0);
        w.update(6.0);
        w.grow();
        assert_eq!(w.capacity(), 3);
        assert_eq!(w.average(), 4.0);
        // zero is oldest, evicted first
        assert_eq!(w.update(6.0), 6.0);
    }

    #[test]
    fn zero_capacity_is_floored() {
        assert_eq!(RollingWindow::new(0).capacity(), 1);
    }

    proptest! {
        #[test]
        fn mean_stays_within_sample_bounds(samples in proptest::collection::vec(-1000i32..1000, 1..64), cap in 1usize..16) {
            let mut w = RollingWindow::new(cap);
            for s in &samples {
                w.update(f64::from(*s));
            }
            let tail: Vec<f64> = std::iter::repeat_n(0.0, cap.saturating_sub(samples.len()))
                .chain(samples.iter().rev().take(cap).map(|s| f64::from(*s)))
                .collect();
            let lo = tail.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = tail.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(w.average() >= lo - 1e-9 && w.average() <= hi + 1e-9);
            prop_assert_eq!(w.capacity(), cap);
        }
    }
}
