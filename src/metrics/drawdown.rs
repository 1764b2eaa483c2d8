//! Peak-to-trough drawdown along simulated value paths.

/// Running peak and worst decline over a stream of portfolio values.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawdownTracker {
    peak: f64,
    worst: f64,
}

impl DrawdownTracker {
    /// Start tracking from a known starting value.
    pub fn starting_at(value: f64) -> Self {
        Self {
            peak: value,
            worst: 0.0,
        }
    }

    /// Record the next value and return its decline from the running peak
    /// as a fraction.
    pub fn observe(&mut self, value: f64) -> f64 {
        if value >= self.peak {
            self.peak = value;
            return 0.0;
        }
        let decline = if self.peak > 0.0 {
            (self.peak - value) / self.peak
        } else {
            0.0
        };
        self.worst = self.worst.max(decline);
        decline
    }

    /// Worst decline seen so far, in percent.
    #[inline]
    pub fn max_drawdown_pct(&self) -> f64 {
        self.worst * 100.0
    }
}

/// Maximum drawdown of a value path, in percent.
pub fn max_drawdown(path: &[f64]) -> f64 {
    let Some((&first, rest)) = path.split_first() else {
        return 0.0;
    };
    let tracker = rest
        .iter()
        .fold(DrawdownTracker::starting_at(first), |mut t, &v| {
            t.observe(v);
            t
        });
    tracker.max_drawdown_pct()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_reports_decline_from_peak() {
        let mut tracker = DrawdownTracker::starting_at(100.0);
        assert_eq!(tracker.observe(110.0), 0.0);
        assert!((tracker.observe(99.0) - 0.1).abs() < 1e-12);
        assert_eq!(tracker.observe(120.0), 0.0);
        assert!((tracker.observe(100.0) - 1.0 / 6.0).abs() < 1e-12);
        assert!((tracker.max_drawdown_pct() - 100.0 / 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_max_drawdown_of_path() {
        let path = vec![100.0, 120.0, 90.0, 110.0, 85.0];
        assert!((max_drawdown(&path) - 29.1667).abs() < 1e-3);
        assert_eq!(max_drawdown(&[]), 0.0);
        assert_eq!(max_drawdown(&[100.0, 101.0, 102.0]), 0.0);
    }

    #[test]
    fn test_path_to_zero_is_full_drawdown() {
        assert!((max_drawdown(&[100.0, 50.0, 0.0]) - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_wiped_out_start_has_no_drawdown() {
        assert_eq!(max_drawdown(&[0.0, 0.0, 0.0]), 0.0);
    }
}
