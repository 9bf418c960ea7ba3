//! Fixed-capacity sample window
//!
//! Sliding history of raw readings for smoothing and outlier highlighting.
//! Backed by `heapless::HistoryBuffer`, so there is no index arithmetic to
//! get wrong.

use heapless::HistoryBuffer;

/// Sliding window over the last `N` raw readings
#[derive(Clone)]
pub struct SampleWindow<const N: usize> {
    buffer: HistoryBuffer<i32, N>,
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleWindow<N> {
    /// Create an empty window
    pub const fn new() -> Self {
        Self {
            buffer: HistoryBuffer::new(),
        }
    }

    /// Create a full window with every slot set to `value`
    pub fn filled(value: i32) -> Self {
        Self {
            buffer: HistoryBuffer::new_with(value),
        }
    }

    /// Overwrite every slot with `value`
    pub fn fill(&mut self, value: i32) {
        *self = Self::filled(value);
    }

    /// Append a reading, evicting the oldest once full
    pub fn push(&mut self, value: i32) {
        self.buffer.write(value);
    }

    /// Number of readings held
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True if no reading has been pushed yet
    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// True once `N` readings are held
    pub fn is_full(&self) -> bool {
        self.buffer.len() == N
    }

    /// Window capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Sum of all held readings
    pub fn sum(&self) -> i64 {
        self.buffer.iter().map(|&v| i64::from(v)).sum()
    }

    /// Mean of the held readings, truncated toward zero
    ///
    /// Returns `None` for an empty window.
    pub fn average(&self) -> Option<i32> {
        let len = self.len() as i64;
        if len == 0 {
            return None;
        }
        Some((self.sum() / len) as i32)
    }

    /// Reading `n` places behind the most recent one (0 = most recent)
    pub fn nth_from_head(&self, n: usize) -> Option<i32> {
        let len = self.len();
        if n >= len {
            return None;
        }
        self.buffer.oldest_ordered().nth(len - 1 - n).copied()
    }

    /// Iterate readings from oldest to most recent
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = i32> + '_ {
        self.buffer.oldest_ordered().copied()
    }

    /// Check whether `sample` strays from `average` by more than
    /// `ratio_percent` of the average
    ///
    /// Squares both sides, so the sign of the average does not matter.
    pub fn deviates(sample: i32, average: i32, ratio_percent: u8) -> bool {
        let diff = f64::from(sample) - f64::from(average);
        let threshold = f64::from(average) * f64::from(ratio_percent) / 100.0;
        diff * diff > threshold * threshold
    }
}

/// Position of the probe sample, counted from the oldest reading
pub const PROBE_FROM_OLDEST: usize = 6;

/// Aggregate of one window update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WindowSummary {
    /// Sum of all held readings
    pub sum: i64,
    /// Truncated mean of the held readings
    pub average: i32,
    /// Probe reading, once the window holds enough samples
    pub probe: Option<i32>,
    /// Probe strays from the average by more than the configured ratio
    pub deviates: bool,
}

/// Sliding window that snapshots itself whenever its probe sample deviates
///
/// The snapshot keeps the readings around the last outlier visible after
/// the live window has moved on.
#[derive(Clone)]
pub struct DeviationMonitor<const N: usize> {
    window: SampleWindow<N>,
    ratio_percent: u8,
    snapshot: Option<SampleWindow<N>>,
}

impl<const N: usize> DeviationMonitor<N> {
    /// Create an empty monitor flagging deviations above `ratio_percent`
    pub const fn new(ratio_percent: u8) -> Self {
        Self {
            window: SampleWindow::new(),
            ratio_percent,
            snapshot: None,
        }
    }

    /// Fill the whole window with a first reading
    pub fn prime(&mut self, value: i32) {
        self.window.fill(value);
    }

    /// Push a reading and evaluate the probe against the new average
    pub fn push(&mut self, value: i32) -> WindowSummary {
        self.window.push(value);

        let sum = self.window.sum();
        let average = self.window.average().unwrap_or(value);
        let probe = self.window.iter_oldest_first().nth(PROBE_FROM_OLDEST);
        let deviates = probe
            .map(|p| SampleWindow::<N>::deviates(p, average, self.ratio_percent))
            .unwrap_or(false);

        if deviates {
            self.snapshot = Some(self.window.clone());
        }

        WindowSummary {
            sum,
            average,
            probe,
            deviates,
        }
    }

    /// Live window
    pub fn window(&self) -> &SampleWindow<N> {
        &self.window
    }

    /// Window as it was at the most recent deviation
    pub fn snapshot(&self) -> Option<&SampleWindow<N>> {
        self.snapshot.as_ref()
    }
}
