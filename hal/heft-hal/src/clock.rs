//! Monotonic time source

/// Monotonic microsecond clock
///
/// Used only for deadline checks. The counter must never go backwards;
/// callers compare instants with wrapping subtraction so a counter that
/// wraps during a short wait still yields the right elapsed time.
pub trait Monotonic {
    /// Current time in microseconds since an arbitrary epoch
    fn now_micros(&self) -> u64;

    /// Microseconds elapsed since `start`
    fn elapsed_since(&self, start: u64) -> u64 {
        self.now_micros().wrapping_sub(start)
    }
}

impl<T: Monotonic + ?Sized> Monotonic for &T {
    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}
