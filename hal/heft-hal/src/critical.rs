//! Scoped uninterruptible execution
//!
//! Bit-banged protocols with hard timing limits need a window in which
//! nothing else runs on the executing core. The window is always scoped:
//! it is released when the closure returns, whatever path it takes.

/// Critical section capability
///
/// Implementations disable preemption and interrupt servicing on the
/// current core for the duration of `f`, then restore the previous state.
/// Only suitable for short, bounded work (hundreds of microseconds).
pub trait CriticalSection {
    /// Run `f` with preemption and interrupts masked
    fn with<R>(&mut self, f: impl FnOnce() -> R) -> R;
}

/// Critical section backed by the global `critical-section` implementation
///
/// On RP2040 this is provided by `embassy-rp` (`critical-section-impl`),
/// which masks interrupts and takes the inter-core spinlock.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptFree;

impl CriticalSection for InterruptFree {
    fn with<R>(&mut self, f: impl FnOnce() -> R) -> R {
        critical_section::with(|_| f())
    }
}

impl<T: CriticalSection + ?Sized> CriticalSection for &mut T {
    fn with<R>(&mut self, f: impl FnOnce() -> R) -> R {
        (**self).with(f)
    }
}
