//! Time abstraction traits for platform-agnostic timing.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;
}

/// Trait abstraction for instant types.
///
/// Implementations backed by a free-running hardware counter must compute
/// `duration_since` with wrapping subtraction so that comparisons stay correct
/// across counter rollover.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Milliseconds elapsed since `earlier`.
    #[inline]
    fn millis_since(&self, earlier: Self) -> u64 {
        self.duration_since(earlier).as_millis()
    }

    /// Returns true once at least `millis` have passed since `earlier`.
    #[inline]
    fn has_elapsed(&self, earlier: Self, millis: u32) -> bool {
        self.millis_since(earlier) >= u64::from(millis)
    }
}

/// Millisecond duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u64);

impl TimeDuration for Millis {
    fn as_millis(&self) -> u64 {
        self.0
    }
}

/// Instant read from a free-running 32-bit millisecond counter.
///
/// The counter wraps after ~49.7 days; `duration_since` handles the wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MillisInstant(pub u32);

impl MillisInstant {
    /// Returns the raw counter value.
    pub fn as_millis(&self) -> u32 {
        self.0
    }

    /// Returns the instant `millis` later, wrapping like the hardware counter.
    pub fn wrapping_add(self, millis: u32) -> Self {
        MillisInstant(self.0.wrapping_add(millis))
    }
}

impl TimeInstant for MillisInstant {
    type Duration = Millis;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        Millis(u64::from(self.0.wrapping_sub(earlier.0)))
    }
}
