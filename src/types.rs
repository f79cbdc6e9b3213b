//! Core types shared by the controller and its outputs.

/// Top-level state of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Choosing how many lives are already spent before play starts.
    #[default]
    Setup,

    /// Game in progress.
    Normal,

    /// All lives spent. Only error feedback is produced.
    Error,
}

/// Something observable that happened during a controller tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerEvent {
    /// Setup preview advanced to the given value.
    SetupAdjusted(u8),

    /// Setup committed; play starts with this counter.
    GameStarted(u8),

    /// Hold-to-confirm gesture began.
    ActionStarted,

    /// Gesture abandoned before completion.
    ActionCancelled,

    /// Gesture held for the full duration; increment is pending release.
    ActionCompleted,

    /// Counter advanced to the given value.
    CounterIncremented(u8),

    /// Lives exhausted.
    EnteredError,

    /// Error tone and flashes started in response to a device-button press.
    ErrorFeedback,
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The counter bar has no LEDs, or more than a `u8` counter can address.
    InvalidLedCount,

    /// A hold duration is zero.
    ZeroHoldTime,

    /// Low tone frequency is not below the high tone frequency.
    InvalidFrequencyRange,

    /// Flicker toggle count range is empty or inverted.
    InvalidFlickerCount,

    /// Flicker interval range is empty or inverted.
    InvalidFlickerInterval,

    /// Reveal animation cadence is zero.
    ZeroRevealStep,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidLedCount => {
                write!(f, "counter bar must have between 1 and 255 LEDs")
            }
            ConfigError::ZeroHoldTime => {
                write!(f, "hold durations must be non-zero")
            }
            ConfigError::InvalidFrequencyRange => {
                write!(f, "low tone frequency must be below high tone frequency")
            }
            ConfigError::InvalidFlickerCount => {
                write!(f, "flicker toggle range must be non-empty with min <= max")
            }
            ConfigError::InvalidFlickerInterval => {
                write!(f, "flicker interval range must be non-zero with min <= max")
            }
            ConfigError::ZeroRevealStep => {
                write!(f, "reveal animation step must be non-zero")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
