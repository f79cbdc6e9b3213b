//! Startup configuration.
//!
//! Every timing and frequency parameter lives here so it can be tuned in one
//! place. Defaults match the reference hardware build: five counter LEDs, a
//! 2 s hold to spend a life and a 600/300 Hz buzzer.
//!
//! The number of counter LEDs (and therefore the maximum counter value) is not
//! part of this record; it is the `N` const generic of the controller.

use crate::button::ActiveLevel;
use crate::types::ConfigError;

/// Button sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// How long a raw level must stay unchanged before it is accepted (ms).
    pub debounce_ms: u32,

    /// Electrical level that means "pressed".
    pub active_level: ActiveLevel,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            active_level: ActiveLevel::Low,
        }
    }
}

/// Buzzer parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneConfig {
    /// Confirmation beep frequency and sweep upper bound (Hz).
    pub high_hz: u32,

    /// Error tone second step and sweep lower bound (Hz).
    pub low_hz: u32,

    /// Length of each confirmation beep (ms).
    pub beep_on_ms: u32,

    /// Silence after each confirmation beep (ms).
    pub beep_off_ms: u32,

    /// Number of beeps in a confirmation.
    pub confirmation_beeps: u8,

    /// Length of each of the two error tone steps (ms).
    pub error_step_ms: u32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            high_hz: 600,
            low_hz: 300,
            beep_on_ms: 100,
            beep_off_ms: 100,
            confirmation_beeps: 3,
            error_step_ms: 150,
        }
    }
}

/// LED animation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedConfig {
    /// Delay between LEDs lighting up during the reveal animation (ms).
    pub reveal_step_ms: u32,

    /// Fewest toggles in a flicker-wipe.
    pub flicker_min_toggles: u8,

    /// Most toggles in a flicker-wipe.
    pub flicker_max_toggles: u8,

    /// Shortest gap between flicker toggles (ms).
    pub flicker_min_ms: u32,

    /// Longest gap between flicker toggles (ms).
    pub flicker_max_ms: u32,

    /// On and off time of each error flash (ms).
    pub error_flash_ms: u32,

    /// Number of error flashes.
    pub error_flashes: u8,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            reveal_step_ms: 60,
            flicker_min_toggles: 3,
            flicker_max_toggles: 6,
            flicker_min_ms: 30,
            flicker_max_ms: 120,
            error_flash_ms: 150,
            error_flashes: 3,
        }
    }
}

/// Complete controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// Action-button hold that commits the setup value (ms).
    pub setup_hold_ms: u32,

    /// Action-button hold that spends a life (ms).
    pub action_hold_ms: u32,

    /// How long the bar stays visible after the device button is released (ms).
    pub display_timeout_ms: u32,

    pub button: ButtonConfig,
    pub tone: ToneConfig,
    pub led: LedConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            setup_hold_ms: 1000,
            action_hold_ms: 2000,
            display_timeout_ms: 2500,
            button: ButtonConfig::default(),
            tone: ToneConfig::default(),
            led: LedConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Checks the record for a bar of `led_count` LEDs.
    ///
    /// # Errors
    /// * `InvalidLedCount` - `led_count` is zero or exceeds 255
    /// * `ZeroHoldTime` - setup or action hold is zero
    /// * `InvalidFrequencyRange` - `low_hz >= high_hz`
    /// * `InvalidFlickerCount` - toggle range empty or inverted
    /// * `InvalidFlickerInterval` - interval range zero or inverted
    /// * `ZeroRevealStep` - reveal cadence is zero
    pub fn validate(&self, led_count: usize) -> Result<(), ConfigError> {
        if led_count == 0 || led_count > usize::from(u8::MAX) {
            return Err(ConfigError::InvalidLedCount);
        }

        if self.setup_hold_ms == 0 || self.action_hold_ms == 0 {
            return Err(ConfigError::ZeroHoldTime);
        }

        if self.tone.low_hz >= self.tone.high_hz {
            return Err(ConfigError::InvalidFrequencyRange);
        }

        let led = &self.led;
        if led.flicker_min_toggles == 0 || led.flicker_min_toggles > led.flicker_max_toggles {
            return Err(ConfigError::InvalidFlickerCount);
        }

        if led.flicker_min_ms == 0 || led.flicker_min_ms > led.flicker_max_ms {
            return Err(ConfigError::InvalidFlickerInterval);
        }

        if led.reveal_step_ms == 0 {
            return Err(ConfigError::ZeroRevealStep);
        }

        Ok(())
    }
}
