//! Debounced push-button with edge and hold detection.
//!
//! [`DebouncedButton`] is sampled once per tick with [`DebouncedButton::sample`];
//! all queries afterwards read only the debounced level. The raw level has to
//! stay unchanged for the configured debounce window before it is committed.

use crate::config::ButtonConfig;
use crate::time::TimeInstant;

/// Trait for abstracting a digital input pin.
///
/// Implement this for your GPIO. Handle any hardware errors internally - this
/// method cannot fail.
pub trait ButtonInput {
    /// Returns true if the pin currently reads a logic high.
    fn is_high(&mut self) -> bool;
}

/// Electrical level that counts as "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Pulled up, switch to ground.
    #[default]
    Low,
    /// Pulled down, switch to supply.
    High,
}

/// A debounced button.
///
/// Edge queries (`was_just_pressed`, `was_just_released`, `was_held_for`) all
/// compare against one shared "last reported" level, so each edge is handed out
/// once. Calling an edge query twice in the same tick consumes the edge.
pub struct DebouncedButton<B: ButtonInput, I: TimeInstant> {
    input: B,
    config: ButtonConfig,
    raw_pressed: bool,
    stable_pressed: bool,
    last_raw_change: Option<I>,
    press_started: Option<I>,
    sampled_at: Option<I>,
    reported_pressed: bool,
    hold_reported: bool,
}

impl<B: ButtonInput, I: TimeInstant> DebouncedButton<B, I> {
    /// Creates a released button.
    pub fn new(input: B, config: ButtonConfig) -> Self {
        Self {
            input,
            config,
            raw_pressed: false,
            stable_pressed: false,
            last_raw_change: None,
            press_started: None,
            sampled_at: None,
            reported_pressed: false,
            hold_reported: false,
        }
    }

    /// Reads the pin and advances the debounce filter. Call once per tick.
    pub fn sample(&mut self, now: I) {
        let raw = self.input.is_high() == (self.config.active_level == ActiveLevel::High);

        if raw != self.raw_pressed {
            self.raw_pressed = raw;
            self.last_raw_change = Some(now);
        }

        let settled = self
            .last_raw_change
            .is_some_and(|changed| now.has_elapsed(changed, self.config.debounce_ms));

        if raw != self.stable_pressed && settled {
            self.stable_pressed = raw;
            if raw {
                self.press_started = Some(now);
            } else {
                self.press_started = None;
                self.hold_reported = false;
            }
        }

        self.sampled_at = Some(now);
    }

    /// Returns the debounced level.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.stable_pressed
    }

    /// Returns true on the first query after the button became pressed.
    pub fn was_just_pressed(&mut self) -> bool {
        let result = self.stable_pressed && !self.reported_pressed;
        self.reported_pressed = self.stable_pressed;
        result
    }

    /// Returns true on the first query after the button became released.
    pub fn was_just_released(&mut self) -> bool {
        let result = !self.stable_pressed && self.reported_pressed;
        self.reported_pressed = self.stable_pressed;
        result
    }

    /// Returns true once per continuous press, on the first query at which
    /// the press has lasted at least `millis`.
    pub fn was_held_for(&mut self, millis: u32) -> bool {
        self.reported_pressed = self.stable_pressed;

        if !self.stable_pressed {
            self.hold_reported = false;
            return false;
        }

        match (self.press_started, self.sampled_at) {
            (Some(started), Some(now)) if !self.hold_reported && now.has_elapsed(started, millis) => {
                self.hold_reported = true;
                true
            }
            _ => false,
        }
    }

    /// Milliseconds since the debounced press began, if pressed.
    pub fn pressed_for(&self) -> Option<u64> {
        match (self.press_started, self.sampled_at) {
            (Some(started), Some(now)) => Some(now.millis_since(started)),
            _ => None,
        }
    }
}
