//! Non-blocking buzzer sequences.
//!
//! Provides [`ToneSequencer`] which drives one buzzer through a confirmation
//! beep, an error tone or a continuously retuned sweep. Timed sequences are
//! advanced by [`ToneSequencer::update`]; nothing here ever waits.

use crate::config::ToneConfig;
use crate::time::TimeInstant;

/// Trait for abstracting a tone-capable output.
///
/// Implement this for your PWM or timer peripheral. Handle any hardware errors
/// internally - these methods cannot fail.
pub trait Buzzer {
    /// Starts (or retunes) a square wave at `frequency_hz`.
    fn tone(&mut self, frequency_hz: u32);

    /// Silences the output.
    fn no_tone(&mut self);
}

/// Which sequence the tone sequencer is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneState {
    /// Silent.
    Idle,
    /// Repeated high beeps separated by silence.
    ConfirmationBeep,
    /// High step, low step, then silence.
    ErrorTone,
    /// Frequency follows caller-supplied progress until stopped.
    Sweep,
}

/// Drives a buzzer through timed tone sequences.
///
/// Only one sequence plays at a time; starting one replaces whatever was
/// playing. The buzzer is written only when the output frequency changes.
pub struct ToneSequencer<Z: Buzzer, I: TimeInstant> {
    buzzer: Z,
    config: ToneConfig,
    state: ToneState,
    started: Option<I>,
    frequency: Option<u32>,
}

impl<Z: Buzzer, I: TimeInstant> ToneSequencer<Z, I> {
    /// Creates an idle sequencer with the buzzer silenced.
    pub fn new(mut buzzer: Z, config: ToneConfig) -> Self {
        buzzer.no_tone();

        Self {
            buzzer,
            config,
            state: ToneState::Idle,
            started: None,
            frequency: None,
        }
    }

    /// Starts the confirmation beep sequence.
    pub fn play_confirmation_beep(&mut self, now: I) {
        self.state = ToneState::ConfirmationBeep;
        self.started = Some(now);
        self.update(now);
    }

    /// Starts the two-step error tone.
    pub fn play_error_tone(&mut self, now: I) {
        self.state = ToneState::ErrorTone;
        self.started = Some(now);
        self.update(now);
    }

    /// Retunes the sweep to `low + progress * (high - low)`.
    ///
    /// `progress` is clamped to `0.0..=1.0`. The sweep keeps sounding until
    /// [`stop_tone`](Self::stop_tone) is called.
    pub fn play_sweep_tone(&mut self, progress: f32) {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let span = self.config.high_hz.saturating_sub(self.config.low_hz);
        let frequency = self.config.low_hz + (progress * span as f32) as u32;

        self.state = ToneState::Sweep;
        self.started = None;
        self.output(Some(frequency.min(self.config.high_hz)));
    }

    /// Cancels any sequence and silences the buzzer.
    pub fn stop_tone(&mut self) {
        self.state = ToneState::Idle;
        self.started = None;
        self.output(None);
    }

    /// Advances a timed sequence. Call once per tick.
    pub fn update(&mut self, now: I) {
        let Some(started) = self.started else {
            return;
        };
        let elapsed = now.millis_since(started);

        let next = match self.state {
            ToneState::Idle | ToneState::Sweep => return,
            ToneState::ConfirmationBeep => {
                let on = u64::from(self.config.beep_on_ms);
                let period = on + u64::from(self.config.beep_off_ms);
                if period == 0 || elapsed / period >= u64::from(self.config.confirmation_beeps) {
                    self.stop_tone();
                    return;
                }
                (elapsed % period < on).then_some(self.config.high_hz)
            }
            ToneState::ErrorTone => {
                let step = u64::from(self.config.error_step_ms);
                if elapsed < step {
                    Some(self.config.high_hz)
                } else if elapsed < step * 2 {
                    Some(self.config.low_hz)
                } else {
                    self.stop_tone();
                    return;
                }
            }
        };

        self.output(next);
    }

    fn output(&mut self, frequency: Option<u32>) {
        if frequency == self.frequency {
            return;
        }

        match frequency {
            Some(hz) => self.buzzer.tone(hz),
            None => self.buzzer.no_tone(),
        }
        self.frequency = frequency;
    }

    /// Returns the sequence currently playing.
    pub fn state(&self) -> ToneState {
        self.state
    }

    /// Returns true while any sequence is active.
    pub fn is_playing(&self) -> bool {
        self.state != ToneState::Idle
    }

    /// Returns the frequency being output, or `None` when silent.
    pub fn current_frequency(&self) -> Option<u32> {
        self.frequency
    }
}
