//! Counter LED bar and indicator LEDs.
//!
//! Provides [`LedBar`], which shows remaining lives as a bar of `N` discrete
//! LEDs (`N - counter` lit, from index 0 upwards) and drives two indicator
//! LEDs. All animations are time-driven and advanced by [`LedBar::update`]:
//!
//! - **reveal**: LEDs light one at a time at a fixed cadence
//! - **flicker-wipe**: when the counter goes up, the LED going dark toggles a
//!   random number of times at random intervals before switching off
//! - **error flash**: the action-started indicator blinks a fixed number of times

use crate::config::LedConfig;
use crate::random::RandomSource;
use crate::time::TimeInstant;

/// Trait for abstracting a single on/off LED.
///
/// Implement this for your GPIO. Handle any hardware errors internally - this
/// method cannot fail.
pub trait Led {
    /// Turns the LED on or off.
    fn set(&mut self, on: bool);
}

/// In-flight flicker-wipe on one LED.
#[derive(Debug, Clone, Copy)]
struct FlickerAnimation<I> {
    target_led: usize,
    settle_counter: u8,
    remaining_toggles: u32,
    last_toggle: I,
    interval_ms: u32,
    level: bool,
}

/// In-flight reveal animation.
#[derive(Debug, Clone, Copy)]
struct RevealAnimation<I> {
    counter: u8,
    lit_target: usize,
    next_index: usize,
    last_step: I,
}

#[derive(Debug, Clone, Copy)]
enum BarAnimation<I> {
    Idle,
    Reveal(RevealAnimation<I>),
    Flicker(FlickerAnimation<I>),
}

/// Drives the counter bar and the two indicator LEDs.
///
/// Outputs are only written when their level changes.
///
/// # Type Parameters
/// * `L` - LED implementation type
/// * `R` - Random source used for flicker timing
/// * `I` - Time instant type
/// * `N` - Number of counter LEDs (the maximum counter value)
pub struct LedBar<L: Led, R: RandomSource, I: TimeInstant, const N: usize> {
    counter_leds: [L; N],
    levels: [bool; N],
    action_started: L,
    action_completed: L,
    started_on: bool,
    completed_on: bool,
    rng: R,
    config: LedConfig,
    shown: Option<u8>,
    requested: Option<u8>,
    animation: BarAnimation<I>,
    error_flash: Option<I>,
}

impl<L: Led, R: RandomSource, I: TimeInstant, const N: usize> LedBar<L, R, I, N> {
    /// Creates a bar with every LED switched off.
    pub fn new(
        mut counter_leds: [L; N],
        mut action_started: L,
        mut action_completed: L,
        rng: R,
        config: LedConfig,
    ) -> Self {
        for led in counter_leds.iter_mut() {
            led.set(false);
        }
        action_started.set(false);
        action_completed.set(false);

        Self {
            counter_leds,
            levels: [false; N],
            action_started,
            action_completed,
            started_on: false,
            completed_on: false,
            rng,
            config,
            shown: None,
            requested: None,
            animation: BarAnimation::Idle,
            error_flash: None,
        }
    }

    /// Number of LEDs lit for `counter`.
    #[inline]
    pub fn lit_for(counter: u8) -> usize {
        N.saturating_sub(usize::from(counter))
    }

    /// Turns the bar off and cancels any bar animation.
    ///
    /// The next counter drawn after this starts without a flicker.
    pub fn clear(&mut self) {
        self.animation = BarAnimation::Idle;
        self.shown = None;
        self.requested = None;
        self.draw(0);
    }

    /// Draws the setup preview for `setup_counter` immediately.
    pub fn show_setup(&mut self, setup_counter: u8) {
        self.animation = BarAnimation::Idle;
        self.shown = None;
        self.requested = None;
        self.draw(Self::lit_for(setup_counter));
    }

    /// Requests the bar to show `counter`.
    ///
    /// If the counter went up since the last drawn value, each LED going dark
    /// flicker-wipes in turn. While another animation is running the request is
    /// held until it finishes.
    pub fn show_counter(&mut self, counter: u8, now: I) {
        self.requested = Some(Self::clamp_counter(counter));
        self.apply(now);
    }

    /// Starts the reveal animation for `counter`.
    pub fn animate(&mut self, counter: u8, now: I) {
        let counter = Self::clamp_counter(counter);
        self.requested = Some(counter);
        self.draw(0);

        let lit_target = Self::lit_for(counter);
        if lit_target == 0 {
            self.animation = BarAnimation::Idle;
            self.shown = Some(counter);
            return;
        }

        self.write(0, true);
        self.animation = BarAnimation::Reveal(RevealAnimation {
            counter,
            lit_target,
            next_index: 1,
            last_step: now,
        });
    }

    /// Starts the error flash sequence on the action-started indicator.
    pub fn start_error_flash(&mut self, now: I) {
        self.error_flash = Some(now);
        self.update_error_flash(now);
    }

    /// Cancels the error flash and turns the action-started indicator off.
    pub fn stop_error_flash(&mut self) {
        self.error_flash = None;
        self.set_action_started(false);
    }

    /// Turns every output off. A running error flash keeps control of the
    /// action-started indicator until it finishes.
    pub fn turn_off_all(&mut self) {
        self.clear();
        self.set_action_completed(false);
        if self.error_flash.is_none() {
            self.set_action_started(false);
        }
    }

    /// Sets the action-started indicator.
    pub fn set_action_started(&mut self, on: bool) {
        if self.started_on != on {
            self.action_started.set(on);
            self.started_on = on;
        }
    }

    /// Sets the action-completed indicator.
    pub fn set_action_completed(&mut self, on: bool) {
        if self.completed_on != on {
            self.action_completed.set(on);
            self.completed_on = on;
        }
    }

    /// Advances all animations. Call once per tick.
    pub fn update(&mut self, now: I) {
        match self.animation {
            BarAnimation::Idle => {}
            BarAnimation::Reveal(reveal) => self.update_reveal(reveal, now),
            BarAnimation::Flicker(flicker) => self.update_flicker(flicker, now),
        }
        self.apply(now);
        self.update_error_flash(now);
    }

    fn update_reveal(&mut self, mut reveal: RevealAnimation<I>, now: I) {
        if reveal.next_index < reveal.lit_target {
            if !now.has_elapsed(reveal.last_step, self.config.reveal_step_ms) {
                return;
            }
            self.write(reveal.next_index, true);
            reveal.next_index += 1;
            reveal.last_step = now;
        }

        if reveal.next_index >= reveal.lit_target {
            self.animation = BarAnimation::Idle;
            self.shown = Some(reveal.counter);
        } else {
            self.animation = BarAnimation::Reveal(reveal);
        }
    }

    fn update_flicker(&mut self, mut flicker: FlickerAnimation<I>, now: I) {
        if !now.has_elapsed(flicker.last_toggle, flicker.interval_ms) {
            return;
        }

        if flicker.remaining_toggles == 0 {
            self.write(flicker.target_led, false);
            self.animation = BarAnimation::Idle;
            self.draw(Self::lit_for(flicker.settle_counter));
            self.shown = Some(flicker.settle_counter);
            return;
        }

        flicker.level = !flicker.level;
        self.write(flicker.target_led, flicker.level);
        flicker.remaining_toggles -= 1;
        flicker.last_toggle = now;
        flicker.interval_ms = self.next_flicker_interval();
        self.animation = BarAnimation::Flicker(flicker);
    }

    fn update_error_flash(&mut self, now: I) {
        let Some(started) = self.error_flash else {
            return;
        };

        let flash_ms = u64::from(self.config.error_flash_ms);
        let phase = if flash_ms == 0 {
            u64::MAX
        } else {
            now.millis_since(started) / flash_ms
        };

        if phase >= u64::from(self.config.error_flashes) * 2 {
            self.error_flash = None;
            self.set_action_started(false);
        } else {
            self.set_action_started(phase % 2 == 0);
        }
    }

    /// Brings the bar in line with the requested counter when idle.
    fn apply(&mut self, now: I) {
        if !matches!(self.animation, BarAnimation::Idle) {
            return;
        }
        let Some(requested) = self.requested else {
            return;
        };

        match self.shown {
            Some(shown) if requested > shown => {
                // shown < requested <= N, so the index is in range
                let target_led = N - usize::from(shown) - 1;
                let toggles = self.rng.range_inclusive(
                    u32::from(self.config.flicker_min_toggles),
                    u32::from(self.config.flicker_max_toggles),
                );
                let interval_ms = self.next_flicker_interval();
                trace!("flicker-wipe on LED {} ({} toggles)", target_led, toggles);

                self.animation = BarAnimation::Flicker(FlickerAnimation {
                    target_led,
                    settle_counter: shown + 1,
                    remaining_toggles: toggles,
                    last_toggle: now,
                    interval_ms,
                    level: self.is_lit(target_led),
                });
            }
            Some(shown) if requested == shown => {}
            _ => {
                self.draw(Self::lit_for(requested));
                self.shown = Some(requested);
            }
        }
    }

    fn next_flicker_interval(&mut self) -> u32 {
        self.rng
            .range_inclusive(self.config.flicker_min_ms, self.config.flicker_max_ms)
    }

    fn clamp_counter(counter: u8) -> u8 {
        // N <= 255 is checked by config validation
        counter.min(N as u8)
    }

    fn draw(&mut self, lit: usize) {
        for index in 0..N {
            self.write(index, index < lit);
        }
    }

    fn write(&mut self, index: usize, on: bool) {
        if let (Some(led), Some(level)) = (self.counter_leds.get_mut(index), self.levels.get_mut(index)) {
            if *level != on {
                led.set(on);
                *level = on;
            }
        }
    }

    /// Returns true if counter LED `index` is lit.
    pub fn is_lit(&self, index: usize) -> bool {
        self.levels.get(index).copied().unwrap_or(false)
    }

    /// Returns the number of lit counter LEDs.
    pub fn lit_count(&self) -> usize {
        self.levels.iter().filter(|on| **on).count()
    }

    /// Returns the counter value the bar last settled on.
    pub fn shown_counter(&self) -> Option<u8> {
        self.shown
    }

    /// Returns true while a reveal or flicker-wipe is running.
    pub fn is_animating(&self) -> bool {
        !matches!(self.animation, BarAnimation::Idle)
    }

    /// Returns true while the error flash is running.
    pub fn is_flashing(&self) -> bool {
        self.error_flash.is_some()
    }

    /// Returns the action-started indicator level.
    pub fn action_started(&self) -> bool {
        self.started_on
    }

    /// Returns the action-completed indicator level.
    pub fn action_completed(&self) -> bool {
        self.completed_on
    }
}
