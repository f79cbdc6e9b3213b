//! Top-level device state machine.
//!
//! Provides [`DeviceController`], which owns both buttons, the LED bar and the
//! tone sequencer. Each [`DeviceController::tick`] reads the clock once,
//! samples both buttons once, advances the Setup / Normal / Error state
//! machine and then lets the outputs advance their own animations.

use crate::button::{ButtonInput, DebouncedButton};
use crate::config::ControllerConfig;
use crate::led_bar::{Led, LedBar};
use crate::random::RandomSource;
use crate::time::{TimeInstant, TimeSource};
use crate::tone::{Buzzer, ToneSequencer, ToneState};
use crate::types::{ConfigError, ControllerEvent, DeviceState};

/// Events produced by a single tick.
pub type TickEvents = heapless::Vec<ControllerEvent, 8>;

/// The physical parts handed to the controller.
///
/// # Type Parameters
/// * `B` - Button input type
/// * `L` - LED type for the counter bar and both indicators
/// * `Z` - Buzzer type
/// * `N` - Number of counter LEDs (the maximum counter value)
pub struct DeviceIo<B, L, Z, const N: usize> {
    pub device_button: B,
    pub action_button: B,
    pub counter_leds: [L; N],
    pub action_started_led: L,
    pub action_completed_led: L,
    pub buzzer: Z,
}

/// One hold-to-confirm attempt.
#[derive(Debug, Clone, Copy)]
struct ActionSession<I> {
    in_progress: bool,
    start_time: Option<I>,
    done_this_cycle: bool,
    pending_increment: bool,
}

impl<I> ActionSession<I> {
    const fn idle() -> Self {
        Self {
            in_progress: false,
            start_time: None,
            done_this_cycle: false,
            pending_increment: false,
        }
    }
}

/// Whether the bar is shown, and since when the device button is released.
#[derive(Debug, Clone, Copy)]
struct DisplayWindow<I> {
    visible: bool,
    released_at: Option<I>,
}

impl<I> DisplayWindow<I> {
    const fn hidden() -> Self {
        Self {
            visible: false,
            released_at: None,
        }
    }
}

/// Controls the lives counter device.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `B` - Button input type
/// * `L` - LED type
/// * `Z` - Buzzer type
/// * `R` - Random source for flicker timing
/// * `N` - Number of counter LEDs, which is also the maximum counter value
pub struct DeviceController<'t, I, T, B, L, Z, R, const N: usize>
where
    I: TimeInstant,
    T: TimeSource<I>,
    B: ButtonInput,
    L: Led,
    Z: Buzzer,
    R: RandomSource,
{
    time_source: &'t T,
    config: ControllerConfig,
    state: DeviceState,
    counter: u8,
    setup_counter: u8,
    device_button: DebouncedButton<B, I>,
    action_button: DebouncedButton<B, I>,
    leds: LedBar<L, R, I, N>,
    tone: ToneSequencer<Z, I>,
    session: ActionSession<I>,
    window: DisplayWindow<I>,
    events: TickEvents,
}

impl<'t, I, T, B, L, Z, R, const N: usize> DeviceController<'t, I, T, B, L, Z, R, N>
where
    I: TimeInstant,
    T: TimeSource<I>,
    B: ButtonInput,
    L: Led,
    Z: Buzzer,
    R: RandomSource,
{
    // Fits: validate() rejects N > 255.
    const MAX_COUNTER: u8 = N as u8;

    /// Creates a controller in `Setup` with all outputs off.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found in `config`.
    pub fn new(
        io: DeviceIo<B, L, Z, N>,
        rng: R,
        config: ControllerConfig,
        time_source: &'t T,
    ) -> Result<Self, ConfigError> {
        config.validate(N)?;

        Ok(Self {
            time_source,
            config,
            state: DeviceState::Setup,
            counter: 0,
            setup_counter: 0,
            device_button: DebouncedButton::new(io.device_button, config.button),
            action_button: DebouncedButton::new(io.action_button, config.button),
            leds: LedBar::new(
                io.counter_leds,
                io.action_started_led,
                io.action_completed_led,
                rng,
                config.led,
            ),
            tone: ToneSequencer::new(io.buzzer, config.tone),
            session: ActionSession::idle(),
            window: DisplayWindow::hidden(),
            events: TickEvents::new(),
        })
    }

    /// Draws the initial setup preview.
    pub fn begin(&mut self) {
        self.leds.show_setup(self.setup_counter);
        info!("Setup: LEDs turned off = {}", self.setup_counter);
    }

    /// Returns to `Setup` with a zero counter, as after a power cycle.
    pub fn reset(&mut self) {
        self.state = DeviceState::Setup;
        self.counter = 0;
        self.setup_counter = 0;
        self.session = ActionSession::idle();
        self.window = DisplayWindow::hidden();
        self.tone.stop_tone();
        self.leds.stop_error_flash();
        self.leds.turn_off_all();
        self.begin();
    }

    /// Runs one control cycle and returns what happened during it.
    pub fn tick(&mut self) -> TickEvents {
        let now = self.time_source.now();

        self.device_button.sample(now);
        self.action_button.sample(now);

        match self.state {
            DeviceState::Setup => self.tick_setup(now),
            DeviceState::Normal => self.tick_normal(now),
            DeviceState::Error => self.tick_error(now),
        }

        self.leds.update(now);
        self.tone.update(now);

        core::mem::take(&mut self.events)
    }

    fn tick_setup(&mut self, now: I) {
        if self.device_button.was_just_pressed() {
            self.setup_counter = if self.setup_counter + 1 >= Self::MAX_COUNTER {
                0
            } else {
                self.setup_counter + 1
            };
            self.leds.show_setup(self.setup_counter);
            info!("Setup: LEDs turned off = {}", self.setup_counter);
            self.emit(ControllerEvent::SetupAdjusted(self.setup_counter));
        }

        if self.action_button.was_held_for(self.config.setup_hold_ms) {
            self.counter = self.setup_counter;
            self.window.visible = true;
            self.window.released_at = Some(now);
            self.leds.show_counter(self.counter, now);
            self.tone.play_confirmation_beep(now);
            self.state = DeviceState::Normal;
            info!("Setup complete. Starting game...");
            self.emit(ControllerEvent::GameStarted(self.counter));
        }
    }

    fn tick_normal(&mut self, now: I) {
        let device_pressed = self.device_button.is_pressed();
        let device_just_pressed = self.device_button.was_just_pressed();

        if device_pressed {
            self.window.released_at = Some(now);

            if device_just_pressed {
                self.window.visible = true;
                self.leds.animate(self.counter, now);
            }

            if !self.session.done_this_cycle && self.action_button.was_just_pressed() {
                self.start_action(now);
            }
        } else {
            let expired = self
                .window
                .released_at
                .is_none_or(|released| now.has_elapsed(released, self.config.display_timeout_ms));
            if self.window.visible && expired {
                self.window.visible = false;
                self.leds.clear();
                debug!("Display timed out");
            }

            if self.session.in_progress {
                self.cancel_action();
            }
            self.session.done_this_cycle = false;
        }

        if self.session.in_progress {
            self.handle_action_in_progress(now);
        }

        if self.action_button.was_just_released() {
            self.leds.set_action_completed(false);
            if self.tone.state() == ToneState::Sweep {
                self.tone.stop_tone();
            }
            self.session.in_progress = false;

            if self.session.pending_increment && self.counter < Self::MAX_COUNTER {
                self.counter += 1;
                self.session.pending_increment = false;
                self.update_display(now);
                info!("Counter incremented to: {}", self.counter);
                self.emit(ControllerEvent::CounterIncremented(self.counter));
            }
        }

        if self.window.visible && !self.session.pending_increment {
            self.update_display(now);
        }

        if self.counter >= Self::MAX_COUNTER && !self.device_button.is_pressed() {
            self.enter_error();
        }
    }

    fn tick_error(&mut self, now: I) {
        self.leds.turn_off_all();
        if self.tone.state() != ToneState::ErrorTone {
            self.tone.stop_tone();
        }

        if self.device_button.was_just_pressed() {
            self.tone.play_error_tone(now);
            self.leds.start_error_flash(now);
            debug!("Error feedback");
            self.emit(ControllerEvent::ErrorFeedback);
        }
    }

    fn start_action(&mut self, now: I) {
        self.session.in_progress = true;
        self.session.start_time = Some(now);
        self.leds.set_action_started(true);
        debug!("Action started");
        self.emit(ControllerEvent::ActionStarted);
    }

    fn handle_action_in_progress(&mut self, now: I) {
        let held = self
            .session
            .start_time
            .map_or(0, |started| now.millis_since(started));
        let hold = u64::from(self.config.action_hold_ms);
        let progress = (held as f32 / hold as f32).min(1.0);
        self.tone.play_sweep_tone(progress);

        if !self.action_button.is_pressed() {
            self.cancel_action();
        }
        // A release on the tick the hold is reached still counts; the release
        // edge below applies the increment.
        if held >= hold && !self.session.done_this_cycle {
            self.complete_action(now);
        }
    }

    fn complete_action(&mut self, now: I) {
        self.session.done_this_cycle = true;
        self.session.pending_increment = true;
        self.session.in_progress = false;

        self.leds.set_action_started(false);
        self.leds.set_action_completed(true);
        self.tone.stop_tone();
        self.tone.play_confirmation_beep(now);
        info!("Action completed");
        self.emit(ControllerEvent::ActionCompleted);
    }

    fn cancel_action(&mut self) {
        self.session.in_progress = false;
        self.session.pending_increment = false;
        self.leds.set_action_started(false);
        self.leds.set_action_completed(false);
        self.tone.stop_tone();
        info!("Action cancelled");
        self.emit(ControllerEvent::ActionCancelled);
    }

    fn update_display(&mut self, now: I) {
        if self.window.visible {
            self.leds.show_counter(self.counter, now);
        } else {
            self.leds.clear();
        }
    }

    fn enter_error(&mut self) {
        self.state = DeviceState::Error;
        self.session = ActionSession::idle();
        self.window = DisplayWindow::hidden();
        self.leds.turn_off_all();
        self.tone.stop_tone();
        info!("Entering Error State!");
        self.emit(ControllerEvent::EnteredError);
    }

    fn emit(&mut self, event: ControllerEvent) {
        if self.events.push(event).is_err() {
            warn!("tick event buffer full, dropping event");
        }
    }

    /// Returns the current device state.
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Returns the number of lives spent.
    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Returns the setup preview value.
    pub fn setup_counter(&self) -> u8 {
        self.setup_counter
    }

    /// Returns the maximum counter value (the number of counter LEDs).
    pub fn max_counter(&self) -> u8 {
        Self::MAX_COUNTER
    }

    /// Returns true while the counter bar is shown.
    pub fn is_display_visible(&self) -> bool {
        self.window.visible
    }

    /// Returns true while a hold-to-confirm gesture is running.
    pub fn is_action_in_progress(&self) -> bool {
        self.session.in_progress
    }

    /// Returns true between gesture completion and action-button release.
    pub fn is_increment_pending(&self) -> bool {
        self.session.pending_increment
    }

    /// Returns the LED bar.
    pub fn leds(&self) -> &LedBar<L, R, I, N> {
        &self.leds
    }

    /// Returns the tone sequencer.
    pub fn tone(&self) -> &ToneSequencer<Z, I> {
        &self.tone
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}
