//! Shared test infrastructure for lives-counter integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lives_counter::{
    Buzzer, ButtonInput, ControllerConfig, ControllerEvent, DeviceController, DeviceIo, Led,
    MillisInstant, TimeSource, XorShift32,
};

/// Tick period used by the helpers below.
pub const TICK_MS: u32 = 5;

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<MillisInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(millis: u32) -> Self {
        Self {
            current_time: Cell::new(MillisInstant(millis)),
        }
    }

    /// Advance time by the given number of milliseconds, wrapping like hardware
    pub fn advance(&self, millis: u32) {
        self.current_time
            .set(self.current_time.get().wrapping_add(millis));
    }
}

impl TimeSource<MillisInstant> for MockTimeSource {
    fn now(&self) -> MillisInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Hardware
// ============================================================================

/// Button whose electrical level is shared with the test.
/// `true` is high, which is "released" for the default active-low wiring.
pub struct MockButton {
    level: Rc<Cell<bool>>,
}

impl ButtonInput for MockButton {
    fn is_high(&mut self) -> bool {
        self.level.get()
    }
}

/// LED whose state is shared with the test.
pub struct MockLed {
    on: Rc<Cell<bool>>,
}

impl Led for MockLed {
    fn set(&mut self, on: bool) {
        self.on.set(on);
    }
}

/// Buzzer that records every frequency change.
pub struct MockBuzzer {
    frequency: Rc<Cell<Option<u32>>>,
    history: Rc<RefCell<Vec<Option<u32>>>>,
}

impl Buzzer for MockBuzzer {
    fn tone(&mut self, frequency_hz: u32) {
        self.frequency.set(Some(frequency_hz));
        self.history.borrow_mut().push(Some(frequency_hz));
    }

    fn no_tone(&mut self) {
        self.frequency.set(None);
        self.history.borrow_mut().push(None);
    }
}

/// Test-side view of the hardware handed to the controller.
pub struct Handles {
    pub device: Rc<Cell<bool>>,
    pub action: Rc<Cell<bool>>,
    pub counter_leds: [Rc<Cell<bool>>; 5],
    pub started: Rc<Cell<bool>>,
    pub completed: Rc<Cell<bool>>,
    pub frequency: Rc<Cell<Option<u32>>>,
    pub tone_history: Rc<RefCell<Vec<Option<u32>>>>,
}

impl Handles {
    pub fn lit_count(&self) -> usize {
        self.counter_leds.iter().filter(|led| led.get()).count()
    }

    pub fn bar(&self) -> [bool; 5] {
        std::array::from_fn(|i| self.counter_leds[i].get())
    }
}

pub type TestController<'t> = DeviceController<
    't,
    MillisInstant,
    MockTimeSource,
    MockButton,
    MockLed,
    MockBuzzer,
    XorShift32,
    5,
>;

/// Configuration used by the documented play-through: 2 s hold, 5 s display.
pub fn scenario_config() -> ControllerConfig {
    ControllerConfig {
        display_timeout_ms: 5000,
        ..ControllerConfig::default()
    }
}

pub fn build(timer: &MockTimeSource, config: ControllerConfig) -> (TestController<'_>, Handles) {
    let device = Rc::new(Cell::new(true));
    let action = Rc::new(Cell::new(true));
    let counter_leds: [Rc<Cell<bool>>; 5] = std::array::from_fn(|_| Rc::new(Cell::new(false)));
    let started = Rc::new(Cell::new(false));
    let completed = Rc::new(Cell::new(false));
    let frequency = Rc::new(Cell::new(None));
    let tone_history = Rc::new(RefCell::new(Vec::new()));

    let io = DeviceIo {
        device_button: MockButton {
            level: device.clone(),
        },
        action_button: MockButton {
            level: action.clone(),
        },
        counter_leds: std::array::from_fn(|i| MockLed {
            on: counter_leds[i].clone(),
        }),
        action_started_led: MockLed {
            on: started.clone(),
        },
        action_completed_led: MockLed {
            on: completed.clone(),
        },
        buzzer: MockBuzzer {
            frequency: frequency.clone(),
            history: tone_history.clone(),
        },
    };

    let mut controller = DeviceController::new(io, XorShift32::new(0xC0FFEE), config, timer)
        .expect("valid test configuration");
    controller.begin();

    let handles = Handles {
        device,
        action,
        counter_leds,
        started,
        completed,
        frequency,
        tone_history,
    };

    (controller, handles)
}

// ============================================================================
// Driving Helpers
// ============================================================================

pub fn press(button: &Rc<Cell<bool>>) {
    button.set(false);
}

pub fn release(button: &Rc<Cell<bool>>) {
    button.set(true);
}

/// Ticks the controller every `TICK_MS` for `millis` and collects the events.
pub fn run(controller: &mut TestController<'_>, timer: &MockTimeSource, millis: u32) -> Vec<ControllerEvent> {
    let mut events = Vec::new();
    for _ in 0..(millis / TICK_MS) {
        timer.advance(TICK_MS);
        events.extend(controller.tick());
    }
    events
}

/// Like [`run`], but calls `check` after every tick.
pub fn run_checked(
    controller: &mut TestController<'_>,
    timer: &MockTimeSource,
    millis: u32,
    mut check: impl FnMut(&TestController<'_>),
) -> Vec<ControllerEvent> {
    let mut events = Vec::new();
    for _ in 0..(millis / TICK_MS) {
        timer.advance(TICK_MS);
        events.extend(controller.tick());
        check(controller);
    }
    events
}

/// Presses and releases the device button, 100 ms each.
pub fn tap(controller: &mut TestController<'_>, timer: &MockTimeSource, button: &Rc<Cell<bool>>) -> Vec<ControllerEvent> {
    press(button);
    let mut events = run(controller, timer, 100);
    release(button);
    events.extend(run(controller, timer, 100));
    events
}

/// Taps the device button `taps` times and holds the action button to commit.
pub fn finish_setup(controller: &mut TestController<'_>, timer: &MockTimeSource, handles: &Handles, taps: u32) {
    for _ in 0..taps {
        tap(controller, timer, &handles.device);
    }
    press(&handles.action);
    run(controller, timer, 1100);
    release(&handles.action);
    run(controller, timer, 100);
}

/// With the device button already held, holds the action button for
/// `hold_ms` and releases it.
pub fn gesture(
    controller: &mut TestController<'_>,
    timer: &MockTimeSource,
    handles: &Handles,
    hold_ms: u32,
) -> Vec<ControllerEvent> {
    press(&handles.action);
    let mut events = run(controller, timer, hold_ms);
    release(&handles.action);
    events.extend(run(controller, timer, 100));
    events
}
