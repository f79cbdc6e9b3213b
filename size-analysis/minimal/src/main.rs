#![no_std]
#![no_main]

use cortex_m_rt::entry;
use lives_counter::{
    Buzzer, ButtonInput, ControllerConfig, DeviceController, DeviceIo, Led, MillisInstant,
    TimeSource, XorShift32,
};
use panic_halt as _;

// ============================================================================
// Minimal Hardware
// ============================================================================

/// Zero-size button, reads released (pulled up)
pub struct MinimalButton;

impl ButtonInput for MinimalButton {
    fn is_high(&mut self) -> bool {
        core::hint::black_box(true)
    }
}

/// Zero-size LED implementation for measuring library overhead
pub struct MinimalLed;

impl Led for MinimalLed {
    fn set(&mut self, on: bool) {
        core::hint::black_box(on);
    }
}

/// Zero-size buzzer
pub struct MinimalBuzzer;

impl Buzzer for MinimalBuzzer {
    fn tone(&mut self, frequency_hz: u32) {
        core::hint::black_box(frequency_hz);
    }

    fn no_tone(&mut self) {
        core::hint::black_box(());
    }
}

// ============================================================================
// Minimal TimeSource Implementation
// ============================================================================

pub struct MinimalTimeSource;

impl TimeSource<MillisInstant> for MinimalTimeSource {
    fn now(&self) -> MillisInstant {
        MillisInstant(core::hint::black_box(0))
    }
}

// This function uses the library to prevent optimizer from removing code
#[inline(never)]
fn run_controller() {
    let time_source = MinimalTimeSource;
    let io = DeviceIo {
        device_button: MinimalButton,
        action_button: MinimalButton,
        counter_leds: [MinimalLed, MinimalLed, MinimalLed, MinimalLed, MinimalLed],
        action_started_led: MinimalLed,
        action_completed_led: MinimalLed,
        buzzer: MinimalBuzzer,
    };

    let controller = DeviceController::<MillisInstant, _, _, _, _, _, 5>::new(
        io,
        XorShift32::new(0x1234_5678),
        ControllerConfig::default(),
        &time_source,
    );

    if let Ok(mut controller) = controller {
        controller.begin();
        for _ in 0..4 {
            let events = controller.tick();
            core::hint::black_box(events);
        }
        controller.reset();
        core::hint::black_box(controller);
    }
}

#[entry]
fn main() -> ! {
    // Call test function to ensure all code is included
    run_controller();

    // Halt - this is a size analysis binary, not meant to run
    loop {
        cortex_m::asm::nop();
    }
}
