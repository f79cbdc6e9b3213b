#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`DeviceController`**: Owns the buttons and outputs and runs the Setup / Normal / Error state machine
//! - **`DebouncedButton`**: Debounced input with press, release and hold detection
//! - **`LedBar`**: Counter bar with reveal and flicker-wipe animations plus two indicator LEDs
//! - **`ToneSequencer`**: Confirmation beep, error tone and sweep on a buzzer
//! - **`ButtonInput`**, **`Led`**, **`Buzzer`**: Traits to implement for your hardware
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`RandomSource`**: Trait for the flicker timing generator (`XorShift32` provided)
//! - **`ControllerConfig`**: Timing, frequency and animation parameters
//!
//! Nothing in this crate blocks. Call [`DeviceController::tick`] from your main
//! loop as often as you like; every animation and tone sequence is advanced by
//! comparing the current time against stored progress.

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod button;
pub mod config;
pub mod controller;
pub mod led_bar;
pub mod random;
pub mod time;
pub mod tone;
pub mod types;

pub use button::{ActiveLevel, ButtonInput, DebouncedButton};
pub use config::{ButtonConfig, ControllerConfig, LedConfig, ToneConfig};
pub use controller::{DeviceController, DeviceIo, TickEvents};
pub use led_bar::{Led, LedBar};
pub use random::{RandomSource, XorShift32};
pub use time::{Millis, MillisInstant, TimeDuration, TimeInstant, TimeSource};
pub use tone::{Buzzer, ToneSequencer, ToneState};
pub use types::{ConfigError, ControllerEvent, DeviceState};
