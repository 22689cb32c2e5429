//! GPIO implementations for RP2040
//!
//! embassy-rp's `Output` maps directly onto the `faultline-hal` output
//! trait; the trigger line and LEDs are plain push-pull outputs.

use embassy_rp::gpio::Output;

use faultline_hal::{OutputPin, StatusLeds};

impl<'d> OutputPin for Output<'d> {
    fn set_high(&mut self) {
        Output::set_high(self);
    }

    fn set_low(&mut self) {
        Output::set_low(self);
    }

    fn toggle(&mut self) {
        Output::toggle(self);
    }

    fn is_set_high(&self) -> bool {
        Output::is_set_high(self)
    }
}

/// The board's indicator LED pair
pub struct Leds<'d> {
    ok: Output<'d>,
    error: Output<'d>,
}

impl<'d> Leds<'d> {
    /// Wrap the two LED outputs
    pub fn new(ok: Output<'d>, error: Output<'d>) -> Self {
        Self { ok, error }
    }
}

impl<'d> StatusLeds for Leds<'d> {
    fn set_ok(&mut self, on: bool) {
        self.ok.set_state(on);
    }

    fn set_error(&mut self, on: bool) {
        self.error.set_state(on);
    }
}
