//! Trigger line control
//!
//! The trigger is a single digital output watched by external
//! instrumentation (oscilloscope, glitch injector). A handler asserts it
//! immediately before its sensitive operation and deasserts it
//! immediately after; the asserted window must contain nothing but the
//! operation under test - no I/O, no allocation, nothing with variable
//! latency. The controller itself is a dumb single-bit output; the
//! discipline lives in the handlers.

use faultline_hal::OutputPin;

/// The external trigger line
#[derive(Debug)]
pub struct TriggerLine<P: OutputPin> {
    pin: P,
}

impl<P: OutputPin> TriggerLine<P> {
    /// Take ownership of the pin, driving it to the deasserted state
    pub fn new(mut pin: P) -> Self {
        pin.set_low();
        Self { pin }
    }

    /// Assert the trigger (start of the measurement window)
    pub fn assert(&mut self) {
        self.pin.set_high();
    }

    /// Deassert the trigger (end of the measurement window)
    pub fn deassert(&mut self) {
        self.pin.set_low();
    }

    /// Current trigger state
    pub fn is_asserted(&self) -> bool {
        self.pin.is_set_high()
    }

    /// Access the underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingPin;

    #[test]
    fn test_starts_deasserted() {
        let trigger = TriggerLine::new(RecordingPin::new());
        assert!(!trigger.is_asserted());
    }

    #[test]
    fn test_assert_deassert() {
        let mut trigger = TriggerLine::new(RecordingPin::new());
        trigger.assert();
        assert!(trigger.is_asserted());
        trigger.deassert();
        assert!(!trigger.is_asserted());
        assert_eq!(trigger.pin().rises, 1);
        assert_eq!(trigger.pin().falls, 1);
    }
}
