//! Bounded harness for the intentionally non-terminating commands
//!
//! Blink and infinite-loop park the dispatch loop forever by design, so
//! they can never run on the test thread. This harness dispatches them
//! on a watchdog'd worker thread and asserts the engine is still inside
//! the handler after a generous grace period. The worker is left
//! running and dies with the test process - the firmware equivalent of
//! waiting for an external reset.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;

use faultline_core::mock::{CaptureTx, FlatMemory, MockLeds, RecordingPin, ScriptedRx};
use faultline_core::{default_registry, Engine};
use faultline_protocol::WireFormat;

/// Delay double that actually sleeps, so the parked handler does not
/// spin a core at 100%
struct SleepDelay;

impl DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(ns as u64));
    }
}

#[test]
fn blink_never_returns() {
    let returned = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&returned);

    thread::spawn(move || {
        let registry = default_registry(WireFormat::V2).unwrap();
        let mut engine = Engine::new(
            ScriptedRx::new(&[b'b', 0x00, 0]),
            CaptureTx::new(),
            WireFormat::V2,
            registry,
            RecordingPin::new(),
            MockLeds::new(),
            SleepDelay,
            FlatMemory::new(),
        );
        let _ = engine.poll();
        flag.store(true, Ordering::SeqCst);
    });

    thread::sleep(Duration::from_millis(200));
    assert!(
        !returned.load(Ordering::SeqCst),
        "blink handler returned; it must park the dispatch loop"
    );
}
