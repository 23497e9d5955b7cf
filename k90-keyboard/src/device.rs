//! One attached K90 primary interface: cached state plus its control channel

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use k90_transport::{
    Brightness, ControlTransport, MacroMode, Profile, SetBrightness, SetMacroMode,
    SetMacroRecordLed, SetProfile, StatusResponse, TransportExt,
};

use crate::error::KeyboardError;
use crate::state::{DeviceState, StateChange};
use crate::usage::{classify, Special, Usage};

/// Where the initial state came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateSource {
    /// Seeded from the status query
    Device,
    /// Status query failed; defaults in use
    Defaults,
}

/// Keyboard handle owning the transport and the state lock
///
/// Setters hold the lock across the control transfer, so a host command and
/// a device report touching the same field never interleave. State changes
/// only after the transfer succeeds.
pub struct K90Device<T: ControlTransport> {
    transport: T,
    state: Mutex<DeviceState>,
    source: StateSource,
}

impl<T: ControlTransport> K90Device<T> {
    /// Query the keyboard's status and build the device
    ///
    /// A failed or malformed status reply is not fatal: the device starts
    /// from defaults (brightness 0, profile 1) and a warning is logged.
    pub fn attach(transport: T) -> Self {
        let (state, source) = match transport.query::<StatusResponse>() {
            Ok(status) => {
                info!(
                    "K90 status: brightness={} profile={}",
                    status.brightness, status.profile
                );
                (DeviceState::from_status(&status), StateSource::Device)
            }
            Err(e) => {
                warn!("Failed to get K90 initial state (error {e})");
                (DeviceState::default(), StateSource::Defaults)
            }
        };

        Self {
            transport,
            state: Mutex::new(state),
            source,
        }
    }

    /// Copy of the current state
    pub fn state(&self) -> DeviceState {
        *self.state.lock()
    }

    pub fn state_source(&self) -> StateSource {
        self.source
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn set_brightness(&self, level: Brightness) -> Result<(), KeyboardError> {
        let mut state = self.state.lock();
        self.transport.send(&SetBrightness::new(level))?;
        state.set_brightness(level);
        debug!("brightness -> {level}");
        Ok(())
    }

    pub fn set_profile(&self, profile: Profile) -> Result<(), KeyboardError> {
        let mut state = self.state.lock();
        self.transport.send(&SetProfile::new(profile))?;
        state.set_profile(profile);
        debug!("profile -> {profile}");
        Ok(())
    }

    pub fn set_macro_mode(&self, mode: MacroMode) -> Result<(), KeyboardError> {
        let mut state = self.state.lock();
        self.transport.send(&SetMacroMode::new(mode))?;
        state.set_macro_mode(mode);
        debug!("macro mode -> {}", mode.token());
        Ok(())
    }

    /// Drive the MR LED and record the flag
    pub fn set_macro_record(&self, on: bool) -> Result<(), KeyboardError> {
        let mut state = self.state.lock();
        self.transport.send(&SetMacroRecordLed::new(on))?;
        state.set_macro_record(on);
        debug!("macro record -> {on}");
        Ok(())
    }

    /// Reconcile a device-pushed usage into state
    ///
    /// Never touches the transport.
    pub fn handle_usage(&self, usage: u16) -> Option<StateChange> {
        match classify(usage) {
            Usage::Special(special) => self.apply(special),
            Usage::GKey(_) | Usage::Unclassified => None,
        }
    }

    /// Apply an already-classified special usage
    pub fn apply(&self, special: Special) -> Option<StateChange> {
        let change = self.state.lock().apply(special);
        if let Some(change) = change {
            debug!("device report: {change:?}");
        }
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Barrier;
    use std::time::Duration;

    use k90_transport::scripted::{ControlCall, ScriptedTransport};
    use k90_transport::{TransportDeviceInfo, TransportError};

    /// Status reply: backlight off, profile M1
    const STATUS_OFF_M1: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

    /// Transport whose OUT requests park until the test lets them finish
    struct GatedTransport {
        info: TransportDeviceInfo,
        entered: Barrier,
        release: Barrier,
    }

    impl GatedTransport {
        fn new() -> Self {
            Self {
                info: TransportDeviceInfo::default(),
                entered: Barrier::new(2),
                release: Barrier::new(2),
            }
        }
    }

    impl ControlTransport for GatedTransport {
        fn control_out(&self, _request: u8, _value: u16) -> Result<(), TransportError> {
            self.entered.wait();
            self.release.wait();
            Ok(())
        }

        fn control_in(
            &self,
            _request: u8,
            _value: u16,
            _len: usize,
        ) -> Result<Vec<u8>, TransportError> {
            Ok(STATUS_OFF_M1.to_vec())
        }

        fn device_info(&self) -> &TransportDeviceInfo {
            &self.info
        }
    }

    fn attached(reply: [u8; 8]) -> K90Device<ScriptedTransport> {
        K90Device::attach(ScriptedTransport::with_status(reply))
    }

    #[test]
    fn test_attach_seeds_from_status() {
        let dev = attached([0, 0, 0, 0, 3, 0, 0, 2]);
        assert_eq!(dev.state_source(), StateSource::Device);
        assert_eq!(dev.state().brightness().level(), 3);
        assert_eq!(dev.state().current_profile().number(), 2);
        assert_eq!(
            dev.transport().calls(),
            vec![ControlCall::In {
                request: 4,
                value: 0,
                len: 8
            }]
        );
    }

    #[test]
    fn test_attach_degrades_on_failure() {
        let dev = K90Device::attach(ScriptedTransport::new());
        assert_eq!(dev.state_source(), StateSource::Defaults);
        assert_eq!(dev.state(), DeviceState::default());
    }

    #[test]
    fn test_attach_degrades_on_garbage() {
        let dev = attached([0, 0, 0, 0, 9, 0, 0, 1]);
        assert_eq!(dev.state_source(), StateSource::Defaults);
        assert_eq!(dev.state().brightness().level(), 0);

        // Valid brightness is dropped along with the bad profile
        let dev = attached([0, 0, 0, 0, 3, 0, 0, 7]);
        assert_eq!(dev.state_source(), StateSource::Defaults);
        assert_eq!(dev.state(), DeviceState::default());
    }

    #[test]
    fn test_setters_send_then_update() {
        let dev = attached(STATUS_OFF_M1);
        assert_eq!(dev.state_source(), StateSource::Device);
        dev.set_brightness(Brightness::new(2).unwrap()).unwrap();
        dev.set_macro_mode(MacroMode::Hardware).unwrap();
        dev.set_macro_record(true).unwrap();
        dev.set_profile(Profile::new(3).unwrap()).unwrap();

        assert_eq!(
            dev.transport().out_calls(),
            vec![(49, 2), (2, 0x0001), (2, 0x0020), (20, 3)]
        );
        let s = dev.state();
        assert_eq!(s.brightness().level(), 2);
        assert_eq!(s.macro_mode(), MacroMode::Hardware);
        assert!(s.macro_record());
        assert_eq!(s.current_profile().number(), 3);
    }

    #[test]
    fn test_failed_transfer_keeps_state() {
        let dev = attached([0, 0, 0, 0, 1, 0, 0, 1]);
        dev.transport().push_out_result(Err(TransportError::Stall));
        let err = dev.set_brightness(Brightness::new(3).unwrap()).unwrap_err();
        assert!(matches!(err, KeyboardError::Transport(TransportError::Stall)));
        assert_eq!(dev.state().brightness().level(), 1);
    }

    #[test]
    fn test_handle_usage_no_io() {
        let dev = attached(STATUS_OFF_M1);
        let before = dev.transport().calls().len();
        assert_eq!(dev.handle_usage(0xF6), Some(StateChange::MacroRecord(true)));
        assert_eq!(dev.handle_usage(0xD0), None);
        assert_eq!(dev.handle_usage(0x04), None);
        assert_eq!(dev.transport().calls().len(), before);
        assert!(dev.state().macro_record());
    }

    #[test]
    fn test_report_waits_for_inflight_write() {
        let dev = K90Device::attach(GatedTransport::new());
        assert_eq!(dev.state_source(), StateSource::Device);
        let report_applied = AtomicBool::new(false);

        std::thread::scope(|s| {
            let writer = s.spawn(|| dev.set_brightness(Brightness::new(3).unwrap()));

            // Writer is now inside the transfer
            dev.transport().entered.wait();
            assert!(dev.state.try_lock().is_none());

            let reporter = s.spawn(|| {
                let change = dev.handle_usage(0xFB);
                report_applied.store(true, Ordering::SeqCst);
                change
            });

            std::thread::sleep(Duration::from_millis(50));
            assert!(!report_applied.load(Ordering::SeqCst));

            dev.transport().release.wait();
            writer.join().unwrap().unwrap();
            assert_eq!(
                reporter.join().unwrap(),
                Some(StateChange::Brightness(Brightness::new(1).unwrap()))
            );
        });

        // Write then report, never interleaved
        assert_eq!(dev.state().brightness().level(), 1);
    }
}
