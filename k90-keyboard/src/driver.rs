//! Interface binding and input dispatch
//!
//! The K90 enumerates several interfaces. Only interface 0 carries device
//! state; the others are bound so their input still flows, but attribute
//! access on them fails with `NoState`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use k90_transport::{ControlTransport, PRIMARY_INTERFACE};

use crate::attributes::{self, Attribute};
use crate::device::K90Device;
use crate::error::KeyboardError;
use crate::keymap::KeyMap;
use crate::state::StateChange;
use crate::usage::{classify, GKey, Usage};

/// Identifies one bound interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceId {
    pub bus: u8,
    pub address: u8,
    pub interface: u8,
}

impl InterfaceId {
    pub fn new(bus: u8, address: u8, interface: u8) -> Self {
        Self {
            bus,
            address,
            interface,
        }
    }

    pub fn is_primary(&self) -> bool {
        self.interface == PRIMARY_INTERFACE
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}/{:03}:{}", self.bus, self.address, self.interface)
    }
}

/// A bound interface, with or without state
pub enum BoundInterface<T: ControlTransport> {
    Primary(K90Device<T>),
    Secondary,
}

/// What happened to one raw usage event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// Deliver as a key event
    GKey { gkey: GKey, code: u16, pressed: bool },
    /// Consumed; state was updated
    StateChanged(StateChange),
    /// Consumed; no visible effect
    Ignored,
    /// Not ours; generic handling applies
    PassThrough,
}

/// How the input layer should treat a usage when building its key table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMapping {
    /// Map to this key code
    Key(u16),
    /// Never generate an input event
    Ignore,
    /// Use the generic mapping
    Default,
}

/// All bound K90 interfaces plus the shared key map
pub struct Driver<T: ControlTransport> {
    keymap: Arc<KeyMap>,
    interfaces: HashMap<InterfaceId, BoundInterface<T>>,
}

impl<T: ControlTransport> Driver<T> {
    pub fn new(keymap: KeyMap) -> Self {
        Self {
            keymap: Arc::new(keymap),
            interfaces: HashMap::new(),
        }
    }

    pub fn keymap(&self) -> &Arc<KeyMap> {
        &self.keymap
    }

    /// Bind an interface
    ///
    /// Interface 0 becomes primary and queries the keyboard's status (see
    /// `K90Device::attach`). Any other interface is bound without state and
    /// the transport is dropped.
    pub fn attach(&mut self, id: InterfaceId, transport: T) -> Result<(), KeyboardError> {
        if self.interfaces.contains_key(&id) {
            return Err(KeyboardError::AlreadyAttached(id));
        }

        let bound = if id.is_primary() {
            BoundInterface::Primary(K90Device::attach(transport))
        } else {
            BoundInterface::Secondary
        };
        info!("Attached K90 interface {id}");
        self.interfaces.insert(id, bound);
        Ok(())
    }

    /// Unbind an interface, dropping its state
    pub fn detach(&mut self, id: InterfaceId) -> Result<(), KeyboardError> {
        self.interfaces
            .remove(&id)
            .map(|_| info!("Detached K90 interface {id}"))
            .ok_or(KeyboardError::NotAttached(id))
    }

    /// The stateful device behind an interface
    pub fn device(&self, id: InterfaceId) -> Result<&K90Device<T>, KeyboardError> {
        match self.interfaces.get(&id) {
            Some(BoundInterface::Primary(dev)) => Ok(dev),
            Some(BoundInterface::Secondary) => Err(KeyboardError::NoState(id)),
            None => Err(KeyboardError::NotAttached(id)),
        }
    }

    /// Bound interface ids, sorted
    pub fn interfaces(&self) -> Vec<InterfaceId> {
        let mut ids: Vec<_> = self.interfaces.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Input-mapping decision for a usage
    pub fn input_mapping(&self, usage: u16) -> InputMapping {
        match classify(usage) {
            Usage::GKey(gkey) => InputMapping::Key(self.keymap.map(gkey)),
            Usage::Special(_) => InputMapping::Ignore,
            Usage::Unclassified => InputMapping::Default,
        }
    }

    /// Key codes the input device must advertise, in usage order
    ///
    /// Runs every report usage through `input_mapping`; a code mapped from
    /// more than one usage is listed once.
    pub fn mapped_keys(&self) -> Vec<u16> {
        let mut keys = Vec::new();
        for usage in 0..=u16::from(u8::MAX) {
            if let InputMapping::Key(code) = self.input_mapping(usage) {
                if !keys.contains(&code) {
                    keys.push(code);
                }
            }
        }
        keys
    }

    /// Handle one usage from an input report
    ///
    /// G-keys translate through the key map regardless of interface. Special
    /// usages update state on the primary interface and are swallowed on
    /// secondary ones.
    pub fn raw_event(
        &self,
        id: InterfaceId,
        usage: u16,
        value: i32,
    ) -> Result<EventDisposition, KeyboardError> {
        let bound = self
            .interfaces
            .get(&id)
            .ok_or(KeyboardError::NotAttached(id))?;

        let disposition = match classify(usage) {
            Usage::GKey(gkey) => EventDisposition::GKey {
                gkey,
                code: self.keymap.map(gkey),
                pressed: value != 0,
            },
            Usage::Special(special) => match bound {
                BoundInterface::Primary(dev) => {
                    dev.apply(special)
                        .map_or(EventDisposition::Ignored, EventDisposition::StateChanged)
                }
                BoundInterface::Secondary => EventDisposition::Ignored,
            },
            Usage::Unclassified => EventDisposition::PassThrough,
        };

        debug!("{id} usage 0x{usage:02X}={value} -> {disposition:?}");
        Ok(disposition)
    }

    /// Read an attribute by name
    pub fn show(&self, id: InterfaceId, name: &str) -> Result<String, KeyboardError> {
        let attr: Attribute = name.parse()?;
        Ok(attributes::show(self.device(id)?, attr))
    }

    /// Write an attribute by name
    pub fn store(&self, id: InterfaceId, name: &str, input: &str) -> Result<usize, KeyboardError> {
        let attr: Attribute = name.parse()?;
        attributes::store(self.device(id)?, attr, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k90_transport::scripted::ScriptedTransport;

    const PRIMARY: InterfaceId = InterfaceId {
        bus: 1,
        address: 5,
        interface: 0,
    };
    const SECONDARY: InterfaceId = InterfaceId {
        bus: 1,
        address: 5,
        interface: 1,
    };

    fn driver() -> Driver<ScriptedTransport> {
        let mut d = Driver::new(KeyMap::default());
        d.attach(
            PRIMARY,
            ScriptedTransport::with_status([0, 0, 0, 0, 0, 0, 0, 1]),
        )
        .unwrap();
        d.attach(SECONDARY, ScriptedTransport::new()).unwrap();
        d
    }

    #[test]
    fn test_mapped_keys_follow_keymap() {
        let d = driver();
        assert_eq!(d.mapped_keys(), d.keymap().codes().to_vec());

        let mut codes = [30u16; 18];
        codes[17] = 31;
        let d: Driver<ScriptedTransport> = Driver::new(KeyMap::from_slice(&codes).unwrap());
        assert_eq!(d.mapped_keys(), vec![30, 31]);
    }

    #[test]
    fn test_fixture_seeded_from_device() {
        let d = driver();
        assert_eq!(
            d.device(PRIMARY).unwrap().state_source(),
            crate::device::StateSource::Device
        );
    }

    #[test]
    fn test_input_mapping() {
        let d = driver();
        assert_eq!(d.input_mapping(0xD0), InputMapping::Key(183));
        assert_eq!(d.input_mapping(0xE9), InputMapping::Key(0x105));
        assert_eq!(d.input_mapping(0xF6), InputMapping::Ignore);
        assert_eq!(d.input_mapping(0xFF), InputMapping::Ignore);
        assert_eq!(d.input_mapping(0x04), InputMapping::Default);
    }

    #[test]
    fn test_secondary_has_no_state() {
        let d = driver();
        assert!(matches!(
            d.show(SECONDARY, "brightness"),
            Err(KeyboardError::NoState(_))
        ));
        assert!(matches!(
            d.store(SECONDARY, "brightness", "1"),
            Err(KeyboardError::NoState(_))
        ));
    }

    #[test]
    fn test_secondary_swallows_specials() {
        let d = driver();
        assert_eq!(
            d.raw_event(SECONDARY, 0xF6, 1).unwrap(),
            EventDisposition::Ignored
        );
        assert!(!d.device(PRIMARY).unwrap().state().macro_record());
    }

    #[test]
    fn test_gkey_event() {
        let d = driver();
        let disp = d.raw_event(SECONDARY, 0xDF, 1).unwrap();
        assert_eq!(
            disp,
            EventDisposition::GKey {
                gkey: GKey::new(16).unwrap(),
                code: 0x100 + 3,
                pressed: true
            }
        );
    }

    #[test]
    fn test_special_updates_primary() {
        let d = driver();
        assert_eq!(
            d.raw_event(PRIMARY, 0xF2, 1).unwrap(),
            EventDisposition::StateChanged(StateChange::Profile(
                k90_transport::Profile::new(2).unwrap()
            ))
        );
        assert_eq!(d.show(PRIMARY, "current_profile").unwrap(), "2\n");
        assert_eq!(
            d.raw_event(PRIMARY, 0xF9, 1).unwrap(),
            EventDisposition::Ignored
        );
        assert_eq!(
            d.raw_event(PRIMARY, 0x04, 1).unwrap(),
            EventDisposition::PassThrough
        );
    }

    #[test]
    fn test_attach_detach() {
        let mut d = driver();
        assert!(matches!(
            d.attach(PRIMARY, ScriptedTransport::new()),
            Err(KeyboardError::AlreadyAttached(_))
        ));
        assert_eq!(d.interfaces(), vec![PRIMARY, SECONDARY]);

        d.detach(PRIMARY).unwrap();
        assert!(matches!(
            d.show(PRIMARY, "brightness"),
            Err(KeyboardError::NotAttached(_))
        ));
        assert!(matches!(
            d.raw_event(PRIMARY, 0xF6, 1),
            Err(KeyboardError::NotAttached(_))
        ));
        assert!(d.detach(PRIMARY).is_err());
    }

    #[test]
    fn test_unknown_attribute() {
        let d = driver();
        assert!(matches!(
            d.show(PRIMARY, "volume"),
            Err(KeyboardError::InvalidParameter(_))
        ));
    }
}
