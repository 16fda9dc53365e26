//! Bridges and the per-controller bridge registry.
//!
//! A [`Bridge`] observes the design once per completed, non-reset cycle. The
//! controller owns a [`BridgeRegistry`] and calls every attached bridge at the
//! sampling point of each cycle. Bridges are keyed by type: the harness looks a
//! bridge up once with [`BridgeRegistry::get`] and hands the resulting
//! [`BridgeHandle`] to whatever scenario needs it.

use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::SimError;
use crate::state::SignalState;

/// Shared handle to an attached bridge.
///
/// The simulation is single-threaded; callers must drop any borrow of the
/// handle before advancing the simulation.
pub type BridgeHandle<T> = Rc<RefCell<T>>;

/// A software-addressable observer of simulated hardware state.
pub trait Bridge {
    /// Human-readable bridge name for logs.
    fn name(&self) -> &str;

    /// Called exactly once per completed, non-reset cycle, after combinational
    /// logic has settled and before the clock edge.
    fn on_cycle(&mut self, cycle: u64, signals: &SignalState);
}

struct Slot {
    type_id: TypeId,
    type_name: &'static str,
    typed: Rc<dyn Any>,
    bridge: Rc<RefCell<dyn Bridge>>,
}

/// Table of attached bridges, at most one per bridge type.
#[derive(Default)]
pub struct BridgeRegistry {
    slots: Vec<Slot>,
}

impl BridgeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a bridge and returns a handle to it.
    pub fn attach<T: Bridge + 'static>(&mut self, bridge: T) -> Result<BridgeHandle<T>, SimError> {
        let type_id = TypeId::of::<T>();
        if self.slots.iter().any(|s| s.type_id == type_id) {
            return Err(SimError::DuplicateBridge {
                bridge: type_name::<T>(),
            });
        }
        let handle: BridgeHandle<T> = Rc::new(RefCell::new(bridge));
        let typed: Rc<dyn Any> = handle.clone();
        let dynamic: Rc<RefCell<dyn Bridge>> = handle.clone();
        tracing::debug!(bridge = type_name::<T>(), "attached bridge");
        self.slots.push(Slot {
            type_id,
            type_name: type_name::<T>(),
            typed,
            bridge: dynamic,
        });
        Ok(handle)
    }

    /// Retrieves the attached bridge of type `T`.
    pub fn get<T: Bridge + 'static>(&self) -> Result<BridgeHandle<T>, SimError> {
        let not_found = || SimError::BridgeNotFound {
            bridge: type_name::<T>(),
        };
        let slot = self
            .slots
            .iter()
            .find(|s| s.type_id == TypeId::of::<T>())
            .ok_or_else(not_found)?;
        slot.typed
            .clone()
            .downcast::<RefCell<T>>()
            .map_err(|_| not_found())
    }

    /// Number of attached bridges.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no bridge is attached.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Names of the attached bridges in attach order.
    pub fn names(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|s| match s.bridge.try_borrow() {
                Ok(bridge) => bridge.name().to_string(),
                Err(_) => s.type_name.to_string(),
            })
            .collect()
    }

    /// Delivers one cycle to every bridge.
    ///
    /// All bridges are borrowed before any is called, so a busy handle fails
    /// the whole dispatch and no bridge observes a partial cycle.
    pub(crate) fn dispatch(&self, cycle: u64, signals: &SignalState) -> Result<(), SimError> {
        let mut borrowed = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let bridge = slot
                .bridge
                .try_borrow_mut()
                .map_err(|_| SimError::BridgeBusy {
                    bridge: slot.type_name,
                })?;
            borrowed.push(bridge);
        }
        for bridge in &mut borrowed {
            bridge.on_cycle(cycle, signals);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_catalog::{Direction, SignalCatalog, SignalManifest};

    #[derive(Debug, Default)]
    struct Counter {
        cycles: Vec<u64>,
    }

    impl Bridge for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn on_cycle(&mut self, cycle: u64, _signals: &SignalState) {
            self.cycles.push(cycle);
        }
    }

    #[derive(Debug, Default)]
    struct Other;

    impl Bridge for Other {
        fn name(&self) -> &str {
            "other"
        }

        fn on_cycle(&mut self, _cycle: u64, _signals: &SignalState) {}
    }

    fn state() -> SignalState {
        let m = SignalManifest::new().with("Top", "a", 8, Direction::Input);
        SignalState::for_catalog(&SignalCatalog::from_manifest(&m).unwrap())
    }

    #[test]
    fn attach_and_get_same_instance() {
        let mut reg = BridgeRegistry::new();
        let handle = reg.attach(Counter::default()).unwrap();
        let again = reg.get::<Counter>().unwrap();
        assert!(Rc::ptr_eq(&handle, &again));
        assert_eq!(reg.names(), vec!["counter".to_string()]);
    }

    #[test]
    fn get_missing_type() {
        let mut reg = BridgeRegistry::new();
        reg.attach(Counter::default()).unwrap();
        let err = reg.get::<Other>().unwrap_err();
        assert!(matches!(err, SimError::BridgeNotFound { .. }));
    }

    #[test]
    fn duplicate_type_rejected() {
        let mut reg = BridgeRegistry::new();
        reg.attach(Counter::default()).unwrap();
        let err = reg.attach(Counter::default()).unwrap_err();
        assert!(matches!(err, SimError::DuplicateBridge { .. }));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn dispatch_reaches_every_bridge() {
        let mut reg = BridgeRegistry::new();
        let counter = reg.attach(Counter::default()).unwrap();
        reg.attach(Other).unwrap();
        let s = state();
        reg.dispatch(0, &s).unwrap();
        reg.dispatch(1, &s).unwrap();
        assert_eq!(counter.borrow().cycles, vec![0, 1]);
    }

    #[test]
    fn busy_handle_blocks_whole_dispatch() {
        let mut reg = BridgeRegistry::new();
        let counter = reg.attach(Counter::default()).unwrap();
        let other = reg.attach(Other).unwrap();
        let s = state();
        let guard = other.borrow_mut();
        let err = reg.dispatch(0, &s).unwrap_err();
        assert!(matches!(err, SimError::BridgeBusy { .. }));
        drop(guard);
        assert!(counter.borrow().cycles.is_empty());
    }
}
