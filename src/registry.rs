//! Deliver-or-defer hand-off of implementor tables.
//!
//! A documentation page and its implementor script load in no fixed order.
//! Whichever side arrives second completes the hand-off:
//!
//! - the script calls [`ImplementorRegistry::load`]: if a callback is already
//!   registered it receives the table immediately, otherwise the table waits in
//!   the pending slot;
//! - the page calls [`ImplementorRegistry::register`]: a waiting table is taken
//!   out of the pending slot and delivered right away.
//!
//! A table is delivered exactly once and is never modified on the way.

use crate::table::ImplementorTable;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Callback receiving a delivered implementor table.
pub type RegisterCallback = Box<dyn FnMut(ImplementorTable) + Send + 'static>;

/// Outcome of handing a table to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The callback received the table.
    Delivered,
    /// No callback yet; the table is waiting in the pending slot.
    Deferred,
}

#[derive(Default)]
struct Slots {
    callback: Option<RegisterCallback>,
    pending: Option<ImplementorTable>,
}

/// Callback slot plus pending slot for one page's implementor table.
///
/// The callback runs while the registry is locked, so it must not call back
/// into the same registry.
#[derive(Default)]
pub struct ImplementorRegistry {
    slots: Mutex<Slots>,
}

impl std::fmt::Debug for ImplementorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.lock();
        f.debug_struct("ImplementorRegistry")
            .field("has_callback", &slots.callback.is_some())
            .field("pending", &slots.pending.as_ref().map(ImplementorTable::len))
            .finish()
    }
}

impl ImplementorRegistry {
    /// Create a registry with both slots empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand a table over: deliver it if a callback is registered, else park it.
    ///
    /// A parked table replaces any table already waiting, so loading the same
    /// script twice never duplicates entries.
    pub fn load(&self, table: ImplementorTable) -> Delivery {
        let mut slots = self.lock();
        match slots.callback.as_mut() {
            Some(callback) => {
                tracing::debug!(records = table.len(), "Delivering implementors");
                callback(table);
                Delivery::Delivered
            }
            None => {
                tracing::debug!(records = table.len(), "Deferring implementors");
                slots.pending = Some(table);
                Delivery::Deferred
            }
        }
    }

    /// Install the callback, replacing any earlier one.
    ///
    /// A table waiting in the pending slot is delivered to the new callback
    /// before this returns; the return value reports whether that happened.
    /// The callback is installed even if it panics, and the table then stays
    /// pending.
    pub fn register<F>(&self, callback: F) -> Option<Delivery>
    where
        F: FnMut(ImplementorTable) + Send + 'static,
    {
        let mut guard = self.lock();
        let slots = &mut *guard;
        let callback = slots.callback.insert(Box::new(callback));

        // Cleared only once the callback has returned.
        let table = slots.pending.clone()?;
        tracing::debug!(records = table.len(), "Delivering pending implementors");
        callback(table);
        slots.pending = None;
        Some(Delivery::Delivered)
    }

    /// Remove the callback. Later loads are deferred again.
    pub fn unregister(&self) -> bool {
        self.lock().callback.take().is_some()
    }

    pub fn has_callback(&self) -> bool {
        self.lock().callback.is_some()
    }

    /// Copy of the table waiting in the pending slot.
    pub fn pending(&self) -> Option<ImplementorTable> {
        self.lock().pending.clone()
    }

    /// Take the waiting table out of the pending slot.
    pub fn take_pending(&self) -> Option<ImplementorTable> {
        self.lock().pending.take()
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        // Slots are only written after a callback returns, so a poisoned
        // lock still guards consistent state.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::implementor::ImplementorRecord;
    use assert2::{check, let_assert};
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;

    fn sample_table() -> ImplementorTable {
        let mut table = ImplementorTable::new();
        table.push("cbc", ImplementorRecord::new("impl IvSizeUser for Decryptor"));
        table.push("cbc", ImplementorRecord::new("impl IvSizeUser for Encryptor"));
        table.push(
            "cipher",
            ImplementorRecord::new("impl IvSizeUser for StreamCipherCoreWrapper"),
        );
        table
    }

    fn recording_callback(
        sink: &Arc<Mutex<Vec<ImplementorTable>>>,
    ) -> impl FnMut(ImplementorTable) + Send + 'static {
        let sink = Arc::clone(sink);
        move |table| sink.lock().unwrap().push(table)
    }

    #[test]
    fn test_load_delivers_to_registered_callback_once() {
        let registry = ImplementorRegistry::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        check!(registry.register(recording_callback(&received)).is_none());

        check!(registry.load(sample_table()) == Delivery::Delivered);

        let received = received.lock().unwrap();
        check!(received.len() == 1);
        check!(received[0] == sample_table());
        check!(registry.pending().is_none());
    }

    #[test]
    fn test_load_without_callback_defers_unchanged() {
        let registry = ImplementorRegistry::new();
        check!(registry.load(sample_table()) == Delivery::Deferred);

        let_assert!(Some(pending) = registry.pending());
        check!(pending == sample_table());
        check!(pending.crate_names().collect::<Vec<_>>() == vec!["cbc", "cipher"]);
        // Reading the slot does not consume it.
        check!(registry.pending().is_some());
    }

    #[test]
    fn test_register_flushes_pending_table() {
        let registry = ImplementorRegistry::new();
        registry.load(sample_table());

        let received = Arc::new(Mutex::new(Vec::new()));
        let_assert!(Some(Delivery::Delivered) = registry.register(recording_callback(&received)));

        check!(received.lock().unwrap().as_slice() == [sample_table()]);
        check!(registry.pending().is_none());
    }

    #[test]
    fn test_panicking_callback_keeps_table_pending() {
        let registry = ImplementorRegistry::new();
        registry.load(sample_table());

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            registry.register(|_| panic!("renderer failed"))
        }));
        check!(result.is_err());
        check!(registry.has_callback());
        check!(registry.pending() == Some(sample_table()));

        let received = Arc::new(Mutex::new(Vec::new()));
        let_assert!(Some(Delivery::Delivered) = registry.register(recording_callback(&received)));
        check!(received.lock().unwrap().as_slice() == [sample_table()]);
        check!(registry.pending().is_none());
    }

    #[test]
    fn test_reload_while_deferred_is_idempotent() {
        let registry = ImplementorRegistry::new();
        registry.load(sample_table());
        registry.load(sample_table());

        let_assert!(Some(pending) = registry.take_pending());
        check!(pending.len() == 3);
        check!(registry.take_pending().is_none());
    }

    #[test]
    fn test_reload_while_registered_delivers_each_time() {
        let registry = ImplementorRegistry::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        registry.register(recording_callback(&received));

        registry.load(sample_table());
        registry.load(sample_table());

        let received = received.lock().unwrap();
        check!(received.len() == 2);
        check!(received.iter().all(|table| *table == sample_table()));
    }

    #[test]
    fn test_unregister_returns_to_deferring() {
        let registry = ImplementorRegistry::new();
        registry.register(|_| {});
        check!(registry.has_callback());
        check!(registry.unregister());
        check!(!registry.has_callback());
        check!(registry.load(sample_table()) == Delivery::Deferred);
    }
}
