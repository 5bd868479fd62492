//! Memoized derivations
//!
//! Caches the last result of a pure derivation, keyed by the identity of
//! the payload (`Arc` pointer) and the selection it was derived with.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

struct Slot<P, S, V> {
    payload: Weak<P>,
    selection: S,
    value: V,
}

/// Single-slot memo for `f(payload, selection)`
pub struct Memo<P, S, V> {
    slot: Mutex<Option<Slot<P, S, V>>>,
}

impl<P, S, V> Default for Memo<P, S, V> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<P, S: PartialEq + Clone, V: Clone> Memo<P, S, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `(payload, selection)`, computing it on a miss
    pub fn get_or_compute<F>(&self, payload: &Arc<P>, selection: S, compute: F) -> V
    where
        F: FnOnce(&P, &S) -> V,
    {
        let mut slot = self.slot.lock();

        if let Some(cached) = slot.as_ref() {
            // The Weak keeps the allocation alive, so a pointer match is the same payload.
            if Weak::as_ptr(&cached.payload) == Arc::as_ptr(payload) && cached.selection == selection {
                return cached.value.clone();
            }
        }

        let value = compute(payload, &selection);
        *slot = Some(Slot {
            payload: Arc::downgrade(payload),
            selection,
            value: value.clone(),
        });
        value
    }

    /// Whether a call with `(payload, selection)` would hit
    pub fn contains(&self, payload: &Arc<P>, selection: &S) -> bool {
        self.slot.lock().as_ref().map_or(false, |cached| {
            Weak::as_ptr(&cached.payload) == Arc::as_ptr(payload) && cached.selection == *selection
        })
    }

    pub fn clear(&self) {
        *self.slot.lock() = None;
    }
}
