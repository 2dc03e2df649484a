//! Confined execution context.
//!
//! The implementation behind the isolation boundary only ever runs while a
//! `ConfinedScope` is alive on the calling thread. Scopes nest: entering a
//! scope remembers whatever was active before, and dropping it puts that
//! back, so re-entrant checks unwind to the right outer context on every
//! exit path, panics included.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

thread_local! {
    static ACTIVE: RefCell<Option<Arc<str>>> = const { RefCell::new(None) };
}

/// Name of the confined context active on this thread, if any.
pub fn current() -> Option<Arc<str>> {
    ACTIVE.with(|active| active.borrow().clone())
}

pub fn is_active() -> bool {
    ACTIVE.with(|active| active.borrow().is_some())
}

/// Guard that keeps a confined context active until dropped.
///
/// Bound to the thread that created it.
#[must_use = "the context is left as soon as the scope is dropped"]
pub struct ConfinedScope {
    previous: Option<Arc<str>>,
    _thread_bound: PhantomData<*const ()>,
}

impl ConfinedScope {
    pub fn enter(name: &Arc<str>) -> Self {
        let previous = ACTIVE.with(|active| active.replace(Some(Arc::clone(name))));
        Self {
            previous,
            _thread_bound: PhantomData,
        }
    }
}

impl Drop for ConfinedScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        ACTIVE.with(|active| {
            active.replace(previous);
        });
    }
}
