//! Lifecycle hooks: the `on_mounted` / `on_before_unmount` slots.
//!
//! Each slot holds at most one callback. Registering again before the slot
//! fires replaces the earlier callback, and firing takes the callback out, so
//! a registration runs at most once.

use std::fmt;

use super::node::Component;
use crate::error::Result;

/// A lifecycle callback. Receives the component it was registered on.
pub type Hook = Box<dyn FnOnce(&mut Component) -> Result<()>>;

/// Which lifecycle slot a hook belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Mounted,
    BeforeUnmount,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecyclePhase::Mounted => f.write_str("mounted"),
            LifecyclePhase::BeforeUnmount => f.write_str("before-unmount"),
        }
    }
}

/// The two hook slots of a component.
#[derive(Default)]
pub struct Hooks {
    mounted: Option<Hook>,
    before_unmount: Option<Hook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `hook` in `phase`'s slot, replacing any pending one.
    pub fn register(&mut self, phase: LifecyclePhase, hook: Hook) {
        match phase {
            LifecyclePhase::Mounted => self.mounted = Some(hook),
            LifecyclePhase::BeforeUnmount => self.before_unmount = Some(hook),
        }
    }

    /// Take the pending hook for `phase`, leaving the slot empty.
    pub fn take(&mut self, phase: LifecyclePhase) -> Option<Hook> {
        match phase {
            LifecyclePhase::Mounted => self.mounted.take(),
            LifecyclePhase::BeforeUnmount => self.before_unmount.take(),
        }
    }

    pub fn is_pending(&self, phase: LifecyclePhase) -> bool {
        match phase {
            LifecyclePhase::Mounted => self.mounted.is_some(),
            LifecyclePhase::BeforeUnmount => self.before_unmount.is_some(),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("mounted", &self.mounted.is_some())
            .field("before_unmount", &self.before_unmount.is_some())
            .finish()
    }
}
