//! Navigation context handed to route components.

use std::fmt;
use std::rc::{Rc, Weak};

use tracing::warn;

use super::{Router, Shared};
use crate::error::{Error, Result};

/// Lets a mounted route component navigate through the router that mounted it.
///
/// Holds a weak reference, so a navigator kept past the router's lifetime does
/// not keep the router alive. Pushing through it then fails with
/// [`Error::TargetMissing`], the same as pushing to an unmounted router;
/// back and forward become logged no-ops.
#[derive(Clone)]
pub struct Navigator {
    shared: Weak<Shared>,
}

impl Navigator {
    pub(crate) fn new(shared: &Rc<Shared>) -> Self {
        Self {
            shared: Rc::downgrade(shared),
        }
    }

    fn router(&self) -> Option<Router> {
        let router = self.shared.upgrade().map(|shared| Router { shared });
        if router.is_none() {
            warn!("navigation through a dropped router ignored");
        }
        router
    }

    /// See [`Router::push`]. Requests made while a transition is running are
    /// applied once it completes.
    pub fn push(&self, path: &str) -> Result<()> {
        match self.router() {
            Some(router) => router.push(path),
            None => Err(Error::TargetMissing),
        }
    }

    /// See [`Router::back`].
    pub fn back(&self) {
        if let Some(router) = self.router() {
            router.back();
        }
    }

    /// See [`Router::forward`].
    pub fn forward(&self) {
        if let Some(router) = self.router() {
            router.forward();
        }
    }

    /// Path of the route being shown, once the router has routed.
    pub fn current_path(&self) -> Option<String> {
        let shared = self.shared.upgrade()?;
        let path = shared.location.borrow().clone();
        path
    }

    /// Whether the router is still alive.
    pub fn is_attached(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("attached", &self.is_attached())
            .finish()
    }
}
