//! Client router: maps URL paths to route components and keeps the mounted
//! route in step with a [`History`] port.
//!
//! A [`Router`] is a handle; [`Router::component`] produces the component
//! that hosts it in the tree. Once that component is mounted the router
//! resolves the current location, replaces the initial history entry and
//! mounts the matching route component inside its own element. From then on
//! every navigation (programmatic `push`, or back/forward reported by the
//! history port) goes through one queue and is applied run-to-completion:
//! the previous route component is unmounted before the next one is mounted,
//! so at most one route component is ever in the document.

pub mod engine;
pub mod history;
pub mod navigator;
pub mod route;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::component::{Component, IdGenerator, Scope, View};
use crate::error::{Error, Result};
use crate::markup::{Element, Markup};

use self::engine::{Host, Request, RouterCore};

pub use self::engine::RouterState;
pub use self::history::{
    History, HistoryState, MemoryHistory, PopStateEvent, PopStateListener, SubscriptionId,
};
pub use self::navigator::Navigator;
pub use self::route::{join_base, strip_base, Route, RouterConfig};

/// State shared between a router handle, its component's hooks, its
/// navigators and its history subscription.
pub(crate) struct Shared {
    pub(crate) core: RefCell<RouterCore>,
    pub(crate) pending: RefCell<VecDeque<Request>>,
    pub(crate) history: Rc<dyn History>,
    /// Path of the route being shown, readable during transitions.
    pub(crate) location: RefCell<Option<String>>,
    pub(crate) state: Cell<RouterState>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Handle to a router. Clones share the same router.
///
/// The introspection methods that look at the route table (`resolve`,
/// `navigation_stack`, `mounted_routes`, `route_component`, ...) must not be
/// called from a lifecycle hook of a route component while that component is
/// being mounted or unmounted; use the [`Navigator`] there instead.
#[derive(Clone)]
pub struct Router {
    pub(crate) shared: Rc<Shared>,
}

impl Router {
    /// Build a router over `history`.
    ///
    /// Fails with [`Error::InvalidConfig`] for an empty route table, a path
    /// not starting with `/`, or a duplicate path.
    pub fn new(config: RouterConfig, history: impl History + 'static) -> Result<Self> {
        config.validate()?;
        debug!(
            routes = config.routes.len(),
            fallback = %config.fallback,
            base_path = %config.base_path,
            "router created"
        );
        Ok(Self {
            shared: Rc::new(Shared {
                core: RefCell::new(RouterCore::new(config)),
                pending: RefCell::new(VecDeque::new()),
                history: Rc::new(history),
                location: RefCell::new(None),
                state: Cell::new(RouterState::Unmounted),
            }),
        })
    }

    /// The component that hosts this router. Renders an empty `<div>`; route
    /// components are mounted inside it.
    pub fn component(&self, ids: &IdGenerator) -> Component {
        Component::new(
            ids,
            RouterView {
                shared: Rc::clone(&self.shared),
            },
        )
    }

    /// Navigate to `path`, adding a history entry.
    ///
    /// Fails with [`Error::InvalidPath`] for an empty or relative path, with
    /// [`Error::TargetMissing`] when the router is not mounted (history is
    /// left untouched), and with [`Error::NoFallbackRoute`] when neither the
    /// path nor the fallback resolves. Called from inside a transition, the
    /// request is queued and applied once that transition completes.
    pub fn push(&self, path: &str) -> Result<()> {
        if !path.starts_with('/') {
            return Err(Error::InvalidPath {
                path: path.to_owned(),
            });
        }
        if let Ok(core) = self.shared.core.try_borrow() {
            if !core.is_attached() {
                return Err(Error::TargetMissing);
            }
        }
        self.shared
            .pending
            .borrow_mut()
            .push_back(Request::Push(path.to_owned()));
        drain(&self.shared)
    }

    /// Ask the history port to go back. The route swap happens when the port
    /// reports the move.
    pub fn back(&self) {
        self.shared.history.back();
    }

    /// Ask the history port to go forward.
    pub fn forward(&self) {
        self.shared.history.forward();
    }

    /// A navigation context for this router.
    pub fn navigator(&self) -> Navigator {
        Navigator::new(&self.shared)
    }

    pub fn state(&self) -> RouterState {
        self.shared.state.get()
    }

    /// Path of the mounted route.
    pub fn current_path(&self) -> Option<String> {
        self.shared.location.borrow().clone()
    }

    /// Path of the route `path` resolves to, applying the fallback.
    pub fn resolve(&self, path: &str) -> Result<String> {
        self.shared.core.borrow_mut().resolve(path)
    }

    /// Routes of the history entries before the current one, oldest first.
    pub fn navigation_stack(&self) -> Vec<String> {
        self.shared.core.borrow().navigation_stack()
    }

    /// Whether `path` has been resolved to a route before.
    pub fn is_cached(&self, path: &str) -> bool {
        self.shared.core.borrow().is_cached(path)
    }

    /// Paths of the route components currently mounted. At most one.
    pub fn mounted_routes(&self) -> Vec<String> {
        self.shared.core.borrow().mounted_routes()
    }

    /// Configured route paths in match order.
    pub fn paths(&self) -> Vec<String> {
        self.shared.core.borrow().paths()
    }

    /// Run `f` on the component of the route configured at `path`.
    pub fn route_component<R>(&self, path: &str, f: impl FnOnce(&Component) -> R) -> Option<R> {
        let core = self.shared.core.borrow();
        core.component(path).map(f)
    }

    /// Run `f` on the component of the route configured at `path`, mutably.
    pub fn route_component_mut<R>(
        &self,
        path: &str,
        f: impl FnOnce(&mut Component) -> R,
    ) -> Option<R> {
        let mut core = self.shared.core.borrow_mut();
        core.component_mut(path).map(f)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("state", &self.state())
            .field("current", &self.current_path())
            .field("pending", &self.shared.pending.borrow().len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Apply queued navigation until the queue is empty. If a transition is
/// already running further up the stack, leave the queue to it.
fn drain(shared: &Rc<Shared>) -> Result<()> {
    loop {
        let Ok(mut core) = shared.core.try_borrow_mut() else {
            trace!("transition in progress, navigation queued");
            return Ok(());
        };
        let next = shared.pending.borrow_mut().pop_front();
        let Some(request) = next else {
            return Ok(());
        };
        if let Err(err) = core.apply(request, shared) {
            shared.pending.borrow_mut().clear();
            return Err(err);
        }
    }
}

fn pop_state_listener(shared: &Rc<Shared>) -> PopStateListener {
    let weak = Rc::downgrade(shared);
    Rc::new(move |event: &PopStateEvent| {
        let Some(shared) = weak.upgrade() else {
            warn!("history event for a dropped router ignored");
            return Ok(());
        };
        shared
            .pending
            .borrow_mut()
            .push_back(Request::Restore(event.state.clone()));
        drain(&shared)
    })
}

/// Mounted hook of the router component.
fn initialize(shared: &Rc<Shared>, node: &Component) -> Result<()> {
    if shared.state.get() != RouterState::Unmounted {
        warn!(id = %node.id(), "router already mounted elsewhere; second mount ignored");
        return Ok(());
    }
    let (Some(document), Some(element)) = (node.document().cloned(), node.element()?) else {
        return Err(Error::TargetMissing);
    };
    let host = Host {
        document,
        element,
        router_id: node.id().clone(),
    };

    shared.state.set(RouterState::Initializing);
    {
        let Ok(mut core) = shared.core.try_borrow_mut() else {
            warn!(id = %node.id(), "router mounted during its own transition; ignored");
            shared.state.set(RouterState::Unmounted);
            return Ok(());
        };
        if let Err(err) = core.initialize(shared, host, pop_state_listener(shared)) {
            core.reset(shared);
            return Err(err);
        }
    }
    drain(shared)
}

/// Before-unmount hook of the router component.
fn teardown(shared: &Rc<Shared>, node: &Component) -> Result<()> {
    let Ok(mut core) = shared.core.try_borrow_mut() else {
        warn!(id = %node.id(), "router unmounted during its own transition; ignored");
        return Ok(());
    };
    if !core.is_hosted_by(node.id()) {
        return Ok(());
    }
    debug!(id = %node.id(), "router unmounting");
    core.teardown(shared)
}

// ---------------------------------------------------------------------------
// RouterView
// ---------------------------------------------------------------------------

/// View of the component returned by [`Router::component`].
pub struct RouterView {
    shared: Rc<Shared>,
}

impl RouterView {
    /// The router this view hosts.
    pub fn router(&self) -> Router {
        Router {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl View for RouterView {
    fn type_name(&self) -> &str {
        "Router"
    }

    fn render(&mut self, scope: &mut Scope) -> Result<Markup> {
        let shared = Rc::clone(&self.shared);
        scope.on_mounted(move |node| initialize(&shared, node));
        let shared = Rc::clone(&self.shared);
        scope.on_before_unmount(move |node| teardown(&shared, node));
        Ok(Element::new("div").id(scope.id()).class("router").into())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
