//! Router state: route table, match cache, navigation record and the
//! transitions between routes.
//!
//! The navigation record keeps one route index per history entry the router
//! has seen in this session, plus the position of the current entry. Entries
//! before the position form the navigation stack.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tracing::{debug, trace};

use super::history::{HistoryState, PopStateListener, SubscriptionId};
use super::navigator::Navigator;
use super::route::{join_base, strip_base, Route, RouterConfig};
use super::Shared;
use crate::component::{Component, ComponentId};
use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};

/// Mount sessions are numbered process-wide, so entries written by an earlier
/// mount or by another router never match the current session.
static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Lifecycle of a router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterState {
    /// Not in a document; navigation fails with `TargetMissing`.
    #[default]
    Unmounted,
    /// Resolving the initial location.
    Initializing,
    /// A route component has been mounted.
    Routed,
}

/// A queued navigation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Request {
    /// Programmatic navigation to a path.
    Push(String),
    /// History moved to an entry carrying this payload.
    Restore(Option<Value>),
}

/// Where route components are mounted.
#[derive(Debug, Clone)]
pub(crate) struct Host {
    pub(crate) document: Document,
    pub(crate) element: NodeId,
    pub(crate) router_id: ComponentId,
}

pub(crate) struct RouterCore {
    routes: Vec<Route>,
    fallback: String,
    base_path: String,
    cache: HashMap<String, usize>,
    current: Option<usize>,
    entries: Vec<usize>,
    position: usize,
    session: u64,
    host: Option<Host>,
    subscription: Option<SubscriptionId>,
}

impl RouterCore {
    pub(crate) fn new(config: RouterConfig) -> Self {
        Self {
            routes: config.routes,
            fallback: config.fallback,
            base_path: config.base_path,
            cache: HashMap::new(),
            current: None,
            entries: Vec::new(),
            position: 0,
            session: 0,
            host: None,
            subscription: None,
        }
    }

    // ── Matching ─────────────────────────────────────────────────────

    /// Resolve `path` to a route index.
    ///
    /// Cached paths answer without scanning. A miss retries once with the
    /// fallback path; if that misses too the error names both.
    pub(crate) fn match_path(&mut self, path: &str) -> Result<usize> {
        if let Some(&index) = self.cache.get(path) {
            trace!(path, "route cache hit");
            return Ok(index);
        }
        if let Some(index) = self.scan(path) {
            return Ok(index);
        }
        if path != self.fallback {
            let fallback = self.fallback.clone();
            let hit = match self.cache.get(&fallback) {
                Some(&index) => Some(index),
                None => self.scan(&fallback),
            };
            if let Some(index) = hit {
                debug!(path, fallback = %fallback, "no route matched, using fallback");
                return Ok(index);
            }
        }
        Err(Error::NoFallbackRoute {
            path: path.to_owned(),
            fallback: self.fallback.clone(),
        })
    }

    fn scan(&mut self, path: &str) -> Option<usize> {
        let index = self.routes.iter().position(|r| r.path == path)?;
        self.cache.insert(path.to_owned(), index);
        Some(index)
    }

    /// Path of the route `path` resolves to.
    pub(crate) fn resolve(&mut self, path: &str) -> Result<String> {
        let index = self.match_path(path)?;
        Ok(self.routes[index].path.clone())
    }

    pub(crate) fn is_cached(&self, path: &str) -> bool {
        self.cache.contains_key(path)
    }

    // ── Introspection ────────────────────────────────────────────────

    pub(crate) fn is_attached(&self) -> bool {
        self.host.is_some()
    }

    pub(crate) fn is_hosted_by(&self, id: &ComponentId) -> bool {
        self.host.as_ref().is_some_and(|host| host.router_id == *id)
    }

    pub(crate) fn navigation_stack(&self) -> Vec<String> {
        let end = self.position.min(self.entries.len());
        self.entries[..end]
            .iter()
            .map(|&i| self.routes[i].path.clone())
            .collect()
    }

    pub(crate) fn mounted_routes(&self) -> Vec<String> {
        self.routes
            .iter()
            .filter(|r| r.component.is_mounted())
            .map(|r| r.path.clone())
            .collect()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.routes.iter().map(|r| r.path.clone()).collect()
    }

    pub(crate) fn component(&self, path: &str) -> Option<&Component> {
        self.routes
            .iter()
            .find(|r| r.path == path)
            .map(|r| &r.component)
    }

    pub(crate) fn component_mut(&mut self, path: &str) -> Option<&mut Component> {
        self.routes
            .iter_mut()
            .find(|r| r.path == path)
            .map(|r| &mut r.component)
    }

    fn history_state(&self, index: usize) -> HistoryState {
        let route = &self.routes[index];
        HistoryState::new(route.path.as_str(), route.component.id().as_str())
            .with_position(self.position)
            .with_session(self.session)
    }


    // ── Navigation record ────────────────────────────────────────────

    /// Record a new entry after the current one, dropping forward entries.
    fn record_push(&mut self, index: usize) {
        if self.entries.is_empty() {
            self.entries.push(index);
            self.position = 0;
            return;
        }
        self.entries.truncate(self.position + 1);
        self.entries.push(index);
        self.position = self.entries.len() - 1;
    }

    /// Move to the entry at `position`.
    fn record_seek(&mut self, position: usize, index: usize) {
        if position < self.entries.len() {
            self.entries[position] = index;
            self.position = position;
        } else {
            self.entries.push(index);
            self.position = self.entries.len() - 1;
        }
    }

    /// Entries without a position: if the route is on top of the stack this
    /// was a step back, otherwise treat it as a step forward.
    fn record_unpositioned(&mut self, index: usize) {
        let top = self.position.checked_sub(1).and_then(|i| self.entries.get(i));
        if top == Some(&index) {
            self.position -= 1;
        } else {
            self.record_push(index);
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Resolve the current location, replace the initial history entry,
    /// subscribe to history events and mount the first route.
    pub(crate) fn initialize(
        &mut self,
        shared: &Rc<Shared>,
        host: Host,
        listener: PopStateListener,
    ) -> Result<()> {
        self.host = Some(host.clone());
        let location = shared.history.location();
        let path = strip_base(&self.base_path, &location);
        let index = self.match_path(&path)?;

        self.session = NEXT_SESSION.fetch_add(1, Ordering::Relaxed);
        self.entries = vec![index];
        self.position = 0;
        shared
            .history
            .replace_state(self.history_state(index).to_value());
        if self.subscription.is_none() {
            self.subscription = Some(shared.history.subscribe(listener));
        }
        debug!(
            location = %location,
            route = %self.routes[index].path,
            session = self.session,
            "router initialized"
        );
        self.activate(index, &host, shared)
    }

    pub(crate) fn apply(&mut self, request: Request, shared: &Rc<Shared>) -> Result<()> {
        match request {
            Request::Push(path) => self.push(&path, shared),
            Request::Restore(state) => self.restore(state.as_ref(), shared),
        }
    }

    fn push(&mut self, path: &str, shared: &Rc<Shared>) -> Result<()> {
        let host = self.host.clone().ok_or(Error::TargetMissing)?;
        let index = self.match_path(path)?;
        self.record_push(index);

        let url = join_base(&self.base_path, path);
        shared
            .history
            .push_state(self.history_state(index).to_value(), &url);
        debug!(path, url = %url, position = self.position, "navigation pushed");
        self.activate(index, &host, shared)
    }

    fn restore(&mut self, state: Option<&Value>, shared: &Rc<Shared>) -> Result<()> {
        let Some(host) = self.host.clone() else {
            debug!("history event while unmounted ignored");
            return Ok(());
        };
        let state = state.and_then(HistoryState::from_value);
        let path = match &state {
            Some(state) => state.path.clone(),
            None => self.fallback.clone(),
        };
        let index = self.match_path(&path)?;
        let position = state
            .filter(|s| s.session == Some(self.session))
            .and_then(|s| s.position);
        match position {
            Some(position) => self.record_seek(position, index),
            None => self.record_unpositioned(index),
        }
        debug!(path = %path, position = self.position, "history entry restored");
        self.activate(index, &host, shared)
    }

    /// Unmount the current route component, then mount `next` into the host.
    fn activate(&mut self, next: usize, host: &Host, shared: &Rc<Shared>) -> Result<()> {
        let unmounted = match self.current.take() {
            Some(previous) => {
                debug!(route = %self.routes[previous].path, "unmounting route");
                self.routes[previous].component.unmount()
            }
            None => Ok(()),
        };

        let path = self.routes[next].path.clone();
        *shared.location.borrow_mut() = Some(path.clone());
        let navigator = Navigator::new(shared);
        let mounted = self.routes[next].component.mount_into(
            &host.document,
            Some(host.element),
            Some(&navigator),
            Some(host.router_id.clone()),
        );

        match mounted {
            Ok(()) => {
                self.current = Some(next);
                shared.state.set(RouterState::Routed);
                debug!(route = %path, "route mounted");
                unmounted
            }
            Err(err) => {
                *shared.location.borrow_mut() = None;
                Err(err)
            }
        }
    }

    /// Unmount the current route component and detach from the document and
    /// the history port.
    pub(crate) fn teardown(&mut self, shared: &Shared) -> Result<()> {
        let result = match self.current.take() {
            Some(index) => self.routes[index].component.unmount(),
            None => Ok(()),
        };
        self.reset(shared);
        result
    }

    pub(crate) fn reset(&mut self, shared: &Shared) {
        if let Some(subscription) = self.subscription.take() {
            shared.history.unsubscribe(subscription);
        }
        self.host = None;
        self.current = None;
        self.entries.clear();
        self.position = 0;
        shared.pending.borrow_mut().clear();
        *shared.location.borrow_mut() = None;
        shared.state.set(RouterState::Unmounted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{IdGenerator, Scope, View};
    use crate::markup::{Element, Markup};
    use pretty_assertions::assert_eq;
    use std::any::Any;

    struct Page;

    impl View for Page {
        fn type_name(&self) -> &str {
            "Page"
        }
        fn render(&mut self, scope: &mut Scope) -> Result<Markup> {
            Ok(Element::new("section").id(scope.id()).into())
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn table(paths: &[&str], fallback: &str) -> RouterCore {
        let ids = IdGenerator::new();
        let config = paths
            .iter()
            .fold(RouterConfig::new(), |config, path| {
                config.route(*path, Component::new(&ids, Page))
            })
            .with_fallback(fallback);
        RouterCore::new(config)
    }

    // ── match_path ───────────────────────────────────────────────────

    #[test]
    fn exact_match() {
        let mut core = table(&["/", "/x"], "/");
        assert_eq!(core.match_path("/x"), Ok(1));
        assert_eq!(core.match_path("/"), Ok(0));
    }

    #[test]
    fn miss_uses_fallback() {
        let mut core = table(&["/", "/x"], "/");
        assert_eq!(core.match_path("/y"), Ok(0));
        // The fallback is memoised, the missed path is not.
        assert!(core.is_cached("/"));
        assert!(!core.is_cached("/y"));
    }

    #[test]
    fn hits_are_memoised() {
        let mut core = table(&["/", "/x"], "/");
        assert!(!core.is_cached("/x"));
        core.match_path("/x").unwrap();
        assert!(core.is_cached("/x"));
        assert_eq!(core.match_path("/x"), Ok(1));
    }

    #[test]
    fn missing_fallback_is_an_error() {
        let mut core = table(&["/a"], "/missing2");
        assert_eq!(
            core.match_path("/missing"),
            Err(Error::NoFallbackRoute {
                path: "/missing".into(),
                fallback: "/missing2".into()
            })
        );
    }

    #[test]
    fn fallback_path_itself_missing_does_not_recurse() {
        let mut core = table(&["/a"], "/gone");
        assert!(matches!(
            core.match_path("/gone"),
            Err(Error::NoFallbackRoute { .. })
        ));
    }

    #[test]
    fn first_route_wins_when_scanning() {
        let mut core = table(&["/a", "/b"], "/a");
        assert_eq!(core.match_path("/b"), Ok(1));
        assert_eq!(core.paths(), vec!["/a", "/b"]);
    }

    // ── navigation record ────────────────────────────────────────────

    #[test]
    fn push_grows_the_stack() {
        let mut core = table(&["/", "/a", "/b"], "/");
        core.record_push(0);
        assert!(core.navigation_stack().is_empty());
        core.record_push(1);
        core.record_push(2);
        assert_eq!(core.navigation_stack(), vec!["/", "/a"]);
    }

    #[test]
    fn seek_moves_without_forgetting_forward_entries() {
        let mut core = table(&["/", "/a", "/b"], "/");
        core.record_push(0);
        core.record_push(1);
        core.record_push(2);

        core.record_seek(1, 1);
        assert_eq!(core.navigation_stack(), vec!["/"]);
        core.record_seek(0, 0);
        assert!(core.navigation_stack().is_empty());
        core.record_seek(2, 2);
        assert_eq!(core.navigation_stack(), vec!["/", "/a"]);
    }

    #[test]
    fn push_after_seek_drops_forward_entries() {
        let mut core = table(&["/", "/a", "/b"], "/");
        core.record_push(0);
        core.record_push(1);
        core.record_seek(0, 0);
        core.record_push(2);
        assert_eq!(core.entries, vec![0, 2]);
        assert_eq!(core.navigation_stack(), vec!["/"]);
    }

    #[test]
    fn unpositioned_entry_on_top_of_stack_pops() {
        let mut core = table(&["/", "/a"], "/");
        core.record_push(0);
        core.record_push(1);
        core.record_unpositioned(0);
        assert!(core.navigation_stack().is_empty());
    }

    #[test]
    fn unpositioned_entry_elsewhere_pushes() {
        let mut core = table(&["/", "/a", "/b"], "/");
        core.record_push(0);
        core.record_push(1);
        core.record_unpositioned(2);
        assert_eq!(core.navigation_stack(), vec!["/", "/a"]);
    }

    #[test]
    fn history_state_carries_position() {
        let mut core = table(&["/", "/a"], "/");
        core.record_push(0);
        core.record_push(1);
        core.session = 5;
        let state = core.history_state(1);
        assert_eq!(state.path, "/a");
        assert_eq!(state.component_id, "uid-2");
        assert_eq!(state.position, Some(1));
        assert_eq!(state.session, Some(5));
    }
}
