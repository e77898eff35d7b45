//! Route table configuration and base-path handling.

use std::collections::HashSet;
use std::fmt;

use crate::component::Component;
use crate::error::{Error, Result};

/// A path-to-component binding.
pub struct Route {
    pub(crate) path: String,
    pub(crate) component: Component,
}

impl Route {
    pub fn new(path: impl Into<String>, component: Component) -> Self {
        Self {
            path: path.into(),
            component,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn component(&self) -> &Component {
        &self.component
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("component", self.component.id())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// RouterConfig
// ---------------------------------------------------------------------------

/// Router configuration.
#[derive(Debug)]
pub struct RouterConfig {
    /// Routes in match order.
    pub routes: Vec<Route>,
    /// Path resolved when nothing else matches.
    pub fallback: String,
    /// Prefix joined onto every URL written to history.
    pub base_path: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            fallback: "/".to_owned(),
            base_path: "/".to_owned(),
        }
    }
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route (builder).
    pub fn route(mut self, path: impl Into<String>, component: Component) -> Self {
        self.routes.push(Route::new(path, component));
        self
    }

    /// Set the fallback path (builder).
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Set the base path (builder).
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Reject empty tables, relative paths and duplicate paths.
    ///
    /// The fallback is not checked here; a missing fallback surfaces as
    /// [`Error::NoFallbackRoute`] when a path fails to match.
    pub fn validate(&self) -> Result<()> {
        if self.routes.is_empty() {
            return Err(Error::InvalidConfig("at least one route is required".into()));
        }
        let mut seen = HashSet::new();
        for route in &self.routes {
            if !route.path.starts_with('/') {
                return Err(Error::InvalidConfig(format!(
                    "route path {:?} must start with '/'",
                    route.path
                )));
            }
            if !seen.insert(route.path.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate route path {:?}",
                    route.path
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Base path
// ---------------------------------------------------------------------------

/// Join `base` and an absolute route `path` into the URL written to history.
///
/// `"/"` contributes nothing, `""` drops the leading separator, and any other
/// base loses one trailing separator before concatenation.
pub fn join_base(base: &str, path: &str) -> String {
    match base {
        "/" => path.to_owned(),
        "" => path.strip_prefix('/').unwrap_or(path).to_owned(),
        base => {
            let base = base.strip_suffix('/').unwrap_or(base);
            format!("{base}{path}")
        }
    }
}

/// Recover a route path from a URL: drop query and fragment, then the base
/// prefix. URLs outside the base are returned unchanged.
pub fn strip_base(base: &str, url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let prefix = base.strip_suffix('/').unwrap_or(base);
    let rest = match path.strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() && (rest.is_empty() || rest.starts_with('/')) => rest,
        _ => path,
    };
    if rest.starts_with('/') {
        rest.to_owned()
    } else {
        format!("/{rest}")
    }
}
