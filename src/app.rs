//! App struct: document, id generator, history and the root component.
//!
//! [`App`] ties together everything a component tree needs to run headless:
//! a [`Document`] with a host element, the [`IdGenerator`] every component of
//! the application draws from, and a [`MemoryHistory`] for routers.

use tracing::debug;

use crate::component::{Component, IdGenerator};
use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::router::{MemoryHistory, Router, RouterConfig};

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Optional document title.
    pub title: Option<String>,
    /// Id of the host element the root component mounts into.
    pub host_id: String,
    /// Base path routers created through [`App::router`] default to.
    pub base_path: String,
    /// URL the session history starts at.
    pub initial_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            host_id: "app".to_owned(),
            base_path: "/".to_owned(),
            initial_url: "/".to_owned(),
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the host element id (builder).
    pub fn with_host_id(mut self, host_id: impl Into<String>) -> Self {
        self.host_id = host_id.into();
        self
    }

    /// Set the base path (builder).
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Set the initial URL (builder).
    pub fn with_initial_url(mut self, url: impl Into<String>) -> Self {
        self.initial_url = url.into();
        self
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The application: owns the document, the id generator, the session history
/// and the mounted root component.
pub struct App {
    document: Document,
    ids: IdGenerator,
    history: MemoryHistory,
    host: NodeId,
    root: Option<Component>,
    /// Application configuration.
    pub config: AppConfig,
}

impl App {
    /// Create an app with an empty host element.
    pub fn new(config: AppConfig) -> Self {
        let document = Document::new();
        let host = document.create_host(&config.host_id);
        let history = MemoryHistory::new(config.initial_url.as_str());
        debug!(title = ?config.title, host = %config.host_id, url = %config.initial_url, "app created");
        Self {
            document,
            ids: IdGenerator::new(),
            history,
            host,
            root: None,
            config,
        }
    }

    /// Create an app with the default config.
    pub fn headless() -> Self {
        Self::new(AppConfig::default())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The generator to build this app's components with.
    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    pub fn history(&self) -> &MemoryHistory {
        &self.history
    }

    /// The host element.
    pub fn host(&self) -> NodeId {
        self.host
    }

    /// Build a router over this app's history. A router config that keeps the
    /// default base path inherits the app's.
    pub fn router(&self, config: RouterConfig) -> Result<Router> {
        let config = if config.base_path == "/" {
            config.with_base_path(self.config.base_path.clone())
        } else {
            config
        };
        Router::new(config, self.history.clone())
    }

    /// Mount `root` into the host element, unmounting the previous root first.
    pub fn mount(&mut self, mut root: Component) -> Result<()> {
        self.unmount()?;
        root.mount(&self.document, Some(self.host), None)?;
        self.root = Some(root);
        Ok(())
    }

    /// Unmount and hand back the root component.
    pub fn unmount(&mut self) -> Result<Option<Component>> {
        match self.root.take() {
            Some(mut root) => {
                root.unmount()?;
                Ok(Some(root))
            }
            None => Ok(None),
        }
    }

    pub fn root(&self) -> Option<&Component> {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> Option<&mut Component> {
        self.root.as_mut()
    }

    /// Deliver queued history events; one call is one event-loop turn.
    pub fn run_pending(&self) -> Result<usize> {
        self.history.dispatch_pending()
    }

    /// Serialised contents of the host element.
    pub fn html(&self) -> String {
        self.document.inner_html(self.host)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::headless()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
