//! # trellis
//!
//! A component tree with explicit lifecycle hooks, and a client router that
//! keeps the mounted page in step with session history.
//!
//! Components render to typed [`markup`], are mounted into a slotmap-backed
//! [`dom`], and fire their `mounted` hooks children-first. The [`router`] maps
//! paths to pre-built page components, mounts one at a time inside its own
//! element, and follows back/forward through a [`History`](router::History).
//!
//! ## Core Systems
//!
//! - **[`component`]**: `View` trait, `Component` node, props, lifecycle hooks
//! - **[`dom`]**: document arena, HTML serialisation, id lookup
//! - **[`event`]**: DOM events and bubbling listener registry
//! - **[`router`]**: route table, history, run-to-completion navigation
//! - **[`widgets`]**: built-in Text, Button, Input
//! - **[`app`]**: headless application tying everything together
//! - **[`testing`]**: `Pilot` and snapshot helpers

extern crate self as trellis;

// Foundation
pub mod error;
pub mod markup;

// Document
pub mod dom;
pub mod event;

// Components
pub mod component;
pub mod widgets;

// Routing
pub mod router;

// Application
pub mod app;
pub mod testing;

#[doc(hidden)]
pub use serde_json;

pub use app::{App, AppConfig};
pub use component::{Component, ComponentId, IdGenerator, Props, Scope, View};
pub use error::{Error, Result};
pub use markup::{Element, Markup};
pub use router::{MemoryHistory, Navigator, Router, RouterConfig};

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use trellis_macros::markup;
