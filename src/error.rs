//! Crate error type.
//!
//! Every variant is a programmer or configuration error raised synchronously at
//! the call site. Nothing here is retried.

/// Errors raised by mounting, rendering and routing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `mount` was called without a host element, or with one that is not in
    /// the document.
    #[error("mount target element is missing")]
    TargetMissing,

    /// A rendered root does not carry the component id, or a rendered child was
    /// not embedded in its parent's markup.
    #[error(
        "component `{id}` broke the markup contract (found root id {found:?}): \
         its rendered root element must carry id=\"{id}\" and be embedded in its parent's markup"
    )]
    MarkupContractViolation { id: String, found: Option<String> },

    /// The component claims to be mounted but no element with its id exists.
    #[error(
        "no element with id \"{id}\" exists although the component is mounted; \
         its rendered root element must carry id=\"{id}\""
    )]
    ElementNotFound { id: String },

    /// Router constructed with an unusable route table.
    #[error("invalid router configuration: {0}")]
    InvalidConfig(String),

    /// Navigation requested with an empty or relative path.
    #[error("invalid navigation path {path:?}: paths must be non-empty and start with '/'")]
    InvalidPath { path: String },

    /// Neither the requested path nor the fallback resolves to a route.
    #[error("no route matches {path:?} and the fallback {fallback:?} is not a configured route")]
    NoFallbackRoute { path: String, fallback: String },

    /// `render_child` was called with a name that was never registered.
    #[error("component `{parent}` has no child named {name:?}")]
    UnknownChild { parent: String, name: String },
}

/// Crate result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
