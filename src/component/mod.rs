//! Component model: identity, props, lifecycle hooks and the component tree.

pub mod id;
pub mod lifecycle;
pub mod node;
pub mod props;

pub use id::{ComponentId, IdGenerator};
pub use lifecycle::{Hook, Hooks, LifecyclePhase};
pub use node::{Component, Scope, View};
pub use props::Props;
