//! Host document: slotmap-backed element tree with id/class queries,
//! listeners and HTML serialisation.

pub mod document;
pub mod html;
pub mod node;
pub mod query;
pub mod tree;

pub use document::Document;
pub use node::{NodeData, NodeId, NodeKind};
pub use tree::Dom;
