//! Tree builder for utility-class strings like `hover:text-lg font-bold`.
//!
//! The grammar has no reject state: any input produces a tree, malformed input
//! just yields smaller or emptier nodes.

mod builder;
mod cursor;
mod node;

pub use builder::build;
pub use node::{Identifier, Node, NodeId, NodeKind, Tree, Variant};
pub use text_size::{TextRange, TextSize};
