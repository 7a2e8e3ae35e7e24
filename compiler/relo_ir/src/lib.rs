//! Relo IR - emitted-module syntax tree types.
//!
//! This crate contains the data structures shared between the host
//! compiler's emit stage and the path-rewriting pass:
//! - Spans for locations in emitted text
//! - Names for interned strings
//! - Tree nodes (`Node`, `NodeKind`) for transpiled module code and
//!   declaration output
//! - Arena allocation for nodes
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: strings → `Name(u32)`
//! - **Flatten Everything**: no `Box<Node>`, use `NodeId(u32)` indices
//! - **Append-only arenas**: rewrites allocate, never mutate, so unchanged
//!   subtrees are shared by id between input and output trees

mod arena;
pub mod ast;
mod name;
mod node_id;
mod span;

pub use arena::ModuleArena;
pub use ast::{Node, NodeKind, QuoteKind};
pub use name::{Name, StringInterner};
pub use node_id::{NodeId, NodeRange};
pub use span::{Span, Spanned};
