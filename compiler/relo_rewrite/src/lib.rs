//! Relo rewrite — emit-phase module path rewriting.
//!
//! This crate is the post-processing pass a host compiler runs over its
//! emitted trees: it finds every syntax node that references another module
//! by a path string, resolves the path through a layered policy, and swaps
//! in a structurally equivalent node carrying the new path. Everything else
//! in the tree — shape, order, bindings, spans — is left alone, so compiled
//! artifacts can be relocated into a different directory/package layout
//! without hand-editing imports.
//!
//! # Pipeline Position
//!
//! ```text
//! Host: Parse → Check → Emit code ──→ **after_code_emit** ──→ write .js
//!                     → Emit decls ─→ **after_declarations_emit** → write .d.ts
//! ```
//!
//! # Usage
//!
//! ```
//! use relo_ir::{ModuleArena, Node, NodeKind, Span, StringInterner};
//! use relo_rewrite::{PathRewriter, RewriteConfig};
//!
//! let policy = RewriteConfig {
//!     project_base_dir: Some("/proj".into()),
//!     project_namespace: Some("dummy-project".into()),
//!     alias_rules: Vec::new(),
//! }
//! .compile()?;
//! let rewriter = PathRewriter::new(policy);
//!
//! // Tree construction is the host's job; a bare side-effect import will do.
//! let interner = StringInterner::new();
//! let mut arena = ModuleArena::new();
//! let specifier = arena.alloc(Node::new(
//!     NodeKind::String {
//!         value: interner.intern("./util"),
//!         quote: relo_ir::QuoteKind::Double,
//!     },
//!     Span::DUMMY,
//! ));
//! let root = arena.alloc(Node::new(
//!     NodeKind::ImportDecl { clause: None, specifier },
//!     Span::DUMMY,
//! ));
//!
//! let result = rewriter.after_code_emit(&mut arena, &interner, root, "/proj/src/a.ts");
//! assert!(result.changed());
//! # Ok::<(), relo_rewrite::PolicyError>(())
//! ```
//!
//! The pass never raises user-facing errors: malformed nodes fail
//! classification and pass through; the only fallible step is compiling the
//! configuration (`RewriteConfig::compile`), once per run.

mod locate;
pub mod policy;
mod transform;

pub use locate::{ReferenceSite, SiteKind};
pub use policy::{
    AliasRule, PolicyError, RewriteConfig, RewriteFn, RewriteOutcome, RewritePolicy,
};
pub use transform::{FileRewrite, PathRewriter};
