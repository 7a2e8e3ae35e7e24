//! Emitted-module syntax tree nodes.
//!
//! This is the shape of compiled output handed over by the host compiler:
//! transpiled module code (`import`/`export` declarations, dynamic `import()`
//! calls, AMD-style `define` registrations) and companion declaration text
//! (type-position `import("...")` references). The rewriter only interprets
//! the module-reference forms; everything else is carried opaquely.
//!
//! All children are arena indices, not boxes, so `NodeKind` stays `Copy`
//! (the rewrite pass copies a kind out of the arena before allocating
//! replacements, same trick as any flat-AST transform).

use crate::{Name, NodeId, NodeRange, Span, Spanned};

/// Quote character of a string literal in the emitted text.
///
/// Preserved so a rewritten path literal is emitted with the same quoting
/// as the literal it replaces.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum QuoteKind {
    #[default]
    Double,
    Single,
}

/// Syntax tree node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }
}

impl Spanned for Node {
    fn span(&self) -> Span {
        self.span
    }
}

/// Node variants.
///
/// A closed enumeration: reference-site classification is an exhaustive
/// match over this enum, so adding a variant is a compile error until every
/// consumer handles it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    /// Identifier: `define`, `fsExtra`
    Ident(Name),

    /// String literal. `value` is the cooked text with the enclosing quote
    /// characters stripped; `quote` records which quotes enclosed it.
    String { value: Name, quote: QuoteKind },

    /// Numeric literal (f64 stored as bits for Hash)
    Number(u64),

    /// The `import` keyword in callee position of a dynamic import call
    ImportKeyword,

    /// Array literal: `[a, b, c]`
    Array(NodeRange),

    /// Call expression: `callee(args...)`
    Call { callee: NodeId, args: NodeRange },

    /// Function expression: `function (params) { body }`
    Function { params: NodeRange, body: NodeRange },

    /// Property access: `object.property`
    Member { object: NodeId, property: Name },

    /// Named import/export bindings: `{ a, b as c }`
    NamedBindings(NodeRange),

    /// Namespace import binding: `* as name`
    NamespaceBinding(Name),

    /// Static import declaration: `import clause from "specifier"`.
    /// `clause` is `None` for bare side-effect imports (`import "x"`).
    /// `specifier` is always a `String` node.
    ImportDecl {
        clause: Option<NodeId>,
        specifier: NodeId,
    },

    /// Export declaration. `specifier` is `Some` for re-exports
    /// (`export ... from "specifier"`) and `None` for local exports.
    /// `clause` is `None` for wildcard re-exports (`export * from "x"`).
    ExportDecl {
        clause: Option<NodeId>,
        specifier: Option<NodeId>,
    },

    /// Type-position import reference in declaration output:
    /// `import("argument").qualifier<type_args>`
    ImportType {
        argument: NodeId,
        qualifier: Option<Name>,
        type_args: NodeRange,
    },

    /// Expression statement
    ExprStmt(NodeId),

    /// Source file root: top-level statement list
    SourceFile(NodeRange),

    /// Any other emitted construct. Opaque to the pass, but its children
    /// are still traversed.
    Other(NodeRange),
}
