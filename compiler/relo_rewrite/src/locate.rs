//! Syntax reference locator.
//!
//! Classifies each node as one of the five module-reference forms or "not a
//! reference". Classification is a single exhaustive match over `NodeKind`:
//! adding a node kind is a compile error here until it is either recognized
//! or explicitly passed through. Malformed shapes (a re-export without a
//! specifier, a dynamic import with the wrong arity, a `define` call whose
//! arguments are not `[array, function]`) simply fail classification and
//! are traversed like any other node.

use relo_ir::{ModuleArena, Name, NodeId, NodeKind, NodeRange};

/// The five module-reference forms.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SiteKind {
    /// `import clause from "path"`
    StaticImport,
    /// `export clause from "path"` / `export * from "path"`
    StaticExportFrom,
    /// `import("path")`
    DynamicImportCall,
    /// `import("path").Qualifier` in declaration output
    TypeOnlyImportRef,
    /// One entry of `define(["path", ...], function () {})`
    RegistrationEntry,
}

/// One module-reference site: a single path string at a single syntax
/// location. Ephemeral — built while a node is being rewritten, consumed by
/// the resolution policy, never persisted.
#[derive(Copy, Clone, Debug)]
pub struct ReferenceSite<'a> {
    pub kind: SiteKind,
    /// Literal path text, enclosing quote characters stripped.
    pub raw_path: &'a str,
    /// Path of the file the tree was emitted from.
    pub origin_file: &'a str,
}

/// Shape of a node recognized as carrying module references. The field ids
/// are everything the rewriter needs to build a replacement node that
/// preserves all non-path content.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Reference {
    StaticImport {
        clause: Option<NodeId>,
        specifier: NodeId,
    },
    StaticExportFrom {
        clause: Option<NodeId>,
        specifier: NodeId,
    },
    DynamicImportCall {
        callee: NodeId,
        argument: NodeId,
    },
    TypeOnlyImportRef {
        argument: NodeId,
        qualifier: Option<Name>,
        type_args: NodeRange,
    },
    /// `define([paths...], factory)`; every string entry of `array` is an
    /// independent `RegistrationEntry` site.
    Registration {
        callee: NodeId,
        array: NodeId,
        factory: NodeId,
    },
}

/// Classify one node. `define` is the pre-interned registration callee name.
pub(crate) fn classify(arena: &ModuleArena, define: Name, id: NodeId) -> Option<Reference> {
    match *arena.kind(id) {
        NodeKind::ImportDecl { clause, specifier } if arena.string_literal(specifier).is_some() => {
            Some(Reference::StaticImport { clause, specifier })
        }

        NodeKind::ExportDecl {
            clause,
            specifier: Some(specifier),
        } if arena.string_literal(specifier).is_some() => {
            Some(Reference::StaticExportFrom { clause, specifier })
        }

        NodeKind::Call { callee, args } => classify_call(arena, define, callee, args),

        NodeKind::ImportType {
            argument,
            qualifier,
            type_args,
        } if arena.string_literal(argument).is_some() => Some(Reference::TypeOnlyImportRef {
            argument,
            qualifier,
            type_args,
        }),

        // A specifier-less import/export or a non-literal argument fails
        // the guards above and falls through here.
        NodeKind::ImportDecl { .. }
        | NodeKind::ExportDecl { .. }
        | NodeKind::ImportType { .. }
        | NodeKind::Ident(_)
        | NodeKind::String { .. }
        | NodeKind::Number(_)
        | NodeKind::ImportKeyword
        | NodeKind::Array(_)
        | NodeKind::Function { .. }
        | NodeKind::Member { .. }
        | NodeKind::NamedBindings(_)
        | NodeKind::NamespaceBinding(_)
        | NodeKind::ExprStmt(_)
        | NodeKind::SourceFile(_)
        | NodeKind::Other(_) => None,
    }
}

/// A call expression is a reference when it is a dynamic import with exactly
/// one string-literal argument, or a `define` registration with exactly two
/// arguments shaped `[array, function]`.
fn classify_call(
    arena: &ModuleArena,
    define: Name,
    callee: NodeId,
    args: NodeRange,
) -> Option<Reference> {
    match *arena.kind(callee) {
        NodeKind::ImportKeyword => {
            let &[argument] = arena.list(args) else {
                return None;
            };
            arena.string_literal(argument)?;
            Some(Reference::DynamicImportCall { callee, argument })
        }
        NodeKind::Ident(name) if name == define => {
            let &[array, factory] = arena.list(args) else {
                return None;
            };
            if !matches!(arena.kind(array), NodeKind::Array(_)) {
                return None;
            }
            if !matches!(arena.kind(factory), NodeKind::Function { .. }) {
                return None;
            }
            Some(Reference::Registration {
                callee,
                array,
                factory,
            })
        }
        _ => None,
    }
}

impl Reference {
    /// The site kind this node shape produces (registration nodes produce
    /// one `RegistrationEntry` site per string entry).
    pub(crate) fn site_kind(&self) -> SiteKind {
        match self {
            Reference::StaticImport { .. } => SiteKind::StaticImport,
            Reference::StaticExportFrom { .. } => SiteKind::StaticExportFrom,
            Reference::DynamicImportCall { .. } => SiteKind::DynamicImportCall,
            Reference::TypeOnlyImportRef { .. } => SiteKind::TypeOnlyImportRef,
            Reference::Registration { .. } => SiteKind::RegistrationEntry,
        }
    }
}
