//! Transform driver.
//!
//! Walks one emitted file's tree top-down with a two-state contract per
//! node: *Visited-Rewritten* — the node was a module-reference site and its
//! path resolved to something new, so a replacement node comes back and
//! descent stops (a reference's path literal is terminal, nothing nested
//! inside can be a reference); *Visited-Unchanged* — recurse into children,
//! rebuilding the parent only when some child came back with a new id.
//!
//! The walk allocates into the same append-only arena, so every subtree the
//! pass does not touch is shared by id between the input and output trees.
//! One `Rewriter` lives for exactly one file; nothing is cached across
//! files.

mod rewrite;

use relo_ir::{ModuleArena, Name, Node, NodeId, NodeKind, NodeRange, StringInterner};
use tracing::{debug, trace};

use crate::locate;
use crate::policy::RewritePolicy;

/// Callee name of registration-style module listings.
const REGISTRATION_CALLEE: &str = "define";

/// Result of one per-file pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FileRewrite {
    /// Root of the transformed tree; equal to the input root when nothing
    /// was rewritten.
    pub root: NodeId,
    /// Number of module-reference sites whose path changed.
    pub rewrites: usize,
}

impl FileRewrite {
    /// Whether any reference was rewritten.
    pub fn changed(&self) -> bool {
        self.rewrites > 0
    }
}

/// The pass: a compiled policy applied through the host compiler's two emit
/// hooks. Owns no per-file state — each hook call is a single bounded pass
/// over one tree, so the surrounding system may order or parallelize files
/// freely.
pub struct PathRewriter {
    policy: RewritePolicy,
}

impl PathRewriter {
    pub fn new(policy: RewritePolicy) -> Self {
        PathRewriter { policy }
    }

    pub fn policy(&self) -> &RewritePolicy {
        &self.policy
    }

    /// Post-code-transform hook: rewrite a transpiled module tree.
    pub fn after_code_emit(
        &self,
        arena: &mut ModuleArena,
        interner: &StringInterner,
        root: NodeId,
        origin_file: &str,
    ) -> FileRewrite {
        self.run(arena, interner, root, origin_file)
    }

    /// Post-declaration-transform hook: rewrite a declaration-output tree.
    /// Type-position import references only occur here; otherwise this is
    /// the same engine as [`PathRewriter::after_code_emit`], wired to both
    /// hook points exactly alike.
    pub fn after_declarations_emit(
        &self,
        arena: &mut ModuleArena,
        interner: &StringInterner,
        root: NodeId,
        origin_file: &str,
    ) -> FileRewrite {
        self.run(arena, interner, root, origin_file)
    }

    fn run(
        &self,
        arena: &mut ModuleArena,
        interner: &StringInterner,
        root: NodeId,
        origin_file: &str,
    ) -> FileRewrite {
        if !root.is_valid() {
            return FileRewrite { root, rewrites: 0 };
        }
        let define = interner.intern(REGISTRATION_CALLEE);
        let mut rewriter = Rewriter {
            arena,
            interner,
            policy: &self.policy,
            origin_file,
            define,
            rewrites: 0,
        };
        let new_root = rewriter.transform_node(root);
        let rewrites = rewriter.rewrites;
        debug!(origin_file, rewrites, "path rewrite pass finished");
        FileRewrite {
            root: new_root,
            rewrites,
        }
    }
}

/// Per-file walker. Holds the mutable arena it both reads and allocates
/// into; node kinds are `Copy`, so each visit copies the kind out before
/// any allocation.
pub(crate) struct Rewriter<'a> {
    pub(crate) arena: &'a mut ModuleArena,
    pub(crate) interner: &'a StringInterner,
    pub(crate) policy: &'a RewritePolicy,
    pub(crate) origin_file: &'a str,
    /// Pre-interned registration callee name.
    define: Name,
    pub(crate) rewrites: usize,
}

impl Rewriter<'_> {
    /// Visit one node: classify, rewrite if its path changed, otherwise
    /// recurse.
    fn transform_node(&mut self, id: NodeId) -> NodeId {
        if let Some(reference) = locate::classify(self.arena, self.define, id) {
            trace!(site = ?reference.site_kind(), node = ?id, "classified module reference");
            if let Some(replacement) = self.rewrite_reference(id, reference) {
                // Visited-Rewritten: stop, no further descent.
                return replacement;
            }
        }
        self.transform_children(id)
    }

    /// Visited-Unchanged: recurse into children, rebuilding this node only
    /// if some child changed.
    fn transform_children(&mut self, id: NodeId) -> NodeId {
        let node = *self.arena.get(id);
        let kind = match node.kind {
            // Leaves: nothing to descend into.
            NodeKind::Ident(_)
            | NodeKind::String { .. }
            | NodeKind::Number(_)
            | NodeKind::ImportKeyword
            | NodeKind::NamespaceBinding(_) => return id,

            NodeKind::Array(items) => {
                let new_items = self.transform_list(items);
                if new_items == items {
                    return id;
                }
                NodeKind::Array(new_items)
            }
            NodeKind::Call { callee, args } => {
                let new_callee = self.transform_node(callee);
                let new_args = self.transform_list(args);
                if new_callee == callee && new_args == args {
                    return id;
                }
                NodeKind::Call {
                    callee: new_callee,
                    args: new_args,
                }
            }
            NodeKind::Function { params, body } => {
                let new_params = self.transform_list(params);
                let new_body = self.transform_list(body);
                if new_params == params && new_body == body {
                    return id;
                }
                NodeKind::Function {
                    params: new_params,
                    body: new_body,
                }
            }
            NodeKind::Member { object, property } => {
                let new_object = self.transform_node(object);
                if new_object == object {
                    return id;
                }
                NodeKind::Member {
                    object: new_object,
                    property,
                }
            }
            NodeKind::NamedBindings(bindings) => {
                let new_bindings = self.transform_list(bindings);
                if new_bindings == bindings {
                    return id;
                }
                NodeKind::NamedBindings(new_bindings)
            }
            NodeKind::ImportDecl { clause, specifier } => {
                let new_clause = self.transform_opt(clause);
                let new_specifier = self.transform_node(specifier);
                if new_clause == clause && new_specifier == specifier {
                    return id;
                }
                NodeKind::ImportDecl {
                    clause: new_clause,
                    specifier: new_specifier,
                }
            }
            NodeKind::ExportDecl { clause, specifier } => {
                let new_clause = self.transform_opt(clause);
                let new_specifier = self.transform_opt(specifier);
                if new_clause == clause && new_specifier == specifier {
                    return id;
                }
                NodeKind::ExportDecl {
                    clause: new_clause,
                    specifier: new_specifier,
                }
            }
            NodeKind::ImportType {
                argument,
                qualifier,
                type_args,
            } => {
                let new_argument = self.transform_node(argument);
                let new_type_args = self.transform_list(type_args);
                if new_argument == argument && new_type_args == type_args {
                    return id;
                }
                NodeKind::ImportType {
                    argument: new_argument,
                    qualifier,
                    type_args: new_type_args,
                }
            }
            NodeKind::ExprStmt(expr) => {
                let new_expr = self.transform_node(expr);
                if new_expr == expr {
                    return id;
                }
                NodeKind::ExprStmt(new_expr)
            }
            NodeKind::SourceFile(statements) => {
                let new_statements = self.transform_list(statements);
                if new_statements == statements {
                    return id;
                }
                NodeKind::SourceFile(new_statements)
            }
            NodeKind::Other(children) => {
                let new_children = self.transform_list(children);
                if new_children == children {
                    return id;
                }
                NodeKind::Other(new_children)
            }
        };
        self.arena.alloc(Node::new(kind, node.span))
    }

    /// Transform every node in a child list; the original range is kept
    /// when no child changed.
    fn transform_list(&mut self, range: NodeRange) -> NodeRange {
        let ids = self.arena.list(range).to_vec();
        let mut changed = false;
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let new_id = self.transform_node(id);
            changed |= new_id != id;
            out.push(new_id);
        }
        if changed {
            self.arena.alloc_list(out)
        } else {
            range
        }
    }

    fn transform_opt(&mut self, id: Option<NodeId>) -> Option<NodeId> {
        id.map(|id| self.transform_node(id))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;
