//! Node rewriter — replacement-node construction per reference form.
//!
//! Given a classified reference and the policy's new path, builds a
//! structurally equivalent node where only the path-literal position
//! differs. Every sibling field — import/export clause, call callee,
//! argument count, type qualifier and arguments, registration factory,
//! quote kind — is carried over, by id wherever possible, so untouched
//! subtrees stay shared with the input tree. Nothing here mutates an
//! existing node.

use relo_ir::{Node, NodeId, NodeKind};
use tracing::debug;

use super::Rewriter;
use crate::locate::{Reference, ReferenceSite, SiteKind};
use crate::policy::RewriteOutcome;

impl Rewriter<'_> {
    /// Build the replacement for a reference node, or `None` when every
    /// path it carries resolves unchanged (the driver then treats the node
    /// as Visited-Unchanged).
    pub(super) fn rewrite_reference(&mut self, id: NodeId, reference: Reference) -> Option<NodeId> {
        match reference {
            Reference::StaticImport { clause, specifier } => {
                let new_specifier = self.rewrite_literal(SiteKind::StaticImport, specifier)?;
                Some(self.alloc_like(
                    id,
                    NodeKind::ImportDecl {
                        clause,
                        specifier: new_specifier,
                    },
                ))
            }
            Reference::StaticExportFrom { clause, specifier } => {
                let new_specifier = self.rewrite_literal(SiteKind::StaticExportFrom, specifier)?;
                Some(self.alloc_like(
                    id,
                    NodeKind::ExportDecl {
                        clause,
                        specifier: Some(new_specifier),
                    },
                ))
            }
            Reference::DynamicImportCall { callee, argument } => {
                let new_argument = self.rewrite_literal(SiteKind::DynamicImportCall, argument)?;
                let args = self.arena.alloc_list([new_argument]);
                Some(self.alloc_like(id, NodeKind::Call { callee, args }))
            }
            Reference::TypeOnlyImportRef {
                argument,
                qualifier,
                type_args,
            } => {
                let new_argument = self.rewrite_literal(SiteKind::TypeOnlyImportRef, argument)?;
                Some(self.alloc_like(
                    id,
                    NodeKind::ImportType {
                        argument: new_argument,
                        qualifier,
                        type_args,
                    },
                ))
            }
            Reference::Registration {
                callee,
                array,
                factory,
            } => self.rewrite_registration(id, callee, array, factory),
        }
    }

    /// Rewrite a `define([paths...], factory)` call. Each string entry is an
    /// independent site; entries whose path resolves unchanged — and any
    /// non-string entry — keep their original id, so array length and order
    /// are preserved by construction.
    fn rewrite_registration(
        &mut self,
        id: NodeId,
        callee: NodeId,
        array: NodeId,
        factory: NodeId,
    ) -> Option<NodeId> {
        let NodeKind::Array(entries) = *self.arena.kind(array) else {
            return None;
        };
        let ids = self.arena.list(entries).to_vec();
        let mut changed = false;
        let mut out = Vec::with_capacity(ids.len());
        for entry in ids {
            match self.rewrite_literal(SiteKind::RegistrationEntry, entry) {
                Some(new_entry) => {
                    changed = true;
                    out.push(new_entry);
                }
                None => out.push(entry),
            }
        }
        if !changed {
            return None;
        }
        let new_entries = self.arena.alloc_list(out);
        let new_array = self.alloc_like(array, NodeKind::Array(new_entries));
        let args = self.arena.alloc_list([new_array, factory]);
        Some(self.alloc_like(id, NodeKind::Call { callee, args }))
    }

    /// Resolve the path carried by a string-literal node. Returns a fresh
    /// literal (same quote kind, same span) when the policy rewrote the
    /// path; `None` when the node is not a string literal or the path
    /// resolves unchanged.
    fn rewrite_literal(&mut self, kind: SiteKind, literal: NodeId) -> Option<NodeId> {
        let (value, quote) = self.arena.string_literal(literal)?;
        let site = ReferenceSite {
            kind,
            raw_path: self.interner.resolve(value),
            origin_file: self.origin_file,
        };
        match self.policy.resolve(site.raw_path, site.origin_file) {
            RewriteOutcome::Unchanged => None,
            RewriteOutcome::Rewritten(new_path) => {
                debug!(
                    site = ?site.kind,
                    from = site.raw_path,
                    to = %new_path,
                    origin = site.origin_file,
                    "rewrote module reference"
                );
                self.rewrites += 1;
                let value = self.interner.intern(&new_path);
                Some(self.alloc_like(literal, NodeKind::String { value, quote }))
            }
        }
    }

    /// Allocate a replacement node carrying the span of the node it
    /// replaces.
    fn alloc_like(&mut self, original: NodeId, kind: NodeKind) -> NodeId {
        let span = self.arena.span(original);
        self.arena.alloc(Node::new(kind, span))
    }
}
