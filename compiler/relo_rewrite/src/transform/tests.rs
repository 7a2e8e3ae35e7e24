use super::*;
use pretty_assertions::assert_eq;
use relo_ir::QuoteKind;

use crate::policy::{AliasRule, RewriteConfig};

const ORIGIN: &str = "/proj/test/fixture/foo.ts";

struct Tree {
    arena: ModuleArena,
    interner: StringInterner,
}

impl Tree {
    fn new() -> Self {
        Tree {
            arena: ModuleArena::new(),
            interner: StringInterner::new(),
        }
    }

    fn node(&mut self, kind: NodeKind) -> NodeId {
        self.arena.alloc(Node::new(kind, relo_ir::Span::DUMMY))
    }

    fn string(&mut self, text: &str) -> NodeId {
        let value = self.interner.intern(text);
        self.node(NodeKind::String {
            value,
            quote: QuoteKind::Double,
        })
    }

    fn ident(&mut self, text: &str) -> NodeId {
        let name = self.interner.intern(text);
        self.node(NodeKind::Ident(name))
    }

    /// `import { binding } from "path"`
    fn named_import(&mut self, binding: &str, path: &str) -> NodeId {
        let binding = self.ident(binding);
        let bindings = self.arena.alloc_list([binding]);
        let clause = self.node(NodeKind::NamedBindings(bindings));
        let specifier = self.string(path);
        self.node(NodeKind::ImportDecl {
            clause: Some(clause),
            specifier,
        })
    }

    /// `import * as binding from "path"`
    fn namespace_import(&mut self, binding: &str, path: &str) -> NodeId {
        let name = self.interner.intern(binding);
        let clause = self.node(NodeKind::NamespaceBinding(name));
        let specifier = self.string(path);
        self.node(NodeKind::ImportDecl {
            clause: Some(clause),
            specifier,
        })
    }

    /// `define(["paths"...], function () {})`
    fn registration(&mut self, paths: &[&str]) -> NodeId {
        let callee = self.ident("define");
        let entries: Vec<NodeId> = paths.iter().map(|path| self.string(path)).collect();
        let entries = self.arena.alloc_list(entries);
        let array = self.node(NodeKind::Array(entries));
        let factory = self.node(NodeKind::Function {
            params: NodeRange::EMPTY,
            body: NodeRange::EMPTY,
        });
        let args = self.arena.alloc_list([array, factory]);
        self.node(NodeKind::Call { callee, args })
    }

    fn string_text(&self, id: NodeId) -> &'static str {
        let (value, _) = self.arena.string_literal(id).unwrap();
        self.interner.resolve(value)
    }

    fn import_parts(&self, id: NodeId) -> (Option<NodeId>, NodeId) {
        match *self.arena.kind(id) {
            NodeKind::ImportDecl { clause, specifier } => (clause, specifier),
            ref other => panic!("expected ImportDecl, got {other:?}"),
        }
    }

    fn call_parts(&self, id: NodeId) -> (NodeId, Vec<NodeId>) {
        match *self.arena.kind(id) {
            NodeKind::Call { callee, args } => (callee, self.arena.list(args).to_vec()),
            ref other => panic!("expected Call, got {other:?}"),
        }
    }
}

fn project_rewriter() -> PathRewriter {
    let policy = RewriteConfig {
        project_base_dir: Some("/proj".into()),
        project_namespace: Some("dummy-project".into()),
        alias_rules: Vec::new(),
    }
    .compile()
    .unwrap();
    PathRewriter::new(policy)
}

#[test]
fn relative_import_becomes_namespaced() {
    // import { dummy } from "../fixture/bar"  →
    // import { dummy } from "dummy-project/test/fixture/bar"
    let mut tree = Tree::new();
    let import = tree.named_import("dummy", "../fixture/bar");
    let (old_clause, _) = tree.import_parts(import);

    let rewriter = project_rewriter();
    assert_eq!(
        rewriter.policy().resolve("../fixture/bar", ORIGIN).rewritten(),
        Some("dummy-project/test/fixture/bar")
    );
    let result = rewriter.after_code_emit(&mut tree.arena, &tree.interner, import, ORIGIN);

    assert!(result.changed());
    assert_eq!(result.rewrites, 1);
    assert_ne!(result.root, import);
    let (clause, specifier) = tree.import_parts(result.root);
    assert_eq!(tree.string_text(specifier), "dummy-project/test/fixture/bar");
    // The import clause is carried over by id: structural sharing.
    assert_eq!(clause, old_clause);
}

#[test]
fn callback_rewrites_namespace_import() {
    // import * as fsExtra from "fs-extra"  →
    // import * as fsExtra from "rewritten/fs-extra"
    let policy = RewriteConfig::default()
        .compile()
        .unwrap()
        .with_rewrite_fn(|path, _| {
            path.starts_with("fs-extra")
                .then(|| "rewritten/fs-extra".to_owned())
        });
    let rewriter = PathRewriter::new(policy);

    let mut tree = Tree::new();
    let import = tree.namespace_import("fsExtra", "fs-extra");
    let (old_clause, _) = tree.import_parts(import);

    let result = rewriter.after_code_emit(&mut tree.arena, &tree.interner, import, ORIGIN);

    let (clause, specifier) = tree.import_parts(result.root);
    assert_eq!(tree.string_text(specifier), "rewritten/fs-extra");
    assert_eq!(clause, old_clause);
}

#[test]
fn alias_rewrites_named_import() {
    // import { sync } from "glob"  →  import { sync } from "external/glob"
    let policy = RewriteConfig {
        alias_rules: vec![AliasRule::new("^(glob)$", "external/$1")],
        ..RewriteConfig::default()
    }
    .compile()
    .unwrap();
    let rewriter = PathRewriter::new(policy);

    let mut tree = Tree::new();
    let import = tree.named_import("sync", "glob");

    let result = rewriter.after_code_emit(&mut tree.arena, &tree.interner, import, ORIGIN);

    let (_, specifier) = tree.import_parts(result.root);
    assert_eq!(tree.string_text(specifier), "external/glob");
}

#[test]
fn unmatched_wildcard_reexport_stays_verbatim() {
    // export * from "dummy-project/test/fixture/bar" — non-relative,
    // non-aliased, no callback match: nothing is allocated at all.
    let mut tree = Tree::new();
    let specifier = tree.string("dummy-project/test/fixture/bar");
    let export = tree.node(NodeKind::ExportDecl {
        clause: None,
        specifier: Some(specifier),
    });
    let nodes_before = tree.arena.node_count();

    let result =
        project_rewriter().after_code_emit(&mut tree.arena, &tree.interner, export, ORIGIN);

    assert!(!result.changed());
    assert_eq!(result.root, export);
    assert_eq!(tree.arena.node_count(), nodes_before);
}

#[test]
fn reexport_with_relative_specifier_is_rewritten() {
    let mut tree = Tree::new();
    let specifier = tree.string("./bar");
    let export = tree.node(NodeKind::ExportDecl {
        clause: None,
        specifier: Some(specifier),
    });

    let result =
        project_rewriter().after_code_emit(&mut tree.arena, &tree.interner, export, ORIGIN);

    let NodeKind::ExportDecl {
        clause: None,
        specifier: Some(new_specifier),
    } = *tree.arena.kind(result.root)
    else {
        panic!("expected wildcard re-export");
    };
    assert_eq!(
        tree.string_text(new_specifier),
        "dummy-project/test/fixture/bar"
    );
}

#[test]
fn dynamic_import_changes_only_its_argument() {
    // import("./bar")  →  import("dummy-project/test/fixture/bar")
    let mut tree = Tree::new();
    let keyword = tree.node(NodeKind::ImportKeyword);
    let path = tree.string("./bar");
    let args = tree.arena.alloc_list([path]);
    let call = tree.node(NodeKind::Call {
        callee: keyword,
        args,
    });

    let result = project_rewriter().after_code_emit(&mut tree.arena, &tree.interner, call, ORIGIN);

    let (callee, args) = tree.call_parts(result.root);
    // Callee untouched, by id; still a call with a single argument.
    assert_eq!(callee, keyword);
    assert_eq!(args.len(), 1);
    assert_eq!(tree.string_text(args[0]), "dummy-project/test/fixture/bar");
}

#[test]
fn registration_preserves_length_order_and_unchanged_entries() {
    // define(["./a", "fs-extra", "./b"], function () {})
    let mut tree = Tree::new();
    let call = tree.registration(&["./a", "fs-extra", "./b"]);
    let (old_callee, old_args) = tree.call_parts(call);
    let old_factory = old_args[1];
    let NodeKind::Array(old_entries) = *tree.arena.kind(old_args[0]) else {
        panic!("expected array argument");
    };
    let old_entry_ids = tree.arena.list(old_entries).to_vec();

    let result = project_rewriter().after_code_emit(&mut tree.arena, &tree.interner, call, ORIGIN);

    assert_eq!(result.rewrites, 2);
    let (callee, args) = tree.call_parts(result.root);
    assert_eq!(callee, old_callee);
    assert_eq!(args.len(), 2);
    // Factory shared by id.
    assert_eq!(args[1], old_factory);

    let NodeKind::Array(entries) = *tree.arena.kind(args[0]) else {
        panic!("expected array argument");
    };
    let entry_ids = tree.arena.list(entries).to_vec();
    assert_eq!(entry_ids.len(), 3);
    assert_eq!(tree.string_text(entry_ids[0]), "dummy-project/test/fixture/a");
    assert_eq!(tree.string_text(entry_ids[2]), "dummy-project/test/fixture/b");
    // The bare specifier keeps its original node id.
    assert_eq!(entry_ids[1], old_entry_ids[1]);
    assert_ne!(entry_ids[0], old_entry_ids[0]);
}

#[test]
fn registration_with_no_matching_entries_is_untouched() {
    let mut tree = Tree::new();
    let call = tree.registration(&["pkg-a", "pkg-b"]);
    let nodes_before = tree.arena.node_count();

    let result = project_rewriter().after_code_emit(&mut tree.arena, &tree.interner, call, ORIGIN);

    assert_eq!(result.root, call);
    assert_eq!(result.rewrites, 0);
    assert_eq!(tree.arena.node_count(), nodes_before);
}

#[test]
fn rewritten_node_stops_descent() {
    // define(["./a"], function () { import("./b") }): once the registration
    // is rewritten the factory is carried over verbatim, so the dynamic
    // import inside it is not visited.
    let mut tree = Tree::new();
    let callee = tree.ident("define");
    let entry = tree.string("./a");
    let entries = tree.arena.alloc_list([entry]);
    let array = tree.node(NodeKind::Array(entries));

    let keyword = tree.node(NodeKind::ImportKeyword);
    let inner_path = tree.string("./b");
    let inner_args = tree.arena.alloc_list([inner_path]);
    let inner_call = tree.node(NodeKind::Call {
        callee: keyword,
        args: inner_args,
    });
    let body_stmt = tree.node(NodeKind::ExprStmt(inner_call));
    let body = tree.arena.alloc_list([body_stmt]);
    let factory = tree.node(NodeKind::Function {
        params: NodeRange::EMPTY,
        body,
    });
    let args = tree.arena.alloc_list([array, factory]);
    let call = tree.node(NodeKind::Call { callee, args });

    let result = project_rewriter().after_code_emit(&mut tree.arena, &tree.interner, call, ORIGIN);

    assert_eq!(result.rewrites, 1);
    let (_, new_args) = tree.call_parts(result.root);
    // Factory (and the dynamic import inside it) untouched, by id.
    assert_eq!(new_args[1], factory);
    assert_eq!(tree.string_text(inner_path), "./b");
}

#[test]
fn unchanged_siblings_keep_their_ids_when_parent_is_rebuilt() {
    let mut tree = Tree::new();
    let bare = tree.named_import("a", "left-alone");
    let relative = tree.named_import("b", "./bar");
    let statements = tree.arena.alloc_list([bare, relative]);
    let file = tree.node(NodeKind::SourceFile(statements));

    let result = project_rewriter().after_code_emit(&mut tree.arena, &tree.interner, file, ORIGIN);

    assert_ne!(result.root, file);
    let NodeKind::SourceFile(new_statements) = *tree.arena.kind(result.root) else {
        panic!("expected source file root");
    };
    let statements = tree.arena.list(new_statements).to_vec();
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0], bare);
    assert_ne!(statements[1], relative);
}

#[test]
fn declarations_hook_rewrites_import_type_nodes() {
    // declare const x: import("./bar").Bar
    let mut tree = Tree::new();
    let argument = tree.string("./bar");
    let qualifier = Some(tree.interner.intern("Bar"));
    let import_type = tree.node(NodeKind::ImportType {
        argument,
        qualifier,
        type_args: NodeRange::EMPTY,
    });

    let result = project_rewriter().after_declarations_emit(
        &mut tree.arena,
        &tree.interner,
        import_type,
        "/proj/test/fixture/foo.d.ts",
    );

    let NodeKind::ImportType {
        argument: new_argument,
        qualifier: new_qualifier,
        type_args,
    } = *tree.arena.kind(result.root)
    else {
        panic!("expected import type node");
    };
    assert_eq!(tree.string_text(new_argument), "dummy-project/test/fixture/bar");
    assert_eq!(new_qualifier, qualifier);
    assert_eq!(type_args, NodeRange::EMPTY);
}

#[test]
fn quote_kind_is_preserved_on_rewritten_literals() {
    let mut tree = Tree::new();
    let value = tree.interner.intern("./bar");
    let specifier = tree.node(NodeKind::String {
        value,
        quote: QuoteKind::Single,
    });
    let import = tree.node(NodeKind::ImportDecl {
        clause: None,
        specifier,
    });

    let result =
        project_rewriter().after_code_emit(&mut tree.arena, &tree.interner, import, ORIGIN);

    let (_, new_specifier) = tree.import_parts(result.root);
    let (_, quote) = tree.arena.string_literal(new_specifier).unwrap();
    assert_eq!(quote, QuoteKind::Single);
}

#[test]
fn pass_is_idempotent_across_runs() {
    let mut tree = Tree::new();
    let import = tree.named_import("dummy", "../fixture/bar");
    let rewriter = project_rewriter();

    let first = rewriter.after_code_emit(&mut tree.arena, &tree.interner, import, ORIGIN);
    assert!(first.changed());

    let second = rewriter.after_code_emit(&mut tree.arena, &tree.interner, first.root, ORIGIN);
    assert!(!second.changed());
    assert_eq!(second.root, first.root);
}

#[test]
fn invalid_root_is_a_no_op() {
    let mut tree = Tree::new();
    let result = project_rewriter().after_code_emit(
        &mut tree.arena,
        &tree.interner,
        NodeId::INVALID,
        ORIGIN,
    );
    assert!(!result.changed());
    assert_eq!(result.root, NodeId::INVALID);
}
