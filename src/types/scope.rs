//! Hierarchical namespaces that turn source identifiers into globally unique
//! names.
//!
//! Scopes form a tree stored in an arena; children refer to their parent by
//! index only. A scope's path is its ancestors' names joined with `::`, and an
//! identifier declared in a scope is known to the type context as
//! `path::identifier`. The root scope has the empty name, so root
//! declarations (functions, built-ins) keep their bare names.

use std::collections::HashSet;

const SEPARATOR: &str = "::";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug, Clone)]
struct ScopeData {
    path: String,
    parent: Option<ScopeId>,
    declared: HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<ScopeData>,
}

impl ScopeTree {
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![ScopeData {
                path: String::new(),
                parent: None,
                declared: HashSet::new(),
            }],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn path(&self, scope: ScopeId) -> &str {
        &self.scopes[scope.0].path
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.0].parent
    }

    /// Create a child of `parent` named `local_name`.
    pub fn make_child_scope(&mut self, parent: ScopeId, local_name: &str) -> ScopeId {
        let path = mangle(self.path(parent), local_name);
        self.scopes.push(ScopeData {
            path,
            parent: Some(parent),
            declared: HashSet::new(),
        });
        ScopeId(self.scopes.len() - 1)
    }

    /// Register a declaration of `identifier` directly in `scope`.
    pub fn add_unscoped_variable(&mut self, scope: ScopeId, identifier: &str) {
        self.scopes[scope.0].declared.insert(identifier.to_string());
    }

    /// Mangled name of the nearest declaration of `identifier`, searching
    /// `scope` first and then its ancestors.
    pub fn get_scoped_variable(&self, scope: ScopeId, identifier: &str) -> Option<String> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let data = &self.scopes[id.0];
            if data.declared.contains(identifier) {
                return Some(mangle(&data.path, identifier));
            }
            current = data.parent;
        }
        None
    }

    /// Name `identifier` would have if it were declared in `scope`, without
    /// declaring it. Nothing binds such a name, so using it fails later as an
    /// unbound variable.
    pub fn as_unregistered_scoped_variable(&self, scope: ScopeId, identifier: &str) -> String {
        mangle(self.path(scope), identifier)
    }

    /// Drop `scope` and every scope created after it. The root always
    /// survives; discarding it only clears its descendants.
    pub fn discard(&mut self, scope: ScopeId) {
        self.scopes.truncate(scope.0.max(1));
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

fn mangle(path: &str, local: &str) -> String {
    if path.is_empty() {
        local.to_string()
    } else {
        format!("{path}{SEPARATOR}{local}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_declarations_keep_bare_names() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        tree.add_unscoped_variable(root, "main");
        assert_eq!(tree.get_scoped_variable(root, "main"), Some("main".to_string()));
    }

    #[test]
    fn test_child_path_concatenates_ancestors() {
        let mut tree = ScopeTree::new();
        let main = tree.make_child_scope(tree.root(), "main");
        let inner = tree.make_child_scope(main, "if1");
        assert_eq!(tree.path(main), "main");
        assert_eq!(tree.path(inner), "main::if1");
        assert_eq!(tree.parent(inner), Some(main));
    }

    #[test]
    fn test_lookup_walks_ancestors() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        tree.add_unscoped_variable(root, "helper");
        let main = tree.make_child_scope(root, "main");
        tree.add_unscoped_variable(main, "x");
        let inner = tree.make_child_scope(main, "if1");

        assert_eq!(tree.get_scoped_variable(inner, "x"), Some("main::x".to_string()));
        assert_eq!(tree.get_scoped_variable(inner, "helper"), Some("helper".to_string()));
    }

    #[test]
    fn test_nearest_declaration_wins() {
        let mut tree = ScopeTree::new();
        let main = tree.make_child_scope(tree.root(), "main");
        tree.add_unscoped_variable(main, "x");
        let inner = tree.make_child_scope(main, "if1");
        tree.add_unscoped_variable(inner, "x");

        assert_eq!(
            tree.get_scoped_variable(inner, "x"),
            Some("main::if1::x".to_string())
        );
        assert_eq!(tree.get_scoped_variable(main, "x"), Some("main::x".to_string()));
    }

    #[test]
    fn test_undeclared_lookup_misses() {
        let mut tree = ScopeTree::new();
        let main = tree.make_child_scope(tree.root(), "main");
        assert_eq!(tree.get_scoped_variable(main, "y"), None);
    }

    #[test]
    fn test_unregistered_name_does_not_declare() {
        let mut tree = ScopeTree::new();
        let main = tree.make_child_scope(tree.root(), "main");
        assert_eq!(tree.as_unregistered_scoped_variable(main, "y"), "main::y");
        assert_eq!(tree.get_scoped_variable(main, "y"), None);
    }

    #[test]
    fn test_discard_drops_later_scopes() {
        let mut tree = ScopeTree::new();
        let main = tree.make_child_scope(tree.root(), "main");
        tree.make_child_scope(main, "if1");
        tree.discard(main);

        let other = tree.make_child_scope(tree.root(), "other");
        assert_eq!(other, main);
        assert_eq!(tree.path(other), "other");
    }

    #[test]
    fn test_discarding_root_keeps_root_declarations() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        tree.add_unscoped_variable(root, "main");
        tree.make_child_scope(root, "main");
        tree.discard(root);

        assert_eq!(tree.get_scoped_variable(root, "main"), Some("main".to_string()));
        let next = tree.make_child_scope(root, "other");
        assert_eq!(tree.path(next), "other");
        assert_eq!(tree.parent(next), Some(root));
    }
}
