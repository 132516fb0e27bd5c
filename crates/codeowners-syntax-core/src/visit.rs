//! Visitor dispatch over the CODEOWNERS syntax tree.
//!
//! [`Visitor`] has one method per node variant. Every method defaults to
//! [`Visitor::visit_node`], which itself does nothing, so an implementation
//! only overrides the variants it cares about. [`Node::accept`] calls exactly
//! the method matching the node's variant and never recurses.
//!
//! Traversal is provided separately:
//!
//! - [`walk_nodes`] drives a single callback over a subtree in pre-order and
//!   lets it skip subtrees or stop early.
//! - [`walk`] drives a [`Visitor`] over a subtree in pre-order.
//!
//! Hosts that have their own, CODEOWNERS-agnostic visitor type implement
//! [`ElementVisitor`] and enter through [`Node::accept_element`].
//!
//! # Example
//!
//! ```rust
//! use codeowners_syntax_core::parse::{parse, Owner};
//! use codeowners_syntax_core::visit::Visitor;
//!
//! #[derive(Default)]
//! struct CollectOwners<'a> {
//!     owners: Vec<&'a str>,
//! }
//!
//! impl<'a> Visitor<'a> for CollectOwners<'a> {
//!     fn visit_owner(&mut self, owner: Owner<'a>) {
//!         self.owners.push(owner.text());
//!     }
//! }
//!
//! let file = parse("*.rs @alice\n/docs/ @bob @carol\n");
//! let mut collector = CollectOwners::default();
//! file.walk(&mut collector);
//! assert_eq!(collector.owners, ["@alice", "@bob", "@carol"]);
//! ```

use crate::parse::{Entry, Node, NodeKind, Owner, Pattern, SourceFile, WildcardKind};

/// One callback per node variant.
///
/// The lifetime `'a` is the lifetime of the borrowed [`SourceFile`], so a
/// visitor may keep the nodes and text it is handed.
pub trait Visitor<'a> {
    /// Fallback for every variant whose method is not overridden.
    fn visit_node(&mut self, node: Node<'a>) {
        let _ = node;
    }

    /// Visit the root node.
    fn visit_source_file(&mut self, node: Node<'a>) {
        self.visit_node(node);
    }

    /// Visit an ownership rule.
    fn visit_entry(&mut self, entry: Entry<'a>) {
        self.visit_node(entry.node());
    }

    /// Visit the path pattern of an entry.
    fn visit_pattern(&mut self, pattern: Pattern<'a>) {
        self.visit_node(pattern.node());
    }

    /// Visit a literal pattern segment.
    fn visit_literal(&mut self, node: Node<'a>) {
        self.visit_node(node);
    }

    /// Visit a wildcard pattern segment.
    fn visit_wildcard(&mut self, node: Node<'a>, kind: WildcardKind) {
        let _ = kind;
        self.visit_node(node);
    }

    /// Visit a directory separator pattern segment.
    fn visit_directory_separator(&mut self, node: Node<'a>) {
        self.visit_node(node);
    }

    /// Visit an owner.
    fn visit_owner(&mut self, owner: Owner<'a>) {
        self.visit_node(owner.node());
    }

    /// Visit a full-line or trailing comment.
    fn visit_comment(&mut self, node: Node<'a>) {
        self.visit_node(node);
    }
}

/// A host visitor that knows nothing about CODEOWNERS node variants.
///
/// [`Node::accept_element`] hands the node to the specialized [`Visitor`]
/// returned by [`as_codeowners_visitor`](Self::as_codeowners_visitor) when
/// there is one, and to [`visit_element`](Self::visit_element) otherwise.
pub trait ElementVisitor<'a> {
    /// Generic callback for hosts without CODEOWNERS-specific handling.
    fn visit_element(&mut self, node: Node<'a>);

    /// Returns this visitor as a CODEOWNERS visitor, if it can act as one.
    fn as_codeowners_visitor(&mut self) -> Option<&mut dyn Visitor<'a>> {
        None
    }
}

/// What a [`walk_nodes`] callback wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkControl {
    /// Descend into the node's children.
    #[default]
    Continue,
    /// Do not visit this node's children.
    SkipChildren,
    /// Stop the walk.
    Stop,
}

impl<'a> Node<'a> {
    /// Calls the visitor method matching this node's variant.
    ///
    /// Children are not visited.
    pub fn accept<V: Visitor<'a> + ?Sized>(self, visitor: &mut V) {
        match self.kind() {
            NodeKind::SourceFile => visitor.visit_source_file(self),
            NodeKind::Entry => visitor.visit_entry(Entry(self)),
            NodeKind::Pattern { .. } => visitor.visit_pattern(Pattern(self)),
            NodeKind::Literal => visitor.visit_literal(self),
            NodeKind::Wildcard(kind) => visitor.visit_wildcard(self, kind),
            NodeKind::DirectorySeparator => visitor.visit_directory_separator(self),
            NodeKind::Owner => visitor.visit_owner(Owner(self)),
            NodeKind::Comment => visitor.visit_comment(self),
        }
    }

    /// Host entry point: dispatches to the specialized visitor when the host
    /// visitor provides one, otherwise to its generic callback.
    pub fn accept_element<V: ElementVisitor<'a> + ?Sized>(self, visitor: &mut V) {
        match visitor.as_codeowners_visitor() {
            Some(codeowners) => self.accept(codeowners),
            None => visitor.visit_element(self),
        }
    }
}

impl SourceFile {
    /// Dispatches the root node to the visitor. Children are not visited.
    pub fn accept<'a, V: Visitor<'a> + ?Sized>(&'a self, visitor: &mut V) {
        self.root().accept(visitor);
    }

    /// Walks the whole tree in pre-order, dispatching every node.
    pub fn walk<'a, V: Visitor<'a> + ?Sized>(&'a self, visitor: &mut V) {
        walk(self.root(), visitor);
    }
}

/// Walks `root` and its descendants in pre-order with a single callback.
///
/// Returns [`WalkControl::Stop`] if the callback stopped the walk and
/// [`WalkControl::Continue`] otherwise.
pub fn walk_nodes<'a, F>(root: Node<'a>, mut f: F) -> WalkControl
where
    F: FnMut(Node<'a>) -> WalkControl,
{
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match f(node) {
            WalkControl::Continue => stack.extend(node.children().rev()),
            WalkControl::SkipChildren => {}
            WalkControl::Stop => return WalkControl::Stop,
        }
    }
    WalkControl::Continue
}

/// Walks `root` and its descendants in pre-order, dispatching each node to
/// the visitor.
pub fn walk<'a, V: Visitor<'a> + ?Sized>(root: Node<'a>, visitor: &mut V) {
    walk_nodes(root, |node| {
        node.accept(&mut *visitor);
        WalkControl::Continue
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use pretty_assertions::assert_eq;

    /// Records which method was called for each node.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl<'a> Visitor<'a> for Recorder {
        fn visit_node(&mut self, node: Node<'a>) {
            self.calls.push(format!("node:{}", node.kind()));
        }

        fn visit_source_file(&mut self, _node: Node<'a>) {
            self.calls.push("source_file".to_string());
        }

        fn visit_entry(&mut self, entry: Entry<'a>) {
            self.calls.push(format!("entry:{}", entry.text()));
        }

        fn visit_pattern(&mut self, pattern: Pattern<'a>) {
            self.calls.push(format!("pattern:{}", pattern.text()));
        }

        fn visit_literal(&mut self, node: Node<'a>) {
            self.calls.push(format!("literal:{}", node.text()));
        }

        fn visit_wildcard(&mut self, _node: Node<'a>, kind: WildcardKind) {
            self.calls.push(format!("wildcard:{}", kind.as_str()));
        }

        fn visit_directory_separator(&mut self, _node: Node<'a>) {
            self.calls.push("separator".to_string());
        }

        fn visit_owner(&mut self, owner: Owner<'a>) {
            self.calls.push(format!("owner:{}", owner.text()));
        }

        fn visit_comment(&mut self, node: Node<'a>) {
            self.calls.push(format!("comment:{}", node.text()));
        }
    }

    /// Overrides nothing but the fallback.
    #[derive(Default)]
    struct Fallback<'a> {
        nodes: Vec<Node<'a>>,
    }

    impl<'a> Visitor<'a> for Fallback<'a> {
        fn visit_node(&mut self, node: Node<'a>) {
            self.nodes.push(node);
        }
    }

    #[test]
    fn accept_dispatches_single_node() {
        let file = parse("*.js @alice\n");
        let entry = file.entries().next().unwrap();

        let mut recorder = Recorder::default();
        entry.node().accept(&mut recorder);
        assert_eq!(recorder.calls, vec!["entry:*.js @alice"]);
    }

    #[test]
    fn walk_dispatches_every_variant_in_pre_order() {
        let file = parse("# top\n/src/**/?.rs @alice # rust\n");
        let mut recorder = Recorder::default();
        file.walk(&mut recorder);

        assert_eq!(
            recorder.calls,
            vec![
                "source_file",
                "comment:# top",
                "entry:/src/**/?.rs @alice # rust",
                "pattern:/src/**/?.rs",
                "literal:src",
                "separator",
                "wildcard:**",
                "separator",
                "wildcard:?",
                "literal:.rs",
                "owner:@alice",
                "comment:# rust",
            ]
        );
    }

    #[test]
    fn fallback_receives_unhandled_variants() {
        let file = parse("a @b\n");
        let mut fallback = Fallback::default();
        file.walk(&mut fallback);

        let kinds: Vec<_> = fallback.nodes.iter().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::SourceFile,
                NodeKind::Entry,
                NodeKind::Pattern { anchored: false },
                NodeKind::Literal,
                NodeKind::Owner,
            ]
        );
    }

    #[test]
    fn overridden_method_bypasses_fallback() {
        let file = parse("*.md @docs\n");
        let mut recorder = Recorder::default();
        file.walk(&mut recorder);
        assert!(recorder.calls.iter().all(|c| !c.starts_with("node:")));
    }

    #[test]
    fn source_file_accept_visits_root_only() {
        let file = parse("a @b\n");
        let mut recorder = Recorder::default();
        file.accept(&mut recorder);
        assert_eq!(recorder.calls, vec!["source_file"]);
    }

    #[test]
    fn walk_nodes_skips_children() {
        let file = parse("a/b @x\n# c\n");
        let mut seen = Vec::new();
        let control = walk_nodes(file.root(), |node| {
            seen.push(node.kind().name());
            if node.is_entry() {
                WalkControl::SkipChildren
            } else {
                WalkControl::Continue
            }
        });
        assert_eq!(control, WalkControl::Continue);
        assert_eq!(seen, vec!["source_file", "entry", "comment"]);
    }

    #[test]
    fn walk_nodes_stops_early() {
        let file = parse("a @x\nb @y\n");
        let mut owners = Vec::new();
        let control = walk_nodes(file.root(), |node| {
            if let Some(owner) = node.as_owner() {
                owners.push(owner.text());
                return WalkControl::Stop;
            }
            WalkControl::Continue
        });
        assert_eq!(control, WalkControl::Stop);
        assert_eq!(owners, vec!["@x"]);
    }

    #[test]
    fn walk_from_inner_node_stays_in_subtree() {
        let file = parse("a/b @x\nc @y\n");
        let entry = file.entries().next().unwrap();
        let mut recorder = Recorder::default();
        walk(entry.pattern().node(), &mut recorder);
        assert_eq!(
            recorder.calls,
            vec!["pattern:a/b", "literal:a", "separator", "literal:b"]
        );
    }

    /// A host visitor that counts nodes and can optionally delegate.
    struct Host {
        generic: usize,
        delegate: Option<Recorder>,
    }

    impl<'a> ElementVisitor<'a> for Host {
        fn visit_element(&mut self, _node: Node<'a>) {
            self.generic += 1;
        }

        fn as_codeowners_visitor(&mut self) -> Option<&mut dyn Visitor<'a>> {
            self.delegate.as_mut().map(|r| r as &mut dyn Visitor<'a>)
        }
    }

    #[test]
    fn accept_element_uses_generic_callback() {
        let file = parse("a @x\n");
        let mut host = Host {
            generic: 0,
            delegate: None,
        };
        for node in file.root().descendants() {
            node.accept_element(&mut host);
        }
        assert_eq!(host.generic, 5);
    }

    #[test]
    fn accept_element_prefers_specialized_visitor() {
        let file = parse("a @x\n");
        let mut host = Host {
            generic: 0,
            delegate: Some(Recorder::default()),
        };
        let owner = file.entries().next().unwrap().owners().next().unwrap();
        owner.node().accept_element(&mut host);

        assert_eq!(host.generic, 0);
        assert_eq!(host.delegate.unwrap().calls, vec!["owner:@x"]);
    }

    #[test]
    fn dyn_visitor_dispatch() {
        let file = parse("# only\n");
        let mut recorder = Recorder::default();
        let visitor: &mut dyn Visitor<'_> = &mut recorder;
        file.walk(visitor);
        assert_eq!(recorder.calls, vec!["source_file", "comment:# only"]);
    }
}
