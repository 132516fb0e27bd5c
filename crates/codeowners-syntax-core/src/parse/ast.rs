//! Syntax tree for CODEOWNERS files.
//!
//! A [`SourceFile`] owns the source text and an arena of nodes. Every node
//! has a [`NodeKind`], an immutable [`Span`], a non-owning link to its parent
//! and an ordered list of children. Nodes are only created by the parser;
//! consumers look at them through the borrowed [`Node`] handle or the typed
//! views [`Entry`], [`Pattern`] and [`Owner`].
//!
//! ```text
//! SourceFile
//! ├── Comment            "# top comment"
//! └── Entry              "/docs/ @docs-team # docs"
//!     ├── Pattern        "/docs/" (anchored)
//!     │   ├── Literal    "docs"
//!     │   └── DirectorySeparator "/"
//!     ├── Owner          "@docs-team"
//!     └── Comment        "# docs"
//! ```

use std::fmt::{self, Display};
use std::iter::FusedIterator;
use std::ptr;
use std::slice;

use serde::Serialize;

use super::lexer::{OwnerKind, classify_owner};
use super::span::Span;

/// Identifies a node inside its [`SourceFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The root node of every file.
    pub const ROOT: NodeId = NodeId(0);

    /// Returns the arena index of this node.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The flavour of a wildcard segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WildcardKind {
    /// `*`: any run of characters within one path component.
    Any,
    /// `**`: any number of path components.
    Recursive,
    /// `?`: exactly one character.
    Single,
}

impl WildcardKind {
    /// Returns the source spelling of this wildcard.
    pub fn as_str(&self) -> &'static str {
        match self {
            WildcardKind::Any => "*",
            WildcardKind::Recursive => "**",
            WildcardKind::Single => "?",
        }
    }
}

/// The variant of a syntax node, with its variant-specific data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The root of the tree. Children are entries and comments.
    SourceFile,
    /// One ownership rule: a pattern, zero or more owners, and an optional
    /// trailing comment.
    Entry,
    /// The path pattern of an entry. Children are pattern segments.
    Pattern {
        /// True when the pattern starts with `/` and is anchored to the root.
        anchored: bool,
    },
    /// Literal pattern text.
    Literal,
    /// A wildcard pattern segment.
    Wildcard(WildcardKind),
    /// A `/` marking a directory boundary inside or at the end of a pattern.
    DirectorySeparator,
    /// An owner reference.
    Owner,
    /// A full-line or trailing comment.
    Comment,
}

impl NodeKind {
    /// Returns a short, stable name for this variant.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::SourceFile => "source_file",
            NodeKind::Entry => "entry",
            NodeKind::Pattern { .. } => "pattern",
            NodeKind::Literal => "literal",
            NodeKind::Wildcard(_) => "wildcard",
            NodeKind::DirectorySeparator => "directory_separator",
            NodeKind::Owner => "owner",
            NodeKind::Comment => "comment",
        }
    }

    /// Returns true for the pattern segment variants.
    pub fn is_segment(&self) -> bool {
        matches!(
            self,
            NodeKind::Literal | NodeKind::Wildcard(_) | NodeKind::DirectorySeparator
        )
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    kind: NodeKind,
    span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed CODEOWNERS file: the source text plus its syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    source: String,
    nodes: Vec<NodeData>,
}

impl SourceFile {
    /// Returns the source text the tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the root node.
    pub fn root(&self) -> Node<'_> {
        Node {
            file: self,
            id: NodeId::ROOT,
        }
    }

    /// Returns the node with the given id, if it belongs to this file.
    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.index() < self.nodes.len()).then_some(Node { file: self, id })
    }

    /// Returns the total number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the top-level entries and comments in source order.
    pub fn children(&self) -> Children<'_> {
        self.root().children()
    }

    /// Returns true if the file has no entries and no comments.
    pub fn is_empty(&self) -> bool {
        self.children().len() == 0
    }

    /// Returns an iterator over all entries.
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> {
        self.children().filter_map(Node::as_entry)
    }

    /// Returns an iterator over all full-line comments.
    ///
    /// Trailing comments are reachable through [`Entry::trailing_comment`].
    pub fn comments(&self) -> impl Iterator<Item = Node<'_>> {
        self.children().filter(Node::is_comment)
    }

    /// Returns the node with the smallest span containing `offset`.
    ///
    /// Used by hosts to map a cursor position back to the tree.
    pub fn node_at(&self, offset: usize) -> Option<Node<'_>> {
        let mut current = self.root();
        if offset > current.span().end_offset() {
            return None;
        }
        'descend: loop {
            for child in current.children() {
                let span = child.span();
                if span.offset <= offset && offset < span.end_offset() {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

impl Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Incrementally assembles a [`SourceFile`]. Only the parser uses this.
#[derive(Debug)]
pub(crate) struct TreeBuilder {
    nodes: Vec<NodeData>,
}

impl TreeBuilder {
    /// Creates a builder holding only the root node.
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::SourceFile,
                span: Span::default(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Appends a node as the last child of `parent`.
    pub(crate) fn push(&mut self, parent: NodeId, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            span,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Freezes the tree. The root span is set to cover all of `source`.
    pub(crate) fn finish(mut self, source: String) -> SourceFile {
        self.nodes[NodeId::ROOT.index()].span = Span::new(0, 1, 1, source.len());
        SourceFile {
            source,
            nodes: self.nodes,
        }
    }
}

/// A borrowed handle to one node of a [`SourceFile`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    file: &'a SourceFile,
    id: NodeId,
}

impl<'a> Node<'a> {
    fn data(&self) -> &'a NodeData {
        self.file.data(self.id)
    }

    /// Returns the file this node belongs to.
    pub fn file(&self) -> &'a SourceFile {
        self.file
    }

    /// Returns this node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the variant of this node.
    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    /// Returns the exact source location of this node.
    pub fn span(&self) -> Span {
        self.data().span
    }

    /// Returns the source text covered by this node.
    pub fn text(&self) -> &'a str {
        &self.file.source[self.span().range()]
    }

    /// Returns the parent node, or `None` for the root.
    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|id| Node {
            file: self.file,
            id,
        })
    }

    /// Returns the children of this node in source order.
    pub fn children(&self) -> Children<'a> {
        Children {
            file: self.file,
            ids: self.data().children.iter(),
        }
    }

    /// Returns this node and all nodes below it in pre-order.
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants {
            file: self.file,
            stack: vec![self.id],
        }
    }

    /// Returns true if this is an entry.
    pub fn is_entry(&self) -> bool {
        self.kind() == NodeKind::Entry
    }

    /// Returns true if this is a comment.
    pub fn is_comment(&self) -> bool {
        self.kind() == NodeKind::Comment
    }

    /// Returns true if this is a literal, wildcard or directory separator.
    pub fn is_segment(&self) -> bool {
        self.kind().is_segment()
    }

    /// Views this node as an entry.
    pub fn as_entry(self) -> Option<Entry<'a>> {
        self.is_entry().then_some(Entry(self))
    }

    /// Views this node as a pattern.
    pub fn as_pattern(self) -> Option<Pattern<'a>> {
        matches!(self.kind(), NodeKind::Pattern { .. }).then_some(Pattern(self))
    }

    /// Views this node as an owner.
    pub fn as_owner(self) -> Option<Owner<'a>> {
        (self.kind() == NodeKind::Owner).then_some(Owner(self))
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.file, other.file) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("span", &self.span())
            .field("text", &self.text())
            .finish()
    }
}

impl Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Iterator over the children of a node.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    file: &'a SourceFile,
    ids: slice::Iter<'a, NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        let file = self.file;
        self.ids.next().map(|&id| Node { file, id })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let file = self.file;
        self.ids.next_back().map(|&id| Node { file, id })
    }
}

impl ExactSizeIterator for Children<'_> {}

impl FusedIterator for Children<'_> {}

/// Pre-order iterator over a subtree.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    file: &'a SourceFile,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.file.data(id).children.iter().rev().copied());
        Some(Node {
            file: self.file,
            id,
        })
    }
}

/// Typed view of an [`NodeKind::Entry`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a>(pub(crate) Node<'a>);

impl<'a> Entry<'a> {
    /// Returns the underlying node.
    pub fn node(&self) -> Node<'a> {
        self.0
    }

    /// Returns the entry text, from the pattern to the end of the last owner
    /// or trailing comment.
    pub fn text(&self) -> &'a str {
        self.0.text()
    }

    /// Returns the entry's source location.
    pub fn span(&self) -> Span {
        self.0.span()
    }

    /// Returns the 1-based line of this entry.
    pub fn line(&self) -> usize {
        self.0.span().line
    }

    /// Returns the path pattern.
    pub fn pattern(&self) -> Pattern<'a> {
        // The parser always pushes the pattern as the first child.
        let id = self.0.data().children[0];
        Pattern(Node {
            file: self.0.file,
            id,
        })
    }

    /// Returns the owners in source order.
    pub fn owners(&self) -> impl Iterator<Item = Owner<'a>> + use<'a> {
        self.0.children().filter_map(Node::as_owner)
    }

    /// Returns true if the entry lists at least one owner.
    pub fn has_owners(&self) -> bool {
        self.owners().next().is_some()
    }

    /// Returns the comment at the end of the entry's line, if any.
    pub fn trailing_comment(&self) -> Option<Node<'a>> {
        self.0.children().find(Node::is_comment)
    }
}

/// Typed view of a [`NodeKind::Pattern`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern<'a>(pub(crate) Node<'a>);

impl<'a> Pattern<'a> {
    /// Returns the underlying node.
    pub fn node(&self) -> Node<'a> {
        self.0
    }

    /// Returns the raw pattern text (e.g., "*.rs", "/src/**", "docs/").
    pub fn text(&self) -> &'a str {
        self.0.text()
    }

    /// Returns the pattern's source location.
    pub fn span(&self) -> Span {
        self.0.span()
    }

    /// Returns true when the pattern starts with `/`.
    pub fn is_anchored(&self) -> bool {
        matches!(self.0.kind(), NodeKind::Pattern { anchored: true })
    }

    /// Returns the pattern segments in source order.
    pub fn segments(&self) -> Children<'a> {
        self.0.children()
    }

    /// Returns true if the pattern has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments().len() == 0
    }

    /// Returns true if the pattern ends in a directory separator.
    pub fn is_directory(&self) -> bool {
        self.segments()
            .next_back()
            .is_some_and(|s| s.kind() == NodeKind::DirectorySeparator)
    }
}

impl Display for Pattern<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Typed view of a [`NodeKind::Owner`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner<'a>(pub(crate) Node<'a>);

impl<'a> Owner<'a> {
    /// Returns the underlying node.
    pub fn node(&self) -> Node<'a> {
        self.0
    }

    /// Returns the owner exactly as written (e.g., "@org/team").
    pub fn text(&self) -> &'a str {
        self.0.text()
    }

    /// Returns the owner's source location.
    pub fn span(&self) -> Span {
        self.0.span()
    }

    /// Classifies the owner by its lexical shape.
    pub fn kind(&self) -> OwnerKind<'a> {
        classify_owner(self.text())
    }
}

impl Display for Owner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
