use std::fmt;
use std::ops::DerefMut;

use downcast_rs::impl_downcast;

use crate::docset::DocSet;
use crate::query::Occur;
use crate::{DocId, Score};

/// Scored set of documents matching a query within a partition.
pub trait Scorer: downcast_rs::Downcast + DocSet + 'static {
    /// Returns the score of the current document.
    ///
    /// This method will perform a bit of computation and is not cached.
    fn score(&mut self) -> Score;

    /// Returns the number of clauses of this scorer matching the current document.
    ///
    /// Combinators count each of their direct clauses once. Leaves count 1.
    fn match_count(&mut self) -> u32 {
        1
    }

    /// Returns a snapshot of the scorer tree, each node reporting the
    /// document it is currently positioned on.
    fn node(&self) -> ScorerNode;

    /// Calls `visitor` on every leaf of the scorer tree, in the order
    /// [`ScorerNode::visit_leaves`] would.
    ///
    /// `occur` is the role of this scorer within its parent. Pass
    /// `Occur::Must` at the root.
    ///
    /// The default implementation walks a snapshot built by [`Scorer::node`].
    /// Combinators override it to walk their children in place.
    fn for_each_leaf(&self, occur: Occur, visitor: &mut dyn FnMut(Occur, &str, DocId)) {
        self.node().visit_leaves_with_occur(occur, &mut |leaf_occur, label, doc| {
            visitor(leaf_occur, label, doc)
        });
    }
}

impl_downcast!(Scorer);

impl Scorer for Box<dyn Scorer> {
    #[inline]
    fn score(&mut self) -> Score {
        self.deref_mut().score()
    }

    #[inline]
    fn match_count(&mut self) -> u32 {
        self.deref_mut().match_count()
    }

    fn node(&self) -> ScorerNode {
        self.as_ref().node()
    }

    fn for_each_leaf(&self, occur: Occur, visitor: &mut dyn FnMut(Occur, &str, DocId)) {
        self.as_ref().for_each_leaf(occur, visitor);
    }
}

/// Role of a node given the role of its parent and its own edge.
///
/// `MustNot` wins over `Should`, which wins over `Must`.
pub(crate) fn child_occur(parent: Occur, edge: Occur) -> Occur {
    match (parent, edge) {
        (Occur::MustNot, _) | (_, Occur::MustNot) => Occur::MustNot,
        (Occur::Should, _) | (_, Occur::Should) => Occur::Should,
        (Occur::Must, Occur::Must) => Occur::Must,
    }
}

/// Describes one node of a scorer tree.
///
/// Combinators list their children with the `Occur` under which each child
/// participates. A leaf whose `doc` equals the root's current document
/// matched it, provided the tree was traversed in doc id order.
#[derive(Clone, Debug, PartialEq)]
pub enum ScorerNode {
    /// Clause scorer reading a single posting cursor.
    Leaf {
        /// Name of the term.
        label: String,
        /// Document the cursor is positioned on.
        doc: DocId,
    },
    /// Scorer that never matches.
    Empty,
    /// Intersection of required clauses.
    Conjunction {
        /// Current document.
        doc: DocId,
        /// Required clauses.
        children: Vec<ChildNode>,
    },
    /// Heap-based disjunction requiring `minimum_match` optional clauses.
    Disjunction {
        /// Current document.
        doc: DocId,
        /// Minimum number of optional clauses a document must match.
        minimum_match: usize,
        /// Optional clauses, in no particular order.
        children: Vec<ChildNode>,
    },
    /// Windowed disjunction.
    ///
    /// Children are positioned past the buffered window rather than on the
    /// current document, and exhausted children are no longer listed.
    BucketDisjunction {
        /// Current document.
        doc: DocId,
        /// Optional clauses not yet exhausted.
        children: Vec<ChildNode>,
    },
    /// Positive scorer filtered by prohibited clauses.
    Exclusion {
        /// Current document.
        doc: DocId,
        /// The positive scorer followed by prohibited clauses.
        children: Vec<ChildNode>,
    },
    /// Required scorer, optionally boosted by optional clauses.
    RequiredOptional {
        /// Current document.
        doc: DocId,
        /// The required scorer followed by the optional one.
        children: Vec<ChildNode>,
    },
}

/// Child of a [`ScorerNode`] and the role it plays in its parent.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildNode {
    /// Role of the child.
    pub occur: Occur,
    /// The child itself.
    pub node: ScorerNode,
}

impl ChildNode {
    /// Creates a new child node.
    pub fn new(occur: Occur, node: ScorerNode) -> ChildNode {
        ChildNode { occur, node }
    }
}

impl ScorerNode {
    /// Returns the document the node is positioned on.
    pub fn doc(&self) -> Option<DocId> {
        match self {
            ScorerNode::Leaf { doc, .. }
            | ScorerNode::Conjunction { doc, .. }
            | ScorerNode::Disjunction { doc, .. }
            | ScorerNode::BucketDisjunction { doc, .. }
            | ScorerNode::Exclusion { doc, .. }
            | ScorerNode::RequiredOptional { doc, .. } => Some(*doc),
            ScorerNode::Empty => None,
        }
    }

    /// Returns the children of the node.
    pub fn children(&self) -> &[ChildNode] {
        match self {
            ScorerNode::Leaf { .. } | ScorerNode::Empty => &[],
            ScorerNode::Conjunction { children, .. }
            | ScorerNode::Disjunction { children, .. }
            | ScorerNode::BucketDisjunction { children, .. }
            | ScorerNode::Exclusion { children, .. }
            | ScorerNode::RequiredOptional { children, .. } => children,
        }
    }

    /// Visits every leaf of the tree.
    ///
    /// The `Occur` given to the visitor is `MustNot` if any ancestor edge is
    /// `MustNot`, `Should` if any ancestor edge is `Should`, and `Must` otherwise.
    pub fn visit_leaves<F: FnMut(Occur, &str, DocId)>(&self, visitor: &mut F) {
        self.visit_leaves_with_occur(Occur::Must, visitor);
    }

    fn visit_leaves_with_occur<F: FnMut(Occur, &str, DocId)>(&self, occur: Occur, visitor: &mut F) {
        match self {
            ScorerNode::Leaf { label, doc } => visitor(occur, label, *doc),
            ScorerNode::Empty => {}
            _ => {
                for child in self.children() {
                    child
                        .node
                        .visit_leaves_with_occur(child_occur(occur, child.occur), visitor);
                }
            }
        }
    }

    fn name(&self) -> String {
        match self {
            ScorerNode::Leaf { label, .. } => format!("Leaf({label})"),
            ScorerNode::Empty => "Empty".to_string(),
            ScorerNode::Conjunction { .. } => "Conjunction".to_string(),
            ScorerNode::Disjunction { minimum_match, .. } => {
                format!("Disjunction(minimum_match={minimum_match})")
            }
            ScorerNode::BucketDisjunction { .. } => "BucketDisjunction".to_string(),
            ScorerNode::Exclusion { .. } => "Exclusion".to_string(),
            ScorerNode::RequiredOptional { .. } => "RequiredOptional".to_string(),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter, occur: char, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{occur}{}", "", self.name(), indent = depth * 2)?;
        if let Some(doc) = self.doc() {
            write!(f, " @{doc}")?;
        }
        writeln!(f)?;
        for child in self.children() {
            child
                .node
                .fmt_indented(f, child.occur.to_char(), depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ScorerNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_indented(f, ' ', 0)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChildNode, ScorerNode};
    use crate::query::Occur;

    fn leaf(label: &str, doc: u32) -> ScorerNode {
        ScorerNode::Leaf {
            label: label.to_string(),
            doc,
        }
    }

    #[test]
    fn test_visit_leaves_composes_occur() {
        let tree = ScorerNode::Exclusion {
            doc: 3,
            children: vec![
                ChildNode::new(
                    Occur::Must,
                    ScorerNode::RequiredOptional {
                        doc: 3,
                        children: vec![
                            ChildNode::new(Occur::Must, leaf("a", 3)),
                            ChildNode::new(Occur::Should, leaf("b", 5)),
                        ],
                    },
                ),
                ChildNode::new(Occur::MustNot, leaf("c", 4)),
            ],
        };
        let mut leaves = Vec::new();
        tree.visit_leaves(&mut |occur, label, doc| leaves.push((occur, label.to_string(), doc)));
        assert_eq!(
            leaves,
            vec![
                (Occur::Must, "a".to_string(), 3),
                (Occur::Should, "b".to_string(), 5),
                (Occur::MustNot, "c".to_string(), 4),
            ]
        );
    }

    #[test]
    fn test_display_scorer_tree() {
        let tree = ScorerNode::Conjunction {
            doc: 2,
            children: vec![
                ChildNode::new(Occur::Must, leaf("a", 2)),
                ChildNode::new(Occur::Must, leaf("b", 2)),
            ],
        };
        assert_eq!(
            tree.to_string(),
            " Conjunction @2\n  +Leaf(a) @2\n  +Leaf(b) @2\n"
        );
    }
}
