//! Pruned pre-order traversal
//!
//! [`DescendantsTrimmed`] walks the element descendants of a node without
//! recursion. It keeps one child cursor per open level on an explicit stack,
//! so depth is bounded by memory rather than by the call stack.
//!
//! Every visited element is yielded. When the predicate matches an element,
//! its children are not visited: the element itself still appears in the
//! output but nothing below it does.

use crate::tree::{Elements, NodeRef};

/// Iterator returned by [`NodeRef::descendants_trimmed`]
pub struct DescendantsTrimmed<'a, P> {
    stack: Vec<Elements<'a>>,
    predicate: P,
}

impl<'a, P> Iterator for DescendantsTrimmed<'a, P>
where
    P: FnMut(NodeRef<'a>) -> bool,
{
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<NodeRef<'a>> {
        while let Some(cursor) = self.stack.last_mut() {
            match cursor.next() {
                Some(node) => {
                    if !(self.predicate)(node) {
                        self.stack.push(node.elements());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

impl<'a> NodeRef<'a> {
    /// Element descendants in pre-order, skipping the subtrees of elements
    /// for which `predicate` returns `true`
    ///
    /// The node itself is never yielded or tested.
    ///
    /// ```
    /// use toctree_core::Tree;
    ///
    /// let tree = Tree::parse(b"<body><p><r/></p><tbl><tr/></tbl><p/></body>")?;
    /// let names: Vec<_> = tree
    ///     .root()
    ///     .descendants_trimmed(|e| e.name() == Some("tbl"))
    ///     .map(|e| e.name().unwrap())
    ///     .collect();
    /// assert_eq!(names, vec!["p", "r", "tbl", "p"]);
    /// # Ok::<(), toctree_core::TreeError>(())
    /// ```
    pub fn descendants_trimmed<P>(self, predicate: P) -> DescendantsTrimmed<'a, P>
    where
        P: FnMut(NodeRef<'a>) -> bool,
    {
        DescendantsTrimmed {
            stack: vec![self.elements()],
            predicate,
        }
    }

    /// [`descendants_trimmed`](Self::descendants_trimmed) pruning below
    /// every element named `name`
    pub fn descendants_trimmed_by_name(
        self,
        name: impl Into<String>,
    ) -> DescendantsTrimmed<'a, impl FnMut(NodeRef<'a>) -> bool> {
        let name = name.into();
        self.descendants_trimmed(move |node| node.name() == Some(name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::{NodeId, NodeRef, Tree};

    //     root
    //     ├── a
    //     │   ├── a1
    //     │   │   └── a1x
    //     │   └── a2
    //     ├── b
    //     │   └── b1
    //     └── c
    fn sample() -> Tree {
        let mut tree = Tree::new("root");
        let root = tree.root_id();
        let a = tree.append_element(root, "a").unwrap();
        let a1 = tree.append_element(a, "a1").unwrap();
        tree.append_element(a1, "a1x").unwrap();
        tree.append_text(a, "text between").unwrap();
        tree.append_element(a, "a2").unwrap();
        let b = tree.append_element(root, "b").unwrap();
        tree.append_element(b, "b1").unwrap();
        tree.append_element(root, "c").unwrap();
        tree
    }

    fn names<'a>(nodes: impl Iterator<Item = NodeRef<'a>>) -> Vec<&'a str> {
        nodes.map(|n| n.name().unwrap()).collect()
    }

    #[test]
    fn test_never_pruning_gives_full_preorder() {
        let tree = sample();
        let out = names(tree.root().descendants_trimmed(|_| false));
        assert_eq!(out, vec!["a", "a1", "a1x", "a2", "b", "b1", "c"]);
    }

    #[test]
    fn test_pruned_node_is_emitted_but_not_its_subtree() {
        let tree = sample();
        let out = names(tree.root().descendants_trimmed_by_name("a"));
        assert_eq!(out, vec!["a", "b", "b1", "c"]);
    }

    #[test]
    fn test_prune_nested_level() {
        let tree = sample();
        let out = names(tree.root().descendants_trimmed(|n| n.name() == Some("a1")));
        assert_eq!(out, vec!["a", "a1", "a2", "b", "b1", "c"]);
    }

    #[test]
    fn test_always_pruning_gives_children_only() {
        let tree = sample();
        let out = names(tree.root().descendants_trimmed(|_| true));
        assert_eq!(out, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_no_descendant_of_pruned_node_appears() {
        let tree = sample();
        let pruned: Vec<NodeId> = tree
            .root()
            .descendants_trimmed(|n| matches!(n.name(), Some("a" | "b")))
            .filter(|n| matches!(n.name(), Some("a" | "b")))
            .map(|n| n.id())
            .collect();
        assert_eq!(pruned.len(), 2);
        for node in tree.root().descendants_trimmed(|n| matches!(n.name(), Some("a" | "b"))) {
            let mut ancestor = node.parent();
            while let Some(a) = ancestor {
                assert!(!pruned.contains(&a.id()), "{:?} is below a pruned node", node);
                ancestor = a.parent();
            }
        }
    }

    #[test]
    fn test_empty_root() {
        let tree = Tree::new("root");
        assert_eq!(tree.root().descendants_trimmed(|_| false).count(), 0);
    }

    #[test]
    fn test_start_below_root() {
        let tree = sample();
        let a = tree.root().elements().next().unwrap();
        let out = names(a.descendants_trimmed(|_| false));
        assert_eq!(out, vec!["a1", "a1x", "a2"]);
    }

    #[test]
    fn test_predicate_sees_each_node_once() {
        let tree = sample();
        let mut seen = Vec::new();
        let count = tree
            .root()
            .descendants_trimmed(|n| {
                seen.push(n.name().unwrap().to_string());
                false
            })
            .count();
        assert_eq!(count, 7);
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn test_deep_tree_does_not_overflow() {
        let mut tree = Tree::new("root");
        let mut parent = tree.root_id();
        for _ in 0..200_000 {
            parent = tree.append_element(parent, "level").unwrap();
        }
        assert_eq!(tree.root().descendants_trimmed(|_| false).count(), 200_000);
    }
}
