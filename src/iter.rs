use alloc::vec::Vec;
use core::iter::FusedIterator;

use crate::{AvlTree, Node};

/// An iterator over the keys of an [`AvlTree`] in pre-order.
///
/// Created by [`AvlTree::pre_order`]. Calling that method again restarts the traversal from the
/// root.
pub struct PreOrder<'tree, K> {
    // Roots of the subtrees still to be visited, with the next one on top.
    stack: Vec<&'tree Node<K>>,
    len: usize,
}

impl<'tree, K> PreOrder<'tree, K> {
    pub(crate) fn new(tree: &'tree AvlTree<K>) -> Self {
        let mut stack = Vec::with_capacity(usize::from(tree.height()));
        stack.extend(tree.root());

        PreOrder {
            stack,
            len: tree.len(),
        }
    }
}

impl<'tree, K> Iterator for PreOrder<'tree, K> {
    type Item = &'tree K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Push the right subtree first so the left one is visited before it.
        self.stack.extend(node.right());
        self.stack.extend(node.left());
        self.len -= 1;

        Some(node.key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K> ExactSizeIterator for PreOrder<'_, K> {}

impl<K> FusedIterator for PreOrder<'_, K> {}

impl<K> Clone for PreOrder<'_, K> {
    fn clone(&self) -> Self {
        PreOrder {
            stack: self.stack.clone(),
            len: self.len,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::AvlTree;

    #[test]
    fn empty_tree_yields_nothing() {
        let tree: AvlTree<u32> = AvlTree::new();
        let mut iter = tree.pre_order();

        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn visits_node_before_children() {
        let tree: AvlTree<u32> = [2, 1, 3].into_iter().collect();

        assert_eq!(tree.pre_order().copied().collect::<Vec<_>>(), [2, 1, 3]);
    }

    #[test]
    fn is_exact_size_and_restartable() {
        let tree: AvlTree<u32> = (0..10).collect();

        let mut iter = tree.pre_order();
        assert_eq!(iter.len(), 10);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 8);

        let rest = iter.clone().count();
        assert_eq!(rest, 8);

        let first: Vec<_> = tree.pre_order().collect();
        let second: Vec<_> = tree.pre_order().collect();
        assert_eq!(first.len(), 10);
        assert_eq!(first, second);
    }
}
