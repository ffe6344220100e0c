//! An AVL tree of exclusively-owned, boxed nodes.
#![cfg_attr(not(test), no_std)]

// Conventions used in comments:
// - The height of a node `x` is denoted `h(x)`. A leaf has height 1 and a missing child has
//   height 0.
// - The balance factor of a node `x` is `bf(x) = h(left(x)) - h(right(x))`.
// - A node is `d`-heavy if its `d` subtree is the taller one.
//
// The fundamental invariants of an AVL tree are:
// 1. `bf(x) ∈ {-1, 0, 1}` for every node `x`.
// 2. `h(x) = 1 + max(h(left(x)), h(right(x)))` for every node `x`.
//
// Corollaries:
// 3. Insertion raises the height of at most one subtree on the search path by one. The lowest
//    ancestor that becomes 2-heavy is fixed by a single or double rotation, and the rotated
//    subtree gets back its height from before the insertion.
//
// 4. Removal lowers the height of at most one subtree on the search path by one. The rotation
//    that fixes a 2-heavy ancestor may itself lower the height of the rotated subtree, so the
//    fixup must be carried all the way to the root.

extern crate alloc;
#[cfg(all(feature = "model", not(test)))]
extern crate std;

use alloc::boxed::Box;
use core::{borrow::Borrow, cmp::Ordering, fmt, mem, ops::Not};

use log::trace;

mod debug;
mod iter;
#[cfg(any(test, feature = "model"))]
pub mod model;

pub use iter::PreOrder;

/// A self-balancing binary search tree.
///
/// Every node stores the height of the subtree rooted at it. After each insertion or removal the
/// heights along the search path are refreshed bottom-up and any node whose subtrees differ in
/// height by more than one is restored by a rotation, so the tree height stays within
/// _O(log(n))_.
#[derive(Clone)]
pub struct AvlTree<K> {
    root: Link<K>,
    len: usize,
}

/// A node of an [`AvlTree`].
#[derive(Clone)]
pub struct Node<K> {
    key: K,
    height: u8,
    children: [Link<K>; 2],
}

type Link<K> = Option<Box<Node<K>>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

impl<K> AvlTree<K> {
    /// Returns a new empty tree.
    pub const fn new() -> AvlTree<K> {
        AvlTree { root: None, len: 0 }
    }

    /// Returns `true` if the tree contains no elements.
    pub const fn is_empty(&self) -> bool {
        let empty = self.len() == 0;

        if cfg!(debug_assertions) {
            // Can't use assert_eq!() in const fn.
            assert!(empty == self.root.is_none());
        }

        empty
    }

    /// Returns the number of elements in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the height of the tree, which is 0 if the tree is empty.
    pub fn height(&self) -> u8 {
        height(&self.root)
    }

    /// Returns the root node of the tree.
    pub fn root(&self) -> Option<&Node<K>> {
        self.root.as_deref()
    }

    /// Returns an iterator over the keys of the tree in pre-order.
    ///
    /// Each node is yielded before the nodes of its left subtree, which are in turn yielded
    /// before the nodes of its right subtree.
    pub fn pre_order(&self) -> PreOrder<'_, K> {
        PreOrder::new(self)
    }

    /// Clears the tree, removing all elements.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }
}

impl<K: Ord> AvlTree<K> {
    /// Inserts `key` into the tree.
    ///
    /// Returns `false` if the tree already contained `key`, in which case the tree is left
    /// untouched.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn insert(&mut self, key: K) -> bool {
        let inserted = insert_at(&mut self.root, key);

        if inserted {
            self.len += 1;
        }

        inserted
    }

    /// Removes `key` from the tree.
    ///
    /// Returns `false` if the tree did not contain `key`.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Removes `key` from the tree and returns the key that was stored.
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = remove_at(&mut self.root, key)?;
        self.len -= 1;
        Some(removed)
    }

    /// Returns a reference to the node holding `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&Node<K>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut opt_cur = self.root.as_deref();

        loop {
            let cur = opt_cur?;

            match key.cmp(cur.key.borrow()) {
                Ordering::Less => opt_cur = cur.left(),
                Ordering::Equal => return Some(cur),
                Ordering::Greater => opt_cur = cur.right(),
            }
        }
    }

    /// Returns `true` if the tree contains `key`.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        let count = self
            .root
            .as_deref()
            .map_or(0, |root| root.assert_invariants_at(None, None));

        assert_eq!(count, self.len, "tree length does not match node count");
    }
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for AvlTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.pre_order()).finish()
    }
}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K> Node<K> {
    fn leaf(key: K) -> Box<Node<K>> {
        Box::new(Node {
            key,
            height: 1,
            children: [None, None],
        })
    }

    /// Returns the key stored in this node.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the height of the subtree rooted at this node. Leaves have height 1.
    #[inline]
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Returns the left child of this node.
    #[inline]
    pub fn left(&self) -> Option<&Node<K>> {
        self.child(Dir::Left)
    }

    /// Returns the right child of this node.
    #[inline]
    pub fn right(&self) -> Option<&Node<K>> {
        self.child(Dir::Right)
    }

    /// Returns the height of the left subtree minus the height of the right subtree.
    #[inline]
    pub fn balance_factor(&self) -> i8 {
        height(self.link(Dir::Left)) as i8 - height(self.link(Dir::Right)) as i8
    }

    #[inline]
    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    #[inline]
    fn child(&self, dir: Dir) -> Option<&Node<K>> {
        self.children[dir as usize].as_deref()
    }

    #[inline]
    fn link(&self, dir: Dir) -> &Link<K> {
        &self.children[dir as usize]
    }

    #[inline]
    fn link_mut(&mut self, dir: Dir) -> &mut Link<K> {
        &mut self.children[dir as usize]
    }

    #[inline]
    fn update_height(&mut self) {
        self.height = 1 + height(self.link(Dir::Left)).max(height(self.link(Dir::Right)));
    }

    // Returns the number of nodes in the subtree.
    fn assert_invariants_at(&self, lower: Option<&K>, upper: Option<&K>) -> usize
    where
        K: Ord,
    {
        // Ensure the key lies strictly between the keys of its ancestors.
        if let Some(lower) = lower {
            assert!(*lower < self.key, "key is not greater than its left ancestor");
        }
        if let Some(upper) = upper {
            assert!(self.key < *upper, "key is not less than its right ancestor");
        }

        let mut count = 1;

        for dir in [Dir::Left, Dir::Right] {
            if let Some(child) = self.child(dir) {
                let (lower, upper) = match dir {
                    Dir::Left => (lower, Some(&self.key)),
                    Dir::Right => (Some(&self.key), upper),
                };

                count += child.assert_invariants_at(lower, upper);
            }
        }

        if self.is_leaf() {
            assert_eq!(self.height, 1);
        }

        // Ensure the cached height is up to date.
        let expected = 1 + height(self.link(Dir::Left)).max(height(self.link(Dir::Right)));
        assert_eq!(self.height, expected, "stale height");

        // Ensure subtree heights differ by at most one.
        assert!(
            (-1..=1).contains(&self.balance_factor()),
            "balance factor out of range"
        );

        count
    }
}

impl<K: fmt::Debug> fmt::Debug for Node<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("height", &self.height)
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

/// Returns the height of the pointed-to node.
#[inline]
fn height<K>(link: &Link<K>) -> u8 {
    link.as_ref().map_or(0, |node| node.height)
}

// Performs a rotation towards `dir` at `root`, moving its `!dir` child up and `root` itself down.
//
// The heights of the two moved nodes are refreshed; all other subtrees keep their heights.
//
// Panics if `root` has no `!dir` child.
fn rotate<K>(root: &mut Box<Node<K>>, dir: Dir) {
    let mut up = root
        .link_mut(!dir)
        .take()
        .expect("rotation requires a child on the opposite side");

    // `across` goes from the `dir` child of `up` to the `!dir` child of `down`.
    let across = up.link_mut(dir).take();
    *root.link_mut(!dir) = across;
    root.update_height();

    // `root` now holds `up`, and `up` holds the node moving down.
    mem::swap(root, &mut up);
    let down = up;
    *root.link_mut(dir) = Some(down);
    root.update_height();
}

// Performs a double rotation towards `dir` at `root`: first towards `!dir` at the `!dir` child,
// then towards `dir` at `root`.
fn rotate_twice<K>(root: &mut Box<Node<K>>, dir: Dir) {
    if let Some(child) = root.link_mut(!dir).as_mut() {
        rotate(child, !dir);
    }

    rotate(root, dir);
}

// Inserts `key` into the subtree at `link`. Returns `false` if the key was already present.
fn insert_at<K: Ord>(link: &mut Link<K>, key: K) -> bool {
    match link {
        Some(node) => insert_below(node, key),
        None => {
            *link = Some(Node::leaf(key));
            true
        }
    }
}

fn insert_below<K: Ord>(node: &mut Box<Node<K>>, key: K) -> bool {
    let dir = match key.cmp(&node.key) {
        Ordering::Less => Dir::Left,
        Ordering::Equal => return false,
        Ordering::Greater => Dir::Right,
    };

    // Where the new key lands relative to the child it descends into. `key` is moved into its
    // node, so the comparison is made on the way down.
    let child_ord = node.child(dir).map(|child| key.cmp(&child.key));

    if !insert_at(node.link_mut(dir), key) {
        return false;
    }

    node.update_height();

    if let Some(child_ord) = child_ord {
        rebalance_inserted(node, child_ord);
    }

    true
}

// Restores balance at `node` after an insertion below it.
//
// `child_ord` is the ordering of the inserted key relative to the child it was inserted under. If
// `node` is 2-heavy, the insertion went into its heavy side and that child was not rotated (its
// subtree grew), so `child_ord` still describes the current child.
fn rebalance_inserted<K>(node: &mut Box<Node<K>>, child_ord: Ordering) {
    let balance = node.balance_factor();

    let heavy = if balance > 1 {
        Dir::Left
    } else if balance < -1 {
        Dir::Right
    } else {
        return;
    };

    debug_assert_ne!(child_ord, Ordering::Equal);

    // The key landed on the outside of the heavy child: left of a left child or right of a right
    // child.
    let outside = match heavy {
        Dir::Left => child_ord == Ordering::Less,
        Dir::Right => child_ord == Ordering::Greater,
    };

    if outside {
        trace!("insert: single rotation towards {:?}", !heavy);
        rotate(node, !heavy);
    } else {
        trace!("insert: double rotation towards {:?}", !heavy);
        rotate_twice(node, !heavy);
    }
}

// Restores balance at `node` after a removal below it, refreshing its height first.
fn rebalance_removed<K>(node: &mut Box<Node<K>>) {
    node.update_height();

    let balance = node.balance_factor();

    let heavy = if balance > 1 {
        Dir::Left
    } else if balance < -1 {
        Dir::Right
    } else {
        return;
    };

    // The key that was removed is gone, so the shape of the heavy child decides the case. A
    // single rotation suffices unless the heavy child leans towards the inside.
    let child_balance = node.child(heavy).map_or(0, Node::balance_factor);
    let leans_inside = match heavy {
        Dir::Left => child_balance < 0,
        Dir::Right => child_balance > 0,
    };

    if leans_inside {
        trace!("remove: double rotation towards {:?}", !heavy);
        rotate_twice(node, !heavy);
    } else {
        trace!("remove: single rotation towards {:?}", !heavy);
        rotate(node, !heavy);
    }
}

// Removes `key` from the subtree at `link` and returns the stored key.
fn remove_at<K, Q>(link: &mut Link<K>, key: &Q) -> Option<K>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    let node = link.as_mut()?;

    let removed = match key.cmp(node.key.borrow()) {
        Ordering::Less => remove_at(node.link_mut(Dir::Left), key)?,
        Ordering::Greater => remove_at(node.link_mut(Dir::Right), key)?,

        // With two children, the successor's key moves into this node and the successor is
        // removed from the right subtree instead.
        Ordering::Equal if node.left().is_some() && node.right().is_some() => {
            let successor = remove_min(node.link_mut(Dir::Right))?;
            mem::replace(&mut node.key, successor)
        }

        // With at most one child, the child (if any) is elevated to replace the node. The child
        // subtree is already balanced and there is nothing left here to fix up.
        Ordering::Equal => return unlink(link),
    };

    rebalance_removed(node);

    Some(removed)
}

// Removes the minimum node of the subtree at `link` and returns its key.
fn remove_min<K>(link: &mut Link<K>) -> Option<K> {
    let node = link.as_mut()?;

    if node.left().is_none() {
        return unlink(link);
    }

    let min = remove_min(node.link_mut(Dir::Left));
    rebalance_removed(node);
    min
}

// Removes the node at `link`, which must have at most one child, and elevates its child (if any)
// to replace it.
fn unlink<K>(link: &mut Link<K>) -> Option<K> {
    let node = link.take()?;
    let Node {
        key,
        children: [left, right],
        ..
    } = *node;

    debug_assert!(left.is_none() || right.is_none(), "node has two children");

    *link = left.or(right);

    Some(key)
}

#[cfg(test)]
mod rotation_tests {
    use super::*;

    fn node(key: u32, left: Link<u32>, right: Link<u32>) -> Link<u32> {
        let mut node = Node::leaf(key);
        node.children = [left, right];
        node.update_height();
        Some(node)
    }

    fn keys(node: &Node<u32>) -> ([Option<u32>; 2], u8) {
        (
            [node.left().map(|n| n.key), node.right().map(|n| n.key)],
            node.height,
        )
    }

    #[test]
    fn height_of_missing_node_is_zero() {
        assert_eq!(height::<u32>(&None), 0);
        assert_eq!(height(&node(1, None, None)), 1);
    }

    #[test]
    fn balance_factor_of_unary_nodes() {
        let left_only = node(2, node(1, None, None), None).unwrap();
        assert_eq!(left_only.balance_factor(), 1);

        let right_only = node(2, None, node(3, None, None)).unwrap();
        assert_eq!(right_only.balance_factor(), -1);
    }

    #[test]
    fn rotate_right_moves_across_subtree() {
        // 4(2(1, 3), 5) rotated right becomes 2(1, 4(3, 5)).
        let mut root = node(
            4,
            node(2, node(1, None, None), node(3, None, None)),
            node(5, None, None),
        )
        .unwrap();

        rotate(&mut root, Dir::Right);

        assert_eq!(root.key, 2);
        assert_eq!(keys(&root), ([Some(1), Some(4)], 3));

        let down = root.right().unwrap();
        assert_eq!(keys(down), ([Some(3), Some(5)], 2));
    }

    #[test]
    fn rotate_left_moves_across_subtree() {
        // 2(1, 4(3, 5)) rotated left becomes 4(2(1, 3), 5).
        let mut root = node(
            2,
            node(1, None, None),
            node(4, node(3, None, None), node(5, None, None)),
        )
        .unwrap();

        rotate(&mut root, Dir::Left);

        assert_eq!(root.key, 4);
        assert_eq!(keys(&root), ([Some(2), Some(5)], 3));

        let down = root.left().unwrap();
        assert_eq!(keys(down), ([Some(1), Some(3)], 2));
    }

    #[test]
    fn double_rotation_lifts_grandchild() {
        // 3(1(_, 2), _) becomes 2(1, 3).
        let mut root = node(3, node(1, None, node(2, None, None)), None).unwrap();

        rotate_twice(&mut root, Dir::Right);

        assert_eq!(root.key, 2);
        assert_eq!(keys(&root), ([Some(1), Some(3)], 2));
        assert!(root.left().unwrap().is_leaf());
        assert!(root.right().unwrap().is_leaf());
    }

    #[test]
    #[should_panic(expected = "rotation requires a child on the opposite side")]
    fn rotation_without_pivot_panics() {
        let mut root = node(1, None, None).unwrap();
        rotate(&mut root, Dir::Right);
    }
}
