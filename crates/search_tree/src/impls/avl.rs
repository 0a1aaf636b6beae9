use std::cmp::Ordering;

use crate::order::{Comparator, NaturalOrder};
use crate::stats::SearchStats;
use crate::walk::{self, Branch, InOrder};
use crate::{Result, SearchMap, TreeError};

/// Height-balanced realization of [`SearchMap`], kept next to
/// [`BinarySearchTree`](crate::BinarySearchTree) to compare search costs.
///
/// Height stays logarithmic, so the rebalancing descents recurse.
pub struct AvlTree<K, V, C = NaturalOrder> {
    root: Link<K, V>,
    order: C,
    len: usize,
    stats: SearchStats,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    height: i16,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        }
    }

    fn height(node: &Link<K, V>) -> i16 {
        node.as_ref().map(|n| n.height).unwrap_or(0)
    }

    fn recalc(&mut self) {
        let hl = Self::height(&self.left);
        let hr = Self::height(&self.right);
        self.height = 1 + hl.max(hr);
    }

    fn balance_factor(&self) -> i16 {
        Self::height(&self.left) - Self::height(&self.right)
    }
}

impl<K, V> Branch for Node<K, V> {
    type Key = K;
    type Value = V;

    fn key(&self) -> &K {
        &self.key
    }

    fn value(&self) -> &V {
        &self.value
    }

    fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }
}

impl<K: Ord, V> AvlTree<K, V> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K, V, C: Comparator<K>> AvlTree<K, V, C> {
    pub fn with_comparator(order: C) -> Self {
        Self {
            root: None,
            order,
            len: 0,
            stats: SearchStats::default(),
        }
    }

    pub fn height(&self) -> usize {
        Node::height(&self.root) as usize
    }

    /// Lookup that leaves the search statistics untouched.
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            match self.order.compare(key, &node.key) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => cur = node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        InOrder::new(self.root.as_deref()).map(|node| (&node.key, &node.value))
    }

    fn rotate_right(mut root: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let Some(mut left) = root.left.take() else {
            return root;
        };
        root.left = left.right.take();
        root.recalc();
        left.right = Some(root);
        left.recalc();
        left
    }

    fn rotate_left(mut root: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let Some(mut right) = root.right.take() else {
            return root;
        };
        root.right = right.left.take();
        root.recalc();
        right.left = Some(root);
        right.recalc();
        right
    }

    fn rebalance(mut root: Box<Node<K, V>>) -> Box<Node<K, V>> {
        root.recalc();
        let bf = root.balance_factor();
        if bf > 1 {
            if let Some(left) = root.left.take() {
                root.left = Some(if left.balance_factor() < 0 {
                    Self::rotate_left(left)
                } else {
                    left
                });
            }
            return Self::rotate_right(root);
        }
        if bf < -1 {
            if let Some(right) = root.right.take() {
                root.right = Some(if right.balance_factor() > 0 {
                    Self::rotate_right(right)
                } else {
                    right
                });
            }
            return Self::rotate_left(root);
        }
        root
    }

    fn pop_min(mut node: Box<Node<K, V>>) -> (Link<K, V>, Box<Node<K, V>>) {
        let Some(left) = node.left.take() else {
            let right = node.right.take();
            return (right, node);
        };
        let (new_left, min_node) = Self::pop_min(left);
        node.left = new_left;
        (Some(Self::rebalance(node)), min_node)
    }

    /// Returns the new subtree and whether a node was created.
    fn insert_node(order: &C, root: Link<K, V>, key: K, value: V) -> (Link<K, V>, bool) {
        let Some(mut node) = root else {
            return (Some(Box::new(Node::new(key, value))), true);
        };

        match order.compare(&key, &node.key) {
            Ordering::Less => {
                let (left, inserted) = Self::insert_node(order, node.left.take(), key, value);
                node.left = left;
                (Some(Self::rebalance(node)), inserted)
            }
            Ordering::Greater => {
                let (right, inserted) = Self::insert_node(order, node.right.take(), key, value);
                node.right = right;
                (Some(Self::rebalance(node)), inserted)
            }
            Ordering::Equal => {
                node.value = value;
                (Some(node), false)
            }
        }
    }

    fn remove_node(order: &C, root: Link<K, V>, key: &K) -> (Link<K, V>, Option<V>) {
        let Some(mut node) = root else {
            return (None, None);
        };

        match order.compare(key, &node.key) {
            Ordering::Less => {
                let (left, removed) = Self::remove_node(order, node.left.take(), key);
                node.left = left;
                (Some(Self::rebalance(node)), removed)
            }
            Ordering::Greater => {
                let (right, removed) = Self::remove_node(order, node.right.take(), key);
                node.right = right;
                (Some(Self::rebalance(node)), removed)
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, right) => (right, Some(node.value)),
                (left, None) => (left, Some(node.value)),
                (Some(left), Some(right)) => {
                    let (new_right, succ) = Self::pop_min(right);
                    let removed = std::mem::replace(&mut node.value, succ.value);
                    node.key = succ.key;
                    node.left = Some(left);
                    node.right = new_right;
                    (Some(Self::rebalance(node)), Some(removed))
                }
            },
        }
    }
}

impl<K, V, C> SearchMap for AvlTree<K, V, C>
where
    C: Comparator<K>,
{
    type Key = K;
    type Value = V;

    fn size(&self) -> usize {
        self.len
    }

    fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn search(&mut self, key: &K) -> Result<&V> {
        self.stats.begin();
        let mut cur = self.root.as_deref();
        let found = loop {
            self.stats.tick();
            let Some(node) = cur else {
                break None;
            };
            match self.order.compare(key, &node.key) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => cur = node.right.as_deref(),
                Ordering::Equal => break Some(&node.value),
            }
        };
        self.stats.finish();
        found.ok_or(TreeError::KeyNotFound)
    }

    fn insert(&mut self, key: K, value: V) -> usize {
        let (root, inserted) = Self::insert_node(&self.order, self.root.take(), key, value);
        self.root = root;
        if inserted {
            self.len += 1;
        }
        self.len
    }

    fn remove(&mut self, key: &K) -> Result<V> {
        if self.root.is_none() {
            return Err(TreeError::EmptyCollection);
        }
        self.search(key)?;

        let (root, removed) = Self::remove_node(&self.order, self.root.take(), key);
        self.root = root;
        let value = removed.ok_or(TreeError::KeyNotFound)?;
        self.len -= 1;
        Ok(value)
    }

    fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn traverse(&self) -> Vec<&V> {
        self.iter().map(|(_, value)| value).collect()
    }

    fn range_query(&self, low: &K, high: &K) -> Vec<&V> {
        walk::range(self.root.as_deref(), &self.order, low, high)
    }
}

impl<K, V, C> Default for AvlTree<K, V, C>
where
    C: Comparator<K> + Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}
