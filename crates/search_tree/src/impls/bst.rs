use std::cmp::Ordering;
use std::fmt;

use crate::order::{Comparator, NaturalOrder};
use crate::stats::SearchStats;
use crate::walk::{self, Branch, InOrder};
use crate::{Result, SearchMap, TreeError};

/// How the size counter reacts to an insert that overwrites an existing key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SizePolicy {
    /// Count distinct keys.
    #[default]
    Distinct,
    /// Count every insert call, overwrites included. The counter then drifts
    /// above the number of stored keys, as it did in earlier benchmark output.
    EveryInsert,
}

/// Unbalanced binary search tree ordered by an injected comparator.
///
/// Insertion order decides the shape: monotonic keys build a chain as tall
/// as the tree is large. Every descent runs in a loop, so a degenerate tree
/// costs time but never call-stack depth.
pub struct BinarySearchTree<K, V, C = NaturalOrder> {
    root: Link<K, V>,
    order: C,
    size: usize,
    policy: SizePolicy,
    stats: SearchStats,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
        }
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

/// Drops a subtree without recursing once per level.
fn dismantle<K, V>(root: Link<K, V>) {
    let mut stack: Vec<Box<Node<K, V>>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

impl<K: Ord, V> BinarySearchTree<K, V> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K, V, C: Comparator<K>> BinarySearchTree<K, V, C> {
    pub fn with_comparator(order: C) -> Self {
        Self {
            root: None,
            order,
            size: 0,
            policy: SizePolicy::Distinct,
            stats: SearchStats::default(),
        }
    }

    pub fn with_size_policy(mut self, policy: SizePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn size_policy(&self) -> SizePolicy {
        self.policy
    }

    pub fn comparator(&self) -> &C {
        &self.order
    }

    /// Structural node count, independent of the size counter.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn height(&self) -> usize {
        walk::height(self.root.as_deref())
    }

    /// Lookup that leaves the search statistics untouched.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|node| &node.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        InOrder::new(self.root.as_deref()).map(|node| (&node.key, &node.value))
    }

    pub fn clear(&mut self) {
        dismantle(self.root.take());
        self.size = 0;
    }

    /// Builds a tree holding the same values keyed by `extractor`, under the
    /// natural order of the new key.
    ///
    /// Values are visited in this tree's key order; when two values extract
    /// the same key, the later one wins.
    pub fn rekeyed<K2, F>(&self, extractor: F) -> BinarySearchTree<K2, V>
    where
        K2: Ord,
        V: Clone,
        F: FnMut(&V) -> K2,
    {
        self.rekeyed_with(NaturalOrder, extractor)
    }

    /// [`rekeyed`](Self::rekeyed) with an explicit order for the new key.
    pub fn rekeyed_with<K2, C2, F>(
        &self,
        order: C2,
        mut extractor: F,
    ) -> BinarySearchTree<K2, V, C2>
    where
        C2: Comparator<K2>,
        V: Clone,
        F: FnMut(&V) -> K2,
    {
        let mut tree = BinarySearchTree::with_comparator(order);
        let mut visited = 0usize;
        for (_, value) in self.iter() {
            tree.insert(extractor(value), value.clone());
            visited += 1;
        }
        tracing::debug!(
            visited,
            distinct = tree.size,
            collisions = visited - tree.size,
            "rekeyed search tree"
        );
        tree
    }

    /// Consuming [`rekeyed`](Self::rekeyed): values are moved, not cloned.
    pub fn into_rekeyed<K2, F>(self, mut extractor: F) -> BinarySearchTree<K2, V>
    where
        K2: Ord,
        F: FnMut(&V) -> K2,
    {
        let mut tree = BinarySearchTree::new();
        for (_, value) in self {
            let key = extractor(&value);
            tree.insert(key, value);
        }
        tree
    }

    fn find(&self, key: &K) -> Option<&Node<K, V>> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            match self.order.compare(key, &node.key) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => cur = node.right.as_deref(),
                Ordering::Equal => return Some(node),
            }
        }
        None
    }

    /// Detaches the node at `link` and returns its value.
    ///
    /// A node with two children takes over its in-order successor's entry
    /// and the successor, which has no left child, is spliced out instead.
    fn unlink(link: &mut Link<K, V>) -> Option<V> {
        let mut node = link.take()?;
        match (node.left.take(), node.right.take()) {
            (None, None) => Some(node.value),
            (Some(child), None) | (None, Some(child)) => {
                *link = Some(child);
                Some(node.value)
            }
            (Some(left), Some(right)) => {
                let mut right = Some(right);
                let successor = Self::pop_min(&mut right)?;
                let value = std::mem::replace(&mut node.value, successor.value);
                node.key = successor.key;
                node.left = Some(left);
                node.right = right;
                *link = Some(node);
                Some(value)
            }
        }
    }

    fn pop_min(mut link: &mut Link<K, V>) -> Link<K, V> {
        while link.as_ref().is_some_and(|node| node.left.is_some()) {
            if let Some(node) = link {
                link = &mut node.left;
            }
        }
        let mut min = link.take()?;
        *link = min.right.take();
        Some(min)
    }
}

impl<K, V, C> SearchMap for BinarySearchTree<K, V, C>
where
    C: Comparator<K>,
{
    type Key = K;
    type Value = V;

    fn size(&self) -> usize {
        self.size
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
        let order = &self.order;
        let mut link = &mut self.root;
        while let Some(node) = link {
            match order.compare(&key, &node.key) {
                Ordering::Less => link = &mut node.left,
                Ordering::Greater => link = &mut node.right,
                Ordering::Equal => {
                    node.value = value;
                    if self.policy == SizePolicy::EveryInsert {
                        self.size += 1;
                    }
                    return self.size;
                }
            }
        }
        *link = Some(Box::new(Node::new(key, value)));
        self.size += 1;
        self.size
    }

    fn remove(&mut self, key: &K) -> Result<V> {
        if self.root.is_none() {
            return Err(TreeError::EmptyCollection);
        }
        self.search(key)?;

        // One structural descent; the link is moved along so the match can
        // hand it to `unlink` once the key is reached.
        let order = &self.order;
        let mut link = &mut self.root;
        let value = loop {
            let turn = match link.as_deref() {
                Some(node) => order.compare(key, &node.key),
                None => return Err(TreeError::KeyNotFound),
            };
            link = match (turn, link) {
                (Ordering::Equal, found) => break Self::unlink(found),
                (Ordering::Less, Some(node)) => &mut node.left,
                (_, Some(node)) => &mut node.right,
                (_, None) => return Err(TreeError::KeyNotFound),
            };
        }
        .ok_or(TreeError::KeyNotFound)?;
        self.size = self.size.saturating_sub(1);
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

impl<K, V, C> Default for BinarySearchTree<K, V, C>
where
    C: Comparator<K> + Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C> Drop for BinarySearchTree<K, V, C> {
    fn drop(&mut self) {
        dismantle(self.root.take());
    }
}

impl<K, V, C> FromIterator<(K, V)> for BinarySearchTree<K, V, C>
where
    C: Comparator<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for BinarySearchTree<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Values joined by single spaces in ascending key order.
impl<K, V: fmt::Display, C: Comparator<K>> fmt::Display for BinarySearchTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (_, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C: Comparator<K>> fmt::Debug for BinarySearchTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Owning in-order iterator over `(key, value)` pairs.
pub struct IntoIter<K, V> {
    stack: Vec<Box<Node<K, V>>>,
}

impl<K, V> IntoIter<K, V> {
    fn push_left_spine(&mut self, mut cur: Link<K, V>) {
        while let Some(mut node) = cur {
            cur = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        self.push_left_spine(node.right.take());
        let Node { key, value, .. } = *node;
        Some((key, value))
    }
}

impl<K, V> Drop for IntoIter<K, V> {
    fn drop(&mut self) {
        for node in self.stack.drain(..) {
            dismantle(Some(node));
        }
    }
}

impl<K, V, C> IntoIterator for BinarySearchTree<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> IntoIter<K, V> {
        let mut iter = IntoIter { stack: Vec::new() };
        iter.push_left_spine(self.root.take());
        iter
    }
}
