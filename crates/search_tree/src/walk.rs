use std::cmp::Ordering;

use crate::order::Comparator;

/// Read-only view of a tree node, shared by every realization so the
/// in-order and range walks are written once.
pub(crate) trait Branch {
    type Key;
    type Value;

    fn key(&self) -> &Self::Key;
    fn value(&self) -> &Self::Value;
    fn left(&self) -> Option<&Self>;
    fn right(&self) -> Option<&Self>;
}

/// In-order node iterator over an explicit stack, so depth is bounded by the
/// heap rather than the call stack.
pub(crate) struct InOrder<'a, N> {
    stack: Vec<&'a N>,
}

impl<'a, N: Branch> InOrder<'a, N> {
    pub(crate) fn new(root: Option<&'a N>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut cur: Option<&'a N>) {
        while let Some(node) = cur {
            self.stack.push(node);
            cur = node.left();
        }
    }
}

impl<'a, N: Branch> Iterator for InOrder<'a, N> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some(node)
    }
}

/// Values whose keys lie in `[low, high]`, ascending.
///
/// Subtrees left of `low` are never entered and the walk stops at the first
/// key above `high`, so the cost is the height plus the size of the result.
pub(crate) fn range<'a, N, C>(
    root: Option<&'a N>,
    order: &C,
    low: &N::Key,
    high: &N::Key,
) -> Vec<&'a N::Value>
where
    N: Branch,
    C: Comparator<N::Key>,
{
    let mut out = Vec::new();
    let mut stack: Vec<&'a N> = Vec::new();
    let mut cur = root;
    loop {
        while let Some(node) = cur {
            if order.compare(node.key(), low) == Ordering::Less {
                cur = node.right();
            } else {
                stack.push(node);
                cur = node.left();
            }
        }
        let Some(node) = stack.pop() else {
            break;
        };
        if order.compare(node.key(), high) == Ordering::Greater {
            break;
        }
        out.push(node.value());
        cur = node.right();
    }
    out
}

/// Number of levels on the longest root-to-leaf path.
pub(crate) fn height<N: Branch>(root: Option<&N>) -> usize {
    let mut deepest = 0;
    let mut stack: Vec<(&N, usize)> = root.into_iter().map(|n| (n, 1)).collect();
    while let Some((node, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        stack.extend(node.left().map(|n| (n, depth + 1)));
        stack.extend(node.right().map(|n| (n, depth + 1)));
    }
    deepest
}
