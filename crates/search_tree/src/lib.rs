mod error;
mod order;
mod stats;
mod walk;

pub mod impls;

pub use error::{Result, TreeError};
pub use order::{Comparator, NaturalOrder};
pub use stats::SearchStats;

/// Ordered map with search instrumentation.
///
/// - Keys are unique under the map's comparator; inserting an existing key
///   overwrites its value in place.
/// - `search` resets and records [`SearchStats`]; `remove` performs a full
///   search first, so it records them too.
/// - Nodes are never exposed, only references to stored values.
pub trait SearchMap {
    type Key;
    type Value;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool;

    fn search(&mut self, key: &Self::Key) -> Result<&Self::Value>;

    /// Returns the size counter after the insert.
    fn insert(&mut self, key: Self::Key, value: Self::Value) -> usize;

    /// Fails with [`TreeError::EmptyCollection`] before looking at the key.
    fn remove(&mut self, key: &Self::Key) -> Result<Self::Value>;

    fn stats(&self) -> &SearchStats;

    fn comparisons(&self) -> u64 {
        self.stats().comparisons()
    }

    /// Elapsed time of the last search in milliseconds.
    fn elapsed_time(&self) -> f64 {
        self.stats().elapsed_time()
    }

    /// Every value in ascending key order.
    fn traverse(&self) -> Vec<&Self::Value>;

    /// Values whose keys lie in the closed interval `[low, high]`, ascending.
    /// An inverted interval yields nothing.
    fn range_query(&self, low: &Self::Key, high: &Self::Key) -> Vec<&Self::Value>;
}

pub use impls::{AvlTree, BinarySearchTree, IntoIter, SizePolicy};
