use thiserror::Error;

/// Failures reported by [`SearchMap`](crate::SearchMap) operations.
///
/// Neither variant leaves the tree modified.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The requested key is not stored in the tree.
    #[error("key not found in tree")]
    KeyNotFound,

    /// `remove` was called on a tree with no root.
    #[error("tree is empty")]
    EmptyCollection,
}

pub type Result<T> = std::result::Result<T, TreeError>;
