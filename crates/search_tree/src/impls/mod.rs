mod avl;
mod bst;

pub use avl::AvlTree;
pub use bst::{BinarySearchTree, IntoIter, SizePolicy};
