use std::io;
use std::path::PathBuf;

use search_tree::TreeError;
use thiserror::Error;

use crate::product::{MAX_MARGIN, MIN_DESCRIPTION_LEN, MIN_MARGIN};

/// A product record that cannot be accepted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProductError {
    #[error("expected 4 or 5 `;`-separated fields, found {0}")]
    FieldCount(usize),

    #[error("unknown product kind `{0}`")]
    UnknownKind(String),

    #[error("description must have at least {min} characters", min = MIN_DESCRIPTION_LEN)]
    ShortDescription,

    #[error("invalid cost `{0}`")]
    InvalidCost(String),

    #[error("invalid margin `{0}`")]
    InvalidMargin(String),

    #[error("margin {0} outside [{min}, {max}]", min = MIN_MARGIN, max = MAX_MARGIN)]
    MarginOutOfRange(f64),

    #[error("perishable product needs an expiry date")]
    MissingExpiry,

    #[error("invalid expiry date `{0}`, expected dd/mm/yyyy")]
    InvalidExpiry(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SupplierError {
    #[error("supplier name must have at least two words: `{0}`")]
    ShortName(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: read failed")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("line 1: invalid product count `{0}`")]
    InvalidCount(String),

    #[error("expected {expected} products, input ends after {found}")]
    Truncated { expected: usize, found: usize },

    #[error("line {line}: {source}")]
    InvalidProduct {
        line: usize,
        #[source]
        source: ProductError,
    },

    #[error(transparent)]
    Tree(#[from] TreeError),
}
