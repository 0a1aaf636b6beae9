use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::SupplierError;
use crate::product::{IdSequence, Product};

/// A supplier and the products bought from it.
///
/// Identity is the document number: two suppliers are equal iff their
/// documents are.
#[derive(Debug, Clone)]
pub struct Supplier {
    document: u32,
    name: String,
    products: Vec<Rc<Product>>,
}

impl Supplier {
    /// The trimmed name must contain at least two words.
    pub fn new(name: &str, documents: &mut IdSequence) -> Result<Self, SupplierError> {
        let name = name.trim();
        if name.split_whitespace().count() < 2 {
            return Err(SupplierError::ShortName(name.to_string()));
        }
        Ok(Self {
            document: documents.issue(),
            name: name.to_string(),
            products: Vec::new(),
        })
    }

    pub fn document(&self) -> u32 {
        self.document
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn products(&self) -> &[Rc<Product>] {
        &self.products
    }

    pub fn add_product(&mut self, product: Rc<Product>) {
        self.products.push(product);
    }
}

impl PartialEq for Supplier {
    fn eq(&self, other: &Self) -> bool {
        self.document == other.document
    }
}

impl Eq for Supplier {}

impl Hash for Supplier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.document.hash(state);
    }
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Supplier ---")?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Document: {}", self.document)?;
        writeln!(f, "--- Products ({}) ---", self.products.len())?;
        if self.products.is_empty() {
            writeln!(f, "No products registered.")?;
        }
        for product in &self.products {
            writeln!(f, "* {product}")?;
        }
        writeln!(f, "----------------")
    }
}
