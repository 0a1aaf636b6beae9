use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::CatalogError;
use crate::product::{IdSequence, Product};

/// Reads a product file: the number of products on the first line, then one
/// `kind;description;cost;margin[;expiry]` record per line.
///
/// Ids are issued from `ids` in file order. Lines past the announced count
/// are ignored.
pub fn read_products<R: BufRead>(
    reader: R,
    ids: &mut IdSequence,
) -> Result<Vec<Product>, CatalogError> {
    let mut lines = reader.lines().enumerate();

    let count = match lines.next() {
        Some((_, line)) => {
            let line = line.map_err(|source| CatalogError::Read { line: 1, source })?;
            line.trim()
                .parse::<usize>()
                .map_err(|_| CatalogError::InvalidCount(line.trim().to_string()))?
        }
        None => return Err(CatalogError::InvalidCount(String::new())),
    };

    let mut products = Vec::with_capacity(count);
    for (index, line) in lines.by_ref().take(count) {
        let number = index + 1;
        let line = line.map_err(|source| CatalogError::Read { line: number, source })?;
        let product = Product::parse(&line, ids.issue())
            .map_err(|source| CatalogError::InvalidProduct { line: number, source })?;
        products.push(product);
    }
    if products.len() < count {
        return Err(CatalogError::Truncated {
            expected: count,
            found: products.len(),
        });
    }

    let extra = lines.count();
    if extra > 0 {
        tracing::warn!(extra, "ignoring lines past the announced product count");
    }
    tracing::debug!(products = products.len(), "read product records");
    Ok(products)
}

pub fn load_products(path: &Path, ids: &mut IdSequence) -> Result<Vec<Product>, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let products = read_products(BufReader::new(file), ids)?;
    tracing::info!(path = %path.display(), products = products.len(), "loaded products");
    Ok(products)
}
