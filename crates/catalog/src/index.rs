use std::cmp::Ordering;
use std::rc::Rc;
use std::time::{Duration, Instant};

use search_tree::{AvlTree, BinarySearchTree, Comparator, SearchMap};

use crate::error::CatalogError;
use crate::product::Product;

/// Case-insensitive order on product descriptions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NameOrder;

impl<S: AsRef<str> + ?Sized> Comparator<S> for NameOrder {
    fn compare(&self, a: &S, b: &S) -> Ordering {
        let a = a.as_ref().chars().flat_map(char::to_lowercase);
        let b = b.as_ref().chars().flat_map(char::to_lowercase);
        a.cmp(b)
    }
}

/// Outcome of one search on one index.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub product: Option<Rc<Product>>,
    pub comparisons: u64,
    pub elapsed_ms: f64,
}

/// The same search run on the unbalanced and the balanced index.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub unbalanced: Lookup,
    pub balanced: Lookup,
}

/// Wall-clock time spent building each index.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildTimes {
    pub bst_by_id: Duration,
    pub avl_by_id: Duration,
    pub bst_by_name: Duration,
    pub avl_by_name: Duration,
}

/// Products indexed by id and by description, each in an unbalanced and a
/// balanced tree.
///
/// The name indexes are derived from the id index, so when two products share
/// a description (ignoring case) the one with the higher id is indexed.
pub struct Catalog {
    by_id: BinarySearchTree<u32, Rc<Product>>,
    by_name: BinarySearchTree<String, Rc<Product>, NameOrder>,
    balanced_by_id: AvlTree<u32, Rc<Product>>,
    balanced_by_name: AvlTree<String, Rc<Product>, NameOrder>,
    build_times: BuildTimes,
}

impl Catalog {
    pub fn build(products: impl IntoIterator<Item = Product>) -> Self {
        let products: Vec<Rc<Product>> = products.into_iter().map(Rc::new).collect();
        let mut times = BuildTimes::default();

        let start = Instant::now();
        let mut by_id = BinarySearchTree::new();
        for product in &products {
            by_id.insert(product.id(), Rc::clone(product));
        }
        times.bst_by_id = start.elapsed();

        let start = Instant::now();
        let mut balanced_by_id = AvlTree::new();
        for product in &products {
            balanced_by_id.insert(product.id(), Rc::clone(product));
        }
        times.avl_by_id = start.elapsed();

        let start = Instant::now();
        let by_name = by_id.rekeyed_with(NameOrder, |p: &Rc<Product>| {
            p.description().to_string()
        });
        times.bst_by_name = start.elapsed();

        let start = Instant::now();
        let mut balanced_by_name = AvlTree::with_comparator(NameOrder);
        for (_, product) in by_id.iter() {
            balanced_by_name.insert(product.description().to_string(), Rc::clone(product));
        }
        times.avl_by_name = start.elapsed();

        tracing::info!(
            products = by_id.size(),
            names = by_name.size(),
            bst_height = by_id.height(),
            avl_height = balanced_by_id.height(),
            "built catalog indexes"
        );
        Self {
            by_id,
            by_name,
            balanced_by_id,
            balanced_by_name,
            build_times: times,
        }
    }

    pub fn len(&self) -> usize {
        self.by_id.size()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Every product in id order.
    pub fn products(&self) -> Vec<&Rc<Product>> {
        self.by_id.traverse()
    }

    pub fn build_times(&self) -> BuildTimes {
        self.build_times
    }

    /// Heights of the id indexes, unbalanced first.
    pub fn id_heights(&self) -> (usize, usize) {
        (self.by_id.height(), self.balanced_by_id.height())
    }

    pub fn find_by_id(&mut self, id: u32) -> Comparison {
        Comparison {
            unbalanced: lookup(&mut self.by_id, &id),
            balanced: lookup(&mut self.balanced_by_id, &id),
        }
    }

    pub fn find_by_name(&mut self, name: &str) -> Comparison {
        let key = name.trim().to_string();
        Comparison {
            unbalanced: lookup(&mut self.by_name, &key),
            balanced: lookup(&mut self.balanced_by_name, &key),
        }
    }

    /// Removes a product from every index.
    ///
    /// The name indexes are only touched when they hold this very product,
    /// not another one with the same description. When they do, the next
    /// product sharing the description takes over the name.
    pub fn remove_by_id(&mut self, id: u32) -> Result<Rc<Product>, CatalogError> {
        let product = self.by_id.remove(&id)?;
        self.balanced_by_id.remove(&id)?;

        let name = product.description().to_string();
        let mut named = false;
        if self.by_name.get(&name).is_some_and(|p| Rc::ptr_eq(p, &product)) {
            self.by_name.remove(&name)?;
            named = true;
        }
        if self
            .balanced_by_name
            .get(&name)
            .is_some_and(|p| Rc::ptr_eq(p, &product))
        {
            self.balanced_by_name.remove(&name)?;
            named = true;
        }
        if named {
            self.reindex_name(&name);
        }
        tracing::info!(id, "removed product");
        Ok(product)
    }

    /// Removes the product indexed under `name` from every index. An older
    /// product with the same description becomes reachable by name.
    pub fn remove_by_name(&mut self, name: &str) -> Result<Rc<Product>, CatalogError> {
        let key = name.trim().to_string();
        let product = self.by_name.remove(&key)?;
        self.balanced_by_name.remove(&key)?;

        let id = product.id();
        self.by_id.remove(&id)?;
        self.balanced_by_id.remove(&id)?;
        self.reindex_name(&key);
        tracing::info!(id, name = %product.description(), "removed product");
        Ok(product)
    }

    /// Indexes the highest-id product whose description matches `name`, if
    /// any is left.
    fn reindex_name(&mut self, name: &str) {
        let heir = self
            .by_id
            .iter()
            .map(|(_, product)| product)
            .filter(|product| NameOrder.compare(product.description(), name) == Ordering::Equal)
            .last()
            .cloned();
        let Some(heir) = heir else {
            return;
        };
        tracing::debug!(id = heir.id(), name = %heir.description(), "reindexed name");
        self.by_name.insert(heir.description().to_string(), Rc::clone(&heir));
        self.balanced_by_name.insert(heir.description().to_string(), heir);
    }

    pub fn range_by_id(&self, low: u32, high: u32) -> Vec<Rc<Product>> {
        self.by_id
            .range_query(&low, &high)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn range_by_name(&self, low: &str, high: &str) -> Vec<Rc<Product>> {
        self.by_name
            .range_query(&low.trim().to_string(), &high.trim().to_string())
            .into_iter()
            .cloned()
            .collect()
    }
}

fn lookup<M>(map: &mut M, key: &M::Key) -> Lookup
where
    M: SearchMap<Value = Rc<Product>>,
{
    let product = map.search(key).ok().cloned();
    Lookup {
        product,
        comparisons: map.comparisons(),
        elapsed_ms: map.elapsed_time(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, NameOrder};
    use crate::error::CatalogError;
    use crate::product::{Product, ProductKind};
    use search_tree::{Comparator, TreeError};
    use std::cmp::Ordering;
    use std::rc::Rc;

    fn product(id: u32, name: &str) -> Product {
        Product::new(id, name, 10.0, 0.2, ProductKind::NonPerishable).unwrap()
    }

    fn sample() -> Catalog {
        Catalog::build([
            product(1, "Hammer"),
            product(2, "saw blade"),
            product(3, "Drill"),
            product(4, "Anvil"),
            product(5, "Chisel"),
        ])
    }

    fn ids(products: &[Rc<Product>]) -> Vec<u32> {
        products.iter().map(|p| p.id()).collect()
    }

    #[test]
    fn name_order_ignores_case() {
        assert_eq!(NameOrder.compare("hammer", "HAMMER"), Ordering::Equal);
        assert_eq!(NameOrder.compare("Anvil", "chisel"), Ordering::Less);
        assert_eq!(NameOrder.compare("d", "Drill"), Ordering::Less);
    }

    #[test]
    fn balanced_index_needs_fewer_comparisons() {
        let mut catalog = sample();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.id_heights(), (5, 3));

        let hit = catalog.find_by_id(5);
        assert_eq!(hit.unbalanced.product.map(|p| p.id()), Some(5));
        assert_eq!(hit.balanced.product.map(|p| p.id()), Some(5));
        assert_eq!(hit.unbalanced.comparisons, 5);
        assert_eq!(hit.balanced.comparisons, 3);

        let miss = catalog.find_by_id(6);
        assert!(miss.unbalanced.product.is_none());
        assert!(miss.balanced.product.is_none());
        assert_eq!(miss.unbalanced.comparisons, 6);
    }

    #[test]
    fn finds_by_name_ignoring_case() {
        let mut catalog = sample();
        let found = catalog.find_by_name(" HAMMER ");
        assert_eq!(found.unbalanced.product.map(|p| p.id()), Some(1));
        assert_eq!(found.balanced.product.map(|p| p.id()), Some(1));
        assert!(catalog.find_by_name("Saw").unbalanced.product.is_none());
    }

    #[test]
    fn ranges() {
        let catalog = sample();
        assert_eq!(ids(&catalog.range_by_id(2, 4)), vec![2, 3, 4]);
        assert_eq!(ids(&catalog.range_by_id(4, 2)), Vec::<u32>::new());
        assert_eq!(ids(&catalog.range_by_name("a", "d")), vec![4, 5]);
        assert_eq!(ids(&catalog.range_by_name("DRILL", "Saw Blade")), vec![3, 1, 2]);
    }

    #[test]
    fn remove_by_id_clears_name_indexes() {
        let mut catalog = sample();
        assert_eq!(catalog.remove_by_id(1).unwrap().description(), "Hammer");
        assert_eq!(catalog.len(), 4);
        let gone = catalog.find_by_name("hammer");
        assert!(gone.unbalanced.product.is_none());
        assert!(gone.balanced.product.is_none());
    }

    #[test]
    fn remove_by_name_clears_id_indexes() {
        let mut catalog = sample();
        assert_eq!(catalog.remove_by_name("drill").unwrap().id(), 3);
        let gone = catalog.find_by_id(3);
        assert!(gone.unbalanced.product.is_none());
        assert!(gone.balanced.product.is_none());
        let remaining: Vec<u32> = catalog.products().iter().map(|p| p.id()).collect();
        assert_eq!(remaining, vec![1, 2, 4, 5]);
    }

    #[test]
    fn remove_missing() {
        let mut catalog = sample();
        assert!(matches!(
            catalog.remove_by_id(42),
            Err(CatalogError::Tree(TreeError::KeyNotFound))
        ));
        assert!(matches!(
            catalog.remove_by_name("Lathe"),
            Err(CatalogError::Tree(TreeError::KeyNotFound))
        ));

        let mut empty = Catalog::build([]);
        assert!(empty.is_empty());
        assert!(matches!(
            empty.remove_by_id(1),
            Err(CatalogError::Tree(TreeError::EmptyCollection))
        ));
    }

    #[test]
    fn shared_description_keeps_the_later_product() {
        let mut catalog = Catalog::build([product(1, "Hammer"), product(2, "hammer")]);
        assert_eq!(catalog.len(), 2);
        let found = catalog.find_by_name("Hammer");
        assert_eq!(found.unbalanced.product.map(|p| p.id()), Some(2));

        catalog.remove_by_id(1).unwrap();
        let still = catalog.find_by_name("hammer");
        assert_eq!(still.unbalanced.product.map(|p| p.id()), Some(2));
        assert_eq!(still.balanced.product.map(|p| p.id()), Some(2));
    }

    #[test]
    fn removing_the_indexed_product_exposes_the_earlier_one() {
        let mut catalog = Catalog::build([
            product(1, "Hammer"),
            product(2, "hammer"),
            product(3, "Drill"),
        ]);
        assert_eq!(catalog.remove_by_id(2).unwrap().id(), 2);

        let found = catalog.find_by_name("Hammer");
        assert_eq!(found.unbalanced.product.map(|p| p.id()), Some(1));
        assert_eq!(found.balanced.product.map(|p| p.id()), Some(1));
        assert_eq!(ids(&catalog.range_by_name("a", "z")), vec![3, 1]);
    }

    #[test]
    fn remove_by_name_exposes_the_earlier_product() {
        let mut catalog = Catalog::build([
            product(1, "Hammer"),
            product(2, "HAMMER"),
            product(3, "hammer"),
        ]);
        assert_eq!(catalog.remove_by_name("hammer").unwrap().id(), 3);
        assert_eq!(catalog.find_by_name("hammer").unbalanced.product.map(|p| p.id()), Some(2));
        assert_eq!(catalog.remove_by_name("hammer").unwrap().id(), 2);
        assert_eq!(catalog.find_by_name("hammer").balanced.product.map(|p| p.id()), Some(1));
        assert_eq!(catalog.remove_by_name("hammer").unwrap().id(), 1);

        assert!(catalog.is_empty());
        assert!(catalog.find_by_name("hammer").unbalanced.product.is_none());
    }
}
