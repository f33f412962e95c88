use super::product::{canonical_name, Product, ProductId};

/// Read-only view over the caller-supplied product catalog snapshot.
#[derive(Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    /// Match by canonical (lower-cased, trimmed) display name.
    pub fn find_by_canonical_name(&self, name: &str) -> Option<&Product> {
        let wanted = canonical_name(name);
        self.products.iter().find(|product| product.canonical_name() == wanted)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            cost: 1.0,
            quantity: 1.0,
            package_size: 1.0,
            unit: "lb".to_string(),
            is_available: None,
            current_stock: None,
            reorder_point: None,
            substitutes: Vec::new(),
        }
    }

    #[test]
    fn find_by_canonical_name_ignores_case() {
        let catalog = Catalog::new(vec![product("p1", "Strawberries")]);
        assert!(catalog.find_by_canonical_name("strawberries").is_some());
        assert!(catalog.find_by_canonical_name(" STRAWBERRIES ").is_some());
        assert!(catalog.find_by_canonical_name("blueberries").is_none());
    }
}
