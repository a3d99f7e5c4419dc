//! Pure lookups over a product list. Order of the input is preserved.

use models::Product;

pub fn find_by_id<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.id == id)
}

pub fn by_category<'a>(products: &'a [Product], category: &str) -> Vec<&'a Product> {
    products.iter().filter(|p| p.category == category).collect()
}

/// Case-insensitive substring match over name, description and category.
pub fn search<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let needle = term.to_lowercase();
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
                || p.category.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Distinct categories in first-seen order.
pub fn categories(products: &[Product]) -> Vec<&str> {
    let mut seen = Vec::new();
    for p in products {
        if !seen.contains(&p.category.as_str()) {
            seen.push(p.category.as_str());
        }
    }
    seen
}
