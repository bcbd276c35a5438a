//! The catalog product record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::id::ProductId;
use super::image::ImageData;
use super::price::Price;

/// A product as persisted in the catalog store.
///
/// Serialized field names match the store documents (`nome`, `preco`, ...).
/// The opaque store document key is not part of the record; see
/// [`DocId`](super::id::DocId).
///
/// Invariant at save time (enforced by the admin panel, not the store):
/// at least one image and a price > 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Numeric business id, unique, assigned once at creation.
    pub id: ProductId,
    /// Display name, non-empty.
    #[serde(rename = "nome")]
    pub name: String,
    /// Unit price, > 0.
    #[serde(rename = "preco")]
    pub price: Price,
    /// Category slug used for filtering.
    #[serde(rename = "categoria")]
    pub category: Category,
    /// Ordered image payloads, at least one.
    #[serde(rename = "imagens")]
    pub images: Vec<ImageData>,
    /// Featured products sort first and carry a badge.
    #[serde(rename = "destaque", default)]
    pub featured: bool,
    /// Optional free-text description.
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Stamped when the document is created. Not used by business logic.
    #[serde(rename = "criadoEm", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Stamped on every update. Not used by business logic.
    #[serde(rename = "atualizadoEm", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// First image, used for cart lines and list thumbnails.
    #[must_use]
    pub fn first_image(&self) -> Option<&ImageData> {
        self.images.first()
    }
}

/// Sort products for storefront display: featured first, then ascending
/// by business id. The sort is stable, so equal-featured products keep
/// their relative order before the id tiebreak applies.
pub fn sort_for_display(products: &mut [Product]) {
    products.sort_by_key(|p| (!p.featured, p.id));
}

/// Compute the business id for a new product: `max existing id + 1`, or 1
/// for an empty catalog. Gaps left by deletions are never reused.
pub fn next_product_id<'a, I>(products: I) -> ProductId
where
    I: IntoIterator<Item = &'a Product>,
{
    let max = products
        .into_iter()
        .map(|p| p.id.as_i64())
        .max()
        .unwrap_or(0);
    ProductId::new(max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, featured: bool) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Produto {id}"),
            price: Price::parse("10").expect("valid price"),
            category: Category::slugify("croche").expect("valid category"),
            images: vec![ImageData::new("data:image/jpeg;base64,AAAA")],
            featured,
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn display_sort_puts_featured_first_then_id() {
        let mut products = vec![
            product(3, false),
            product(1, false),
            product(4, true),
            product(2, true),
        ];
        sort_for_display(&mut products);

        let order: Vec<(i64, bool)> = products
            .iter()
            .map(|p| (p.id.as_i64(), p.featured))
            .collect();
        assert_eq!(order, vec![(2, true), (4, true), (1, false), (3, false)]);
    }

    #[test]
    fn display_sort_places_every_featured_before_every_regular() {
        let mut products = vec![
            product(9, false),
            product(8, true),
            product(7, false),
            product(6, true),
            product(5, false),
        ];
        sort_for_display(&mut products);

        let first_regular = products
            .iter()
            .position(|p| !p.featured)
            .expect("has regular items");
        assert!(products.iter().take(first_regular).all(|p| p.featured));
        assert!(products.iter().skip(first_regular).all(|p| !p.featured));
    }

    #[test]
    fn next_id_is_max_plus_one_not_first_gap() {
        let products = vec![product(1, false), product(3, false), product(4, true)];
        assert_eq!(next_product_id(&products), ProductId::new(5));
    }

    #[test]
    fn next_id_starts_at_one_for_empty_catalog() {
        let none: Vec<Product> = Vec::new();
        assert_eq!(next_product_id(&none), ProductId::new(1));
    }
}
