//! Catalog page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use maos_de_fada_core::{Product, sort_for_display};

use crate::filters;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub category: String,
    pub images: Vec<String>,
    pub featured: bool,
    pub description: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            price: product.price.display(),
            category: product.category.as_str().to_owned(),
            images: product
                .images
                .iter()
                .map(|img| img.as_str().to_owned())
                .collect(),
            featured: product.featured,
            description: product.description.clone(),
        }
    }
}

/// Catalog page query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Transient notice shown in a banner (e.g. the empty-cart warning
    /// bounced back from checkout).
    pub aviso: Option<String>,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogIndexTemplate {
    pub products: Vec<ProductView>,
    pub categories: Vec<String>,
    pub load_error: bool,
    pub notice: Option<String>,
    pub cart: CartView,
}

/// Distinct category slugs in display order, for the filter buttons.
fn category_filters(products: &[ProductView]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for product in products {
        if !categories.contains(&product.category) {
            categories.push(product.category.clone());
        }
    }
    categories
}

/// Display the catalog page.
///
/// Loading fails soft: a store error renders an empty grid with an error
/// banner instead of failing the whole page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
    session: Session,
) -> CatalogIndexTemplate {
    let (mut products, load_error) = match state.catalog().fetch_products().await {
        Ok(products) => (products, false),
        Err(e) => {
            tracing::error!("Failed to load products: {e}");
            (Vec::new(), true)
        }
    };

    sort_for_display(&mut products);
    let products: Vec<ProductView> = products.iter().map(ProductView::from).collect();
    let categories = category_filters(&products);
    let cart = CartView::from(&crate::routes::cart::session_cart(&session).await);

    CatalogIndexTemplate {
        products,
        categories,
        load_error,
        notice: query.aviso,
        cart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(category: &str) -> ProductView {
        ProductView {
            id: 1,
            name: "p".to_owned(),
            price: "R$ 1.00".to_owned(),
            category: category.to_owned(),
            images: vec![],
            featured: false,
            description: None,
        }
    }

    #[test]
    fn category_filters_are_distinct_and_keep_display_order() {
        let products = vec![
            view("croche"),
            view("amigurumi"),
            view("croche"),
            view("bordado"),
        ];
        assert_eq!(
            category_filters(&products),
            vec!["croche", "amigurumi", "bordado"]
        );
    }
}
