//! Catalog store read client.
//!
//! The storefront only ever reads the product collection; all writes go
//! through the admin binary. Documents travel in the Firestore REST
//! format and are decoded by [`maos_de_fada_core::doc`].

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use maos_de_fada_core::{Product, doc};

use crate::config::FirestoreConfig;

/// Page size requested from the store; the catalog is small, so one page
/// is the common case.
const PAGE_SIZE: &str = "300";

/// Errors that can occur when reading the catalog store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned status {status}")]
    Status { status: u16, body: String },

    /// A document did not match the catalog schema.
    #[error("invalid document: {0}")]
    InvalidDocument(#[from] doc::DocError),
}

/// One page of a collection listing.
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Value>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

/// Read-only client for the product collection.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    collection_url: String,
    api_key: String,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &FirestoreConfig) -> Self {
        let collection_url = format!("{}/{}", config.documents_url(), config.collection);

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                collection_url,
                api_key: config.api_key.clone(),
            }),
        }
    }

    /// Fetch every product, ordered ascending by business id.
    ///
    /// The ordering is requested from the store; callers re-sort for
    /// display (featured first) as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unreachable, answers with
    /// an error status, or returns a document that does not decode.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, StoreError> {
        let mut products = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .inner
                .client
                .get(&self.inner.collection_url)
                .query(&[
                    ("orderBy", "id"),
                    ("pageSize", PAGE_SIZE),
                    ("key", self.inner.api_key.as_str()),
                ]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(StoreError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let page: ListResponse = response.json().await?;
            for document in &page.documents {
                let (_, product) = doc::product_from_document(document)?;
                products.push(product);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(count = products.len(), "fetched products from catalog store");
        Ok(products)
    }
}
