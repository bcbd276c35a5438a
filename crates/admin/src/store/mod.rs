//! Catalog store CRUD client.
//!
//! Full create/read/update/delete access to the product collection over
//! the Firestore REST API. Every operation is a single request/response
//! round trip; concurrent admin sessions are not coordinated (see the
//! next-id note in `routes::products`).

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use maos_de_fada_core::{DocId, Product, doc};

use crate::config::FirestoreConfig;

/// Page size requested from the store when listing.
const PAGE_SIZE: &str = "300";

/// Errors that can occur when talking to the catalog store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned status {status}")]
    Status { status: u16, body: String },

    /// The requested document does not exist (deleted by another session).
    #[error("document not found")]
    NotFound,

    /// A document did not match the catalog schema.
    #[error("invalid document: {0}")]
    InvalidDocument(#[from] doc::DocError),
}

/// A product together with its opaque store document key.
#[derive(Debug, Clone)]
pub struct StoredProduct {
    pub doc_id: DocId,
    pub product: Product,
}

/// One page of a collection listing.
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Value>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

/// CRUD client for the product collection.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<CatalogStoreInner>,
}

struct CatalogStoreInner {
    client: reqwest::Client,
    collection_url: String,
    api_key: String,
}

impl CatalogStore {
    /// Create a new catalog store client.
    #[must_use]
    pub fn new(config: &FirestoreConfig) -> Self {
        let collection_url = format!("{}/{}", config.documents_url(), config.collection);

        Self {
            inner: Arc::new(CatalogStoreInner {
                client: reqwest::Client::new(),
                collection_url,
                api_key: config.api_key.clone(),
            }),
        }
    }

    fn document_url(&self, doc_id: &DocId) -> String {
        format!("{}/{}", self.inner.collection_url, doc_id)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Fetch every product with its document key, ordered ascending by
    /// business id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unreachable, answers with
    /// an error status, or returns a document that does not decode.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<StoredProduct>, StoreError> {
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

            let response = Self::check_status(request.send().await?).await?;
            let page: ListResponse = response.json().await?;
            for document in &page.documents {
                let (doc_id, product) = doc::product_from_document(document)?;
                products.push(StoredProduct { doc_id, product });
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(count = products.len(), "fetched products from catalog store");
        Ok(products)
    }

    /// Fetch a single product by document key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the document no longer
    /// exists, other [`StoreError`] variants on transport or decode
    /// failures.
    #[instrument(skip(self))]
    pub async fn get(&self, doc_id: &DocId) -> Result<Product, StoreError> {
        let response = self
            .inner
            .client
            .get(self.document_url(doc_id))
            .query(&[("key", self.inner.api_key.as_str())])
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let document: Value = response.json().await?;
        let (_, product) = doc::product_from_document(&document)?;
        Ok(product)
    }

    /// Create a new product document. Returns the store-assigned key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failures or error statuses.
    #[instrument(skip(self, product), fields(id = %product.id))]
    pub async fn add(&self, product: &Product) -> Result<DocId, StoreError> {
        let body = json!({ "fields": doc::product_to_fields(product) });
        let response = self
            .inner
            .client
            .post(&self.inner.collection_url)
            .query(&[("key", self.inner.api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let document: Value = response.json().await?;
        let name = document
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Ok(doc::doc_id_from_name(name))
    }

    /// Update the mutable fields of an existing document.
    ///
    /// The update mask covers exactly the fields the panel may change;
    /// the business id and creation timestamp are never patched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the document no longer
    /// exists, other [`StoreError`] variants otherwise.
    #[instrument(skip(self, product), fields(doc_id = %doc_id))]
    pub async fn update(&self, doc_id: &DocId, product: &Product) -> Result<(), StoreError> {
        let mut query: Vec<(&str, &str)> = vec![("key", self.inner.api_key.as_str())];
        for field in doc::MUTABLE_FIELDS {
            query.push(("updateMask.fieldPaths", field));
        }

        let body = json!({ "fields": doc::product_to_fields(product) });
        let response = self
            .inner
            .client
            .patch(self.document_url(doc_id))
            .query(&query)
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Flip the featured flag of an existing document, leaving every
    /// other field untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the document no longer
    /// exists, other [`StoreError`] variants otherwise.
    #[instrument(skip(self))]
    pub async fn set_featured(&self, doc_id: &DocId, featured: bool) -> Result<(), StoreError> {
        let body = json!({ "fields": doc::featured_to_fields(featured) });
        let response = self
            .inner
            .client
            .patch(self.document_url(doc_id))
            .query(&[
                ("key", self.inner.api_key.as_str()),
                ("updateMask.fieldPaths", "destaque"),
            ])
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Delete a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failures or error statuses.
    #[instrument(skip(self))]
    pub async fn delete(&self, doc_id: &DocId) -> Result<(), StoreError> {
        let response = self
            .inner
            .client
            .delete(self.document_url(doc_id))
            .query(&[("key", self.inner.api_key.as_str())])
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}
