//! Product CRUD route handlers.
//!
//! One page drives everything: the product form (add or edit mode) next
//! to the product list. Mutations are classic form POSTs that bounce back
//! to the panel with a flash message; validation failures re-render the
//! form with the submitted values so the operator can correct and retry.

use askama::Template;
use axum::{
    Form, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use maos_de_fada_core::{Category, DocId, Price, Product, next_product_id};

use crate::error::Result;
use crate::filters;
use crate::images::{self, UploadedFile};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;
use crate::store::{StoreError, StoredProduct};

/// Upper bound for one multipart submission: a handful of images at the
/// 5 MB per-file cap plus form fields.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Fixed category choices offered in the select, value/label pairs. The
/// extra `nova` choice opens the free-text field.
const CATEGORY_CHOICES: &[(&str, &str)] = &[
    ("croche", "Crochê"),
    ("trico", "Tricô"),
    ("amigurumi", "Amigurumi"),
    ("bordado", "Bordado"),
];

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/products", post(create))
        .route("/products/{doc_id}/edit", get(edit))
        .route("/products/{doc_id}", post(update))
        .route("/products/{doc_id}/featured", post(toggle_featured))
        .route("/products/{doc_id}/delete", post(delete))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

// =============================================================================
// Templates
// =============================================================================

/// Product view for the admin list.
#[derive(Debug, Clone)]
pub struct AdminProductView {
    pub doc_id: String,
    pub id: i64,
    pub name: String,
    pub price: String,
    pub category: String,
    pub featured: bool,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub image_count: usize,
}

impl From<&StoredProduct> for AdminProductView {
    fn from(stored: &StoredProduct) -> Self {
        let product = &stored.product;
        Self {
            doc_id: stored.doc_id.to_string(),
            id: product.id.as_i64(),
            name: product.name.clone(),
            price: product.price.display(),
            category: product.category.as_str().to_owned(),
            featured: product.featured,
            description: product.description.clone(),
            images: product
                .images
                .iter()
                .map(|img| img.as_str().to_owned())
                .collect(),
            image_count: product.images.len(),
        }
    }
}

/// Current form field values, echoed back on validation failure.
#[derive(Debug, Clone, Default)]
pub struct ProductFormView {
    pub name: String,
    pub price: String,
    pub category: String,
    pub new_category: String,
    pub featured: bool,
    pub description: String,
}

/// Edit-mode marker: the target document and what the operator needs to
/// know about its persisted images.
#[derive(Debug, Clone)]
pub struct EditingView {
    pub doc_id: String,
    pub name: String,
    pub image_count: usize,
}

/// One option of the category select.
#[derive(Debug, Clone)]
pub struct CategoryOptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Panel page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct AdminIndexTemplate {
    pub products: Vec<AdminProductView>,
    pub total: usize,
    pub form: ProductFormView,
    pub editing: Option<EditingView>,
    pub category_options: Vec<CategoryOptionView>,
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Build the category select options, keeping whatever slug is currently
/// selected visible even if it is not one of the fixed choices.
fn category_options(selected: &str) -> Vec<CategoryOptionView> {
    let mut options: Vec<CategoryOptionView> = CATEGORY_CHOICES
        .iter()
        .map(|(value, label)| CategoryOptionView {
            value: (*value).to_string(),
            label: (*label).to_string(),
            selected: *value == selected,
        })
        .collect();

    let known = selected.is_empty()
        || selected == "nova"
        || CATEGORY_CHOICES.iter().any(|(value, _)| *value == selected);
    if !known {
        options.push(CategoryOptionView {
            value: selected.to_string(),
            label: selected.to_string(),
            selected: true,
        });
    }

    options.push(CategoryOptionView {
        value: "nova".to_string(),
        label: "➕ Nova Categoria".to_string(),
        selected: selected == "nova",
    });

    options
}

fn render(template: &AdminIndexTemplate) -> Response {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
    .into_response()
}

// =============================================================================
// Flash helpers
// =============================================================================

/// Flash query parameters carried across the post-redirect-get bounce.
#[derive(Debug, Deserialize)]
pub struct FlashQuery {
    pub success: Option<String>,
    pub error: Option<String>,
}

fn redirect_success(message: &str) -> Response {
    Redirect::to(&format!("/?success={}", urlencoding::encode(message))).into_response()
}

fn redirect_error(message: &str) -> Response {
    Redirect::to(&format!("/?error={}", urlencoding::encode(message))).into_response()
}

/// Append per-file upload warnings to a flash message.
fn with_warnings(message: &str, warnings: &[String]) -> String {
    if warnings.is_empty() {
        message.to_string()
    } else {
        format!("{message} {}", warnings.join(" "))
    }
}

// =============================================================================
// Form parsing & validation
// =============================================================================

/// Raw product form as submitted, before validation.
#[derive(Debug, Default)]
pub struct ProductForm {
    pub name: String,
    pub price_raw: String,
    pub category_choice: String,
    pub new_category: String,
    pub featured: bool,
    pub description: String,
    pub uploads: Vec<UploadedFile>,
}

impl ProductForm {
    fn to_view(&self) -> ProductFormView {
        ProductFormView {
            name: self.name.clone(),
            price: self.price_raw.clone(),
            category: self.category_choice.clone(),
            new_category: self.new_category.clone(),
            featured: self.featured,
            description: self.description.clone(),
        }
    }
}

/// Validated form fields, ready to become a [`Product`].
#[derive(Debug)]
struct ValidatedInput {
    name: String,
    price: Price,
    category: Category,
    featured: bool,
    description: Option<String>,
}

/// Read the multipart product form. Image parts are collected raw; the
/// ingestion pipeline validates them afterwards.
async fn read_product_form(mut multipart: Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };
        match name.as_str() {
            "nome" => form.name = field.text().await?.trim().to_string(),
            "preco" => form.price_raw = field.text().await?,
            "categoria" => form.category_choice = field.text().await?,
            "novaCategoria" => form.new_category = field.text().await?,
            // A checkbox only shows up when checked
            "destaque" => form.featured = true,
            "descricao" => form.description = field.text().await?.trim().to_string(),
            "imagens" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field.bytes().await?;
                // An untouched file picker still submits one empty part
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.uploads.push(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Validate the text fields of the product form.
fn validate_form(form: &ProductForm) -> std::result::Result<ValidatedInput, String> {
    if form.name.is_empty() {
        return Err("❌ Por favor, digite o nome do produto!".to_string());
    }

    let price = Price::parse(&form.price_raw)
        .map_err(|_| "❌ Por favor, digite um preço válido!".to_string())?;

    let category = if form.category_choice == "nova" {
        Category::slugify(&form.new_category)
            .map_err(|_| "❌ Por favor, digite o nome da nova categoria!".to_string())?
    } else if form.category_choice.is_empty() {
        return Err("❌ Por favor, selecione uma categoria!".to_string());
    } else {
        Category::from_stored(form.category_choice.clone())
    };

    let description = if form.description.is_empty() {
        None
    } else {
        Some(form.description.clone())
    };

    Ok(ValidatedInput {
        name: form.name.clone(),
        price,
        category,
        featured: form.featured,
        description,
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Panel page handler.
///
/// GET /
#[instrument(skip(_auth, state))]
pub async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> Response {
    let (stored, load_error) = match state.store().fetch_products().await {
        Ok(stored) => (stored, None),
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            (
                Vec::new(),
                Some("❌ Erro ao carregar produtos. Verifique sua conexão com a internet.".to_string()),
            )
        }
    };

    let products: Vec<AdminProductView> = stored.iter().map(AdminProductView::from).collect();
    let template = AdminIndexTemplate {
        total: products.len(),
        products,
        form: ProductFormView::default(),
        editing: None,
        category_options: category_options(""),
        success: flash.success,
        error: flash.error.or(load_error),
    };

    render(&template)
}

/// Re-render the panel with the submitted form values and an error
/// message, preserving whatever the operator already typed.
async fn render_form_error(
    state: &AppState,
    form: &ProductForm,
    editing: Option<EditingView>,
    error: String,
) -> Response {
    let stored = state.store().fetch_products().await.unwrap_or_default();
    let products: Vec<AdminProductView> = stored.iter().map(AdminProductView::from).collect();

    let template = AdminIndexTemplate {
        total: products.len(),
        products,
        form: form.to_view(),
        editing,
        category_options: category_options(&form.category_choice),
        success: None,
        error: Some(error),
    };

    render(&template)
}

/// Create a new product.
///
/// POST /products (multipart)
#[instrument(skip(_auth, state, multipart))]
pub async fn create(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let form = read_product_form(multipart).await?;
    let (images, warnings) = images::ingest_files(&form.uploads);

    let input = match validate_form(&form) {
        Ok(input) => input,
        Err(message) => {
            return Ok(render_form_error(&state, &form, None, with_warnings(&message, &warnings))
                .await);
        }
    };

    if images.is_empty() {
        let message = "❌ Por favor, selecione pelo menos uma imagem!";
        return Ok(render_form_error(&state, &form, None, with_warnings(message, &warnings)).await);
    }

    // Next id = max existing + 1. Two racing admin sessions can collide
    // here; the store does not arbitrate (accepted gap, see DESIGN.md).
    let stored = match state.store().fetch_products().await {
        Ok(stored) => stored,
        Err(e) => {
            tracing::error!("Failed to fetch products for id assignment: {e}");
            let message = "❌ Erro ao salvar produto. Verifique sua conexão com a internet.";
            return Ok(render_form_error(&state, &form, None, message.to_string()).await);
        }
    };
    let id = next_product_id(stored.iter().map(|s| &s.product));

    let product = Product {
        id,
        name: input.name.clone(),
        price: input.price,
        category: input.category,
        images,
        featured: input.featured,
        description: input.description,
        created_at: Some(Utc::now()),
        updated_at: None,
    };

    match state.store().add(&product).await {
        Ok(doc_id) => {
            tracing::info!(%id, %doc_id, "product created");
            let message = format!("✅ Produto \"{}\" adicionado com sucesso!", input.name);
            Ok(redirect_success(&with_warnings(&message, &warnings)))
        }
        Err(e) => {
            tracing::error!("Failed to create product: {e}");
            let message = "❌ Erro ao salvar produto. Verifique sua conexão com a internet.";
            Ok(render_form_error(&state, &form, None, message.to_string()).await)
        }
    }
}

/// Load a product into the form for editing.
///
/// GET /products/{doc_id}/edit
#[instrument(skip(_auth, state))]
pub async fn edit(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Response {
    let doc_id = DocId::new(doc_id);

    let product = match state.store().get(&doc_id).await {
        Ok(product) => product,
        Err(StoreError::NotFound) => {
            return redirect_error("❌ Produto não encontrado!");
        }
        Err(e) => {
            tracing::error!("Failed to load product for editing: {e}");
            return redirect_error("❌ Erro ao abrir edição. Verifique sua conexão com a internet.");
        }
    };

    let stored = state.store().fetch_products().await.unwrap_or_default();
    let products: Vec<AdminProductView> = stored.iter().map(AdminProductView::from).collect();

    let form = ProductFormView {
        name: product.name.clone(),
        price: product.price.amount().to_string(),
        category: product.category.as_str().to_owned(),
        new_category: String::new(),
        featured: product.featured,
        description: product.description.clone().unwrap_or_default(),
    };

    let template = AdminIndexTemplate {
        total: products.len(),
        products,
        category_options: category_options(product.category.as_str()),
        editing: Some(EditingView {
            doc_id: doc_id.to_string(),
            name: product.name,
            image_count: product.images.len(),
        }),
        form,
        success: None,
        error: None,
    };

    render(&template)
}

/// Update an existing product.
///
/// POST /products/{doc_id} (multipart). No newly-uploaded images means
/// "keep the persisted ones"; the business id never changes.
#[instrument(skip(_auth, state, multipart))]
pub async fn update(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let doc_id = DocId::new(doc_id);
    let form = read_product_form(multipart).await?;
    let (images, warnings) = images::ingest_files(&form.uploads);

    let current = match state.store().get(&doc_id).await {
        Ok(product) => product,
        Err(StoreError::NotFound) => {
            return Ok(redirect_error("❌ Produto não encontrado!"));
        }
        Err(e) => {
            tracing::error!("Failed to load product for update: {e}");
            return Ok(redirect_error(
                "❌ Erro ao atualizar produto. Verifique sua conexão com a internet.",
            ));
        }
    };

    let editing = EditingView {
        doc_id: doc_id.to_string(),
        name: current.name.clone(),
        image_count: current.images.len(),
    };

    let input = match validate_form(&form) {
        Ok(input) => input,
        Err(message) => {
            return Ok(render_form_error(
                &state,
                &form,
                Some(editing),
                with_warnings(&message, &warnings),
            )
            .await);
        }
    };

    let images = if images.is_empty() {
        current.images
    } else {
        images
    };

    let product = Product {
        id: current.id,
        name: input.name.clone(),
        price: input.price,
        category: input.category,
        images,
        featured: input.featured,
        description: input.description,
        created_at: current.created_at,
        updated_at: Some(Utc::now()),
    };

    match state.store().update(&doc_id, &product).await {
        Ok(()) => {
            tracing::info!(id = %product.id, %doc_id, "product updated");
            let message = format!("✅ Produto \"{}\" atualizado com sucesso!", input.name);
            Ok(redirect_success(&with_warnings(&message, &warnings)))
        }
        Err(StoreError::NotFound) => Ok(redirect_error("❌ Produto não encontrado!")),
        Err(e) => {
            tracing::error!("Failed to update product: {e}");
            let message = "❌ Erro ao atualizar produto. Verifique sua conexão com a internet.";
            Ok(render_form_error(&state, &form, Some(editing), message.to_string()).await)
        }
    }
}

/// Toggle-featured form data.
#[derive(Debug, Deserialize)]
pub struct ToggleFeaturedForm {
    pub destaque: bool,
}

/// Flip the featured flag of a product.
///
/// POST /products/{doc_id}/featured
#[instrument(skip(_auth, state))]
pub async fn toggle_featured(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    Form(form): Form<ToggleFeaturedForm>,
) -> Response {
    let doc_id = DocId::new(doc_id);

    match state.store().set_featured(&doc_id, form.destaque).await {
        Ok(()) => {
            let message = if form.destaque {
                "⭐ Produto marcado como destaque!"
            } else {
                "☆ Destaque removido!"
            };
            redirect_success(message)
        }
        Err(StoreError::NotFound) => redirect_error("❌ Produto não encontrado!"),
        Err(e) => {
            tracing::error!("Failed to toggle featured flag: {e}");
            redirect_error("❌ Erro ao alterar destaque. Verifique sua conexão com a internet.")
        }
    }
}

/// Delete a product.
///
/// POST /products/{doc_id}/delete - the confirmation naming the product
/// runs client-side before this handler is reached.
#[instrument(skip(_auth, state))]
pub async fn delete(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Response {
    let doc_id = DocId::new(doc_id);

    // Fetch first so the flash can name the product
    let product = match state.store().get(&doc_id).await {
        Ok(product) => product,
        Err(StoreError::NotFound) => {
            return redirect_error("❌ Produto não encontrado!");
        }
        Err(e) => {
            tracing::error!("Failed to load product for deletion: {e}");
            return redirect_error(
                "❌ Erro ao remover produto. Verifique sua conexão com a internet.",
            );
        }
    };

    match state.store().delete(&doc_id).await {
        Ok(()) => {
            tracing::info!(id = %product.id, %doc_id, "product deleted");
            redirect_success(&format!(
                "✅ Produto \"{}\" removido com sucesso!",
                product.name
            ))
        }
        Err(e) => {
            tracing::error!("Failed to delete product: {e}");
            redirect_error("❌ Erro ao remover produto. Verifique sua conexão com a internet.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_form() -> ProductForm {
        ProductForm {
            name: "Touca de lã".to_string(),
            price_raw: "45.90".to_string(),
            category_choice: "croche".to_string(),
            new_category: String::new(),
            featured: false,
            description: String::new(),
            uploads: Vec::new(),
        }
    }

    #[test]
    fn valid_form_passes_validation() {
        let input = validate_form(&base_form()).expect("valid");
        assert_eq!(input.name, "Touca de lã");
        assert_eq!(input.price.display(), "R$ 45.90");
        assert_eq!(input.category.as_str(), "croche");
        assert_eq!(input.description, None);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut form = base_form();
        form.name = String::new();
        assert!(validate_form(&form).is_err());
    }

    #[test]
    fn non_positive_or_garbage_price_is_rejected() {
        let mut form = base_form();
        form.price_raw = "0".to_string();
        assert!(validate_form(&form).is_err());

        form.price_raw = "abc".to_string();
        assert!(validate_form(&form).is_err());
    }

    #[test]
    fn missing_category_is_rejected() {
        let mut form = base_form();
        form.category_choice = String::new();
        assert!(validate_form(&form).is_err());
    }

    #[test]
    fn new_category_is_slugified() {
        let mut form = base_form();
        form.category_choice = "nova".to_string();
        form.new_category = "Tricô & Crochê!!".to_string();

        let input = validate_form(&form).expect("valid");
        assert_eq!(input.category.as_str(), "tric-croch-");
    }

    #[test]
    fn new_category_requires_text() {
        let mut form = base_form();
        form.category_choice = "nova".to_string();
        form.new_category = "   ".to_string();
        assert!(validate_form(&form).is_err());
    }

    #[test]
    fn unknown_selected_category_still_renders_as_an_option() {
        let options = category_options("la-os-de-fita");
        let extra = options
            .iter()
            .find(|o| o.value == "la-os-de-fita")
            .expect("present");
        assert!(extra.selected);
        // "nova" is always the last choice
        assert_eq!(options.last().map(|o| o.value.as_str()), Some("nova"));
    }
}
