//! Sell form route handlers.
//!
//! The form is posted as multipart so a photo can be uploaded. An uploaded
//! file is inlined as a `data:` URL; otherwise the `image_url` field is used.
//! Accepted listings are shown back to the seller but never join the catalog.
//!
//! The listing's image is kept in visitor storage until the seller starts a
//! new form. Pages point at `/sell/image` instead of embedding it, so a
//! rejected form can be corrected and resubmitted without the upload making
//! the round trip through the browser again.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::instrument;

use shophub_core::{Catalog, ListingDraft, SellerListing};

use super::Layout;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;
use crate::storage::Storage;

/// Category select option.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Sell form page.
#[derive(Template, WebTemplate)]
#[template(path = "sell/form.html")]
pub struct SellFormTemplate {
    pub layout: Layout,
    pub categories: Vec<CategoryOption>,
    pub draft: ListingDraft,
    /// Preview source for the current image, or empty.
    pub preview_url: String,
    pub error: Option<String>,
}

impl SellFormTemplate {
    fn new(layout: Layout, catalog: &Catalog, draft: ListingDraft) -> Self {
        let categories = catalog
            .categories()
            .iter()
            .map(|c| {
                let id = c.id.to_string();
                CategoryOption {
                    selected: draft.category.trim() == id,
                    id,
                    name: c.name.clone(),
                }
            })
            .collect();

        Self {
            layout,
            categories,
            preview_url: draft.image_url.as_deref().map(preview_src).unwrap_or_default(),
            draft,
            error: None,
        }
    }
}

/// Accepted listing display data.
#[derive(Debug, Clone)]
pub struct ListingView {
    pub title: String,
    pub price: String,
    pub category: String,
    pub stock: u32,
    pub image_url: String,
}

impl From<&SellerListing> for ListingView {
    fn from(listing: &SellerListing) -> Self {
        Self {
            title: listing.title.clone(),
            price: listing.price.to_string(),
            category: listing.category.name.clone(),
            stock: listing.stock,
            image_url: preview_src(&listing.image_url),
        }
    }
}

/// Listing accepted page.
#[derive(Template, WebTemplate)]
#[template(path = "sell/success.html")]
pub struct SellSuccessTemplate {
    pub layout: Layout,
    pub listing: ListingView,
}

/// Path serving the stored listing image.
const IMAGE_PATH: &str = "/sell/image";

/// Encode an uploaded file as a `data:` URL.
fn data_url(content_type: Option<&str>, bytes: &[u8]) -> String {
    let content_type = content_type.unwrap_or("application/octet-stream");
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

/// Decode an image `data:` URL into its content type and bytes.
fn decode_data_url(url: &str) -> Option<(HeaderValue, Vec<u8>)> {
    let (content_type, encoded) = url.strip_prefix("data:")?.split_once(";base64,")?;
    if !content_type.starts_with("image/") {
        return None;
    }
    let content_type = HeaderValue::from_str(content_type).ok()?;
    let bytes = STANDARD.decode(encoded).ok()?;
    Some((content_type, bytes))
}

/// Where a page should load an image from. Uploads are served from storage.
fn preview_src(image_url: &str) -> String {
    if image_url.starts_with("data:") {
        IMAGE_PATH.to_string()
    } else {
        image_url.to_string()
    }
}

/// Collect the sell form fields. An uploaded image replaces `image_url`.
async fn read_draft(mut multipart: Multipart) -> Result<ListingDraft> {
    let mut draft = ListingDraft::default();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            // Browsers send an empty part when no file was chosen.
            if !bytes.is_empty() {
                upload = Some(data_url(content_type.as_deref(), &bytes));
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        match name.as_str() {
            "title" => draft.title = value,
            "description" => draft.description = value,
            "price" => draft.price = value,
            "category" => draft.category = value,
            "stock" => draft.stock = value,
            "image_url" if !value.trim().is_empty() => draft.image_url = Some(value),
            _ => {}
        }
    }

    if upload.is_some() {
        draft.image_url = upload;
    }
    Ok(draft)
}

/// Display the sell form.
#[instrument(skip(state, storage))]
pub async fn form(State(state): State<AppState>, storage: Storage) -> Result<SellFormTemplate> {
    storage.clear_listing_image().await?;
    Ok(SellFormTemplate::new(
        Layout::load(&storage).await?,
        state.catalog(),
        ListingDraft {
            stock: "1".to_string(),
            ..ListingDraft::default()
        },
    ))
}

/// Validate and "publish" a listing.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    storage: Storage,
    multipart: Multipart,
) -> Result<Response> {
    let mut draft = read_draft(multipart).await?;
    if draft.image_url.is_none() {
        draft.image_url = storage.listing_image().await?;
    }
    if let Some(image_url) = &draft.image_url {
        storage.save_listing_image(image_url).await?;
    }
    let layout = Layout::load(&storage).await?;

    let listing = match draft.validate(state.catalog()) {
        Ok(listing) => listing,
        Err(err) => {
            tracing::debug!(error = %err, "Listing rejected");
            let mut page = SellFormTemplate::new(layout, state.catalog(), draft);
            page.error = Some(err.to_string());
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    tokio::time::sleep(state.config().listing_delay).await;

    add_breadcrumb("sell", "Listed product", Some(&[("title", listing.title.as_str())]));
    tracing::info!(
        title = %listing.title,
        price = %listing.price,
        category = %listing.category.slug,
        stock = listing.stock,
        "Product listed"
    );

    Ok(SellSuccessTemplate {
        layout,
        listing: ListingView::from(&listing),
    }
    .into_response())
}

/// Serve the image kept for the current listing.
#[instrument(skip(storage))]
pub async fn image(storage: Storage) -> Result<Response> {
    let (content_type, bytes) = storage
        .listing_image()
        .await?
        .and_then(|url| decode_data_url(&url))
        .ok_or_else(|| AppError::NotFound("listing image".to_string()))?;
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}
