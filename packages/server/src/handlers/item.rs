use axum::Json;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::extractors::form::AddItemForm;
use crate::models::item::{ItemListResponse, SearchQuery};
use crate::models::shared::{MessageResponse, Validate};
use crate::repository::{Item, NewItem};
use crate::state::AppState;

/// Room for the configured image size plus the text fields.
pub fn add_item_body_limit(max_image_size: u64) -> DefaultBodyLimit {
    let limit = usize::try_from(max_image_size)
        .unwrap_or(usize::MAX)
        .saturating_add(64 * 1024);
    DefaultBodyLimit::max(limit)
}

/// `POST /items`
#[instrument(skip(state, form))]
pub async fn add_item(
    State(state): State<AppState>,
    AddItemForm(form): AddItemForm,
) -> Result<Json<MessageResponse>, AppError> {
    form.validate()?;

    let image_name = match &form.image {
        Some(image) => state
            .images
            .put(&image.data, image.file_name.as_deref())
            .await?
            .to_string(),
        None => state.config.storage.default_image.clone(),
    };

    let name = form.name.trim().to_string();
    let item = state
        .items
        .insert(NewItem::new(name, form.category.trim(), image_name))
        .await?;

    info!(item_id = item.id, name = %item.name, image = %item.image_name, "item received");
    Ok(Json(MessageResponse::new(format!(
        "item received: {}",
        item.name
    ))))
}

/// `GET /items`
#[instrument(skip(state))]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<ItemListResponse>, AppError> {
    let items = state.items.list().await?;
    Ok(Json(ItemListResponse { items }))
}

/// `GET /items/{id}`
#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, AppError> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::Validation("Invalid item ID".into()))?;

    Ok(Json(state.items.find_by_id(id).await?))
}

/// `GET /items/search?keyword=`
#[instrument(skip(state))]
pub async fn search_items(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ItemListResponse>, AppError> {
    query.validate()?;

    let items = state.items.search_by_name(query.keyword()).await?;
    Ok(Json(ItemListResponse { items }))
}
