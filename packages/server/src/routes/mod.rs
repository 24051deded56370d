use axum::{Router, routing::get};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::hello::hello))
        .route("/hello", get(handlers::hello::hello))
        .merge(item_routes(config))
        .route("/images/{filename}", get(handlers::image::get_image))
}

fn item_routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(handlers::item::list_items).post(handlers::item::add_item),
        )
        .route("/items/search", get(handlers::item::search_items))
        .route("/search", get(handlers::item::search_items))
        .route("/items/{id}", get(handlers::item::get_item))
        .layer(handlers::item::add_item_body_limit(
            config.storage.max_image_size,
        ))
}
