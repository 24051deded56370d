use axum::Json;

use crate::models::shared::MessageResponse;

/// `GET /` and `GET /hello`
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello, world!"))
}
