use axum::{
    Form,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::item::{AddItemRequest, UploadedImage};

#[derive(Deserialize)]
struct UrlEncodedFields {
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: String,
}

/// Extracts an [`AddItemRequest`] from either `multipart/form-data` (with an
/// optional `image` file part) or `application/x-www-form-urlencoded`.
///
/// Rejections become `AppError::Validation`. Missing text fields come
/// through as empty strings; the handler validates them.
pub struct AddItemForm(pub AddItemRequest);

impl<S> FromRequest<S> for AddItemForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(fields) = Form::<UrlEncodedFields>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            return Ok(AddItemForm(AddItemRequest {
                name: fields.name,
                category: fields.category,
                image: None,
            }));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let mut request = AddItemRequest::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            match field.name() {
                Some("name") => {
                    request.name = field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read name: {e}")))?;
                }
                Some("category") => {
                    request.category = field.text().await.map_err(|e| {
                        AppError::Validation(format!("Failed to read category: {e}"))
                    })?;
                }
                Some("image") => {
                    let file_name = field.file_name().map(|s| s.to_string());
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read image: {e}")))?;
                    // Browsers send an empty part when no file was chosen.
                    if !data.is_empty() {
                        request.image = Some(UploadedImage { file_name, data });
                    }
                }
                _ => {} // Ignore unknown fields.
            }
        }

        Ok(AddItemForm(request))
    }
}
