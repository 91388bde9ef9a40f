//! API handlers for Bookshelf REST endpoints

pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;

use axum_extra::extract::Multipart;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// Parts of the book multipart envelope: a `data` JSON part and an
/// `image` file part. Which parts are required depends on the operation.
pub struct BookForm {
    pub data: Option<String>,
    pub image: Option<Bytes>,
}

/// Read the `data` and `image` parts out of a multipart request.
/// Unknown parts are ignored.
pub async fn read_book_form(mut multipart: Multipart) -> AppResult<BookForm> {
    let mut data = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart request: {}", e)))?
    {
        match field.name() {
            Some("data") => {
                data = Some(field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Unreadable data field: {}", e))
                })?);
            }
            Some("image") => {
                image = Some(field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Unreadable image field: {}", e))
                })?);
            }
            _ => {}
        }
    }

    Ok(BookForm { data, image })
}

/// Deserialize the JSON `data` part of a multipart request
pub fn parse_data<T: DeserializeOwned>(data: &str) -> AppResult<T> {
    serde_json::from_str(data).map_err(|e| {
        AppError::BadRequest(format!("Request content is empty or is not valid JSON: {}", e))
    })
}
