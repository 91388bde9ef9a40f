//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPatch, BookQuery, CreateBook},
};

use super::{parse_data, read_book_form};

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// List of items
    pub items: Vec<T>,
    /// Total number of items
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
}

/// List books with pagination and author-lastname filtering
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(
        ("authors_lastname" = Option<String>, Query, description = "Filter by author lastname (case-insensitive substring)"),
        ("page" = Option<i64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<i64>, Query, description = "Items per page (default: 20)")
    ),
    responses(
        (status = 200, description = "List of books", body = PaginatedResponse<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    let (items, total) = state.services.books.list(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get(id).await?;
    Ok(Json(book))
}

/// Create a new book.
/// Multipart form: `data` = JSON `{title, description?, authors: [uuid]}`,
/// `image` = JPEG or PNG file, at most 2 MiB.
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body(content = CreateBook, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Referenced author not found")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Book>)> {
    let form = read_book_form(multipart).await?;

    let (Some(data), Some(image)) = (form.data, form.image) else {
        return Err(AppError::BadRequest("Missing request parameters".to_string()));
    };

    let payload: CreateBook = parse_data(&data)?;

    let created = state.services.books.create(payload, &image).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing book.
/// POST rather than PUT: multipart/form-data bodies on PUT are poorly
/// supported by common HTTP clients. The `data` JSON part is a partial
/// payload; only present fields are applied. `image` is optional and,
/// when present, replaces the stored image.
#[utoipa::path(
    post,
    path = "/books/update/{id}",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    request_body(content = BookPatch, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Book or referenced author not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<Book>> {
    let form = read_book_form(multipart).await?;

    let data = form
        .data
        .ok_or_else(|| AppError::BadRequest("Request content is empty or is not valid JSON".to_string()))?;
    let patch: BookPatch = parse_data(&data)?;

    let updated = state
        .services
        .books
        .update(id, patch, form.image.as_deref())
        .await?;
    Ok(Json(updated))
}
