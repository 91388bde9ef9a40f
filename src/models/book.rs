//! Book model and related types.
//!
//! `Book` is the persistence shape (table `book`) plus its loaded author
//! list. The author association lives in the `books_authors` join table and
//! is only mutated through the book side, which keeps both directions of
//! the relation consistent by construction.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::author::AuthorSummary;

/// Full book model (DB + API), authors loaded from the join table
#[derive(Debug, Clone, Serialize, Deserialize, Validate, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    #[validate(length(min = 1, max = 255, message = "title must be between 1 and 255 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,
    /// Relative path of the uploaded cover image, `<dir>/<file>`
    pub image: String,
    /// Unix timestamp, set once at creation
    pub creation_date: i64,
    #[sqlx(skip)]
    #[serde(default)]
    pub authors: Vec<AuthorSummary>,
}

impl Book {
    /// Create a new book with a fresh identifier and creation timestamp.
    /// The image path is assigned later, after the upload succeeds.
    pub fn new(title: String, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            image: String::new(),
            creation_date: Utc::now().timestamp(),
            authors: Vec::new(),
        }
    }
}

/// Short book representation for back-references and lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image: String,
    pub creation_date: i64,
}

/// Create book payload (the `data` part of the multipart request)
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBook {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub authors: Vec<Uuid>,
}

/// Partial update payload. Absent fields are left untouched; `description`
/// distinguishes "absent" from an explicit null.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BookPatch {
    pub title: Option<String>,
    #[serde(default, with = "serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub authors: Option<Vec<Uuid>>,
}

/// Book list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive substring match on a linked author's lastname
    pub authors_lastname: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
