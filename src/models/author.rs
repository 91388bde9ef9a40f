//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::book::BookSummary;

/// Full author model. The book list is a read-only back-reference loaded
/// from the join table; mutation goes through the book side.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, FromRow, ToSchema)]
pub struct Author {
    pub id: Uuid,
    #[validate(length(min = 1, max = 255, message = "firstname must be between 1 and 255 characters"))]
    pub firstname: String,
    #[validate(length(min = 3, max = 255, message = "lastname must be between 3 and 255 characters"))]
    pub lastname: String,
    #[validate(length(max = 255, message = "surname must be at most 255 characters"))]
    pub surname: Option<String>,
    #[sqlx(skip)]
    #[serde(default)]
    pub books: Vec<BookSummary>,
}

impl Author {
    /// Create a new author with a fresh identifier
    pub fn new(firstname: String, lastname: String, surname: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            firstname,
            lastname,
            surname,
            books: Vec::new(),
        }
    }
}

/// Short author representation used inside book payloads and lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub surname: Option<String>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = 255, message = "firstname must be between 1 and 255 characters"))]
    pub firstname: String,
    #[validate(length(min = 3, max = 255, message = "lastname must be between 3 and 255 characters"))]
    pub lastname: String,
    #[validate(length(max = 255, message = "surname must be at most 255 characters"))]
    pub surname: Option<String>,
}

/// Author list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AuthorQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
