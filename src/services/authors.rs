//! Author management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::author::{Author, AuthorQuery, AuthorSummary, CreateAuthor},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorService {
    repository: Repository,
}

impl AuthorService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List authors with pagination
    pub async fn list(&self, query: &AuthorQuery) -> AppResult<(Vec<AuthorSummary>, i64)> {
        self.repository.authors.list(query).await
    }

    /// Get an author by ID with their books
    pub async fn get(&self, id: Uuid) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    /// Create a new author
    pub async fn create(&self, payload: CreateAuthor) -> AppResult<Author> {
        let author = Author::new(payload.firstname, payload.lastname, payload.surname);
        author.validate()?;

        self.repository.authors.create(&author).await?;

        tracing::info!("Created author {}", author.id);

        Ok(author)
    }
}
