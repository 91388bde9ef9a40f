//! Book workflow service: create and update orchestration.
//!
//! Both operations validate the mutated entity before any file is written,
//! so a validation failure never leaves an orphaned upload behind.

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPatch, BookQuery, CreateBook},
    repository::Repository,
};

use super::images::ImageStore;

const AT_LEAST_ONE_AUTHOR: &str = "You must add at least one author";

/// Split an incoming author-id set against the currently attached one.
/// Returns `(detach, attach)`: attached ids missing from `incoming` are
/// detached, incoming ids not yet attached are attached, the overlap is
/// left untouched.
fn author_set_diff(current: &[Uuid], incoming: &[Uuid]) -> (Vec<Uuid>, Vec<Uuid>) {
    let detach = current
        .iter()
        .filter(|id| !incoming.contains(id))
        .copied()
        .collect();
    let attach = incoming
        .iter()
        .filter(|id| !current.contains(id))
        .copied()
        .collect();
    (detach, attach)
}

/// Drop duplicate ids while preserving first-seen order
fn dedup_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

#[derive(Clone)]
pub struct BookService {
    repository: Repository,
    images: ImageStore,
}

impl BookService {
    pub fn new(repository: Repository, images: ImageStore) -> Self {
        Self { repository, images }
    }

    /// List books with pagination and the optional author-lastname filter
    pub async fn list(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.list(query).await
    }

    /// Get a book by ID with its authors
    pub async fn get(&self, id: Uuid) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a book: resolve authors, validate, then store the image and
    /// persist row plus associations.
    pub async fn create(&self, payload: CreateBook, image: &[u8]) -> AppResult<Book> {
        if payload.authors.is_empty() {
            return Err(AppError::Validation(AT_LEAST_ONE_AUTHOR.to_string()));
        }

        let author_ids = dedup_ids(payload.authors);

        let mut book = Book::new(payload.title, payload.description);
        book.authors = self.repository.authors.find_by_ids(&author_ids).await?;

        book.validate()?;

        // Validation passed; only now touch the file system
        book.image = self.images.upload(image).await?;

        self.repository.books.create(&book, &author_ids).await?;

        tracing::info!("Created book {} with {} author(s)", book.id, author_ids.len());

        Ok(book)
    }

    /// Apply a partial update. Absent patch fields are left untouched; the
    /// author list, when present, fully replaces the attached set. A new
    /// image replaces the old one, whose directory is then removed
    /// best-effort after the row points at the new file.
    pub async fn update(
        &self,
        id: Uuid,
        patch: BookPatch,
        image: Option<&[u8]>,
    ) -> AppResult<Book> {
        let mut book = self.repository.books.get_by_id(id).await?;

        if let Some(title) = patch.title {
            book.title = title;
        }
        if let Some(description) = patch.description {
            book.description = description;
        }

        let mut attach = Vec::new();
        let mut detach = Vec::new();
        if let Some(author_ids) = patch.authors {
            if author_ids.is_empty() {
                return Err(AppError::Validation(AT_LEAST_ONE_AUTHOR.to_string()));
            }

            let incoming = dedup_ids(author_ids);
            let current: Vec<Uuid> = book.authors.iter().map(|a| a.id).collect();
            (detach, attach) = author_set_diff(&current, &incoming);

            let new_authors = self.repository.authors.find_by_ids(&attach).await?;
            book.authors.retain(|a| incoming.contains(&a.id));
            book.authors.extend(new_authors);
        }

        book.validate()?;

        let old_image = book.image.clone();
        if let Some(data) = image {
            book.image = self.images.upload(data).await?;
        }

        self.repository.books.update(&book, &attach, &detach).await?;

        if image.is_some() {
            self.images.remove(&old_image).await;
            tracing::info!("Replaced image of book {}: {} -> {}", book.id, old_image, book.image);
        }

        Ok(book)
    }
}
