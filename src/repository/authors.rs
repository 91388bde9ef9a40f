//! Authors repository for database operations

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorQuery, AuthorSummary},
        book::BookSummary,
    },
};
use sqlx::{Pool, Postgres};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get an author by ID with their books loaded
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Author> {
        let mut author = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, firstname, lastname, surname
            FROM author
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))?;

        author.books = self.get_author_books(id).await?;

        Ok(author)
    }

    /// Resolve a list of author ids to existing rows. Fails with NotFound
    /// naming the first id that has no matching record. Pure read.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<AuthorSummary>> {
        let mut authors = Vec::with_capacity(ids.len());

        for id in ids {
            let author = sqlx::query_as::<_, AuthorSummary>(
                r#"
                SELECT id, firstname, lastname, surname
                FROM author
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))?;

            authors.push(author);
        }

        Ok(authors)
    }

    /// Load all books linked to an author via the books_authors junction table
    pub async fn get_author_books(&self, author_id: Uuid) -> AppResult<Vec<BookSummary>> {
        let books = sqlx::query_as::<_, BookSummary>(
            r#"
            SELECT b.id, b.title, b.description, b.image, b.creation_date
            FROM books_authors ba
            JOIN book b ON b.id = ba.book_id
            WHERE ba.author_id = $1
            ORDER BY b.creation_date DESC, b.id
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// List authors with pagination
    pub async fn list(&self, query: &AuthorQuery) -> AppResult<(Vec<AuthorSummary>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let authors = sqlx::query_as::<_, AuthorSummary>(
            r#"
            SELECT id, firstname, lastname, surname
            FROM author
            ORDER BY lastname, firstname
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM author")
            .fetch_one(&self.pool)
            .await?;

        Ok((authors, total))
    }

    /// Insert a new author
    pub async fn create(&self, author: &Author) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO author (id, firstname, lastname, surname)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(author.id)
        .bind(&author.firstname)
        .bind(&author.lastname)
        .bind(&author.surname)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
