//! Books repository for database operations

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::AuthorSummary,
        book::{Book, BookQuery},
    },
};
use sqlx::{Pool, Postgres};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a book by ID with its authors loaded
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        let mut book = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, description, image, creation_date
            FROM book
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        book.authors = self.get_book_authors(id).await?;

        Ok(book)
    }

    /// Load all authors linked to a book via the books_authors junction table
    pub async fn get_book_authors(&self, book_id: Uuid) -> AppResult<Vec<AuthorSummary>> {
        let authors = sqlx::query_as::<_, AuthorSummary>(
            r#"
            SELECT a.id, a.firstname, a.lastname, a.surname
            FROM books_authors ba
            JOIN author a ON a.id = ba.author_id
            WHERE ba.book_id = $1
            ORDER BY a.lastname, a.firstname
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    /// List books with pagination. An `authors_lastname` filter value matches
    /// books having at least one author whose lastname contains the value,
    /// case-insensitively. An empty filter value is a no-op.
    pub async fn list(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let lastname = query
            .authors_lastname
            .as_deref()
            .filter(|v| !v.is_empty());

        let (mut books, total) = if let Some(lastname) = lastname {
            let books = sqlx::query_as::<_, Book>(
                r#"
                SELECT id, title, description, image, creation_date
                FROM book b
                WHERE EXISTS (
                    SELECT 1 FROM books_authors ba
                    JOIN author a ON a.id = ba.author_id
                    WHERE ba.book_id = b.id AND a.lastname ILIKE '%' || $1 || '%'
                )
                ORDER BY creation_date DESC, id
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(lastname)
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let total: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*)
                FROM book b
                WHERE EXISTS (
                    SELECT 1 FROM books_authors ba
                    JOIN author a ON a.id = ba.author_id
                    WHERE ba.book_id = b.id AND a.lastname ILIKE '%' || $1 || '%'
                )
                "#,
            )
            .bind(lastname)
            .fetch_one(&self.pool)
            .await?;

            (books, total)
        } else {
            let books = sqlx::query_as::<_, Book>(
                r#"
                SELECT id, title, description, image, creation_date
                FROM book
                ORDER BY creation_date DESC, id
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book")
                .fetch_one(&self.pool)
                .await?;

            (books, total)
        };

        for book in &mut books {
            book.authors = self.get_book_authors(book.id).await?;
        }

        Ok((books, total))
    }

    /// Insert a book and its author links in one transaction
    pub async fn create(&self, book: &Book, author_ids: &[Uuid]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO book (id, title, description, image, creation_date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.description)
        .bind(&book.image)
        .bind(book.creation_date)
        .execute(&mut *tx)
        .await?;

        for author_id in author_ids {
            sqlx::query("INSERT INTO books_authors (book_id, author_id) VALUES ($1, $2)")
                .bind(book.id)
                .bind(author_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Update the book row and apply the author link diff in one transaction
    pub async fn update(
        &self,
        book: &Book,
        attach: &[Uuid],
        detach: &[Uuid],
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE book
            SET title = $2, description = $3, image = $4
            WHERE id = $1
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.description)
        .bind(&book.image)
        .execute(&mut *tx)
        .await?;

        for author_id in detach {
            sqlx::query("DELETE FROM books_authors WHERE book_id = $1 AND author_id = $2")
                .bind(book.id)
                .bind(author_id)
                .execute(&mut *tx)
                .await?;
        }

        for author_id in attach {
            sqlx::query(
                r#"
                INSERT INTO books_authors (book_id, author_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(book.id)
            .bind(author_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
