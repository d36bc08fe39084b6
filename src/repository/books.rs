//! Books repository for database operations

use sqlx::{PgConnection, Pool, Postgres, Row};

use super::contains_pattern;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookShort, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Search books, newest first
    pub async fn search(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Book>, i64)> {
        let pattern = search
            .filter(|s| !s.trim().is_empty())
            .map(contains_pattern);

        let filter = r#"
            ($1::text IS NULL
             OR title ILIKE $1 OR author ILIKE $1
             OR isbn ILIKE $1 OR category ILIKE $1)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM books WHERE {}", filter))
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT * FROM books WHERE {} ORDER BY id DESC LIMIT $2 OFFSET $3",
            filter
        ))
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((books, total))
    }

    /// Books with at least one copy on the shelf
    pub async fn list_available(&self) -> AppResult<Vec<BookShort>> {
        let books = sqlx::query_as::<_, BookShort>(
            r#"
            SELECT id, title, author, available_copies
            FROM books
            WHERE available_copies > 0
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Create a book; every copy starts on the shelf
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, category, publisher,
                               publication_year, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.isbn)
        .bind(&data.category)
        .bind(&data.publisher)
        .bind(data.publication_year)
        .bind(data.total_copies)
        .fetch_one(&self.pool)
        .await?;
        Ok(book)
    }

    /// Update a book. A new total moves available copies by the same delta
    /// and may not drop below the copies currently on loan.
    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT total_copies, available_copies FROM books WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        let total: i32 = row.get("total_copies");
        let available: i32 = row.get("available_copies");
        let on_loan = total - available;

        let new_total = data.total_copies.unwrap_or(total);
        if new_total < on_loan {
            return Err(AppError::ConstraintViolation(format!(
                "Book {} has {} copies on loan; total cannot be {}",
                id, on_loan, new_total
            )));
        }
        let new_available = new_total - on_loan;

        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                isbn = COALESCE($4, isbn),
                category = COALESCE($5, category),
                publisher = COALESCE($6, publisher),
                publication_year = COALESCE($7, publication_year),
                total_copies = $8,
                available_copies = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.isbn)
        .bind(&data.category)
        .bind(&data.publisher)
        .bind(data.publication_year)
        .bind(new_total)
        .bind(new_available)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(book)
    }

    /// Delete a book that has never been issued
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        let (open, total): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'issued'), COUNT(*)
            FROM book_issues
            WHERE book_id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if open > 0 {
            return Err(AppError::ConstraintViolation(format!(
                "Book {} has {} open issue(s)",
                id, open
            )));
        }
        if total > 0 {
            return Err(AppError::ConstraintViolation(format!(
                "Book {} has issue history and cannot be deleted",
                id
            )));
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Take one copy off the shelf if any is left. Returns false when the book
    /// is missing or has no available copy; the row lock taken by the UPDATE
    /// serializes concurrent issues of the same book.
    pub async fn take_copy(&self, conn: &mut PgConnection, id: i32) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET available_copies = available_copies - 1
            WHERE id = $1 AND available_copies > 0
            "#,
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Put one copy back on the shelf, never above the total
    pub async fn return_copy(&self, conn: &mut PgConnection, id: i32) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET available_copies = available_copies + 1
            WHERE id = $1 AND available_copies < total_copies
            "#,
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Check whether a book exists
    pub async fn exists(&self, conn: &mut PgConnection, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(exists)
    }
}
