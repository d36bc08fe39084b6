//! Book and student catalog service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookQuery, CreateBook, UpdateBook},
        enums::StudentStatus,
        student::{CreateStudent, Student, StudentQuery, UpdateStudent},
    },
    repository::{page_window, Repository},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    page_size: i64,
}

impl CatalogService {
    pub fn new(repository: Repository, page_size: i64) -> Self {
        Self {
            repository,
            page_size,
        }
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Search books with pagination
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let (limit, offset) = page_window(query.page, query.per_page, self.page_size);
        self.repository
            .books
            .search(query.search.as_deref(), limit, offset)
            .await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        let book = book.trimmed();
        book.validate()?;
        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, title = %created.title, "Book added");
        Ok(created)
    }

    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        let book = book.trimmed();
        book.validate()?;
        self.repository.books.update(id, &book).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    /// Search students with pagination
    pub async fn search_students(&self, query: &StudentQuery) -> AppResult<(Vec<Student>, i64)> {
        let (limit, offset) = page_window(query.page, query.per_page, self.page_size);
        self.repository
            .students
            .search(
                query.search.as_deref(),
                query.status.unwrap_or(StudentStatus::Active),
                limit,
                offset,
            )
            .await
    }

    pub async fn get_student(&self, id: i32) -> AppResult<Student> {
        self.repository.students.get_by_id(id).await
    }

    pub async fn create_student(&self, student: CreateStudent) -> AppResult<Student> {
        let student = student.trimmed();
        student.validate()?;
        let created = self.repository.students.create(&student).await?;
        tracing::info!(student_id = created.id, roll_number = %created.roll_number, "Student added");
        Ok(created)
    }

    pub async fn update_student(&self, id: i32, student: UpdateStudent) -> AppResult<Student> {
        let student = student.trimmed();
        student.validate()?;
        self.repository.students.update(id, &student).await
    }

    pub async fn delete_student(&self, id: i32) -> AppResult<()> {
        self.repository.students.delete(id).await?;
        tracing::info!(student_id = id, "Student deleted");
        Ok(())
    }
}
