//! Book catalog service

use crate::{
    error::AppResult,
    models::book::{Book, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.check()?;
        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, "Book added to catalog");
        Ok(created)
    }

    /// Partial update; omitted fields are left untouched
    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        book.check()?;
        self.repository.books.update(id, &book).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "Book removed from catalog");
        Ok(())
    }
}
