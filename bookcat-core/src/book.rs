//! The catalog's document shape.
//!
//! The book schema is implicit in the queries the runner issues; this module
//! declares it explicitly so every operation works with a typed structure
//! instead of loose BSON. Documents that do not match this shape are a
//! data-quality concern of whoever seeded the collection.

use bson::Uuid;
use serde::{Deserialize, Serialize};

use crate::document::Document;

/// A single book in the bookstore catalog.
///
/// `title` doubles as the natural lookup key for the update and delete
/// operations; nothing enforces its uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Document identity. Stored as the `_id` by persistent backends.
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub price: f64,
    pub in_stock: bool,
}

impl Book {
    /// Creates a book with a fresh identity. Intended for seed data and fixtures.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        published_year: i32,
        price: f64,
        in_stock: bool,
    ) -> Self {
        Self {
            id: Uuid::new(),
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            published_year,
            price,
            in_stock,
        }
    }
}

impl Document for Book {
    fn id(&self) -> &Uuid {
        &self.id
    }

    fn collection_name() -> &'static str {
        "books"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Book;
    use crate::document::{Document, DocumentExt};

    #[test]
    fn book_from_json() {
        let book = Book::from_json(json!({
            "id": "73ffd264-44b3-4c69-90e8-e7d1dfb6c7ee",
            "title": "1984",
            "author": "George Orwell",
            "genre": "Dystopian",
            "published_year": 1949,
            "price": 10.99,
            "in_stock": true,
        }))
        .unwrap();

        assert_eq!(book.title, "1984");
        assert_eq!(book.published_year, 1949);
        assert!(book.in_stock);
    }

    #[test]
    fn bson_round_trip_keeps_identity() {
        let book = Book::new("Moby Dick", "Herman Melville", "Adventure", 1851, 9.99, false);
        let restored = Book::from_bson(book.to_bson().unwrap()).unwrap();

        assert_eq!(restored.id, book.id);
        assert_eq!(restored, book);
    }

    #[test]
    fn collection_name_is_books() {
        assert_eq!(Book::collection_name(), "books");
    }
}
