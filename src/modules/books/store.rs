//! Persistence for [`Book`] records over the `book` table.

use bookrate_db::{ChosenDB, Pool};
use futures::{future, TryStreamExt as _};
use sqlx::QueryBuilder;
use tracing::{debug, info};

use super::error::{BookError, Result};
use super::models::{Book, BookInput};
use super::validate::{validate_book, validate_query, validate_rating};

const SELECT_BOOKS: &str = "SELECT id, title, author, rating, comment, genre, status FROM book";

/// Equality filters over book columns; unset fields match everything and
/// set fields are combined with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookFilter<'a> {
    pub rating: Option<i32>,
    pub genre: Option<&'a str>,
    pub status: Option<&'a str>,
}

impl<'a> BookFilter<'a> {
    fn push_where(&self, query: &mut QueryBuilder<'a, ChosenDB>) {
        let mut separator = " WHERE ";
        if let Some(rating) = self.rating {
            query.push(separator).push("rating = ").push_bind(rating);
            separator = " AND ";
        }
        if let Some(genre) = self.genre {
            query.push(separator).push("genre = ").push_bind(genre);
            separator = " AND ";
        }
        if let Some(status) = self.status {
            query.push(separator).push("status = ").push_bind(status);
        }
    }
}

#[derive(Clone)]
pub struct BookStore {
    pool: Pool,
}

impl BookStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// All books, optionally narrowed by rating and genre.
    pub async fn find_all(&self, rating: Option<i32>, genre: Option<&str>) -> Result<Vec<Book>> {
        if let Some(rating) = rating {
            validate_rating(rating)?;
        }
        self.select(BookFilter {
            rating,
            genre,
            status: None,
        })
        .await
    }

    pub async fn find_by_genre_status(
        &self,
        genre: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<Book>> {
        self.select(BookFilter {
            rating: None,
            genre,
            status,
        })
        .await
    }

    pub async fn select(&self, filter: BookFilter<'_>) -> Result<Vec<Book>> {
        let mut query = QueryBuilder::new(SELECT_BOOKS);
        filter.push_where(&mut query);
        query.push(" ORDER BY id");

        let books = query
            .build_query_as::<Book>()
            .fetch_all(&self.pool)
            .await?;
        debug!(?filter, count = books.len(), "books selected");
        Ok(books)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Book> {
        sqlx::query_as::<_, Book>(&format!("{SELECT_BOOKS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(BookError::NotFound { id })
    }

    /// Books whose title or author contains `query`, ignoring case and
    /// surrounding whitespace.
    pub async fn search(&self, query: &str) -> Result<Vec<Book>> {
        let needle = validate_query(query)?.to_lowercase();

        // Full scan: SQLite lower() folds ASCII only, so narrowing in SQL would
        // drop matches such as "Ästhetik" for "äst". Cost is linear in table size.

        let books: Vec<Book> = sqlx::query_as::<_, Book>(&format!("{SELECT_BOOKS} ORDER BY id"))
            .fetch(&self.pool)
            .try_filter(|book| future::ready(mentions(book, &needle)))
            .try_collect()
            .await?;
        debug!(query = %needle, count = books.len(), "books searched");
        Ok(books)
    }

    pub async fn create(&self, input: BookInput) -> Result<Book> {
        validate_book(&input)?;
        let input = input.with_defaults();

        let book = sqlx::query_as::<_, Book>(
            r#"INSERT INTO book (title, author, rating, comment, genre, status)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, title, author, rating, comment, genre, status"#,
        )
        .bind(input.title)
        .bind(input.author)
        .bind(input.rating)
        .bind(input.comment)
        .bind(input.genre)
        .bind(input.status)
        .fetch_one(&self.pool)
        .await?;

        info!(book_id = book.id, "book created");
        Ok(book)
    }

    /// Replace every field of book `id`; no defaults are applied.
    pub async fn update(&self, id: i64, input: BookInput) -> Result<Book> {
        validate_book(&input)?;

        let book = sqlx::query_as::<_, Book>(
            r#"UPDATE book
            SET title = ?, author = ?, rating = ?, comment = ?, genre = ?, status = ?
            WHERE id = ?
            RETURNING id, title, author, rating, comment, genre, status"#,
        )
        .bind(input.title)
        .bind(input.author)
        .bind(input.rating)
        .bind(input.comment)
        .bind(input.genre)
        .bind(input.status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(BookError::NotFound { id })?;

        info!(book_id = id, "book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM book WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            Err(BookError::NotFound { id })
        } else {
            info!(book_id = id, "book deleted");
            Ok(())
        }
    }
}

fn mentions(book: &Book, needle: &str) -> bool {
    book.title.to_lowercase().contains(needle) || book.author.to_lowercase().contains(needle)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::modules::books::{models::UNKNOWN, validate::ValidationError};
    use bookrate_kernel::settings::DatabaseSettings;

    pub(crate) async fn test_store() -> BookStore {
        let pool = bookrate_db::connect(&DatabaseSettings::in_memory())
            .await
            .unwrap();
        let migrations: Vec<_> = crate::modules::books::migrations()
            .into_iter()
            .map(|m| ("books".to_string(), m))
            .collect();
        bookrate_db::run_migrations(&pool, &migrations)
            .await
            .unwrap();
        BookStore::new(pool)
    }

    async fn seeded_store() -> BookStore {
        let store = test_store().await;
        for input in [
            BookInput::new("Testbuch 1", "Autor A", 4)
                .with_comment("Gut")
                .with_genre("Roman")
                .with_status("Gelesen"),
            BookInput::new("Testbuch 2", "Autor B", 3)
                .with_comment("Okay")
                .with_genre("Fantasy")
                .with_status("Will ich lesen"),
            BookInput::new("Testbuch 3", "Autor C", 5)
                .with_comment("Top")
                .with_genre("Roman")
                .with_status("Lese ich"),
        ] {
            store.create(input).await.unwrap();
        }
        store
    }

    fn titles(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.title.as_str()).collect()
    }

    async fn count(store: &BookStore) -> usize {
        store.find_all(None, None).await.unwrap().len()
    }

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let store = test_store().await;
        let input = BookInput::new("Dune", "Herbert", 5)
            .with_comment("Sand")
            .with_genre("Science-Fiction")
            .with_status("Gelesen");

        let created = store.create(input).await.unwrap();
        let found = store.find_by_id(created.id).await.unwrap();

        assert_eq!(found, created);
        assert_eq!(found.title, "Dune");
        assert_eq!(found.author, "Herbert");
        assert_eq!(found.rating, 5);
        assert_eq!(found.comment.as_deref(), Some("Sand"));
        assert_eq!(found.genre.as_deref(), Some("Science-Fiction"));
        assert_eq!(found.status.as_deref(), Some("Gelesen"));
    }

    #[tokio::test]
    async fn create_defaults_genre_and_status() {
        let store = test_store().await;
        let created = store
            .create(BookInput::new("Dune", "Herbert", 5).with_genre(""))
            .await
            .unwrap();

        assert_eq!(created.genre.as_deref(), Some(UNKNOWN));
        assert_eq!(created.status.as_deref(), Some(UNKNOWN));
        assert_eq!(created.comment, None);
    }

    #[tokio::test]
    async fn invalid_create_leaves_store_untouched() {
        let store = seeded_store().await;

        for (input, expected) in [
            (BookInput::new(" ", "Autor", 3), ValidationError::EmptyTitle),
            (BookInput::new("Titel", "", 3), ValidationError::EmptyAuthor),
            (BookInput::new("Titel", "Autor", 9), ValidationError::InvalidRating(9)),
        ] {
            let err = store.create(input).await.unwrap_err();
            assert!(matches!(err, BookError::Validation(e) if e == expected));
        }
        assert_eq!(count(&store).await, 3);
    }

    #[tokio::test]
    async fn find_missing_book_is_not_found() {
        let store = test_store().await;
        let err = store.find_by_id(999).await.unwrap_err();
        assert!(matches!(err, BookError::NotFound { id: 999 }));
    }

    #[tokio::test]
    async fn update_replaces_all_fields_and_keeps_id() {
        let store = seeded_store().await;
        let original = store.find_by_id(1).await.unwrap();

        let updated = store
            .update(
                original.id,
                BookInput::new("New Title", "New Author", 5)
                    .with_comment("New")
                    .with_genre("Krimi")
                    .with_status("Will noch lesen"),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.author, "New Author");
        assert_eq!(updated.rating, 5);
        assert_eq!(updated.genre.as_deref(), Some("Krimi"));
        assert_eq!(store.find_by_id(original.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_does_not_apply_defaults() {
        let store = seeded_store().await;
        let updated = store
            .update(1, BookInput::new("Testbuch 1", "Autor A", 4))
            .await
            .unwrap();
        assert_eq!(updated.genre, None);
        assert_eq!(updated.status, None);
        assert_eq!(updated.comment, None);
    }

    #[tokio::test]
    async fn update_missing_book_is_not_found() {
        let store = test_store().await;
        let err = store
            .update(999, BookInput::new("Dune", "Herbert", 5))
            .await
            .unwrap_err();
        assert!(matches!(err, BookError::NotFound { id: 999 }));
    }

    #[tokio::test]
    async fn invalid_update_leaves_record_unchanged() {
        let store = seeded_store().await;
        let before = store.find_by_id(2).await.unwrap();

        let err = store
            .update(2, BookInput::new("Neu", "", 4))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BookError::Validation(ValidationError::EmptyAuthor)
        ));
        assert_eq!(store.find_by_id(2).await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_twice_is_not_found_the_second_time() {
        let store = seeded_store().await;

        store.delete(2).await.unwrap();
        let err = store.delete(2).await.unwrap_err();

        assert!(matches!(err, BookError::NotFound { id: 2 }));
        assert!(matches!(
            store.find_by_id(2).await,
            Err(BookError::NotFound { id: 2 })
        ));
        assert_eq!(count(&store).await, 2);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let store = seeded_store().await;
        store.delete(3).await.unwrap();

        let created = store
            .create(BookInput::new("Dune", "Herbert", 5))
            .await
            .unwrap();
        assert_eq!(created.id, 4);
    }

    #[tokio::test]
    async fn find_all_without_filters_returns_everything_in_order() {
        let store = seeded_store().await;
        let books = store.find_all(None, None).await.unwrap();
        assert_eq!(titles(&books), ["Testbuch 1", "Testbuch 2", "Testbuch 3"]);
    }

    #[tokio::test]
    async fn find_all_combines_filters_with_and() {
        let store = seeded_store().await;

        let by_genre = store.find_all(None, Some("Roman")).await.unwrap();
        assert_eq!(titles(&by_genre), ["Testbuch 1", "Testbuch 3"]);

        let by_rating = store.find_all(Some(3), None).await.unwrap();
        assert_eq!(titles(&by_rating), ["Testbuch 2"]);

        let both = store.find_all(Some(5), Some("Roman")).await.unwrap();
        assert_eq!(titles(&both), ["Testbuch 3"]);

        let none = store.find_all(Some(3), Some("Roman")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn find_all_rejects_out_of_range_rating() {
        let store = seeded_store().await;
        let err = store.find_all(Some(6), None).await.unwrap_err();
        assert!(matches!(
            err,
            BookError::Validation(ValidationError::InvalidRating(6))
        ));
    }

    #[tokio::test]
    async fn find_by_genre_status_combines_with_and() {
        let store = seeded_store().await;

        let both = store
            .find_by_genre_status(Some("Roman"), Some("Gelesen"))
            .await
            .unwrap();
        assert_eq!(titles(&both), ["Testbuch 1"]);

        let by_status = store
            .find_by_genre_status(None, Some("Will ich lesen"))
            .await
            .unwrap();
        assert_eq!(titles(&by_status), ["Testbuch 2"]);

        let all = store.find_by_genre_status(None, None).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_title_and_author() {
        let store = test_store().await;
        store
            .create(BookInput::new("Harry Potter", "J. K. Rowling", 5))
            .await
            .unwrap();
        store
            .create(BookInput::new("Der Hobbit", "Tolkien", 4))
            .await
            .unwrap();
        store
            .create(BookInput::new("Ästhetik", "Hegel", 2))
            .await
            .unwrap();

        assert_eq!(titles(&store.search("harry").await.unwrap()), ["Harry Potter"]);
        assert_eq!(titles(&store.search("ROWLING").await.unwrap()), ["Harry Potter"]);
        assert_eq!(titles(&store.search("  hobbit ").await.unwrap()), ["Der Hobbit"]);
        assert_eq!(titles(&store.search("äst").await.unwrap()), ["Ästhetik"]);
        assert!(store.search("Dune").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_rejects_blank_query() {
        let store = test_store().await;
        let err = store.search("   ").await.unwrap_err();
        assert!(matches!(
            err,
            BookError::Validation(ValidationError::EmptyQuery)
        ));
    }

    #[tokio::test]
    async fn search_treats_like_wildcards_literally() {
        let store = seeded_store().await;
        assert!(store.search("%").await.unwrap().is_empty());
        assert!(store.search("_").await.unwrap().is_empty());
    }
}
