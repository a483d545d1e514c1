use serde::{Deserialize, Serialize};

/// Value stored for `genre` and `status` when a new book leaves them empty.
pub const UNKNOWN: &str = "Unbekannt";

/// A catalogued book as persisted in the `book` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Store-assigned identifier, never reused
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Star rating from 1 to 5
    pub rating: i32,
    pub comment: Option<String>,
    pub genre: Option<String>,
    /// Reading status, free text (e.g. "Gelesen")
    pub status: Option<String>,
}

/// Write payload for creating or fully replacing a book.
///
/// Every field may be missing on the wire; the validator decides what is
/// acceptable. A missing rating reads as `0` and is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
    pub genre: Option<String>,
    pub status: Option<String>,
}

impl BookInput {
    pub fn new(title: impl Into<String>, author: impl Into<String>, rating: i32) -> Self {
        Self {
            title: Some(title.into()),
            author: Some(author.into()),
            rating,
            ..Self::default()
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Fill empty `genre` and `status` with [`UNKNOWN`].
    pub(crate) fn with_defaults(mut self) -> Self {
        self.genre = Some(or_unknown(self.genre));
        self.status = Some(or_unknown(self.status));
        self
    }
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let input: BookInput = serde_json::from_str(r#"{"title": "Dune"}"#).unwrap();
        assert_eq!(input.title.as_deref(), Some("Dune"));
        assert_eq!(input.author, None);
        assert_eq!(input.rating, 0);
    }

    #[test]
    fn client_supplied_id_is_ignored() {
        let input: BookInput =
            serde_json::from_str(r#"{"id": 42, "title": "Dune", "author": "Herbert", "rating": 5}"#)
                .unwrap();
        assert_eq!(input, BookInput::new("Dune", "Herbert", 5));
    }

    #[test]
    fn defaults_replace_empty_and_missing_values_only() {
        let input = BookInput::new("Dune", "Herbert", 5)
            .with_genre("")
            .with_status("Gelesen")
            .with_defaults();
        assert_eq!(input.genre.as_deref(), Some(UNKNOWN));
        assert_eq!(input.status.as_deref(), Some("Gelesen"));

        let input = BookInput::new("Dune", "Herbert", 5).with_defaults();
        assert_eq!(input.genre.as_deref(), Some(UNKNOWN));
        assert_eq!(input.status.as_deref(), Some(UNKNOWN));
    }

    #[test]
    fn book_serializes_all_fields() {
        let book = Book {
            id: 1,
            title: "Dune".into(),
            author: "Herbert".into(),
            rating: 5,
            comment: None,
            genre: Some(UNKNOWN.into()),
            status: Some(UNKNOWN.into()),
        };
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "title": "Dune",
                "author": "Herbert",
                "rating": 5,
                "comment": null,
                "genre": "Unbekannt",
                "status": "Unbekannt"
            })
        );
    }
}
