//! Field rules a book must satisfy before it is written.

use std::ops::RangeInclusive;

use super::models::BookInput;

pub const RATING_RANGE: RangeInclusive<i32> = 1..=5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("author must not be empty")]
    EmptyAuthor,
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(i32),
    #[error("search query must not be empty")]
    EmptyQuery,
}

impl ValidationError {
    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyTitle => "title",
            ValidationError::EmptyAuthor => "author",
            ValidationError::InvalidRating(_) => "rating",
            ValidationError::EmptyQuery => "query",
        }
    }

    /// Machine-readable reason
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::InvalidRating(_) => "out_of_range",
            _ => "empty",
        }
    }
}

pub fn validate_rating(rating: i32) -> Result<(), ValidationError> {
    if RATING_RANGE.contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::InvalidRating(rating))
    }
}

/// Check title, author and rating, in that order; the first failure wins.
pub fn validate_book(book: &BookInput) -> Result<(), ValidationError> {
    if is_blank(book.title.as_deref()) {
        return Err(ValidationError::EmptyTitle);
    }
    if is_blank(book.author.as_deref()) {
        return Err(ValidationError::EmptyAuthor);
    }
    validate_rating(book.rating)
}

/// Returns the trimmed query.
pub fn validate_query(query: &str) -> Result<&str, ValidationError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyQuery)
    } else {
        Ok(trimmed)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_accepted_only_within_one_to_five() {
        for rating in -3..=9 {
            assert_eq!(
                validate_rating(rating).is_ok(),
                (1..=5).contains(&rating),
                "rating {rating}"
            );
        }
        assert_eq!(
            validate_rating(i32::MIN),
            Err(ValidationError::InvalidRating(i32::MIN))
        );
    }

    #[test]
    fn valid_book_passes() {
        assert_eq!(validate_book(&BookInput::new("Dune", "Herbert", 5)), Ok(()));
    }

    #[test]
    fn missing_or_blank_title_is_rejected() {
        let mut book = BookInput::new("", "Herbert", 5);
        assert_eq!(validate_book(&book), Err(ValidationError::EmptyTitle));

        book.title = Some("   ".into());
        assert_eq!(validate_book(&book), Err(ValidationError::EmptyTitle));

        book.title = None;
        assert_eq!(validate_book(&book), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn missing_or_blank_author_is_rejected() {
        let mut book = BookInput::new("Dune", "\t", 5);
        assert_eq!(validate_book(&book), Err(ValidationError::EmptyAuthor));

        book.author = None;
        assert_eq!(validate_book(&book), Err(ValidationError::EmptyAuthor));
    }

    #[test]
    fn first_violation_wins() {
        let book = BookInput {
            rating: 10,
            ..BookInput::default()
        };
        assert_eq!(validate_book(&book), Err(ValidationError::EmptyTitle));

        let book = BookInput::new("Dune", "", 10);
        assert_eq!(validate_book(&book), Err(ValidationError::EmptyAuthor));

        let book = BookInput::new("Dune", "Herbert", -1);
        assert_eq!(validate_book(&book), Err(ValidationError::InvalidRating(-1)));
    }

    #[test]
    fn query_is_trimmed() {
        assert_eq!(validate_query("  Harry  "), Ok("Harry"));
        assert_eq!(validate_query(" \n "), Err(ValidationError::EmptyQuery));
        assert_eq!(validate_query(""), Err(ValidationError::EmptyQuery));
    }

    #[test]
    fn errors_name_their_field() {
        assert_eq!(ValidationError::EmptyTitle.field(), "title");
        assert_eq!(ValidationError::InvalidRating(9).field(), "rating");
        assert_eq!(ValidationError::InvalidRating(9).reason(), "out_of_range");
        assert_eq!(ValidationError::EmptyQuery.reason(), "empty");
    }
}
