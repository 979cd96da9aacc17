use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LibraryEventType {
    New,
    Update,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default)]
    pub book_id: Option<i32>,
    #[serde(default)]
    pub book_name: Option<String>,
    #[serde(default)]
    pub book_author: Option<String>,
}

impl Book {
    pub fn new(book_id: i32, book_name: impl Into<String>, book_author: impl Into<String>) -> Self {
        Book {
            book_id: Some(book_id),
            book_name: Some(book_name.into()),
            book_author: Some(book_author.into()),
        }
    }
}

/// A library action as received on ingress and published to Kafka.
///
/// Field order is part of the wire format: consumers compare the serialized
/// value byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEvent {
    #[serde(default)]
    pub library_event_id: Option<i32>,
    #[serde(default)]
    pub library_event_type: Option<LibraryEventType>,
    #[serde(default)]
    pub book: Option<Book>,
}

impl LibraryEvent {
    pub fn new(library_event_id: Option<i32>, book: Book) -> Self {
        LibraryEvent {
            library_event_id,
            library_event_type: None,
            book: Some(book),
        }
    }

    pub fn tagged(mut self, event_type: LibraryEventType) -> Self {
        self.library_event_type = Some(event_type);
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Checks the fields a well-formed event must carry before it can be
    /// dispatched. All failures are collected rather than stopping at the
    /// first one.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        match &self.book {
            None => errors.push(FieldError::new("book", MUST_NOT_BE_NULL)),
            Some(book) => {
                if book.book_id.is_none() {
                    errors.push(FieldError::new("book.bookId", MUST_NOT_BE_NULL));
                }
                let author_blank = book
                    .book_author
                    .as_deref()
                    .map_or(true, |author| author.trim().is_empty());
                if author_blank {
                    errors.push(FieldError::new("book.bookAuthor", MUST_NOT_BE_BLANK));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::new(errors))
        }
    }
}

const MUST_NOT_BE_NULL: &str = "must not be null";
const MUST_NOT_BE_BLANK: &str = "must not be blank";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        FieldError { field, message }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.field, self.message)
    }
}

/// Field errors sorted by field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn new(mut errors: Vec<FieldError>) -> Self {
        errors.sort_by(|a, b| a.field.cmp(b.field));
        ValidationErrors(errors)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Book {
        Book::new(123, "Kafka Using Spring Boot", "Aleksandar Grahovac")
    }

    #[test]
    fn serializes_in_wire_order() {
        let event = LibraryEvent::new(None, book()).tagged(LibraryEventType::New);
        assert_eq!(
            event.to_json().unwrap(),
            r#"{"libraryEventId":null,"libraryEventType":"NEW","book":{"bookId":123,"bookName":"Kafka Using Spring Boot","bookAuthor":"Aleksandar Grahovac"}}"#
        );
    }

    #[test]
    fn untagged_event_serializes_null_type() {
        let event = LibraryEvent::new(Some(7), book());
        let json = event.to_json().unwrap();
        assert!(json.starts_with(r#"{"libraryEventId":7,"libraryEventType":null,"#));
    }

    #[test]
    fn deserializes_partial_payload() {
        let event: LibraryEvent =
            serde_json::from_str(r#"{"book":{"bookName":"Kafka Using Spring Boot"}}"#).unwrap();
        assert_eq!(event.library_event_id, None);
        assert_eq!(event.library_event_type, None);
        let book = event.book.unwrap();
        assert_eq!(book.book_id, None);
        assert_eq!(book.book_author, None);
    }

    #[test]
    fn deserializes_update_type() {
        let event: LibraryEvent = serde_json::from_str(
            r#"{"libraryEventId":1,"libraryEventType":"UPDATE","book":{"bookId":2,"bookName":"n","bookAuthor":"a"}}"#,
        )
        .unwrap();
        assert_eq!(event.library_event_type, Some(LibraryEventType::Update));
    }

    #[test]
    fn valid_event_passes() {
        assert!(LibraryEvent::new(None, book()).validate().is_ok());
    }

    #[test]
    fn missing_book_fields_are_reported_sorted() {
        let event = LibraryEvent::new(
            None,
            Book {
                book_id: None,
                book_name: Some("Kafka Using Spring Boot".into()),
                book_author: None,
            },
        );
        let errors = event.validate().unwrap_err();
        assert_eq!(errors.errors().len(), 2);
        assert_eq!(
            errors.to_string(),
            "book.bookAuthor-must not be blank, book.bookId-must not be null"
        );
    }

    #[test]
    fn whitespace_author_is_blank() {
        let mut b = book();
        b.book_author = Some("   ".into());
        let errors = LibraryEvent::new(None, b).validate().unwrap_err();
        assert_eq!(errors.to_string(), "book.bookAuthor-must not be blank");
    }

    #[test]
    fn missing_book_is_reported() {
        let event = LibraryEvent::default();
        assert_eq!(
            event.validate().unwrap_err().to_string(),
            "book-must not be null"
        );
    }
}
