// ⚠️ Naming Errors - typed failures of the core pipeline
// Loading and configuration use anyhow; everything the core can reject lives here

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    /// Month outside 1-12, day not in the month, or hour outside 0-23
    #[error("Invalid birth moment: {year}-{month:02}-{day:02} {hour:02}h")]
    InvalidDate {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
    },

    #[error("Character database is empty")]
    EmptyDatabase,

    #[error("Hexagram table is empty")]
    EmptyHexagramTable,

    #[error("Unknown element: {0:?}")]
    UnknownElement(String),

    /// Duplicate redraws ran past the configured bound
    #[error("Could only draw {accepted} of {requested} distinct names after {attempts} rejected drafts")]
    SelectionExhausted {
        accepted: usize,
        requested: usize,
        attempts: usize,
    },
}

pub type Result<T> = std::result::Result<T, NamingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_message() {
        let err = NamingError::InvalidDate {
            year: 1990,
            month: 2,
            day: 30,
            hour: 8,
        };
        assert_eq!(err.to_string(), "Invalid birth moment: 1990-02-30 08h");
    }

    #[test]
    fn test_exhausted_message() {
        let err = NamingError::SelectionExhausted {
            accepted: 2,
            requested: 3,
            attempts: 64,
        };
        assert!(err.to_string().contains("2 of 3"));
    }
}
