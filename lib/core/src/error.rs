use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error reading CSV: {0}")]
    Csv(String),

    #[error("Input is not valid UTF-8: {0}")]
    Encoding(String),

    #[error("No columns to parse from file")]
    EmptyDataset,

    #[error("No text columns found in the dataset")]
    NoTextColumns,

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid dictionary name: {0:?}")]
    InvalidDictionaryName(String),

    #[error("Dictionary not found: {0}")]
    DictionaryNotFound(String),

    #[error("Invalid column length: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("No dataset loaded")]
    NoDataset,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Utf8 { pos, err } => {
                let line = pos.as_ref().map(|p| p.line()).unwrap_or(0);
                Error::Encoding(format!("line {}: {}", line, err))
            }
            _ => Error::Csv(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Serialization(error.to_string())
    }
}
