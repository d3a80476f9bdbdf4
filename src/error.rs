use thiserror::Error;

/// Errors that can occur while adapting a remote repository
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Invalid configuration: option {name} value cannot be null")]
    MissingOption { name: String },

    #[error("Invalid configuration: option {name} is advertised more than once")]
    DuplicateOption { name: String },

    #[error("Item {item_location} is missing required metadata field {field}")]
    MissingField {
        field: &'static str,
        item_location: String,
    },

    #[error("Invalid timestamp in field {field}: {value}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Remote repository returned status {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Result handler error: {message}")]
    Handler { message: String },

    #[error("Operation cancelled")]
    Cancelled,
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;
