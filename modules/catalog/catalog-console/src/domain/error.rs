use catalog_sdk::CatalogError;
use console_sdk::MutationError;
use thiserror::Error;

/// Problems with the composite-keyed pricing form state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("pricing form state must be an object keyed by configuration")]
    NotAnObject,

    #[error("malformed configuration key {key}: {reason}")]
    MalformedKey { key: String, reason: String },

    #[error("configuration key {key} appears more than once")]
    DuplicateKey { key: String },

    #[error("options of {key} must be an object of option -> price")]
    OptionsNotAnObject { key: String },

    #[error("price of '{option}' in {key} must be a non-negative integer, got {value}")]
    InvalidPrice {
        key: String,
        option: String,
        value: String,
    },
}

/// Why an editor submission was not sent, or failed.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("unsupported image type '{0}': only JPEG and PNG are accepted")]
    UnsupportedImage(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Mutation(#[from] MutationError<CatalogError>),
}
