use thiserror::Error;

/// Failures surfaced by the pricing engine.
///
/// Missing or mismatched offer data is deliberately not an error: an offer
/// list that covers none of the requested containers simply contributes a
/// cost of 0.
#[derive(Debug, Error, PartialEq)]
pub enum QuoteError {
    #[error("{selected} seafreight offers selected for only {requested} distinct container types")]
    SelectionTooLarge { selected: usize, requested: usize },
    #[error("two selected seafreight offers cover the same container type: {0}")]
    DuplicateContainerType(String),
    #[error("container index {0} is out of range")]
    ContainerIndexOutOfRange(usize),
    #[error("margin {0}% is outside the allowed 0..=100 range")]
    InvalidMargin(f64),
    #[error("lump sum {0} must not be negative")]
    InvalidAdding(f64),
}

pub type Result<T> = std::result::Result<T, QuoteError>;
