use thiserror::Error;

/// Fatal conditions raised while interpreting a query response.
///
/// Per-row data quality problems (ragged rows, null cells, unknown column
/// types) are tolerated by the builders and never surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No datetime column found in the result. The Time Series format requires a time column.")]
    MissingTimeColumn,
    #[error("Missing mandatory time column in annotation query.")]
    MissingAnnotationTimeColumn,
}
