use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while loading, querying or printing a document.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("I/O error: {0}")]
    #[diagnostic(code(xq::io))]
    Io(#[from] std::io::Error),

    #[error("XPath error: {message}")]
    #[diagnostic(
        code(xq::xpath),
        help("The query must be a valid XPath 1.0 expression, e.g. '//item/@id'.")
    )]
    XPath {
        message: String,
        #[source_code]
        query: String,
    },

    #[error("Highlighting error: {0}")]
    #[diagnostic(code(xq::highlight))]
    Highlight(#[from] syntect::Error),
}

impl Error {
    pub(crate) fn xpath(query: &str, cause: impl std::fmt::Display) -> Self {
        Error::XPath {
            message: cause.to_string(),
            query: query.to_string(),
        }
    }
}
