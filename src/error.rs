use protoquery_xpath::XPathError;
use thiserror::Error;

/// The errors surfaced by building documents and running queries against them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtoQueryError {
    /// The message reported a field kind the tree builder cannot project.
    /// No partial document is returned.
    #[error("Unsupported kind '{kind}' for field '{field}'")]
    UnsupportedFieldKind { field: String, kind: String },

    #[error("Invalid expression '{expression}': {message}")]
    InvalidExpression { expression: String, message: String },

    #[error("Failed to evaluate '{expression}': {source}")]
    EvaluationError {
        expression: String,
        #[source]
        source: XPathError,
    },
}

pub type Result<T> = std::result::Result<T, ProtoQueryError>;
