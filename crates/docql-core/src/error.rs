use crate::term::ConvertError;
use thiserror::Error as ThisError;

///
/// TermError
///
/// Failures raised while generating a term from a query chain.
/// Shape errors never reach this type; they are rejected by trait bounds
/// when the chain is built.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TermError {
    #[error("unsupported expression form: {construct}")]
    UnsupportedExpression { construct: String },

    #[error("value not convertible: {0}")]
    Convert(#[from] ConvertError),
}

impl TermError {
    /// Construct an unsupported-expression error naming the offending construct.
    pub(crate) fn unsupported(construct: impl Into<String>) -> Self {
        Self::UnsupportedExpression {
            construct: construct.into(),
        }
    }
}
