use miette::Diagnostic;
use thiserror::Error;

/// Structural bugs detected while operating on a pattern matrix. None of
/// these can be produced by rules that passed the subject-reduction check.
#[derive(Error, Diagnostic, Debug)]
pub enum MatrixError {
    #[error("Unexpected {term} at the head of a default-matrix row")]
    #[diagnostic(code("D-001"))]
    BadDefaultHead { term: String },
    #[error("Pattern variable {name} is applied to non-variable arguments")]
    #[diagnostic(code("D-002"))]
    PattArgsNotVariables { name: String },
}
