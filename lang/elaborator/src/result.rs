use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use ast::{MetaError, SigError};

/// Errors raised while checking a rewrite rule.
///
/// Two tiers: located rejections of the rule under check, and structural
/// bugs for malformed input that upstream elaboration must never produce.
/// An untypable left-hand side is neither: such a rule has no well-typed
/// instance and is accepted as vacuous, with a warning.
#[derive(Error, Diagnostic, Debug)]
pub enum RuleError {
    #[error("The rule {rule} does not preserve typing")]
    #[diagnostic(code("R-001"))]
    DoesNotPreserveTyping {
        rule: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Cannot solve the following constraints:\n{constraints}")]
    #[diagnostic(code("R-002"))]
    CannotSolve {
        constraints: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Cannot instantiate all metavariables in the rule {rule}")]
    #[diagnostic(code("R-003"))]
    CannotInstantiate {
        rule: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error("Unexpected {term} in a rule left-hand side")]
    #[diagnostic(code("R-004"))]
    /// This error should not occur: the constructors rejected here cannot
    /// be produced by upstream elaboration of a rule left-hand side.
    LhsBadTerm {
        term: String,
        #[label]
        span: Option<SourceSpan>,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Signature(#[from] SigError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Meta(#[from] MetaError),
}
