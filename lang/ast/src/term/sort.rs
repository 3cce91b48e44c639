use codespan::Span;
use derivative::Derivative;
use printer::theme::ThemeExt;
use printer::tokens::{KIND, TYPE};
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::traits::HasSpan;

use super::Term;

/// The two sorts of the λΠ-calculus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKind {
    Type,
    Kind,
}

#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Sort {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub kind: SortKind,
}

impl Sort {
    pub fn typ() -> Self {
        Sort { span: None, kind: SortKind::Type }
    }

    pub fn kind() -> Self {
        Sort { span: None, kind: SortKind::Kind }
    }
}

impl From<Sort> for Term {
    fn from(val: Sort) -> Self {
        Term::Sort(val)
    }
}

impl HasSpan for Sort {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Print for Sort {
    fn print_prec<'a>(
        &'a self,
        _cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        match self.kind {
            SortKind::Type => alloc.keyword(TYPE),
            SortKind::Kind => alloc.keyword(KIND),
        }
    }
}
