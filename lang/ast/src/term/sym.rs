use codespan::Span;
use derivative::Derivative;
use printer::theme::ThemeExt;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::decls::SymId;
use crate::ident::IdBound;
use crate::traits::HasSpan;

use super::Term;

/// A reference to a symbol of the signature. The name is a display hint
/// recording how the reference was written (possibly through an alias);
/// only the id is semantically significant.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Sym {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub id: SymId,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: IdBound,
}

impl From<Sym> for Term {
    fn from(val: Sym) -> Self {
        Term::Sym(val)
    }
}

impl HasSpan for Sym {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Print for Sym {
    fn print_prec<'a>(
        &'a self,
        _cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        alloc.ctor(&self.name.id)
    }
}
