use std::fmt;

use codespan::Span;
use derivative::Derivative;
use pretty::DocAllocator;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::ident::VarBound;
use crate::traits::{HasSpan, Occurs, Shift, Substitutable, Substitution};

use super::Term;

// Idx
//
//

/// A de Bruijn index: the number of binders between a variable occurrence
/// and the binder it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Idx(pub usize);

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Variable
//
//

/// A bound variable occurrence. The name is a display hint recorded by the
/// parser; only the index is semantically significant.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Variable {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub idx: Idx,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: VarBound,
}

impl Variable {
    pub fn new(idx: usize) -> Self {
        Variable { span: None, idx: Idx(idx), name: VarBound::from_string("") }
    }
}

impl From<Variable> for Term {
    fn from(val: Variable) -> Self {
        Term::Variable(val)
    }
}

impl HasSpan for Variable {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Shift for Variable {
    fn shift_in_range(&mut self, cutoff: usize, by: isize) {
        if self.idx.0 >= cutoff {
            self.idx = Idx((self.idx.0 as isize + by) as usize);
        }
    }
}

impl Print for Variable {
    fn print_prec<'a>(
        &'a self,
        _cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        if self.name.id.is_empty() {
            alloc.text(format!("x{}", self.idx))
        } else {
            alloc.text(self.name.id.as_str())
        }
    }
}

// FVar
//
//

/// The identity of a free variable introduced by opening a binder. Equality
/// is by the numeric id; the name is a display hint.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct FVar {
    pub id: u64,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: VarBound,
}

impl fmt::Display for FVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.id.is_empty() {
            write!(f, "v{}", self.id)
        } else {
            write!(f, "{}", self.name.id)
        }
    }
}

// FreeVar
//
//

/// A free variable occurrence.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct FreeVar {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub var: FVar,
}

impl From<FreeVar> for Term {
    fn from(val: FreeVar) -> Self {
        Term::FreeVar(val)
    }
}

impl From<FVar> for Term {
    fn from(var: FVar) -> Self {
        Term::FreeVar(FreeVar { span: None, var })
    }
}

impl HasSpan for FreeVar {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Substitutable for FreeVar {
    type Target = Term;

    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        match by.get_subst(&self.var) {
            Some(t) => t,
            None => self.clone().into(),
        }
    }
}

impl Occurs for FreeVar {
    fn occurs(&self, var: &FVar) -> bool {
        self.var == *var
    }
}

impl Print for FreeVar {
    fn print_prec<'a>(
        &'a self,
        _cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        alloc.text(self.var.to_string())
    }
}
