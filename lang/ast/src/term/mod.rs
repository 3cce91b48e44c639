use codespan::Span;
use derivative::Derivative;
use printer::theme::ThemeExt;
use printer::tokens::UNDERSCORE;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::metas::MetaCtx;
use crate::traits::{ContainsMetas, HasSpan, Occurs, Shift, Substitutable, Substitution};

mod abs;
mod app;
mod binder;
mod meta;
mod patt;
mod sort;
mod sym;
mod variable;

pub use abs::*;
pub use app::*;
pub use binder::*;
pub use meta::*;
pub use patt::*;
pub use sort::*;
pub use sym::*;
pub use variable::*;

// Term
//
//

/// The syntax of terms, in locally nameless style: variables bound by an
/// enclosing binder are de Bruijn indices, variables introduced by opening
/// a binder are identity-numbered free variables.
///
/// Equality and hashing are up to α-equivalence: source locations and
/// display names do not participate.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub enum Term {
    Variable(Variable),
    FreeVar(FreeVar),
    Sort(Sort),
    Sym(Sym),
    App(App),
    Abs(Abs),
    Prod(Prod),
    Meta(Meta),
    Patt(Patt),
    EnvRef(EnvRef),
    Wild(Wild),
}

impl HasSpan for Term {
    fn span(&self) -> Option<Span> {
        match self {
            Term::Variable(e) => e.span(),
            Term::FreeVar(e) => e.span(),
            Term::Sort(e) => e.span(),
            Term::Sym(e) => e.span(),
            Term::App(e) => e.span(),
            Term::Abs(e) => e.span(),
            Term::Prod(e) => e.span(),
            Term::Meta(e) => e.span(),
            Term::Patt(e) => e.span(),
            Term::EnvRef(e) => e.span(),
            Term::Wild(e) => e.span(),
        }
    }
}

impl Shift for Term {
    fn shift_in_range(&mut self, cutoff: usize, by: isize) {
        match self {
            Term::Variable(e) => e.shift_in_range(cutoff, by),
            Term::FreeVar(_) => {}
            Term::Sort(_) => {}
            Term::Sym(_) => {}
            Term::App(e) => e.shift_in_range(cutoff, by),
            Term::Abs(e) => e.shift_in_range(cutoff, by),
            Term::Prod(e) => e.shift_in_range(cutoff, by),
            Term::Meta(e) => e.shift_in_range(cutoff, by),
            Term::Patt(e) => e.shift_in_range(cutoff, by),
            Term::EnvRef(e) => e.shift_in_range(cutoff, by),
            Term::Wild(_) => {}
        }
    }
}

impl Substitutable for Term {
    type Target = Term;

    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        match self {
            Term::Variable(e) => e.clone().into(),
            Term::FreeVar(e) => e.subst(by),
            Term::Sort(e) => e.clone().into(),
            Term::Sym(e) => e.clone().into(),
            Term::App(e) => e.subst(by).into(),
            Term::Abs(e) => e.subst(by).into(),
            Term::Prod(e) => e.subst(by).into(),
            Term::Meta(e) => e.subst(by).into(),
            Term::Patt(e) => e.subst(by).into(),
            Term::EnvRef(e) => e.subst(by).into(),
            Term::Wild(e) => e.clone().into(),
        }
    }
}

impl Occurs for Term {
    fn occurs(&self, var: &FVar) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::FreeVar(e) => e.occurs(var),
            Term::Sort(_) => false,
            Term::Sym(_) => false,
            Term::App(e) => e.occurs(var),
            Term::Abs(e) => e.occurs(var),
            Term::Prod(e) => e.occurs(var),
            Term::Meta(e) => e.occurs(var),
            Term::Patt(e) => e.occurs(var),
            Term::EnvRef(e) => e.occurs(var),
            Term::Wild(_) => false,
        }
    }
}

impl ContainsMetas for Term {
    fn contains_metas(&self, metas: &MetaCtx) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::FreeVar(_) => false,
            Term::Sort(_) => false,
            Term::Sym(_) => false,
            Term::App(e) => e.contains_metas(metas),
            Term::Abs(e) => e.contains_metas(metas),
            Term::Prod(e) => e.contains_metas(metas),
            Term::Meta(e) => e.contains_metas(metas),
            Term::Patt(e) => e.contains_metas(metas),
            Term::EnvRef(e) => e.contains_metas(metas),
            Term::Wild(_) => false,
        }
    }
}

impl Print for Term {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        match self {
            Term::Variable(e) => e.print_prec(cfg, alloc, prec),
            Term::FreeVar(e) => e.print_prec(cfg, alloc, prec),
            Term::Sort(e) => e.print_prec(cfg, alloc, prec),
            Term::Sym(e) => e.print_prec(cfg, alloc, prec),
            Term::App(e) => e.print_prec(cfg, alloc, prec),
            Term::Abs(e) => e.print_prec(cfg, alloc, prec),
            Term::Prod(e) => e.print_prec(cfg, alloc, prec),
            Term::Meta(e) => e.print_prec(cfg, alloc, prec),
            Term::Patt(e) => e.print_prec(cfg, alloc, prec),
            Term::EnvRef(e) => e.print_prec(cfg, alloc, prec),
            Term::Wild(e) => e.print_prec(cfg, alloc, prec),
        }
    }
}

// Wild
//
//

/// Transient placeholder inserted by the inference oracle for positions it
/// has not elaborated yet. Never part of a fully elaborated term handed to
/// this core.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Wild {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
}

impl From<Wild> for Term {
    fn from(val: Wild) -> Self {
        Term::Wild(val)
    }
}

impl HasSpan for Wild {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Print for Wild {
    fn print_prec<'a>(
        &'a self,
        _cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        alloc.keyword(UNDERSCORE)
    }
}
