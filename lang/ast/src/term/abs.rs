use codespan::Span;
use derivative::Derivative;
use pretty::DocAllocator;
use printer::theme::ThemeExt;
use printer::tokens::{COLON, COMMA, DOT, LAMBDA, PI};
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::metas::MetaCtx;
use crate::traits::{ContainsMetas, HasSpan, Occurs, Shift, Substitutable, Substitution};

use super::{Binder1, FVar, Term};

// Abs
//
//

/// An abstraction `λ x : typ. body`.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Abs {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub typ: Box<Term>,
    pub body: Binder1,
}

impl Abs {
    pub fn new(name: &str, typ: Term, body: Term) -> Self {
        Abs { span: None, typ: Box::new(typ), body: Binder1::new(name, body) }
    }
}

impl From<Abs> for Term {
    fn from(val: Abs) -> Self {
        Term::Abs(val)
    }
}

impl HasSpan for Abs {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Shift for Abs {
    fn shift_in_range(&mut self, cutoff: usize, by: isize) {
        self.typ.shift_in_range(cutoff, by);
        self.body.shift_in_range(cutoff, by);
    }
}

impl Substitutable for Abs {
    type Target = Abs;

    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        Abs { span: self.span, typ: self.typ.subst(by), body: self.body.subst(by) }
    }
}

impl Occurs for Abs {
    fn occurs(&self, var: &FVar) -> bool {
        self.typ.occurs(var) || self.body.occurs(var)
    }
}

impl ContainsMetas for Abs {
    fn contains_metas(&self, metas: &MetaCtx) -> bool {
        self.typ.contains_metas(metas) || self.body.contains_metas(metas)
    }
}

impl Print for Abs {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let doc = alloc
            .keyword(LAMBDA)
            .append(alloc.var(&self.body.name.id))
            .append(COLON)
            .append(alloc.space())
            .append(self.typ.print_prec(cfg, alloc, Precedence::App))
            .append(DOT)
            .append(alloc.space())
            .append(self.body.body.print(cfg, alloc))
            .group();
        if prec > Precedence::Exp {
            doc.parens()
        } else {
            doc
        }
    }
}

// Prod
//
//

/// A dependent product `Π x : typ, body`.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Prod {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub typ: Box<Term>,
    pub body: Binder1,
}

impl Prod {
    pub fn new(name: &str, typ: Term, body: Term) -> Self {
        Prod { span: None, typ: Box::new(typ), body: Binder1::new(name, body) }
    }
}

impl From<Prod> for Term {
    fn from(val: Prod) -> Self {
        Term::Prod(val)
    }
}

impl HasSpan for Prod {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Shift for Prod {
    fn shift_in_range(&mut self, cutoff: usize, by: isize) {
        self.typ.shift_in_range(cutoff, by);
        self.body.shift_in_range(cutoff, by);
    }
}

impl Substitutable for Prod {
    type Target = Prod;

    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        Prod { span: self.span, typ: self.typ.subst(by), body: self.body.subst(by) }
    }
}

impl Occurs for Prod {
    fn occurs(&self, var: &FVar) -> bool {
        self.typ.occurs(var) || self.body.occurs(var)
    }
}

impl ContainsMetas for Prod {
    fn contains_metas(&self, metas: &MetaCtx) -> bool {
        self.typ.contains_metas(metas) || self.body.contains_metas(metas)
    }
}

impl Print for Prod {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let doc = alloc
            .keyword(PI)
            .append(alloc.var(&self.body.name.id))
            .append(COLON)
            .append(alloc.space())
            .append(self.typ.print_prec(cfg, alloc, Precedence::App))
            .append(COMMA)
            .append(alloc.space())
            .append(self.body.body.print(cfg, alloc))
            .group();
        if prec > Precedence::Exp {
            doc.parens()
        } else {
            doc
        }
    }
}
