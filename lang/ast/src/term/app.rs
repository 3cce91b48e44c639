use codespan::Span;
use derivative::Derivative;
use pretty::DocAllocator;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::metas::{unfold, MetaCtx};
use crate::traits::{ContainsMetas, HasSpan, Occurs, Shift, Substitutable, Substitution};

use super::{FVar, Term};

/// Binary, left-associative application.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct App {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub fun: Box<Term>,
    pub arg: Box<Term>,
}

impl App {
    pub fn new(fun: Term, arg: Term) -> Self {
        App { span: None, fun: Box::new(fun), arg: Box::new(arg) }
    }
}

impl From<App> for Term {
    fn from(val: App) -> Self {
        Term::App(val)
    }
}

impl HasSpan for App {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Shift for App {
    fn shift_in_range(&mut self, cutoff: usize, by: isize) {
        self.fun.shift_in_range(cutoff, by);
        self.arg.shift_in_range(cutoff, by);
    }
}

impl Substitutable for App {
    type Target = App;

    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        App { span: self.span, fun: self.fun.subst(by), arg: self.arg.subst(by) }
    }
}

impl Occurs for App {
    fn occurs(&self, var: &FVar) -> bool {
        self.fun.occurs(var) || self.arg.occurs(var)
    }
}

impl ContainsMetas for App {
    fn contains_metas(&self, metas: &MetaCtx) -> bool {
        self.fun.contains_metas(metas) || self.arg.contains_metas(metas)
    }
}

impl Print for App {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let doc = self
            .fun
            .print_prec(cfg, alloc, Precedence::App)
            .append(alloc.space())
            .append(self.arg.print_prec(cfg, alloc, Precedence::Atom))
            .group();
        if prec > Precedence::App {
            doc.parens()
        } else {
            doc
        }
    }
}

// Spine helpers
//
//

/// Split a term into its head and the left-to-right list of arguments it is
/// applied to, unfolding instantiated metavariables along the spine.
pub fn head_and_args(metas: &MetaCtx, t: &Term) -> (Term, Vec<Term>) {
    let mut args = Vec::new();
    let mut head = unfold(metas, t);
    while let Term::App(App { fun, arg, .. }) = head {
        args.push(*arg);
        head = unfold(metas, &fun);
    }
    args.reverse();
    (head, args)
}

/// Inverse of [head_and_args]: apply `head` to `args` left to right.
pub fn add_args(head: Term, args: Vec<Term>) -> Term {
    args.into_iter().fold(head, |fun, arg| App::new(fun, arg).into())
}

#[cfg(test)]
mod tests {
    use super::super::{Binder, Meta, Sort};
    use super::*;

    #[test]
    fn spines_split_and_rebuild() {
        let metas = MetaCtx::new();
        let head: Term = Sort::typ().into();
        let args: Vec<Term> = vec![Sort::kind().into(), Sort::typ().into()];

        let t = add_args(head.clone(), args.clone());
        let (h, a) = head_and_args(&metas, &t);
        assert_eq!(h, head);
        assert_eq!(a, args);
    }

    #[test]
    fn spines_unfold_instantiated_heads() {
        let mut metas = MetaCtx::new();
        let m = metas.fresh(None, 0, Sort::typ().into());
        let solution: Term = App::new(Sort::typ().into(), Sort::kind().into()).into();
        metas.solve(m, Binder::new(0, solution)).unwrap();

        let t = add_args(Meta::new(m, vec![]).into(), vec![Sort::typ().into()]);
        let (h, a) = head_and_args(&metas, &t);
        assert_eq!(h, Sort::typ().into());
        assert_eq!(a, vec![Sort::kind().into(), Sort::typ().into()]);
    }
}
