use codespan::Span;
use derivative::Derivative;
use pretty::DocAllocator;
use printer::theme::ThemeExt;
use printer::tokens::{DOLLAR, UNDERSCORE};
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::ident::VarBound;
use crate::metas::MetaCtx;
use crate::traits::{ContainsMetas, HasSpan, Occurs, Shift, Substitutable, Substitution};

use super::{Binder, FVar, Term};

// Patt
//
//

/// A pattern placeholder, legal only in rule left-hand sides and in the
/// transient rows of a pattern matrix. `slot` is `None` for wildcards and
/// for linear pattern variables that the right-hand side does not use;
/// otherwise it indexes the per-rule environment array. The argument list
/// holds the bound variables the pattern variable may depend on.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Patt {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub slot: Option<usize>,
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: VarBound,
    pub args: Vec<Term>,
}

impl Patt {
    pub fn wildcard() -> Self {
        Patt { span: None, slot: None, name: VarBound::from_string(""), args: Vec::new() }
    }

    pub fn var(slot: usize, name: &str) -> Self {
        Patt { span: None, slot: Some(slot), name: VarBound::from_string(name), args: Vec::new() }
    }
}

impl From<Patt> for Term {
    fn from(val: Patt) -> Self {
        Term::Patt(val)
    }
}

impl HasSpan for Patt {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Shift for Patt {
    fn shift_in_range(&mut self, cutoff: usize, by: isize) {
        self.args.shift_in_range(cutoff, by);
    }
}

impl Substitutable for Patt {
    type Target = Patt;

    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        Patt {
            span: self.span,
            slot: self.slot,
            name: self.name.clone(),
            args: self.args.subst(by),
        }
    }
}

impl Occurs for Patt {
    fn occurs(&self, var: &FVar) -> bool {
        self.args.occurs(var)
    }
}

impl ContainsMetas for Patt {
    fn contains_metas(&self, metas: &MetaCtx) -> bool {
        self.args.contains_metas(metas)
    }
}

impl Print for Patt {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        let name = if self.name.id.is_empty() { UNDERSCORE } else { self.name.id.as_str() };
        let mut doc = alloc.text(DOLLAR).append(alloc.var(name));
        if cfg.print_var_envs && !self.args.is_empty() {
            doc = doc.append(printer::print_comma_separated(&self.args, cfg, alloc).brackets());
        }
        doc
    }
}

// EnvRef
//
//

/// The target of a pattern-variable environment reference.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub enum TeRef {
    /// A slot of the enclosing rule's environment array, bound by the
    /// right-hand side binder.
    Slot(usize),
    /// A slot that has been consumed by matching.
    Bound(Binder),
    /// A slot that is (or is deliberately left) unmatched.
    Unmatched,
}

/// A pattern-variable environment reference `slot[e₀ …]`, used when
/// splicing a matched substitution into a right-hand side.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct EnvRef {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub target: TeRef,
    pub args: Vec<Term>,
}

impl EnvRef {
    pub fn slot(slot: usize, args: Vec<Term>) -> Self {
        EnvRef { span: None, target: TeRef::Slot(slot), args }
    }
}

impl From<EnvRef> for Term {
    fn from(val: EnvRef) -> Self {
        Term::EnvRef(val)
    }
}

impl HasSpan for EnvRef {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Shift for EnvRef {
    fn shift_in_range(&mut self, cutoff: usize, by: isize) {
        self.args.shift_in_range(cutoff, by);
    }
}

impl Substitutable for EnvRef {
    type Target = EnvRef;

    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        EnvRef { span: self.span, target: self.target.clone(), args: self.args.subst(by) }
    }
}

impl Occurs for EnvRef {
    fn occurs(&self, var: &FVar) -> bool {
        let target = match &self.target {
            TeRef::Bound(binder) => binder.occurs(var),
            TeRef::Slot(_) | TeRef::Unmatched => false,
        };
        target || self.args.occurs(var)
    }
}

impl ContainsMetas for EnvRef {
    fn contains_metas(&self, metas: &MetaCtx) -> bool {
        let target = match &self.target {
            TeRef::Bound(binder) => binder.contains_metas(metas),
            TeRef::Slot(_) | TeRef::Unmatched => false,
        };
        target || self.args.contains_metas(metas)
    }
}

impl Print for EnvRef {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        let head = match &self.target {
            TeRef::Slot(slot) => alloc.text(DOLLAR).append(alloc.text(format!("{slot}"))),
            TeRef::Bound(_) => alloc.text(DOLLAR).append(alloc.text("⟨bound⟩")),
            TeRef::Unmatched => alloc.text(DOLLAR).append(alloc.text(UNDERSCORE)),
        };
        if cfg.print_var_envs && !self.args.is_empty() {
            head.append(printer::print_comma_separated(&self.args, cfg, alloc).brackets())
        } else {
            head
        }
    }
}
