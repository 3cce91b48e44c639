use codespan::Span;
use derivative::Derivative;
use printer::theme::ThemeExt;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::metas::{MetaCtx, MetaVar};
use crate::traits::{ContainsMetas, HasSpan, Occurs, Shift, Substitutable, Substitution};

use super::{FVar, Term};

/// A metavariable instance `?m[e₀ … e_{k-1}]`. The explicit environment
/// supplies the values of the `k = arity(m)` variables the metavariable was
/// parameterised over.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Meta {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub meta: MetaVar,
    pub args: Vec<Term>,
}

impl Meta {
    pub fn new(meta: MetaVar, args: Vec<Term>) -> Self {
        Meta { span: None, meta, args }
    }
}

impl From<Meta> for Term {
    fn from(val: Meta) -> Self {
        Term::Meta(val)
    }
}

impl HasSpan for Meta {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Shift for Meta {
    fn shift_in_range(&mut self, cutoff: usize, by: isize) {
        self.args.shift_in_range(cutoff, by);
    }
}

impl Substitutable for Meta {
    type Target = Meta;

    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        Meta { span: self.span, meta: self.meta, args: self.args.subst(by) }
    }
}

impl Occurs for Meta {
    fn occurs(&self, var: &FVar) -> bool {
        self.args.occurs(var)
    }
}

impl ContainsMetas for Meta {
    fn contains_metas(&self, metas: &MetaCtx) -> bool {
        match metas.solution(self.meta) {
            // Crossing an instantiated metavariable: look at what it
            // unfolds to instead.
            Some(solution) => solution.apply(&self.args).contains_metas(metas),
            None => true,
        }
    }
}

impl Print for Meta {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        let mut doc = self.meta.print(cfg, alloc);
        if cfg.print_var_envs && !self.args.is_empty() {
            doc = doc.append(printer::print_comma_separated(&self.args, cfg, alloc).brackets());
        }
        doc
    }
}

impl Print for MetaVar {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        if cfg.print_metavar_ids {
            alloc.meta(&format!("?{}", self.id))
        } else {
            alloc.meta("?")
        }
    }
}
