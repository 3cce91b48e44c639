use codespan::Span;
use derivative::Derivative;
use miette::Diagnostic;
use thiserror::Error;

use crate::term::{Abs, App, Binder, Binder1, EnvRef, Meta, Patt, Prod, Term};
use crate::traits::HasSpan;
use crate::HashMap;

// MetaVar
//
//

/// The identity of a metavariable. Equality is by id; the span records
/// where the metavariable was introduced.
#[derive(Debug, Clone, Copy, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct MetaVar {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub id: u64,
}

impl HasSpan for MetaVar {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

// MetaState
//
//

/// Everything the context knows about one metavariable: its arity `k`, its
/// type `∀(x₁:A₁)…(x_k:A_k), A_{k+1}`, an optional textual name, and the
/// instantiation slot which is filled at most once by unification.
#[derive(Debug, Clone)]
pub struct MetaState {
    pub name: Option<String>,
    pub arity: usize,
    pub typ: Box<Term>,
    pub solution: Option<Binder>,
}

// MetaCtx
//
//

#[derive(Debug, Error, Diagnostic)]
pub enum MetaError {
    #[error("Metavariable ?{id} is not bound in this context")]
    #[diagnostic(code("M-001"))]
    UnboundMetaVar { id: u64 },
    #[error("Metavariable ?{id} is already instantiated")]
    #[diagnostic(code("M-002"))]
    AlreadySolved { id: u64 },
    #[error("Metavariable ?{id} has arity {arity} but was instantiated with arity {actual}")]
    #[diagnostic(code("M-003"))]
    ArityMismatch { id: u64, arity: usize, actual: usize },
}

/// The metavariable context. It owns the identity counter, the types of all
/// metavariables and their instantiation slots. It is passed explicitly to
/// every traversal that needs to look through instantiations; there is no
/// process-wide state.
#[derive(Debug, Clone, Default)]
pub struct MetaCtx {
    map: HashMap<MetaVar, MetaState>,
    next_id: u64,
}

impl MetaCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Introduce a fresh, uninstantiated metavariable of the given arity
    /// and type.
    pub fn fresh(&mut self, name: Option<String>, arity: usize, typ: Term) -> MetaVar {
        let meta = MetaVar { span: None, id: self.next_id };
        self.next_id += 1;
        self.map.insert(meta, MetaState { name, arity, typ: Box::new(typ), solution: None });
        meta
    }

    pub fn get(&self, meta: MetaVar) -> Option<&MetaState> {
        self.map.get(&meta)
    }

    pub fn arity(&self, meta: MetaVar) -> Result<usize, MetaError> {
        self.get(meta).map(|state| state.arity).ok_or(MetaError::UnboundMetaVar { id: meta.id })
    }

    pub fn typ(&self, meta: MetaVar) -> Result<&Term, MetaError> {
        self.get(meta).map(|state| &*state.typ).ok_or(MetaError::UnboundMetaVar { id: meta.id })
    }

    pub fn solution(&self, meta: MetaVar) -> Option<&Binder> {
        self.get(meta).and_then(|state| state.solution.as_ref())
    }

    /// Fill the instantiation slot of `meta`. The slot is monotonic:
    /// instantiating an already instantiated metavariable is an error.
    pub fn solve(&mut self, meta: MetaVar, solution: Binder) -> Result<(), MetaError> {
        let state =
            self.map.get_mut(&meta).ok_or(MetaError::UnboundMetaVar { id: meta.id })?;
        if state.solution.is_some() {
            return Err(MetaError::AlreadySolved { id: meta.id });
        }
        if state.arity != solution.arity {
            return Err(MetaError::ArityMismatch {
                id: meta.id,
                arity: state.arity,
                actual: solution.arity,
            });
        }
        state.solution = Some(solution);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MetaVar, &MetaState)> {
        self.map.iter()
    }
}

// Unfolding
//
//

/// Resolve instantiated metavariables at the head of `t`. Traversals apply
/// this at every head inspection.
pub fn unfold(metas: &MetaCtx, t: &Term) -> Term {
    match t {
        Term::Meta(Meta { meta, args, .. }) => match metas.solution(*meta) {
            Some(solution) => {
                let applied = solution.apply(args);
                unfold(metas, &applied)
            }
            None => t.clone(),
        },
        _ => t.clone(),
    }
}

/// Deeply resolve instantiated metavariables everywhere in `t`.
pub fn zonk(metas: &MetaCtx, t: &Term) -> Term {
    match t {
        Term::Variable(_) | Term::FreeVar(_) | Term::Sort(_) | Term::Sym(_) | Term::Wild(_) => {
            t.clone()
        }
        Term::App(e) => App {
            span: e.span,
            fun: Box::new(zonk(metas, &e.fun)),
            arg: Box::new(zonk(metas, &e.arg)),
        }
        .into(),
        Term::Abs(e) => Abs {
            span: e.span,
            typ: Box::new(zonk(metas, &e.typ)),
            body: Binder1 { name: e.body.name.clone(), body: Box::new(zonk(metas, &e.body.body)) },
        }
        .into(),
        Term::Prod(e) => Prod {
            span: e.span,
            typ: Box::new(zonk(metas, &e.typ)),
            body: Binder1 { name: e.body.name.clone(), body: Box::new(zonk(metas, &e.body.body)) },
        }
        .into(),
        Term::Meta(e) => match metas.solution(e.meta) {
            Some(solution) => {
                let applied = solution.apply(&e.args);
                zonk(metas, &applied)
            }
            None => Meta {
                span: e.span,
                meta: e.meta,
                args: e.args.iter().map(|a| zonk(metas, a)).collect(),
            }
            .into(),
        },
        Term::Patt(e) => Patt {
            span: e.span,
            slot: e.slot,
            name: e.name.clone(),
            args: e.args.iter().map(|a| zonk(metas, a)).collect(),
        }
        .into(),
        Term::EnvRef(e) => EnvRef {
            span: e.span,
            target: e.target.clone(),
            args: e.args.iter().map(|a| zonk(metas, a)).collect(),
        }
        .into(),
    }
}

/// Whether the metavariable `needle` occurs in `t`, looking through
/// instantiations.
pub fn occurs_meta(metas: &MetaCtx, t: &Term, needle: MetaVar) -> bool {
    match t {
        Term::Variable(_) | Term::FreeVar(_) | Term::Sort(_) | Term::Sym(_) | Term::Wild(_) => {
            false
        }
        Term::App(e) => occurs_meta(metas, &e.fun, needle) || occurs_meta(metas, &e.arg, needle),
        Term::Abs(e) => {
            occurs_meta(metas, &e.typ, needle) || occurs_meta(metas, &e.body.body, needle)
        }
        Term::Prod(e) => {
            occurs_meta(metas, &e.typ, needle) || occurs_meta(metas, &e.body.body, needle)
        }
        Term::Meta(e) => {
            if e.meta == needle {
                return true;
            }
            match metas.solution(e.meta) {
                Some(solution) => occurs_meta(metas, &solution.apply(&e.args), needle),
                None => e.args.iter().any(|a| occurs_meta(metas, a, needle)),
            }
        }
        Term::Patt(e) => e.args.iter().any(|a| occurs_meta(metas, a, needle)),
        Term::EnvRef(e) => e.args.iter().any(|a| occurs_meta(metas, a, needle)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Sort;
    use crate::traits::ContainsMetas;

    #[test]
    fn solve_is_set_once() {
        let mut metas = MetaCtx::new();
        let m = metas.fresh(None, 0, Sort::typ().into());
        metas.solve(m, Binder::new(0, Sort::typ().into())).unwrap();
        assert!(metas.solve(m, Binder::new(0, Sort::kind().into())).is_err());
    }

    #[test]
    fn unfold_resolves_chains() {
        let mut metas = MetaCtx::new();
        let m1 = metas.fresh(None, 0, Sort::typ().into());
        let m2 = metas.fresh(None, 0, Sort::typ().into());
        metas.solve(m1, Binder::new(0, Meta::new(m2, vec![]).into())).unwrap();
        metas.solve(m2, Binder::new(0, Sort::typ().into())).unwrap();

        let t: Term = Meta::new(m1, vec![]).into();
        assert_eq!(unfold(&metas, &t), Sort::typ().into());
    }

    #[test]
    fn contains_metas_looks_through_instantiations() {
        let mut metas = MetaCtx::new();
        let m = metas.fresh(None, 0, Sort::typ().into());
        let t: Term = Meta::new(m, vec![]).into();
        assert!(t.contains_metas(&metas));

        metas.solve(m, Binder::new(0, Sort::typ().into())).unwrap();
        assert!(!t.contains_metas(&metas));
    }
}
