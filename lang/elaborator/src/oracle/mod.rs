//! The external contracts the rule checker relies on.
//!
//! Type inference, type checking, unification and convertibility are
//! trusted collaborators of this core: the checker only depends on the
//! contracts below. A first-order syntactic implementation is provided in
//! [syntactic] for tests and simple embedders.

use ast::{FVar, HashMap, MetaCtx, Signature, SymId, Term};

use crate::constraints::Constraint;

pub mod syntactic;

pub use syntactic::SyntacticOracle;

/// A typing context mapping the free variables opened during inference to
/// their types.
#[derive(Debug, Clone, Default)]
pub struct TypingCtx {
    entries: Vec<(FVar, Term)>,
}

impl TypingCtx {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, var: FVar, typ: Term) {
        self.entries.push((var, typ));
    }

    pub fn lookup(&self, var: &FVar) -> Option<&Term> {
        self.entries.iter().rev().find(|(v, _)| v == var).map(|(_, typ)| typ)
    }
}

/// Builtin symbols known to the unification oracle, registered by name.
#[derive(Debug, Clone, Default)]
pub struct Builtins {
    map: HashMap<String, SymId>,
}

impl Builtins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, id: SymId) {
        self.map.insert(name.to_owned(), id);
    }

    pub fn get(&self, name: &str) -> Option<SymId> {
        self.map.get(name).copied()
    }
}

/// The inference, checking, unification and convertibility oracles.
///
/// Contracts:
///
/// * `infer` returns the inferred type of `t` together with deferred
///   convertibility constraints, or `None` if `t` is untypable.
/// * `check` returns the constraints that must hold for `t : typ`.
/// * `solve` returns `None` on contradiction and the residual unsolved
///   constraints otherwise. It is the only collaborator that fills
///   metavariable instantiation slots.
/// * `eq_modulo` decides convertibility modulo the accepted rewrite rules.
///   It may fail to terminate on ill-behaved rewrite systems; that is the
///   caller's responsibility.
pub trait Oracle {
    fn infer(
        &self,
        sig: &Signature,
        metas: &mut MetaCtx,
        ctx: &TypingCtx,
        t: &Term,
    ) -> Option<(Term, Vec<Constraint>)>;

    fn check(
        &self,
        sig: &Signature,
        metas: &mut MetaCtx,
        ctx: &TypingCtx,
        t: &Term,
        typ: &Term,
    ) -> Vec<Constraint>;

    fn solve(
        &self,
        sig: &Signature,
        metas: &mut MetaCtx,
        builtins: &Builtins,
        problems: Vec<Constraint>,
    ) -> Option<Vec<Constraint>>;

    fn eq_modulo(&self, sig: &Signature, metas: &MetaCtx, a: &Term, b: &Term) -> bool;
}
