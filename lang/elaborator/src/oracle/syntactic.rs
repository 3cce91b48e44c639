//! A first-order syntactic implementation of the oracle contracts.
//!
//! Inference handles spines of symbols, free variables and metavariables
//! over dependent product types; unification solves metavariables in
//! Miller's pattern fragment:
//!
//! 1. the environment of the metavariable consists of distinct free
//!    variables,
//! 2. every free variable of the candidate occurs in that environment,
//! 3. the metavariable does not occur in the candidate.
//!
//! Constraints outside the fragment are returned as residual; a clash of
//! rigid heads is a contradiction. Convertibility is syntactic (up to α
//! and instantiation): this oracle does not reduce, so it is complete only
//! for signatures whose rules never need to fire during checking. Tests
//! and simple embedders use it; full embedders bring their own evaluator.

use ast::{
    collect_free_vars, head_and_args, occurs_meta, unfold, zonk, Binder, FVar, HasSpan, Meta,
    MetaCtx, Signature, SortKind, Term, Wild,
};
use printer::Print;

use crate::constraints::Constraint;

use super::{Builtins, Oracle, TypingCtx};

pub struct SyntacticOracle;

enum SolveOutcome {
    Solved,
    Occurs,
    OutsideFragment,
}

impl SyntacticOracle {
    fn infer_term(
        &self,
        sig: &Signature,
        metas: &MetaCtx,
        ctx: &TypingCtx,
        t: &Term,
    ) -> Option<(Term, Vec<Constraint>)> {
        let (head, args) = head_and_args(metas, t);
        let mut cs = Vec::new();
        let mut typ: Term = match &head {
            Term::Sym(s) => (*sig.get(s.id).ok()?.typ).clone(),
            Term::FreeVar(v) => ctx.lookup(&v.var)?.clone(),
            Term::Meta(m) => meta_instance_type(metas, m)?,
            Term::Sort(s) if s.kind == SortKind::Type => ast::Sort::kind().into(),
            _ => return None,
        };
        for arg in &args {
            let Term::Prod(prod) = unfold(metas, &typ) else { return None };
            let (arg_typ, arg_cs) = self.infer_term(sig, metas, ctx, arg)?;
            cs.extend(arg_cs);
            cs.push(Constraint::new((*prod.typ).clone(), arg_typ));
            typ = prod.body.apply(arg);
        }
        Some((typ, cs))
    }
}

/// The type of a metavariable instance: the product telescope of the
/// metavariable's type, instantiated with the explicit environment.
fn meta_instance_type(metas: &MetaCtx, m: &Meta) -> Option<Term> {
    let mut typ = metas.typ(m.meta).ok()?.clone();
    for arg in &m.args {
        let Term::Prod(prod) = unfold(metas, &typ) else { return None };
        typ = prod.body.apply(arg);
    }
    Some(typ)
}

/// Attempt to instantiate `m := candidate` within the pattern fragment.
fn solve_meta(metas: &mut MetaCtx, m: &Meta, candidate: &Term) -> SolveOutcome {
    if occurs_meta(metas, candidate, m.meta) {
        return SolveOutcome::Occurs;
    }

    // Condition 1: the environment consists of distinct free variables.
    let mut vars: Vec<FVar> = Vec::with_capacity(m.args.len());
    for arg in &m.args {
        match unfold(metas, arg) {
            Term::FreeVar(v) if !vars.contains(&v.var) => vars.push(v.var),
            _ => return SolveOutcome::OutsideFragment,
        }
    }

    // Condition 2: every free variable of the candidate occurs in the
    // environment.
    if collect_free_vars(candidate).iter().any(|v| !vars.contains(v)) {
        return SolveOutcome::OutsideFragment;
    }

    let solution = Binder::bind(&vars, candidate);
    match metas.solve(m.meta, solution) {
        Ok(()) => {
            log::trace!("solved metavariable ?{}", m.meta.id);
            SolveOutcome::Solved
        }
        Err(_) => SolveOutcome::OutsideFragment,
    }
}

impl Oracle for SyntacticOracle {
    fn infer(
        &self,
        sig: &Signature,
        metas: &mut MetaCtx,
        ctx: &TypingCtx,
        t: &Term,
    ) -> Option<(Term, Vec<Constraint>)> {
        self.infer_term(sig, metas, ctx, t)
    }

    fn check(
        &self,
        sig: &Signature,
        metas: &mut MetaCtx,
        ctx: &TypingCtx,
        t: &Term,
        typ: &Term,
    ) -> Vec<Constraint> {
        match self.infer_term(sig, metas, ctx, t) {
            Some((inferred, mut cs)) => {
                cs.push(Constraint::new(typ.clone(), inferred));
                cs
            }
            // An untypable term cannot check against anything: emit a
            // constraint no unifier accepts.
            None => vec![Constraint::new(typ.clone(), Wild { span: t.span() }.into())],
        }
    }

    fn solve(
        &self,
        _sig: &Signature,
        metas: &mut MetaCtx,
        _builtins: &Builtins,
        problems: Vec<Constraint>,
    ) -> Option<Vec<Constraint>> {
        let mut work = problems;
        let mut residual: Vec<Constraint> = Vec::new();

        while let Some(constraint) = work.pop() {
            let a = zonk(metas, &constraint.lhs);
            let b = zonk(metas, &constraint.rhs);
            if a == b {
                continue;
            }
            log::trace!("solving {}", Constraint::new(a.clone(), b.clone()).print_to_string(None));

            let (head_a, args_a) = head_and_args(metas, &a);
            let (head_b, args_b) = head_and_args(metas, &b);

            match (&head_a, &head_b) {
                (Term::Meta(m), _) if args_a.is_empty() => {
                    match solve_meta(metas, m, &b) {
                        SolveOutcome::Solved => work.append(&mut residual),
                        SolveOutcome::Occurs => return None,
                        SolveOutcome::OutsideFragment => residual.push(Constraint::new(a, b)),
                    }
                }
                (_, Term::Meta(m)) if args_b.is_empty() => {
                    match solve_meta(metas, m, &a) {
                        SolveOutcome::Solved => work.append(&mut residual),
                        SolveOutcome::Occurs => return None,
                        SolveOutcome::OutsideFragment => residual.push(Constraint::new(a, b)),
                    }
                }
                (Term::Sym(s1), Term::Sym(s2)) if s1.id == s2.id => {
                    if args_a.len() != args_b.len() {
                        return None;
                    }
                    for (x, y) in args_a.into_iter().zip(args_b) {
                        work.push(Constraint::new(x, y));
                    }
                }
                (Term::FreeVar(v1), Term::FreeVar(v2)) if v1.var == v2.var => {
                    if args_a.len() != args_b.len() {
                        return None;
                    }
                    for (x, y) in args_a.into_iter().zip(args_b) {
                        work.push(Constraint::new(x, y));
                    }
                }
                (Term::Variable(i1), Term::Variable(i2))
                    if i1.idx == i2.idx && args_a.len() == args_b.len() =>
                {
                    for (x, y) in args_a.into_iter().zip(args_b) {
                        work.push(Constraint::new(x, y));
                    }
                }
                (Term::Sort(s1), Term::Sort(s2))
                    if s1.kind == s2.kind && args_a.is_empty() && args_b.is_empty() => {}
                (Term::Prod(p1), Term::Prod(p2))
                    if args_a.is_empty() && args_b.is_empty() =>
                {
                    work.push(Constraint::new((*p1.typ).clone(), (*p2.typ).clone()));
                    work.push(Constraint::new(
                        (*p1.body.body).clone(),
                        (*p2.body.body).clone(),
                    ));
                }
                (Term::Abs(a1), Term::Abs(a2)) if args_a.is_empty() && args_b.is_empty() => {
                    work.push(Constraint::new((*a1.typ).clone(), (*a2.typ).clone()));
                    work.push(Constraint::new(
                        (*a1.body.body).clone(),
                        (*a2.body.body).clone(),
                    ));
                }
                // A metavariable applied beyond its environment is outside
                // the pattern fragment.
                (Term::Meta(_), _) | (_, Term::Meta(_)) => {
                    residual.push(Constraint::new(a, b));
                }
                // Rigid heads that agree were handled above; what is left
                // is a clash.
                _ => return None,
            }
        }

        Some(residual)
    }

    fn eq_modulo(&self, _sig: &Signature, metas: &MetaCtx, a: &Term, b: &Term) -> bool {
        zonk(metas, a) == zonk(metas, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::{add_args, IdBound, Prod, Sort, Sym, SymId, SymTag, Symbol, VarGen};
    use url::Url;

    fn declare(sig: &mut Signature, name: &str, typ: Term) -> SymId {
        let uri = Url::parse("inmemory://scratch.rp").unwrap();
        let name = IdBound { span: None, id: name.to_owned(), uri };
        sig.add_symbol(Symbol::new(name, typ, SymTag::Definable))
    }

    fn sym(sig: &Signature, id: SymId) -> Term {
        let decl = sig.get(id).unwrap();
        Sym { span: None, id, name: decl.name.clone() }.into()
    }

    fn bool_sig() -> (Signature, SymId, SymId, SymId, SymId) {
        let mut sig = Signature::new();
        let b = declare(&mut sig, "B", Sort::typ().into());
        let bool_typ: Term = sym(&sig, b);
        let t = declare(&mut sig, "true", bool_typ.clone());
        let f = declare(&mut sig, "false", bool_typ.clone());
        let neg = declare(&mut sig, "neg", Prod::new("b", bool_typ.clone(), bool_typ).into());
        (sig, b, t, f, neg)
    }

    #[test]
    fn infer_application_emits_domain_constraints() {
        let (sig, b, t, _, neg) = bool_sig();
        let mut metas = MetaCtx::new();
        let oracle = SyntacticOracle;

        let term = add_args(sym(&sig, neg), vec![sym(&sig, t)]);
        let (typ, cs) = oracle.infer(&sig, &mut metas, &TypingCtx::empty(), &term).unwrap();
        assert_eq!(typ, sym(&sig, b));
        assert_eq!(cs, vec![Constraint::new(sym(&sig, b), sym(&sig, b))]);
    }

    #[test]
    fn solve_instantiates_bare_metas() {
        let (sig, _, t, _, _) = bool_sig();
        let mut metas = MetaCtx::new();
        let m = metas.fresh(None, 0, Sort::typ().into());
        let oracle = SyntacticOracle;

        let problems = vec![Constraint::new(Meta::new(m, vec![]).into(), sym(&sig, t))];
        let residual =
            oracle.solve(&sig, &mut metas, &Builtins::new(), problems).unwrap();
        assert!(residual.is_empty());
        assert_eq!(unfold(&metas, &Term::from(Meta::new(m, vec![]))), sym(&sig, t));
    }

    #[test]
    fn solve_respects_the_pattern_fragment() {
        let (sig, _, t, _, _) = bool_sig();
        let mut metas = MetaCtx::new();
        let mut gen = VarGen::new();
        let x = gen.fresh("x");
        let m = metas.fresh(None, 1, Sort::typ().into());

        // ?m[true] ≡ x is outside the fragment: the environment entry is
        // not a variable.
        let problems =
            vec![Constraint::new(Meta::new(m, vec![sym(&sig, t)]).into(), x.into())];
        let oracle = SyntacticOracle;
        let residual =
            oracle.solve(&sig, &mut metas, &Builtins::new(), problems).unwrap();
        assert_eq!(residual.len(), 1);
        assert!(metas.solution(m).is_none());
    }

    #[test]
    fn clashing_heads_are_a_contradiction() {
        let (sig, _, t, f, _) = bool_sig();
        let mut metas = MetaCtx::new();
        let oracle = SyntacticOracle;

        let problems = vec![Constraint::new(sym(&sig, t), sym(&sig, f))];
        assert!(oracle.solve(&sig, &mut metas, &Builtins::new(), problems).is_none());
    }

    #[test]
    fn occurs_check_fails_cyclic_solutions() {
        let (sig, _, t, _, _) = bool_sig();
        let mut metas = MetaCtx::new();
        let m = metas.fresh(None, 0, Sort::typ().into());
        let oracle = SyntacticOracle;

        let cyclic = add_args(sym(&sig, t), vec![Meta::new(m, vec![]).into()]);
        let problems = vec![Constraint::new(Meta::new(m, vec![]).into(), cyclic)];
        assert!(oracle.solve(&sig, &mut metas, &Builtins::new(), problems).is_none());
    }
}
