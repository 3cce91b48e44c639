//! Construction of the most general type schema for fresh metavariables.

use ast::{Binder, Meta, MetaCtx, MetaVar, Prod, Sort, Term};

/// Build the closed term `∀(x₁:A₁)…(x_k:A_k), A_{k+1}` in which each `Aᵢ`
/// is a fresh metavariable applied to `x₁,…,x_{i-1}`, and each of those
/// metavariables has type `∀(x₁:A₁)…(x_{i-1}:A_{i-1}), TYPE`.
///
/// This is the canonical "most general" type for a fresh pattern variable
/// of arity `k`: nothing about the domains or the codomain is fixed, but
/// every later domain may depend on all earlier variables.
///
/// All introduced metavariables are uninstantiated, pairwise distinct, and
/// their types reference only earlier ones.
pub fn build_meta_type(metas: &mut MetaCtx, k: usize) -> Term {
    let mut domains: Vec<MetaVar> = Vec::with_capacity(k + 1);
    for i in 0..=k {
        // aᵢ₊₁ abstracts over x₁ … xᵢ and lands in TYPE.
        let typ = telescope(&domains, i, Sort::typ().into());
        let meta = metas.fresh(Some(format!("a{}", i + 1)), i, typ);
        domains.push(meta);
    }
    telescope(&domains, k, Meta::new(domains[k], Binder::id_args(k)).into())
}

/// Wrap `codomain` in the product telescope `∀(x₁:A₁)…(x_n:A_n), ·` over
/// the first `n` domain metavariables.
fn telescope(domains: &[MetaVar], n: usize, codomain: Term) -> Term {
    let mut acc = codomain;
    for i in (0..n).rev() {
        let dom: Term = Meta::new(domains[i], Binder::id_args(i)).into();
        acc = Prod::new(&format!("x{}", i + 1), dom, acc).into();
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::{ContainsMetas, Variable};

    #[test]
    fn arity_zero_is_a_single_type_meta() {
        let mut metas = MetaCtx::new();
        let t = build_meta_type(&mut metas, 0);
        let Term::Meta(m) = &t else { panic!("expected a metavariable") };
        assert!(m.args.is_empty());
        assert_eq!(metas.arity(m.meta).unwrap(), 0);
        assert_eq!(*metas.typ(m.meta).unwrap(), Sort::typ().into());
    }

    #[test]
    fn telescope_references_earlier_variables() {
        let mut metas = MetaCtx::new();
        let t = build_meta_type(&mut metas, 2);

        // ∀(x₁:a₁)(x₂:a₂[x₁]), a₃[x₁,x₂]
        let Term::Prod(p1) = &t else { panic!("expected a product") };
        let Term::Meta(a1) = &*p1.typ else { panic!("expected a metavariable domain") };
        assert!(a1.args.is_empty());

        let Term::Prod(p2) = &*p1.body.body else { panic!("expected a product") };
        let Term::Meta(a2) = &*p2.typ else { panic!("expected a metavariable domain") };
        assert_eq!(a2.args, vec![Term::from(Variable::new(0))]);

        let Term::Meta(a3) = &*p2.body.body else { panic!("expected a metavariable codomain") };
        assert_eq!(
            a3.args,
            vec![Term::from(Variable::new(1)), Term::from(Variable::new(0))]
        );

        // Pairwise distinct and uninstantiated.
        assert_ne!(a1.meta, a2.meta);
        assert_ne!(a2.meta, a3.meta);
        assert_ne!(a1.meta, a3.meta);
        for m in [a1.meta, a2.meta, a3.meta] {
            assert!(metas.solution(m).is_none());
        }

        // The whole schema is open: it still contains metavariables.
        assert!(t.contains_metas(&metas));
    }
}
