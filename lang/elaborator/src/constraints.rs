//! Convertibility constraints and the typing-substitution builder.
//!
//! Type inference over a rule left-hand side defers a list of
//! convertibility constraints. Before checking the right-hand side, as many
//! of them as possible are absorbed into a simultaneous substitution; the
//! remainder is left for the unification oracle.

use derivative::Derivative;
use printer::{Alloc, Builder, Print, PrintCfg};

use ast::{head_and_args, FVar, MetaCtx, ParallelSubst, Signature, Term};

/// A convertibility constraint `lhs ≡ rhs`.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Constraint {
    pub lhs: Term,
    pub rhs: Term,
}

impl Constraint {
    pub fn new(lhs: Term, rhs: Term) -> Self {
        Constraint { lhs, rhs }
    }
}

impl Print for Constraint {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        self.lhs
            .print(cfg, alloc)
            .append(" ≡ ")
            .append(self.rhs.print(cfg, alloc))
    }
}

/// Derive a typing substitution from a list of convertibility constraints.
///
/// Constraints are processed in input order:
///
/// 1. a pair of applications of the same declared injective symbol with
///    matching arities is decomposed into pointwise constraints;
/// 2. a free variable applied to nothing on either side records a mapping
///    from that variable to the other side;
/// 3. anything else is dropped and left for the unification oracle.
///
/// The result is applied as a simultaneous substitution, never
/// sequentially, so an occurrence of one of its variables inside one of its
/// replacement terms is left untouched.
pub fn build_typing_subst(
    sig: &Signature,
    metas: &MetaCtx,
    constraints: &[Constraint],
) -> ParallelSubst {
    // Worklist in input order; decomposed constraints are processed before
    // the remaining input.
    let mut work: Vec<Constraint> = constraints.iter().rev().cloned().collect();
    let mut acc: Vec<(FVar, Term)> = Vec::new();

    while let Some(Constraint { lhs, rhs }) = work.pop() {
        let (head_l, args_l) = head_and_args(metas, &lhs);
        let (head_r, args_r) = head_and_args(metas, &rhs);

        match (&head_l, &head_r) {
            (Term::Sym(s1), Term::Sym(s2))
                if s1.id == s2.id
                    && sig.is_injective(s1.id)
                    && args_l.len() == args_r.len() =>
            {
                for (a, b) in args_l.into_iter().zip(args_r).rev() {
                    work.push(Constraint::new(a, b));
                }
            }
            (Term::FreeVar(x), _) if args_l.is_empty() => {
                acc.push((x.var.clone(), rhs));
            }
            (_, Term::FreeVar(x)) if args_r.is_empty() => {
                acc.push((x.var.clone(), lhs));
            }
            _ => {
                // Left for the unification oracle after substitution.
            }
        }
    }

    acc.reverse();
    let (vars, terms) = acc.into_iter().unzip();
    ParallelSubst { vars, terms }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::{
        add_args, App, IdBound, Occurs, Substitutable, Sym, SymTag, Symbol, Term, VarGen,
    };
    use url::Url;

    fn sym_decl(name: &str) -> Symbol {
        let uri = Url::parse("inmemory://scratch.rp").unwrap();
        let name = IdBound { span: None, id: name.to_owned(), uri };
        Symbol::new(name, ast::Sort::typ().into(), SymTag::Injective)
    }

    fn sym_ref(sig: &Signature, name: &str) -> Term {
        let id = sig.lookup(name).unwrap();
        let decl = sig.get(id).unwrap();
        Sym { span: None, id, name: decl.name.clone() }.into()
    }

    /// Injectivity-guided decomposition: `g x ≡ g y` for injective `g`
    /// decomposes to `x ≡ y` and records the pointwise mapping, no direct
    /// one.
    #[test]
    fn injective_symbols_decompose_pointwise() {
        let mut sig = Signature::new();
        sig.add_symbol(sym_decl("g"));
        let metas = MetaCtx::new();
        let mut gen = VarGen::new();
        let x = gen.fresh("x");
        let y = gen.fresh("y");

        let g = sym_ref(&sig, "g");
        let lhs = add_args(g.clone(), vec![x.clone().into()]);
        let rhs = add_args(g, vec![y.clone().into()]);

        let subst = build_typing_subst(&sig, &metas, &[Constraint::new(lhs, rhs)]);
        assert_eq!(subst.vars, vec![x]);
        assert_eq!(subst.terms, vec![Term::from(y)]);
    }

    /// A non-injective head is neither decomposed nor recorded.
    #[test]
    fn non_injective_symbols_are_dropped() {
        let mut sig = Signature::new();
        let mut decl = sym_decl("h");
        decl.tag = SymTag::Definable;
        sig.add_symbol(decl);
        let metas = MetaCtx::new();
        let mut gen = VarGen::new();
        let x = gen.fresh("x");
        let y = gen.fresh("y");

        let h = sym_ref(&sig, "h");
        let lhs = add_args(h.clone(), vec![x.into()]);
        let rhs = add_args(h, vec![y.into()]);

        let subst = build_typing_subst(&sig, &metas, &[Constraint::new(lhs, rhs)]);
        assert!(subst.is_empty());
    }

    /// An applied variable must not be recorded as a substitution.
    #[test]
    fn applied_variables_are_not_recorded() {
        let sig = Signature::new();
        let metas = MetaCtx::new();
        let mut gen = VarGen::new();
        let x = gen.fresh("x");
        let y = gen.fresh("y");
        let z = gen.fresh("z");

        let lhs: Term = App::new(x.into(), y.into()).into();
        let subst = build_typing_subst(&sig, &metas, &[Constraint::new(lhs, z.clone().into())]);
        // Recorded through the symmetric branch: z ↦ x y, not x ↦ _.
        assert_eq!(subst.vars, vec![z]);
    }

    /// Simultaneous application: `x ↦ y, y ↦ x` swaps and is not chained.
    #[test]
    fn substitution_is_simultaneous() {
        let sig = Signature::new();
        let metas = MetaCtx::new();
        let mut gen = VarGen::new();
        let x = gen.fresh("x");
        let y = gen.fresh("y");

        let cs = vec![
            Constraint::new(x.clone().into(), y.clone().into()),
            Constraint::new(y.clone().into(), x.clone().into()),
        ];
        let subst = build_typing_subst(&sig, &metas, &cs);
        let applied: Term = Term::from(x.clone()).subst(&subst);
        assert_eq!(applied, Term::from(y.clone()));
        // The image still mentions x: no second pass happened.
        assert!(subst.terms.iter().any(|t| t.occurs(&x)));
    }
}
