//! Subject-reduction checking of rewrite rules.
//!
//! A rule `l ↪ r` preserves typing if every well-typed instance of `l` has
//! the same type as the corresponding instance of `r`. The check replaces
//! the pattern variables of `l` by fresh metavariables, infers a type for
//! the resulting term, absorbs the deferred constraints into a typing
//! substitution, checks `r` against the substituted type and hands the
//! remaining constraints to the unification oracle. Constraints that
//! survive all of this are genuine unsolved obligations and reject the
//! rule.

use miette_util::ToMiette;
use printer::Print;

use ast::{
    add_args, Binder, ContainsMetas, HasSpan, HashMap, Meta, MetaCtx, MetaVar, Rule, Signature,
    Substitutable, Sym, SymId, Term,
};

use crate::constraints::{build_typing_subst, Constraint};
use crate::meta_type::build_meta_type;
use crate::oracle::{Builtins, Oracle, TypingCtx};
use crate::result::RuleError;

/// Check one rule of `sym` for subject reduction. Accepts by returning
/// `Ok(())`; a rule with an untypable left-hand side is accepted as vacuous
/// with a warning. The rule is not appended to the symbol here: callers
/// append only after acceptance.
pub fn check_rule<O: Oracle>(
    oracle: &O,
    builtins: &Builtins,
    sig: &Signature,
    metas: &mut MetaCtx,
    sym: SymId,
    rule: &Rule,
) -> Result<(), RuleError> {
    let symbol = sig.get(sym)?;
    log::trace!("checking rule {} {}", symbol.name, rule.print_to_string(None));

    // (a) Replace every pattern variable by a metavariable, sharing one
    // metavariable per slot across occurrences.
    let mut eraser = PattEraser { metas: &mut *metas, slot_metas: HashMap::default() };
    let lhs_args = rule
        .lhs
        .iter()
        .map(|arg| eraser.erase(arg, 0))
        .collect::<Result<Vec<_>, _>>()?;
    let slot_metas = eraser.slot_metas;

    // (b) Reconstruct the left-hand side under the symbol.
    let head: Term = Sym { span: rule.span, id: sym, name: symbol.name.clone() }.into();
    let lhs = add_args(head, lhs_args);

    // (c) Splice the same metavariables into the right-hand side.
    let mut bindings: Vec<Option<Binder>> = Vec::with_capacity(rule.arity());
    for (slot, decl) in rule.rhs.slots.iter().enumerate() {
        let meta = match slot_metas.get(&slot) {
            Some(meta) => *meta,
            // A slot with no left-hand-side occurrence cannot be matched;
            // it gets a fresh metavariable and stage (i) will reject it.
            None => {
                let typ = build_meta_type(metas, decl.arity);
                metas.fresh(Some(decl.name.id.clone()), decl.arity, typ)
            }
        };
        let body: Term = Meta::new(meta, Binder::id_args(decl.arity)).into();
        bindings.push(Some(Binder::new(decl.arity, body)));
    }
    let rhs = rule.rhs.msubst(&bindings);

    // (d) Infer a type for the left-hand side.
    let ctx = TypingCtx::empty();
    let Some((lhs_typ, lhs_constraints)) = oracle.infer(sig, metas, &ctx, &lhs) else {
        log::warn!(
            "rule {} has an untypable left-hand side: no instance is well typed",
            rule.print_to_string(None)
        );
        return Ok(());
    };

    // (e) Absorb the deferred constraints into a typing substitution and
    // apply it simultaneously to the right-hand side and the type.
    let subst = build_typing_subst(sig, metas, &lhs_constraints);
    let rhs = rhs.subst(&subst);
    let lhs_typ = lhs_typ.subst(&subst);

    // (f) Check the right-hand side against the substituted type.
    let rhs_constraints = oracle.check(sig, metas, &ctx, &rhs, &lhs_typ);

    // (g) Solve.
    let residual = oracle.solve(sig, metas, builtins, rhs_constraints).ok_or_else(|| {
        RuleError::DoesNotPreserveTyping {
            rule: rule.print_to_string(None),
            span: rule.span.to_miette(),
        }
    })?;

    // (h) Filter residuals that are convertible, under commutativity, to a
    // constraint inference already deferred.
    let unsolved: Vec<&Constraint> = residual
        .iter()
        .filter(|c| !lhs_constraints.iter().any(|c0| eq_commuted(oracle, sig, metas, c, c0)))
        .collect();
    if !unsolved.is_empty() {
        let constraints =
            unsolved.iter().map(|c| c.print_to_string(None)).collect::<Vec<_>>().join("\n");
        return Err(RuleError::CannotSolve { constraints, span: rule.span.to_miette() });
    }

    // (i) Groundness: re-evaluate the original right-hand side with every
    // slot unmatched; a remaining metavariable means the rule cannot be
    // elaborated to a closed rewrite.
    let vacant: Vec<Option<Binder>> = vec![None; rule.arity()];
    let original_rhs = rule.rhs.msubst(&vacant);
    if original_rhs.contains_metas(metas) {
        return Err(RuleError::CannotInstantiate {
            rule: rule.print_to_string(None),
            span: rule.span.to_miette(),
        });
    }

    log::trace!("accepted rule {}", rule.print_to_string(None));
    Ok(())
}

fn eq_commuted<O: Oracle>(
    oracle: &O,
    sig: &Signature,
    metas: &MetaCtx,
    c: &Constraint,
    c0: &Constraint,
) -> bool {
    (oracle.eq_modulo(sig, metas, &c.lhs, &c0.lhs)
        && oracle.eq_modulo(sig, metas, &c.rhs, &c0.rhs))
        || (oracle.eq_modulo(sig, metas, &c.lhs, &c0.rhs)
            && oracle.eq_modulo(sig, metas, &c.rhs, &c0.lhs))
}

/// The pattern→metavariable rewriting of stage (a). `k` is the number of
/// applications enclosing the current occurrence, so that the type of an
/// introduced metavariable accounts for the surrounding arguments.
struct PattEraser<'a> {
    metas: &'a mut MetaCtx,
    slot_metas: HashMap<usize, MetaVar>,
}

impl PattEraser<'_> {
    fn erase(&mut self, t: &Term, k: usize) -> Result<Term, RuleError> {
        match t {
            Term::Patt(p) => {
                let args = p
                    .args
                    .iter()
                    .map(|arg| self.erase(arg, 0))
                    .collect::<Result<Vec<_>, _>>()?;
                let arity = args.len();
                let meta = match p.slot {
                    Some(slot) => match self.slot_metas.get(&slot) {
                        Some(meta) => *meta,
                        None => {
                            let meta = self.fresh_meta(&p.name.id, arity, k);
                            self.slot_metas.insert(slot, meta);
                            meta
                        }
                    },
                    None => self.fresh_meta(&p.name.id, arity, k),
                };
                Ok(Meta { span: p.span, meta, args }.into())
            }
            Term::App(e) => Ok(ast::App {
                span: e.span,
                fun: Box::new(self.erase(&e.fun, k + 1)?),
                arg: Box::new(self.erase(&e.arg, 0)?),
            }
            .into()),
            Term::Abs(e) => Ok(ast::Abs {
                span: e.span,
                typ: Box::new(self.erase(&e.typ, 0)?),
                body: ast::Binder1 {
                    name: e.body.name.clone(),
                    body: Box::new(self.erase(&e.body.body, 0)?),
                },
            }
            .into()),
            Term::Variable(_) | Term::FreeVar(_) | Term::Sym(_) => Ok(t.clone()),
            bad => Err(RuleError::LhsBadTerm {
                term: bad.print_to_string(None),
                span: bad.span().to_miette(),
            }),
        }
    }

    fn fresh_meta(&mut self, name: &str, arity: usize, k: usize) -> MetaVar {
        let typ = build_meta_type(self.metas, arity + k);
        let name = if name.is_empty() { None } else { Some(name.to_owned()) };
        self.metas.fresh(name, arity, typ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::SyntacticOracle;
    use ast::{EnvRef, IdBound, Patt, PattSlot, Prod, RhsBinder, Sort, SymTag, Symbol};
    use url::Url;

    fn declare(sig: &mut Signature, name: &str, typ: Term, tag: SymTag) -> SymId {
        let uri = Url::parse("inmemory://scratch.rp").unwrap();
        let name = IdBound { span: None, id: name.to_owned(), uri };
        sig.add_symbol(Symbol::new(name, typ, tag))
    }

    fn sym(sig: &Signature, id: SymId) -> Term {
        let decl = sig.get(id).unwrap();
        Sym { span: None, id, name: decl.name.clone() }.into()
    }

    struct BoolSig {
        sig: Signature,
        tru: SymId,
        fls: SymId,
        neg: SymId,
        and: SymId,
    }

    fn bool_sig() -> BoolSig {
        let mut sig = Signature::new();
        let b = declare(&mut sig, "B", Sort::typ().into(), SymTag::Constant);
        let bool_typ: Term = sym(&sig, b);
        let tru = declare(&mut sig, "true", bool_typ.clone(), SymTag::Constant);
        let fls = declare(&mut sig, "false", bool_typ.clone(), SymTag::Constant);
        let neg = declare(
            &mut sig,
            "neg",
            Prod::new("b", bool_typ.clone(), bool_typ.clone()).into(),
            SymTag::Definable,
        );
        let and = declare(
            &mut sig,
            "and",
            Prod::new("x", bool_typ.clone(), Prod::new("y", bool_typ.clone(), bool_typ).into())
                .into(),
            SymTag::Definable,
        );
        BoolSig { sig, tru, fls, neg, and }
    }

    #[test]
    fn constant_rules_are_accepted() {
        let BoolSig { sig, tru, fls, neg, .. } = bool_sig();
        let mut metas = MetaCtx::new();

        // neg true ↪ false and neg false ↪ true
        let rules = [
            Rule::new(vec![sym(&sig, tru)], RhsBinder::closed(sym(&sig, fls))),
            Rule::new(vec![sym(&sig, fls)], RhsBinder::closed(sym(&sig, tru))),
        ];
        for rule in &rules {
            check_rule(&SyntacticOracle, &Builtins::new(), &sig, &mut metas, neg, rule)
                .unwrap();
        }
    }

    #[test]
    fn pattern_variables_are_accepted_and_shared() {
        let BoolSig { sig, and, .. } = bool_sig();
        let mut metas = MetaCtx::new();

        // and $x $x ↪ $x, with both occurrences sharing one metavariable.
        let rule = Rule::new(
            vec![Patt::var(0, "x").into(), Patt::var(0, "x").into()],
            RhsBinder::new(vec![PattSlot::new("x", 0)], EnvRef::slot(0, vec![]).into()),
        );
        check_rule(&SyntacticOracle, &Builtins::new(), &sig, &mut metas, and, &rule).unwrap();
        // One metavariable for the shared slot plus the single domain
        // metavariable of its type schema.
        assert_eq!(metas.iter().count(), 2);
    }

    #[test]
    fn unshared_wildcards_get_fresh_metas() {
        let BoolSig { sig, tru, and, .. } = bool_sig();
        let mut metas = MetaCtx::new();

        // and _ _ ↪ true
        let rule = Rule::new(
            vec![Patt::wildcard().into(), Patt::wildcard().into()],
            RhsBinder::closed(sym(&sig, tru)),
        );
        check_rule(&SyntacticOracle, &Builtins::new(), &sig, &mut metas, and, &rule).unwrap();
        assert_eq!(metas.iter().count(), 4);
    }

    #[test]
    fn rhs_metavariable_rejects_the_rule() {
        let BoolSig { sig, neg, .. } = bool_sig();
        let mut metas = MetaCtx::new();

        // neg _ ↪ ?m, the way upstream elaboration encodes a right-hand
        // side variable the left-hand side does not bind.
        let unknown = {
            let typ = build_meta_type(&mut metas, 0);
            metas.fresh(Some("y".to_owned()), 0, typ)
        };
        let rule = Rule::new(
            vec![Patt::wildcard().into()],
            RhsBinder::closed(Meta::new(unknown, vec![]).into()),
        );
        let err = check_rule(&SyntacticOracle, &Builtins::new(), &sig, &mut metas, neg, &rule)
            .unwrap_err();
        assert!(matches!(err, RuleError::CannotInstantiate { .. }));
    }

    #[test]
    fn untypable_lhs_is_accepted_as_vacuous() {
        let BoolSig { sig, tru, fls, neg, .. } = bool_sig();
        let mut metas = MetaCtx::new();

        // neg true true ↪ false: over-applied, so no instance is well typed.
        let rule = Rule::new(
            vec![sym(&sig, tru), sym(&sig, tru)],
            RhsBinder::closed(sym(&sig, fls)),
        );
        check_rule(&SyntacticOracle, &Builtins::new(), &sig, &mut metas, neg, &rule).unwrap();
    }

    #[test]
    fn ill_typed_rhs_rejects_the_rule() {
        let BoolSig { sig, tru, neg, .. } = bool_sig();
        let mut metas = MetaCtx::new();

        // neg true ↪ B: the right-hand side is a type, not a boolean.
        let b = sig.lookup("B").unwrap();
        let rule = Rule::new(vec![sym(&sig, tru)], RhsBinder::closed(sym(&sig, b)));
        let err = check_rule(&SyntacticOracle, &Builtins::new(), &sig, &mut metas, neg, &rule)
            .unwrap_err();
        assert!(matches!(err, RuleError::DoesNotPreserveTyping { .. }));
    }

    #[test]
    fn sorts_in_a_lhs_are_a_structural_bug() {
        let BoolSig { sig, neg, .. } = bool_sig();
        let mut metas = MetaCtx::new();

        let rule = Rule::new(
            vec![Sort::typ().into()],
            RhsBinder::closed(Sort::typ().into()),
        );
        let err = check_rule(&SyntacticOracle, &Builtins::new(), &sig, &mut metas, neg, &rule)
            .unwrap_err();
        assert!(matches!(err, RuleError::LhsBadTerm { .. }));
    }
}
