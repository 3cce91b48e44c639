//! End-to-end scenarios: rules pass the subject-reduction check, are
//! appended to their symbol, and the decision tree is recompiled.

use url::Url;

use ast::{
    add_args, DecTree, EnvRef, IdBound, MetaCtx, Patt, PattSlot, Prod, RhsBinder, Rule,
    Signature, Sort, Sym, SymId, SymTag, Symbol, Term,
};
use driver::register_rule;
use elaborator::oracle::SyntacticOracle;
use elaborator::Builtins;

fn declare(sig: &mut Signature, name: &str, typ: Term, tag: SymTag) -> SymId {
    let uri = Url::parse("inmemory://scratch.rp").unwrap();
    let name = IdBound { span: None, id: name.to_owned(), uri };
    sig.add_symbol(Symbol::new(name, typ, tag))
}

fn sym(sig: &Signature, id: SymId) -> Term {
    Sym { span: None, id, name: sig.get(id).unwrap().name.clone() }.into()
}

fn arrow(dom: Term, cod: Term) -> Term {
    Prod::new("_", dom, cod).into()
}

struct BoolSig {
    sig: Signature,
    tru: SymId,
    fls: SymId,
    neg: SymId,
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
        arrow(bool_typ.clone(), bool_typ),
        SymTag::Definable,
    );
    BoolSig { sig, tru, fls, neg }
}

#[test]
fn negation_rules_register_and_compile() {
    let BoolSig { mut sig, tru, fls, neg } = bool_sig();
    let mut metas = MetaCtx::new();
    let oracle = SyntacticOracle;
    let builtins = Builtins::new();

    let rules = [
        Rule::new(vec![sym(&sig, tru)], RhsBinder::closed(sym(&sig, fls))),
        Rule::new(vec![sym(&sig, fls)], RhsBinder::closed(sym(&sig, tru))),
    ];
    for rule in rules {
        register_rule(&oracle, &builtins, &mut sig, &mut metas, neg, rule).unwrap();
    }

    let symbol = sig.get(neg).unwrap();
    assert_eq!(symbol.rules.len(), 2);

    let Some(DecTree::Node(root)) = &symbol.tree else { panic!("expected a compiled tree") };
    assert_eq!(root.children.len(), 2);
    assert_eq!(root.children[0].0, Some(sym(&sig, tru)));
    assert_eq!(root.children[1].0, Some(sym(&sig, fls)));
    assert!(matches!(root.children[0].1, DecTree::Leaf(_)));
    assert!(matches!(root.children[1].1, DecTree::Leaf(_)));
}

#[test]
fn rejected_rules_leave_the_signature_untouched() {
    let BoolSig { mut sig, tru, neg, .. } = bool_sig();
    let mut metas = MetaCtx::new();
    let oracle = SyntacticOracle;
    let builtins = Builtins::new();

    // The right-hand side is a type, not a boolean.
    let b = sig.lookup("B").unwrap();
    let rule = Rule::new(vec![sym(&sig, tru)], RhsBinder::closed(sym(&sig, b)));
    register_rule(&oracle, &builtins, &mut sig, &mut metas, neg, rule).unwrap_err();

    let symbol = sig.get(neg).unwrap();
    assert!(symbol.rules.is_empty());
    assert!(symbol.tree.is_none());
}

#[test]
fn addition_rule_matches_nested_columns() {
    let mut sig = Signature::new();
    let nat = declare(&mut sig, "Nat", Sort::typ().into(), SymTag::Constant);
    let nat_typ: Term = sym(&sig, nat);
    let zero = declare(&mut sig, "Z", nat_typ.clone(), SymTag::Constant);
    let succ = declare(
        &mut sig,
        "S",
        arrow(nat_typ.clone(), nat_typ.clone()),
        SymTag::Constant,
    );
    let plus = declare(
        &mut sig,
        "plus",
        arrow(nat_typ.clone(), arrow(nat_typ.clone(), nat_typ)),
        SymTag::Definable,
    );
    let mut metas = MetaCtx::new();
    let oracle = SyntacticOracle;
    let builtins = Builtins::new();

    // plus Z (S $m) ↪ S $m
    let rule = Rule::new(
        vec![
            sym(&sig, zero),
            add_args(sym(&sig, succ), vec![Patt::var(0, "m").into()]),
        ],
        RhsBinder::new(
            vec![PattSlot::new("m", 0)],
            add_args(sym(&sig, succ), vec![EnvRef::slot(0, vec![]).into()]),
        ),
    );
    register_rule(&oracle, &builtins, &mut sig, &mut metas, plus, rule).unwrap();

    let symbol = sig.get(plus).unwrap();
    let Some(tree) = &symbol.tree else { panic!("expected a compiled tree") };
    assert_eq!(tree.capacity(), 1);

    // Column 1 is matched in a nested node under the `Z` child of column 0.
    let DecTree::Node(root) = tree else { panic!("expected an inner node") };
    assert_eq!(root.children[0].0, Some(sym(&sig, zero)));
    let DecTree::Node(under_zero) = &root.children[0].1 else {
        panic!("expected a nested switch")
    };
    assert_eq!(under_zero.children[0].0, Some(sym(&sig, succ)));
}
