use std::fmt;

use codespan::Span;
use derivative::Derivative;
use miette::Diagnostic;
use miette_util::ToMiette;
use pretty::DocAllocator;
use printer::tokens::REWRITE;
use printer::{Alloc, Builder, Print, PrintCfg};
use thiserror::Error;

use crate::ident::{IdBound, VarBind};
use crate::term::{Binder, EnvRef, Term};
use crate::traits::HasSpan;
use crate::tree::DecTree;

// SymId
//
//

/// Index of a symbol in the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymId(pub usize);

impl fmt::Display for SymId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// SymTag
//
//

/// How a symbol may participate in rewriting. `Injective` symbols are
/// definable symbols which additionally satisfy
/// `s(a₁…aₙ) ≡ s(b₁…bₙ) ⟹ aᵢ ≡ bᵢ` pointwise; the attribute is declared
/// upstream and read by the typing-substitution builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymTag {
    Constant,
    Definable,
    Injective,
}

// Rules
//
//

/// One slot of a rule's pattern-variable environment: the name of the
/// pattern variable and the number of bound variables it abstracts over.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct PattSlot {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: VarBind,
    pub arity: usize,
}

impl PattSlot {
    pub fn new(name: &str, arity: usize) -> Self {
        PattSlot { name: VarBind::from_string(name), arity }
    }
}

/// The right-hand side of a rule: a multi-variable binder over the rule's
/// pattern slots. Occurrences of slot `i` in the body are
/// `EnvRef(Slot(i), args)` nodes.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct RhsBinder {
    pub slots: Vec<PattSlot>,
    pub body: Box<Term>,
}

impl RhsBinder {
    pub fn new(slots: Vec<PattSlot>, body: Term) -> Self {
        RhsBinder { slots, body: Box::new(body) }
    }

    /// A right-hand side without pattern variables.
    pub fn closed(body: Term) -> Self {
        RhsBinder { slots: Vec::new(), body: Box::new(body) }
    }

    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// Simultaneously substitute the slot bindings into the body. A slot
    /// mapped to `None` leaves an `Unmatched` environment reference in
    /// place; a slot mapped to a binder is instantiated with the reference
    /// arguments.
    pub fn msubst(&self, bindings: &[Option<Binder>]) -> Term {
        debug_assert_eq!(bindings.len(), self.slots.len());
        subst_slots(&self.body, bindings)
    }
}

fn subst_slots(t: &Term, bindings: &[Option<Binder>]) -> Term {
    match t {
        Term::Variable(_) | Term::FreeVar(_) | Term::Sort(_) | Term::Sym(_) | Term::Wild(_) => {
            t.clone()
        }
        Term::App(e) => crate::term::App {
            span: e.span,
            fun: Box::new(subst_slots(&e.fun, bindings)),
            arg: Box::new(subst_slots(&e.arg, bindings)),
        }
        .into(),
        Term::Abs(e) => crate::term::Abs {
            span: e.span,
            typ: Box::new(subst_slots(&e.typ, bindings)),
            body: crate::term::Binder1 {
                name: e.body.name.clone(),
                body: Box::new(subst_slots(&e.body.body, bindings)),
            },
        }
        .into(),
        Term::Prod(e) => crate::term::Prod {
            span: e.span,
            typ: Box::new(subst_slots(&e.typ, bindings)),
            body: crate::term::Binder1 {
                name: e.body.name.clone(),
                body: Box::new(subst_slots(&e.body.body, bindings)),
            },
        }
        .into(),
        Term::Meta(e) => crate::term::Meta {
            span: e.span,
            meta: e.meta,
            args: e.args.iter().map(|a| subst_slots(a, bindings)).collect(),
        }
        .into(),
        Term::Patt(e) => crate::term::Patt {
            span: e.span,
            slot: e.slot,
            name: e.name.clone(),
            args: e.args.iter().map(|a| subst_slots(a, bindings)).collect(),
        }
        .into(),
        Term::EnvRef(e) => {
            let args: Vec<Term> = e.args.iter().map(|a| subst_slots(a, bindings)).collect();
            match &e.target {
                crate::term::TeRef::Slot(slot) => match &bindings[*slot] {
                    Some(binder) => binder.apply(&args),
                    None => EnvRef { span: e.span, target: crate::term::TeRef::Unmatched, args }
                        .into(),
                },
                target => EnvRef { span: e.span, target: target.clone(), args }.into(),
            }
        }
    }
}

/// A rewrite rule `s l₁ … lₙ ↪ rhs` of its defining symbol. The left-hand
/// side is the ordered list of argument patterns under the symbol; the
/// right-hand side binds the pattern variables of the left-hand side that
/// it uses.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Rule {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub lhs: Vec<Term>,
    pub rhs: RhsBinder,
}

impl Rule {
    pub fn new(lhs: Vec<Term>, rhs: RhsBinder) -> Self {
        Rule { span: None, lhs, rhs }
    }

    /// The number of pattern-variable slots the rule binds.
    pub fn arity(&self) -> usize {
        self.rhs.arity()
    }
}

impl HasSpan for Rule {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl Print for Rule {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let lhs = alloc
            .intersperse(self.lhs.iter().map(|arg| arg.print(cfg, alloc)), alloc.space());
        lhs.append(alloc.space())
            .append(alloc.text(REWRITE))
            .append(alloc.space())
            .append(self.rhs.body.print(cfg, alloc))
            .group()
    }
}

// Symbol
//
//

/// A symbol of the signature: a qualified name, a closed type, a tag, and,
/// for rewritable symbols, the accepted rules together with the decision
/// tree compiled from them.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: IdBound,
    pub typ: Box<Term>,
    pub tag: SymTag,
    pub rules: Vec<Rule>,
    pub tree: Option<DecTree>,
}

impl Symbol {
    pub fn new(name: IdBound, typ: Term, tag: SymTag) -> Self {
        Symbol { name, typ: Box::new(typ), tag, rules: Vec::new(), tree: None }
    }

    pub fn is_injective(&self) -> bool {
        self.tag == SymTag::Injective
    }

    pub fn is_rewritable(&self) -> bool {
        matches!(self.tag, SymTag::Definable | SymTag::Injective)
    }
}

// Signature
//
//

#[derive(Debug, Error, Diagnostic)]
pub enum SigError {
    #[error("Unknown symbol #{id}")]
    #[diagnostic(code("S-001"))]
    UnknownSymbol { id: usize },
    #[error("Symbol {name} is declared constant and cannot be rewritten")]
    #[diagnostic(code("S-002"))]
    ConstantRewritten {
        name: String,
        #[label]
        span: Option<miette::SourceSpan>,
    },
}

/// The symbol table, passed explicitly to everything that resolves symbol
/// references.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    symbols: Vec<Symbol>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_symbol(&mut self, symbol: Symbol) -> SymId {
        let id = SymId(self.symbols.len());
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymId) -> Result<&Symbol, SigError> {
        self.symbols.get(id.0).ok_or(SigError::UnknownSymbol { id: id.0 })
    }

    /// Whether `id` refers to a declared injective symbol. Unknown ids are
    /// conservatively not injective.
    pub fn is_injective(&self, id: SymId) -> bool {
        self.symbols.get(id.0).is_some_and(Symbol::is_injective)
    }

    /// Append an accepted rule to its symbol. Rules must have passed the
    /// subject-reduction check before they are appended.
    pub fn add_rule(&mut self, id: SymId, rule: Rule) -> Result<(), SigError> {
        let symbol =
            self.symbols.get_mut(id.0).ok_or(SigError::UnknownSymbol { id: id.0 })?;
        if !symbol.is_rewritable() {
            return Err(SigError::ConstantRewritten {
                name: symbol.name.id.clone(),
                span: rule.span.to_miette(),
            });
        }
        symbol.rules.push(rule);
        // The compiled tree no longer reflects the rule set.
        symbol.tree = None;
        Ok(())
    }

    pub fn set_tree(&mut self, id: SymId, tree: DecTree) -> Result<(), SigError> {
        let symbol =
            self.symbols.get_mut(id.0).ok_or(SigError::UnknownSymbol { id: id.0 })?;
        symbol.tree = Some(tree);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<SymId> {
        self.symbols.iter().position(|symbol| symbol.name.id == name).map(SymId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymId, &Symbol)> {
        self.symbols.iter().enumerate().map(|(i, symbol)| (SymId(i), symbol))
    }
}
