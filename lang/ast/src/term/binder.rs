use derivative::Derivative;

use crate::ident::{VarBind, VarBound};
use crate::metas::MetaCtx;
use crate::traits::{ContainsMetas, Occurs, Shift, Substitutable, Substitution};

use super::{FVar, FreeVar, Idx, Term, Variable};

// VarGen
//
//

/// Generator of fresh free variables. Freshness is relative to the
/// generator, which is passed explicitly wherever binders are opened; there
/// is no process-wide counter.
#[derive(Debug, Clone, Default)]
pub struct VarGen {
    next: u64,
}

impl VarGen {
    pub fn new() -> Self {
        VarGen { next: 0 }
    }

    /// A generator whose variables are fresh for anything numbered below
    /// `next`.
    pub fn starting_at(next: u64) -> Self {
        VarGen { next }
    }

    pub fn fresh(&mut self, hint: &str) -> FVar {
        let id = self.next;
        self.next += 1;
        FVar { id, name: VarBound::from_string(hint) }
    }
}

// Binder1
//
//

/// A single-variable binder, used by abstractions and products. The bound
/// variable is the de Bruijn index 0 of the body; the name is a display
/// hint.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Binder1 {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub name: VarBind,
    pub body: Box<Term>,
}

impl Binder1 {
    pub fn new(name: &str, body: Term) -> Self {
        Binder1 { name: VarBind::from_string(name), body: Box::new(body) }
    }

    /// Instantiate the binder with `arg`, which must not contain dangling
    /// bound indices.
    pub fn apply(&self, arg: &Term) -> Term {
        msubst(&self.body, 0, &[arg.clone()])
    }

    /// Open the binder, replacing the bound variable by the free variable
    /// `var`.
    pub fn open(&self, var: &FVar) -> Term {
        self.apply(&FreeVar { span: None, var: var.clone() }.into())
    }
}

impl Shift for Binder1 {
    fn shift_in_range(&mut self, cutoff: usize, by: isize) {
        self.body.shift_in_range(cutoff + 1, by);
    }
}

impl Substitutable for Binder1 {
    type Target = Binder1;

    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        Binder1 { name: self.name.clone(), body: self.body.subst(by) }
    }
}

impl Occurs for Binder1 {
    fn occurs(&self, var: &FVar) -> bool {
        self.body.occurs(var)
    }
}

impl ContainsMetas for Binder1 {
    fn contains_metas(&self, metas: &MetaCtx) -> bool {
        self.body.contains_metas(metas)
    }
}

// Binder
//
//

/// A multi-variable binder `⟨x₀ … x_{a-1}⟩ body`. Inside the body, `x_j` is
/// the de Bruijn index `a - 1 - j`, as if bound by `a` nested single
/// binders with `x₀` outermost.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Binder {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub names: Vec<VarBind>,
    pub arity: usize,
    pub body: Box<Term>,
}

impl Binder {
    pub fn new(arity: usize, body: Term) -> Self {
        let names = (0..arity).map(|i| VarBind::from_string(&format!("x{i}"))).collect();
        Binder { names, arity, body: Box::new(body) }
    }

    /// The identity environment `[x₀ … x_{a-1}]` as bound variable
    /// occurrences, suitable as the argument list of a metavariable that
    /// abstracts over exactly the binder's variables.
    pub fn id_args(arity: usize) -> Vec<Term> {
        (0..arity).map(|j| Variable::new(arity - 1 - j).into()).collect()
    }

    /// Simultaneously instantiate the binder with `args`, which must not
    /// contain dangling bound indices. `args[j]` replaces `x_j`.
    pub fn apply(&self, args: &[Term]) -> Term {
        debug_assert_eq!(args.len(), self.arity);
        msubst(&self.body, 0, args)
    }

    /// Close `body` over the free variables `vars`, yielding a binder of
    /// arity `vars.len()` whose `x_j` abstracts `vars[j]`.
    pub fn bind(vars: &[FVar], body: &Term) -> Binder {
        let arity = vars.len();
        let names = vars.iter().map(|v| VarBind::from_string(&v.name.id)).collect();
        Binder { names, arity, body: Box::new(close(body, 0, vars)) }
    }
}

impl Shift for Binder {
    fn shift_in_range(&mut self, cutoff: usize, by: isize) {
        self.body.shift_in_range(cutoff + self.arity, by);
    }
}

impl Substitutable for Binder {
    type Target = Binder;

    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        Binder { names: self.names.clone(), arity: self.arity, body: self.body.subst(by) }
    }
}

impl Occurs for Binder {
    fn occurs(&self, var: &FVar) -> bool {
        self.body.occurs(var)
    }
}

impl ContainsMetas for Binder {
    fn contains_metas(&self, metas: &MetaCtx) -> bool {
        self.body.contains_metas(metas)
    }
}

// Index manipulation
//
//

/// Simultaneous substitution of the `a` innermost bound variables at depth
/// `depth` by `args` (with `args[j]` for `x_j`, i.e. index `a - 1 - j`).
/// Indices beyond the substituted range are lowered by `a`.
fn msubst(t: &Term, depth: usize, args: &[Term]) -> Term {
    let arity = args.len();
    match t {
        Term::Variable(Variable { span, idx, name }) => {
            let i = idx.0;
            if i < depth {
                t.clone()
            } else if i < depth + arity {
                args[arity - 1 - (i - depth)].clone().shifted(depth as isize)
            } else {
                Variable { span: *span, idx: Idx(i - arity), name: name.clone() }.into()
            }
        }
        Term::FreeVar(_) | Term::Sort(_) | Term::Sym(_) | Term::Wild(_) => t.clone(),
        Term::App(e) => super::App {
            span: e.span,
            fun: Box::new(msubst(&e.fun, depth, args)),
            arg: Box::new(msubst(&e.arg, depth, args)),
        }
        .into(),
        Term::Abs(e) => super::Abs {
            span: e.span,
            typ: Box::new(msubst(&e.typ, depth, args)),
            body: Binder1 {
                name: e.body.name.clone(),
                body: Box::new(msubst(&e.body.body, depth + 1, args)),
            },
        }
        .into(),
        Term::Prod(e) => super::Prod {
            span: e.span,
            typ: Box::new(msubst(&e.typ, depth, args)),
            body: Binder1 {
                name: e.body.name.clone(),
                body: Box::new(msubst(&e.body.body, depth + 1, args)),
            },
        }
        .into(),
        Term::Meta(e) => super::Meta {
            span: e.span,
            meta: e.meta,
            args: e.args.iter().map(|a| msubst(a, depth, args)).collect(),
        }
        .into(),
        Term::Patt(e) => super::Patt {
            span: e.span,
            slot: e.slot,
            name: e.name.clone(),
            args: e.args.iter().map(|a| msubst(a, depth, args)).collect(),
        }
        .into(),
        Term::EnvRef(e) => super::EnvRef {
            span: e.span,
            target: e.target.clone(),
            args: e.args.iter().map(|a| msubst(a, depth, args)).collect(),
        }
        .into(),
    }
}

/// Close `t` over `vars`: occurrences of `vars[j]` become the bound index
/// `depth + a - 1 - j`, and indices at or above `depth` are raised by `a`
/// to make room for the new binders.
fn close(t: &Term, depth: usize, vars: &[FVar]) -> Term {
    let arity = vars.len();
    match t {
        Term::Variable(Variable { span, idx, name }) => {
            if idx.0 >= depth {
                Variable { span: *span, idx: Idx(idx.0 + arity), name: name.clone() }.into()
            } else {
                t.clone()
            }
        }
        Term::FreeVar(FreeVar { span, var }) => match vars.iter().position(|v| v == var) {
            Some(j) => Variable {
                span: *span,
                idx: Idx(depth + arity - 1 - j),
                name: var.name.clone(),
            }
            .into(),
            None => t.clone(),
        },
        Term::Sort(_) | Term::Sym(_) | Term::Wild(_) => t.clone(),
        Term::App(e) => super::App {
            span: e.span,
            fun: Box::new(close(&e.fun, depth, vars)),
            arg: Box::new(close(&e.arg, depth, vars)),
        }
        .into(),
        Term::Abs(e) => super::Abs {
            span: e.span,
            typ: Box::new(close(&e.typ, depth, vars)),
            body: Binder1 {
                name: e.body.name.clone(),
                body: Box::new(close(&e.body.body, depth + 1, vars)),
            },
        }
        .into(),
        Term::Prod(e) => super::Prod {
            span: e.span,
            typ: Box::new(close(&e.typ, depth, vars)),
            body: Binder1 {
                name: e.body.name.clone(),
                body: Box::new(close(&e.body.body, depth + 1, vars)),
            },
        }
        .into(),
        Term::Meta(e) => super::Meta {
            span: e.span,
            meta: e.meta,
            args: e.args.iter().map(|a| close(a, depth, vars)).collect(),
        }
        .into(),
        Term::Patt(e) => super::Patt {
            span: e.span,
            slot: e.slot,
            name: e.name.clone(),
            args: e.args.iter().map(|a| close(a, depth, vars)).collect(),
        }
        .into(),
        Term::EnvRef(e) => super::EnvRef {
            span: e.span,
            target: e.target.clone(),
            args: e.args.iter().map(|a| close(a, depth, vars)).collect(),
        }
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Abs, App, Sort};
    use super::*;

    #[test]
    fn open_replaces_index_zero() {
        let mut gen = VarGen::new();
        let x = gen.fresh("x");
        let binder = Binder1::new("x", Variable::new(0).into());
        assert_eq!(binder.open(&x), Term::from(x));
    }

    #[test]
    fn bind_then_apply_is_substitution() {
        let mut gen = VarGen::new();
        let x = gen.fresh("x");
        let y = gen.fresh("y");
        let body: Term = App::new(x.clone().into(), y.clone().into()).into();
        let binder = Binder::bind(&[x, y], &body);
        assert_eq!(binder.arity, 2);

        let s: Term = Sort::typ().into();
        let t: Term = Sort::kind().into();
        let applied = binder.apply(&[s.clone(), t.clone()]);
        assert_eq!(applied, App::new(s, t).into());
    }

    #[test]
    fn id_args_are_in_binding_order() {
        // For arity 2, x₀ is index 1 and x₁ is index 0.
        let args = Binder::id_args(2);
        let expected: Vec<Term> = vec![Variable::new(1).into(), Variable::new(0).into()];
        assert_eq!(args, expected);
    }

    #[test]
    fn apply_shifts_arguments_under_inner_binders() {
        let mut gen = VarGen::new();
        let x = gen.fresh("x");
        // ⟨x₀⟩ λy. x₀: the substituted term must still refer to x after
        // being moved under the abstraction.
        let body: Term = Abs::new("y", Sort::typ().into(), Variable::new(1).into()).into();
        let binder = Binder::new(1, body);
        let applied = binder.apply(&[x.clone().into()]);
        let expected: Term = Abs::new("y", Sort::typ().into(), x.into()).into();
        assert_eq!(applied, expected);
    }
}
