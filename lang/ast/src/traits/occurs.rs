use crate::term::{FVar, Term};

pub trait Occurs {
    /// Whether the given free variable occurs in the entity.
    fn occurs(&self, var: &FVar) -> bool;
}

impl<T: Occurs> Occurs for Box<T> {
    fn occurs(&self, var: &FVar) -> bool {
        (**self).occurs(var)
    }
}

impl<T: Occurs> Occurs for Option<T> {
    fn occurs(&self, var: &FVar) -> bool {
        self.as_ref().is_some_and(|x| x.occurs(var))
    }
}

impl<T: Occurs> Occurs for Vec<T> {
    fn occurs(&self, var: &FVar) -> bool {
        self.iter().any(|x| x.occurs(var))
    }
}

/// Collect the distinct free variables of a term, in first-occurrence
/// order.
pub fn collect_free_vars(t: &Term) -> Vec<FVar> {
    let mut acc = Vec::new();
    collect(t, &mut acc);
    acc
}

fn collect(t: &Term, acc: &mut Vec<FVar>) {
    match t {
        Term::Variable(_) | Term::Sort(_) | Term::Sym(_) | Term::Wild(_) => {}
        Term::FreeVar(v) => {
            if !acc.contains(&v.var) {
                acc.push(v.var.clone());
            }
        }
        Term::App(e) => {
            collect(&e.fun, acc);
            collect(&e.arg, acc);
        }
        Term::Abs(e) => {
            collect(&e.typ, acc);
            collect(&e.body.body, acc);
        }
        Term::Prod(e) => {
            collect(&e.typ, acc);
            collect(&e.body.body, acc);
        }
        Term::Meta(e) => {
            for arg in &e.args {
                collect(arg, acc);
            }
        }
        Term::Patt(e) => {
            for arg in &e.args {
                collect(arg, acc);
            }
        }
        Term::EnvRef(e) => {
            if let crate::term::TeRef::Bound(binder) = &e.target {
                collect(&binder.body, acc);
            }
            for arg in &e.args {
                collect(arg, acc);
            }
        }
    }
}
