use crate::term::{FVar, Term};

/// Trait for entities which can be used as a substitution for free
/// variables. In order to be used as a substitution an entity has to
/// provide a method to query it for a result for a given free variable.
///
/// Substitutions map free variables to terms without dangling bound
/// indices, so applying them never requires shifting and cannot capture.
pub trait Substitution: Clone {
    fn get_subst(&self, var: &FVar) -> Option<Term>;
}

/// An assignment is the simplest form of a substitution which provides just
/// one mapping from a free variable to a term.
#[derive(Debug, Clone)]
pub struct Assign {
    pub var: FVar,
    pub term: Term,
}

impl Substitution for Assign {
    fn get_subst(&self, var: &FVar) -> Option<Term> {
        if self.var == *var {
            Some(self.term.clone())
        } else {
            None
        }
    }
}

/// A simultaneous substitution given by two parallel arrays. Every
/// occurrence of `vars[i]` is replaced by `terms[i]` in one pass, so an
/// occurrence of some `vars[i]` inside any `terms[j]` is left untouched.
#[derive(Debug, Clone, Default)]
pub struct ParallelSubst {
    pub vars: Vec<FVar>,
    pub terms: Vec<Term>,
}

impl ParallelSubst {
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Substitution for ParallelSubst {
    fn get_subst(&self, var: &FVar) -> Option<Term> {
        let pos = self.vars.iter().position(|x| x == var)?;
        Some(self.terms[pos].clone())
    }
}

/// A trait for all entities to which we can apply a substitution.
pub trait Substitutable: Sized {
    type Target;

    fn subst<S: Substitution>(&self, by: &S) -> Self::Target;
}

impl<T: Substitutable> Substitutable for Box<T> {
    type Target = Box<T::Target>;

    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        Box::new((**self).subst(by))
    }
}

impl<T: Substitutable> Substitutable for Option<T> {
    type Target = Option<T::Target>;

    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        self.as_ref().map(|x| x.subst(by))
    }
}

impl<T: Substitutable> Substitutable for Vec<T> {
    type Target = Vec<T::Target>;

    fn subst<S: Substitution>(&self, by: &S) -> Self::Target {
        self.iter().map(|x| x.subst(by)).collect()
    }
}
