use crate::metas::MetaCtx;

pub trait ContainsMetas {
    /// Whether an uninstantiated metavariable is reachable without crossing
    /// an instantiated one, i.e. after unfolding solutions.
    fn contains_metas(&self, metas: &MetaCtx) -> bool;
}

impl<T: ContainsMetas> ContainsMetas for Box<T> {
    fn contains_metas(&self, metas: &MetaCtx) -> bool {
        (**self).contains_metas(metas)
    }
}

impl<T: ContainsMetas> ContainsMetas for Option<T> {
    fn contains_metas(&self, metas: &MetaCtx) -> bool {
        self.as_ref().is_some_and(|x| x.contains_metas(metas))
    }
}

impl<T: ContainsMetas> ContainsMetas for Vec<T> {
    fn contains_metas(&self, metas: &MetaCtx) -> bool {
        self.iter().any(|x| x.contains_metas(metas))
    }
}
