use derivative::Derivative;

use crate::decls::RhsBinder;
use crate::term::Term;

/// A decision tree driving pattern dispatch for one symbol, following
/// Maranget's "Compiling Pattern Matching to Good Decision Trees". At
/// reduction time the evaluator walks the tree over the argument vector of
/// the symbol instead of scanning rules sequentially.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub enum DecTree {
    /// A rule applies; the action is its right-hand-side binder, ready to
    /// be instantiated with the matched environment.
    Leaf(RhsBinder),
    /// No rule applies.
    Fail,
    Node(DecNode),
}

/// An inner node tests the first column of the incoming term vector. If
/// `swap` is set, that column must first be exchanged with column 0. Each
/// child is tagged with the constructor head it matches; the `None` child
/// is the default branch.
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct DecNode {
    pub swap: Option<usize>,
    pub children: Vec<(Option<Term>, DecTree)>,
}

impl DecTree {
    pub fn is_fail(&self) -> bool {
        matches!(self, DecTree::Fail)
    }

    /// Fold over the tree. `leaf_fn` is applied to every action, `node_fn`
    /// to every inner node together with the folded children (in order,
    /// default branch last), and `fail_value` stands for every `Fail`.
    pub fn iter<A, L, N>(&self, leaf_fn: &L, node_fn: &N, fail_value: &A) -> A
    where
        A: Clone,
        L: Fn(&RhsBinder) -> A,
        N: Fn(&DecNode, Vec<(Option<&Term>, A)>) -> A,
    {
        match self {
            DecTree::Leaf(action) => leaf_fn(action),
            DecTree::Fail => fail_value.clone(),
            DecTree::Node(node) => {
                let children = node
                    .children
                    .iter()
                    .map(|(tag, child)| {
                        (tag.as_ref(), child.iter(leaf_fn, node_fn, fail_value))
                    })
                    .collect();
                node_fn(node, children)
            }
        }
    }

    /// The maximal number of pattern slots any reachable action binds. The
    /// evaluator sizes its match environment with this.
    pub fn capacity(&self) -> usize {
        self.iter(
            &|action: &RhsBinder| action.arity(),
            &|_, children: Vec<(Option<&Term>, usize)>| {
                children.into_iter().map(|(_, c)| c).max().unwrap_or(0)
            },
            &0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decls::PattSlot;
    use crate::term::Sort;

    fn leaf(arity: usize) -> DecTree {
        let slots = (0..arity).map(|i| PattSlot::new(&format!("x{i}"), 0)).collect();
        DecTree::Leaf(RhsBinder::new(slots, Sort::typ().into()))
    }

    #[test]
    fn capacity_is_max_over_leaves() {
        let tree = DecTree::Node(DecNode {
            swap: None,
            children: vec![
                (Some(Sort::typ().into()), leaf(2)),
                (Some(Sort::kind().into()), leaf(3)),
                (None, DecTree::Fail),
            ],
        });
        assert_eq!(tree.capacity(), 3);
    }

    #[test]
    fn capacity_of_fail_is_zero() {
        assert_eq!(DecTree::Fail.capacity(), 0);
    }
}
