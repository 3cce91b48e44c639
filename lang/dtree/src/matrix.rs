//! The row/column representation of a pattern-matching problem.
//!
//! A row holds the still-unmatched argument patterns of one rule, the
//! rule's right-hand side, and the environment array recording which
//! pattern slots matching has already bound. Column `k` means the same
//! argument position in every row, but row lengths may differ: rules of
//! one symbol may bind different numbers of arguments, and specialization
//! consumes matched columns from the front.

use ast::{unfold, Binder, MetaCtx, Rule, Term};

/// One row of a pattern matrix.
#[derive(Debug, Clone)]
pub struct Row {
    pub lhs: Vec<Term>,
    pub rhs: ast::RhsBinder,
    /// `env[i] = None` while slot `i` is unmatched, `Some` once it has
    /// been bound to a matched subterm.
    pub env: Vec<Option<Binder>>,
}

#[derive(Debug, Clone, Default)]
pub struct Matrix {
    pub rows: Vec<Row>,
}

/// Assemble the initial matrix of a symbol from its accepted rules, in
/// source order.
pub fn of_rules(rules: &[Rule]) -> Matrix {
    let rows = rules
        .iter()
        .map(|rule| Row {
            lhs: rule.lhs.clone(),
            rhs: rule.rhs.clone(),
            env: vec![None; rule.arity()],
        })
        .collect();
    Matrix { rows }
}

impl Matrix {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The number of columns of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|row| row.lhs.len()).max().unwrap_or(0)
    }

    /// The values of column `k`, skipping rows that are too short.
    pub fn get_col(&self, k: usize) -> Vec<&Term> {
        self.rows.iter().filter_map(|row| row.lhs.get(k)).collect()
    }

    /// Project the matrix to the chosen columns.
    pub fn select(&self, indices: &[usize]) -> Matrix {
        let rows = self
            .rows
            .iter()
            .map(|row| Row {
                lhs: indices.iter().filter_map(|&k| row.lhs.get(k).cloned()).collect(),
                rhs: row.rhs.clone(),
                env: row.env.clone(),
            })
            .collect();
        Matrix { rows }
    }

    /// Exchange columns 0 and `i` in every row that has both.
    pub fn swap(&self, i: usize) -> Matrix {
        let mut out = self.clone();
        for row in &mut out.rows {
            if row.lhs.len() > i {
                row.lhs.swap(0, i);
            }
        }
        out
    }

    /// Whether a switch on column `k` discriminates anything: some row
    /// presents a constructor head there. Columns that are all pattern
    /// holes (or absent) offer no discrimination.
    pub fn can_switch_on(&self, metas: &MetaCtx, k: usize) -> bool {
        self.rows
            .iter()
            .any(|row| row.lhs.get(k).is_some_and(|t| is_cons(metas, &row.env, t)))
    }

    /// The indices of the columns a switch can be carried out on. At least
    /// one column is retained whenever a non-exhausted row exists.
    pub fn discard_patt_free(&self, metas: &MetaCtx) -> Vec<usize> {
        (0..self.width()).filter(|&k| self.can_switch_on(metas, k)).collect()
    }
}

impl Row {
    /// A row is exhausted when every remaining column is a pattern hole;
    /// it yields its action immediately.
    pub fn exhausted(&self, metas: &MetaCtx) -> bool {
        self.lhs.iter().all(|t| !is_cons(metas, &self.env, t))
    }
}

/// Whether `t` presents a head that requires matching. Pattern holes
/// (wildcards and variables whose slot is still unmatched) do not; a
/// pattern variable whose slot is already bound behaves like its binding.
pub fn is_cons(metas: &MetaCtx, env: &[Option<Binder>], t: &Term) -> bool {
    match unfold(metas, t) {
        Term::Patt(p) => match p.slot {
            Some(slot) => match env.get(slot) {
                Some(Some(binder)) => is_cons(metas, env, &binder.apply(&p.args)),
                _ => false,
            },
            None => false,
        },
        // Well-formed columns never have a pattern hole in applicand
        // position; the recursion is kept for safety.
        Term::App(app) => is_cons(metas, env, &app.fun),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::{add_args, IdBound, Patt, PattSlot, RhsBinder, Sort, Sym, SymId, SymTag, Symbol};
    use url::Url;

    fn declare(sig: &mut ast::Signature, name: &str) -> SymId {
        let uri = Url::parse("inmemory://scratch.rp").unwrap();
        let name = IdBound { span: None, id: name.to_owned(), uri };
        sig.add_symbol(Symbol::new(name, Sort::typ().into(), SymTag::Constant))
    }

    fn sym(sig: &ast::Signature, id: SymId) -> Term {
        Sym { span: None, id, name: sig.get(id).unwrap().name.clone() }.into()
    }

    #[test]
    fn holes_are_not_constructors() {
        let metas = MetaCtx::new();
        let env: Vec<Option<Binder>> = vec![None];
        assert!(!is_cons(&metas, &env, &Patt::wildcard().into()));
        assert!(!is_cons(&metas, &env, &Patt::var(0, "x").into()));
    }

    #[test]
    fn bound_pattern_variables_behave_like_their_binding() {
        let mut sig = ast::Signature::new();
        let t = declare(&mut sig, "true");
        let metas = MetaCtx::new();

        let env = vec![Some(Binder::new(0, sym(&sig, t)))];
        assert!(is_cons(&metas, &env, &Patt::var(0, "x").into()));
    }

    #[test]
    fn application_heads_look_through_the_spine() {
        let mut sig = ast::Signature::new();
        let s = declare(&mut sig, "S");
        let metas = MetaCtx::new();
        let env: Vec<Option<Binder>> = vec![None];

        let t = add_args(sym(&sig, s), vec![Patt::var(0, "m").into()]);
        assert!(is_cons(&metas, &env, &t));
    }

    #[test]
    fn columns_are_gathered_selected_and_swapped() {
        let mut sig = ast::Signature::new();
        let t = declare(&mut sig, "true");
        let f = declare(&mut sig, "false");

        let rules = [
            Rule::new(vec![sym(&sig, t), sym(&sig, f)], RhsBinder::closed(sym(&sig, t))),
            Rule::new(vec![sym(&sig, f)], RhsBinder::closed(sym(&sig, f))),
        ];
        let m = of_rules(&rules);

        // Column 1 exists only in the wider row.
        let col = m.get_col(1);
        assert_eq!(col.len(), 1);
        assert_eq!(*col[0], sym(&sig, f));

        let selected = m.select(&[1]);
        assert_eq!(selected.rows[0].lhs, vec![sym(&sig, f)]);
        assert!(selected.rows[1].lhs.is_empty());

        let swapped = m.swap(1);
        assert_eq!(swapped.rows[0].lhs, vec![sym(&sig, f), sym(&sig, t)]);
        // Rows without column 1 are untouched.
        assert_eq!(swapped.rows[1].lhs, vec![sym(&sig, f)]);
    }

    #[test]
    fn patt_free_columns_are_discarded() {
        let mut sig = ast::Signature::new();
        let t = declare(&mut sig, "true");
        let metas = MetaCtx::new();

        let rule = Rule::new(
            vec![Patt::var(0, "x").into(), sym(&sig, t)],
            RhsBinder::new(vec![PattSlot::new("x", 0)], ast::EnvRef::slot(0, vec![]).into()),
        );
        let m = of_rules(&[rule]);
        assert!(!m.can_switch_on(&metas, 0));
        assert!(m.can_switch_on(&metas, 1));
        assert_eq!(m.discard_patt_free(&metas), vec![1]);
        assert!(!m.rows[0].exhausted(&metas));
    }
}
