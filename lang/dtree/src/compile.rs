//! Recursive construction of the matching tree from a pattern matrix.

use ast::{
    add_args, collect_free_vars, unfold, Binder, DecNode, DecTree, FVar, MetaCtx, Patt, Term,
    VarGen,
};
use printer::Print;

use crate::matrix::{is_cons, Matrix, Row};
use crate::result::MatrixError;

/// The column-selection heuristic. Any policy that returns a valid column
/// index is conforming; the choice affects tree size, never correctness.
#[derive(Debug, Clone, Copy, Default)]
pub enum ColumnPolicy {
    /// Match against the leftmost switchable column.
    #[default]
    Leftmost,
    /// Match against the column with the most constructor heads.
    MostConstructors,
}

impl ColumnPolicy {
    /// Pick a column of the already-selected matrix `m`.
    fn pick_best(&self, metas: &MetaCtx, m: &Matrix) -> usize {
        match self {
            ColumnPolicy::Leftmost => 0,
            ColumnPolicy::MostConstructors => (0..m.width())
                .max_by_key(|&k| {
                    m.rows
                        .iter()
                        .filter(|row| {
                            row.lhs.get(k).is_some_and(|t| is_cons(metas, &row.env, t))
                        })
                        .count()
                })
                .unwrap_or(0),
        }
    }
}

/// Compile `m` with the default (leftmost) column policy.
pub fn compile(metas: &MetaCtx, m: &Matrix) -> Result<DecTree, MatrixError> {
    Compiler::new(metas, ColumnPolicy::default(), m).run(m)
}

/// The tree compiler. It owns the fresh-variable generator used to open
/// abstraction columns, seeded above every free variable of the input
/// matrix, so that compilation is a pure function of the matrix up to the
/// naming of fresh variables.
pub struct Compiler<'a> {
    metas: &'a MetaCtx,
    policy: ColumnPolicy,
    gen: VarGen,
}

impl<'a> Compiler<'a> {
    pub fn new(metas: &'a MetaCtx, policy: ColumnPolicy, m: &Matrix) -> Self {
        Compiler { metas, policy, gen: VarGen::starting_at(seed(m)) }
    }

    /// Compile a matrix:
    ///
    /// 1. no rows: no rule applies, emit `Fail`;
    /// 2. first row exhausted: emit its action (the textually earliest
    ///    rule wins);
    /// 3. otherwise switch on the best switchable column, specializing the
    ///    matrix once per candidate constructor head, with a default
    ///    branch for the rows that hold a pattern hole there.
    pub fn run(&mut self, m: &Matrix) -> Result<DecTree, MatrixError> {
        let Some(first) = m.rows.first() else {
            return Ok(DecTree::Fail);
        };
        if first.exhausted(self.metas) {
            return Ok(DecTree::Leaf(first.rhs.clone()));
        }

        let cols = m.discard_patt_free(self.metas);
        let sel = self.policy.pick_best(self.metas, &m.select(&cols));
        let chosen = cols[sel];
        let (swap, m) = if chosen == 0 {
            (None, m.clone())
        } else {
            (Some(chosen), m.swap(chosen))
        };

        // The candidate constructor heads of column 0, in source order of
        // the rules that contribute them: the leftmost head of each
        // application spine, at the arity it is applied at. Specialization
        // matches one constructor layer at a time, so the witness carries
        // pattern holes in argument positions; two rules applying the same
        // head to different subterms share a child, and the subterms are
        // discriminated by later switches on the exposed columns.
        let mut tags: Vec<(Term, usize)> = Vec::new();
        for row in &m.rows {
            let Some(head) = row.lhs.first() else { continue };
            if !is_cons(self.metas, &row.env, head) {
                continue;
            }
            let witness = self.resolve_head(&row.env, head);
            let (tag, arity) = self.split_head(&witness);
            if !tags.iter().any(|(t, a)| *t == tag && *a == arity) {
                tags.push((tag, arity));
            }
        }

        let mut children = Vec::with_capacity(tags.len() + 1);
        for (tag, arity) in tags {
            let args = (0..arity).map(|_| Patt::wildcard().into()).collect();
            let shape = add_args(tag.clone(), args);
            let specialized = self.specialize(&shape, &m)?;
            log::trace!(
                "specialized by {}: {} rows",
                tag.print_to_string(None),
                specialized.rows.len()
            );
            children.push((Some(tag), self.run(&specialized)?));
        }
        let default = self.default_matrix(&m)?;
        if !default.is_empty() {
            children.push((None, self.run(&default)?));
        }

        Ok(DecTree::Node(DecNode { swap, children }))
    }

    /// Restrict `m` to the rows whose first column matches the constructor
    /// witness `p`, rewriting each retained row to reflect the matching
    /// step just performed.
    pub fn specialize(&mut self, p: &Term, m: &Matrix) -> Result<Matrix, MatrixError> {
        let mut openers: Vec<FVar> = Vec::new();
        let mut rows = Vec::new();
        for row in &m.rows {
            let Some(head) = row.lhs.first() else { continue };
            let mut env = row.env.clone();
            if let Some(mut cols) = self.spec_filter(p, head, &mut env, 0, &mut openers)? {
                cols.extend(row.lhs[1..].iter().cloned());
                rows.push(Row { lhs: cols, rhs: row.rhs.clone(), env });
            }
        }
        Ok(Matrix { rows })
    }

    /// Row-level filter of specialization. Returns the replacement columns
    /// for the row head, or `None` when the row cannot match `p`. Consumed
    /// pattern holes are recorded in the row environment.
    fn spec_filter(
        &mut self,
        p: &Term,
        h: &Term,
        env: &mut Vec<Option<Binder>>,
        depth: usize,
        openers: &mut Vec<FVar>,
    ) -> Result<Option<Vec<Term>>, MatrixError> {
        let p = unfold(self.metas, p);
        let h = unfold(self.metas, h);

        // A hole on the witness side accepts anything; the row subterm
        // stays behind as a column of its own.
        if matches!(p, Term::Patt(_)) {
            return Ok(Some(vec![h]));
        }

        match &h {
            Term::Patt(hp) => {
                // A bound pattern variable behaves like its binding.
                if let Some(slot) = hp.slot {
                    if let Some(binder) = env[slot].clone() {
                        return self.spec_filter(&p, &binder.apply(&hp.args), env, depth, openers);
                    }
                }
                // A pattern hole matches; it expands into one wildcard per
                // subterm the witness shape exposes. When the witness is
                // atomic the hole is consumed outright and its slot is
                // bound to the witness.
                let cols = hole_expansion(&p);
                if cols.is_empty() {
                    if let Some(slot) = hp.slot {
                        let vars = hole_vars(self.metas, hp)?;
                        env[slot] = Some(Binder::bind(&vars, &p));
                    }
                }
                Ok(Some(cols))
            }
            Term::Sym(hs) => match &p {
                Term::Sym(ps) if ps.id == hs.id => Ok(Some(vec![])),
                _ => Ok(None),
            },
            Term::App(ha) => match &p {
                Term::App(pa) => {
                    if self.spec_filter(&pa.fun, &ha.fun, env, depth, openers)?.is_none() {
                        return Ok(None);
                    }
                    if self.spec_filter(&pa.arg, &ha.arg, env, depth, openers)?.is_none() {
                        return Ok(None);
                    }
                    Ok(Some(vec![(*ha.fun).clone(), (*ha.arg).clone()]))
                }
                _ => Ok(None),
            },
            Term::Abs(hx) => match &p {
                Term::Abs(px) => {
                    let var = self.opener(openers, depth);
                    let p_body = px.body.open(&var);
                    let h_body = hx.body.open(&var);
                    let kept =
                        self.spec_filter(&p_body, &h_body, env, depth + 1, openers)?;
                    Ok(kept.map(|_| vec![h_body]))
                }
                _ => Ok(None),
            },
            Term::FreeVar(hv) => match &p {
                Term::FreeVar(pv) if pv.var == hv.var => Ok(Some(vec![])),
                _ => Ok(None),
            },
            Term::Variable(hv) => match &p {
                Term::Variable(pv) if pv.idx == hv.idx => Ok(Some(vec![])),
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }

    /// Restrict `m` to the rows whose first column is a pattern hole,
    /// dropping that column. Rows headed by a true constructor are
    /// discarded: they are covered by the constructor children.
    pub fn default_matrix(&self, m: &Matrix) -> Result<Matrix, MatrixError> {
        let mut rows = Vec::new();
        for row in &m.rows {
            let Some(head) = row.lhs.first() else { continue };
            if self.is_default_hole(&row.env, head)? {
                rows.push(Row {
                    lhs: row.lhs[1..].to_vec(),
                    rhs: row.rhs.clone(),
                    env: row.env.clone(),
                });
            }
        }
        Ok(Matrix { rows })
    }

    fn is_default_hole(
        &self,
        env: &[Option<Binder>],
        t: &Term,
    ) -> Result<bool, MatrixError> {
        match unfold(self.metas, t) {
            Term::Patt(p) => match p.slot {
                Some(slot) => match env.get(slot) {
                    Some(Some(binder)) => self.is_default_hole(env, &binder.apply(&p.args)),
                    _ => Ok(true),
                },
                None => Ok(true),
            },
            Term::Sym(_) | Term::App(_) | Term::Abs(_) | Term::Variable(_)
            | Term::FreeVar(_) => Ok(false),
            bad => Err(MatrixError::BadDefaultHead { term: bad.print_to_string(None) }),
        }
    }

    /// Resolve a column head to the constructor it presents, following
    /// bound pattern variables.
    fn resolve_head(&self, env: &[Option<Binder>], t: &Term) -> Term {
        let t = unfold(self.metas, t);
        if let Term::Patt(p) = &t {
            if let Some(Some(binder)) = p.slot.map(|slot| env.get(slot).cloned().flatten()) {
                return self.resolve_head(env, &binder.apply(&p.args));
            }
        }
        t
    }

    /// The leftmost non-application head of a witness and the number of
    /// arguments it is applied to.
    fn split_head(&self, t: &Term) -> (Term, usize) {
        let mut head = unfold(self.metas, t);
        let mut arity = 0;
        while let Term::App(app) = head {
            arity += 1;
            head = unfold(self.metas, &app.fun);
        }
        (head, arity)
    }

    /// The fresh variable used to open abstraction columns at the given
    /// binder depth. One opener per depth is shared across all rows of a
    /// specialization call, so identical bodies stay α-comparable.
    fn opener(&mut self, openers: &mut Vec<FVar>, depth: usize) -> FVar {
        while openers.len() <= depth {
            openers.push(self.gen.fresh("x"));
        }
        openers[depth].clone()
    }
}

/// The columns a pattern hole expands into when matched against the shape
/// of `p`: one per immediate subterm of an application, the body of an
/// abstraction, nothing for an atom.
fn hole_expansion(p: &Term) -> Vec<Term> {
    match p {
        Term::App(_) => vec![Patt::wildcard().into(), Patt::wildcard().into()],
        Term::Abs(_) => vec![Patt::wildcard().into()],
        _ => vec![],
    }
}

/// The argument variables of a pattern hole, which by construction are the
/// free variables of the binders it sits under.
fn hole_vars(metas: &MetaCtx, p: &Patt) -> Result<Vec<FVar>, MatrixError> {
    let mut vars = Vec::with_capacity(p.args.len());
    for arg in &p.args {
        match unfold(metas, arg) {
            Term::FreeVar(v) => vars.push(v.var),
            _ => {
                return Err(MatrixError::PattArgsNotVariables { name: p.name.id.clone() })
            }
        }
    }
    Ok(vars)
}

/// A fresh-variable seed strictly above every id occurring in the matrix.
fn seed(m: &Matrix) -> u64 {
    let mut max = 0;
    for row in &m.rows {
        for t in row.lhs.iter().chain(std::iter::once(&*row.rhs.body)) {
            for v in collect_free_vars(t) {
                max = max.max(v.id + 1);
            }
        }
        for binder in row.env.iter().flatten() {
            for v in collect_free_vars(&binder.body) {
                max = max.max(v.id + 1);
            }
        }
    }
    max
}
