//! Sequencing of rule registration.
//!
//! Rule addition observes a happens-before ordering: a rule is checked for
//! subject reduction *before* it is appended to its symbol, so that the
//! check never sees the partially-added rule itself. After the rule set of
//! a symbol changes, its decision tree is recompiled.

use miette::Diagnostic;
use thiserror::Error;

use ast::{MetaCtx, Rule, SigError, Signature, SymId};
use dtree::MatrixError;
use elaborator::{check_rule, Builtins, Oracle, RuleError};

#[derive(Error, Diagnostic, Debug)]
pub enum DriverError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Signature(#[from] SigError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Matrix(#[from] MatrixError),
}

/// Check `rule`, append it to `sym`, and recompile the symbol's decision
/// tree. A rejected rule leaves the signature untouched.
pub fn register_rule<O: Oracle>(
    oracle: &O,
    builtins: &Builtins,
    sig: &mut Signature,
    metas: &mut MetaCtx,
    sym: SymId,
    rule: Rule,
) -> Result<(), DriverError> {
    check_rule(oracle, builtins, sig, metas, sym, &rule)?;
    sig.add_rule(sym, rule)?;

    let matrix = dtree::of_rules(&sig.get(sym)?.rules);
    let tree = dtree::compile(metas, &matrix)?;
    log::debug!(
        "recompiled decision tree of {} (capacity {})",
        sig.get(sym)?.name,
        tree.capacity()
    );
    sig.set_tree(sym, tree)?;
    Ok(())
}
