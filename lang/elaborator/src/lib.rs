pub mod constraints;
pub mod meta_type;
pub mod oracle;
pub mod result;
pub mod subject_reduction;

pub use constraints::{build_typing_subst, Constraint};
pub use meta_type::build_meta_type;
pub use oracle::{Builtins, Oracle, TypingCtx};
pub use result::RuleError;
pub use subject_reduction::check_rule;
