//! Compilation of the rewrite rules of a symbol into a decision tree,
//! following Maranget's "Compiling Pattern Matching to Good Decision
//! Trees". Head-symbol dispatch at reduction time is then driven by a
//! compact tree of column tests and swaps instead of sequential pattern
//! scans.

pub mod compile;
pub mod dot;
pub mod matrix;
pub mod result;

pub use compile::{compile, ColumnPolicy, Compiler};
pub use dot::{to_dot, write_dot};
pub use matrix::{of_rules, Matrix, Row};
pub use result::MatrixError;
