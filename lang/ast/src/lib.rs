pub mod decls;
pub mod ident;
pub mod metas;
pub mod term;
pub mod traits;
pub mod tree;

pub use decls::*;
pub use ident::*;
pub use metas::*;
pub use term::*;
pub use traits::*;
pub use tree::*;

pub type HashMap<K, V> = fxhash::FxHashMap<K, V>;
pub type HashSet<V> = fxhash::FxHashSet<V>;
