mod contains_metas;
mod has_span;
mod occurs;
mod shift;
mod subst;

pub use contains_metas::*;
pub use has_span::*;
pub use occurs::*;
pub use shift::*;
pub use subst::*;
