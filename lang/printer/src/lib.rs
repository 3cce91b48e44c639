pub use pretty::termcolor;
pub use pretty::termcolor::Color;
pub use pretty::termcolor::ColorSpec;
pub use pretty::DocAllocator;

pub mod theme;
pub mod tokens;
mod types;

pub use types::*;

pub const DEFAULT_WIDTH: usize = 100;

/// Print an iterator of items interspersed with commas.
pub fn print_comma_separated<'a, T: Print>(
    items: &'a [T],
    cfg: &PrintCfg,
    alloc: &'a Alloc<'a>,
) -> Builder<'a> {
    let sep = alloc.text(tokens::COMMA).append(alloc.space());
    alloc.intersperse(items.iter().map(|item| item.print(cfg, alloc)), sep)
}
