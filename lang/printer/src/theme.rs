use pretty::termcolor::{Color, ColorSpec};
use pretty::DocAllocator;

use super::types::*;

pub trait ThemeExt<'a> {
    fn keyword(&'a self, text: &str) -> Builder<'a>;
    fn ctor(&'a self, text: &str) -> Builder<'a>;
    fn var(&'a self, text: &str) -> Builder<'a>;
    fn meta(&'a self, text: &str) -> Builder<'a>;
}

impl<'a> ThemeExt<'a> for Alloc<'a> {
    fn keyword(&'a self, text: &str) -> Builder<'a> {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Magenta));
        self.text(text.to_owned()).annotate(spec)
    }

    fn ctor(&'a self, text: &str) -> Builder<'a> {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Blue));
        self.text(text.to_owned()).annotate(spec)
    }

    fn var(&'a self, text: &str) -> Builder<'a> {
        self.text(text.to_owned())
    }

    fn meta(&'a self, text: &str) -> Builder<'a> {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Cyan));
        self.text(text.to_owned()).annotate(spec)
    }
}
