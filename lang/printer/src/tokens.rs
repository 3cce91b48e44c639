pub const ARROW: &str = "→";
pub const COLON: &str = ":";
pub const COMMA: &str = ",";
pub const DOT: &str = ".";
pub const KIND: &str = "KIND";
pub const LAMBDA: &str = "λ";
pub const PI: &str = "Π";
pub const QUESTION_MARK: &str = "?";
pub const REWRITE: &str = "↪";
pub const TYPE: &str = "TYPE";
pub const UNDERSCORE: &str = "_";
pub const DOLLAR: &str = "$";
