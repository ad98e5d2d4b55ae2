//! Overloadable operator kinds (§4.1 step 5, §9 "Operator-overload dispatch").

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    IndexedGet,
    IndexedSet,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl OperatorKind {
    /// Recognized `@operator("<symbol>")` symbols (§4.1 step 5). `None` means
    /// the decorator argument isn't a recognized operator symbol.
    pub fn from_symbol(symbol: &str) -> Option<OperatorKind> {
        use OperatorKind::*;
        Some(match symbol {
            "[]" => IndexedGet,
            "[]=" => IndexedSet,
            "+" => Add,
            "-" => Sub,
            "*" => Mul,
            "/" => Div,
            "%" => Mod,
            "**" => Pow,
            "&" => BitAnd,
            "|" => BitOr,
            "^" => BitXor,
            "==" => Eq,
            "!=" => NotEq,
            ">" => Gt,
            ">=" => Gte,
            "<" => Lt,
            "<=" => Lte,
            _ => return None,
        })
    }
}
