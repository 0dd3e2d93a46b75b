use num::FromPrimitive;

/// The six comparison operator codes `CMPR` pops off the expression stack.
/// IL pushes these as plain integers the same way it pushes variable
/// indices, so the conversion back to a typed enum happens only at the
/// point `CMPR` actually needs it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive)]
pub enum Comparison {
    Eq = 0,
    Lt = 1,
    Le = 2,
    Ne = 3,
    Gt = 4,
    Ge = 5,
}

impl Comparison {
    /// An operator code outside `0..=5` is a VM invariant violation, not a
    /// BASIC-level error; the IL text is trusted to only ever push
    /// operator codes it itself defined.
    pub fn from_code(code: i64) -> Option<Comparison> {
        if code < 0 {
            None
        } else {
            FromPrimitive::from_i64(code)
        }
    }

    pub fn apply(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Eq => lhs == rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Ne => lhs != rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
        }
    }
}
