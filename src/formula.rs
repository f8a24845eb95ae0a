//! HUCTL formula abstract syntax.
//!
//! The engine consumes formulas as a plain AST; concrete syntax and parsing
//! live outside this crate. HUCTL here is CTL (path quantifiers A/E combined
//! with temporal operators X/F/G/U) extended with a mode-membership predicate
//! for hybrid models.
//!
//! The AST derives structural equality and hashing so the checker can
//! memoize per-subformula results.

use std::fmt;

/// Atomic proposition: a half-space of the discretized grid.
///
/// With `above`, the proposition holds in cells whose coordinate index in
/// `dimension` is `>= cut`; otherwise in cells strictly below the cut. The
/// cut is a grid-line index, so a threshold value like `x > 5` is expressed
/// as the index of the grid line at 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Proposition {
    pub dimension: usize,
    pub cut: usize,
    pub above: bool,
}

impl Proposition {
    pub fn new(dimension: usize, cut: usize, above: bool) -> Self {
        Proposition { dimension, cut, above }
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = if self.above { ">=" } else { "<" };
        write!(f, "x{} {} t{}", self.dimension, op, self.cut)
    }
}

/// HUCTL formula AST.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    /// True everywhere.
    True,
    /// False everywhere.
    False,
    /// Atomic proposition.
    Prop(Proposition),
    /// Mode-membership predicate: the state lies in the named mode.
    Mode(String),
    /// Negation.
    Not(Box<Formula>),
    /// Conjunction.
    And(Box<Formula>, Box<Formula>),
    /// Disjunction.
    Or(Box<Formula>, Box<Formula>),
    /// Exists Next: EX φ
    EX(Box<Formula>),
    /// All Next: AX φ
    AX(Box<Formula>),
    /// Exists Future: EF φ
    EF(Box<Formula>),
    /// All Future: AF φ
    AF(Box<Formula>),
    /// Exists Globally: EG φ
    EG(Box<Formula>),
    /// All Globally: AG φ
    AG(Box<Formula>),
    /// Exists Until: E[φ U ψ]
    EU(Box<Formula>, Box<Formula>),
    /// All Until: A[φ U ψ]
    AU(Box<Formula>, Box<Formula>),
}

impl Formula {
    /// Constructors for convenience
    pub fn prop(dimension: usize, cut: usize, above: bool) -> Self {
        Formula::Prop(Proposition::new(dimension, cut, above))
    }

    pub fn mode(label: impl Into<String>) -> Self {
        Formula::Mode(label.into())
    }

    pub fn not(self) -> Self {
        Formula::Not(Box::new(self))
    }

    pub fn and(self, other: Self) -> Self {
        Formula::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Self) -> Self {
        Formula::Or(Box::new(self), Box::new(other))
    }

    pub fn ex(self) -> Self {
        Formula::EX(Box::new(self))
    }

    pub fn ax(self) -> Self {
        Formula::AX(Box::new(self))
    }

    pub fn ef(self) -> Self {
        Formula::EF(Box::new(self))
    }

    pub fn af(self) -> Self {
        Formula::AF(Box::new(self))
    }

    pub fn eg(self) -> Self {
        Formula::EG(Box::new(self))
    }

    pub fn ag(self) -> Self {
        Formula::AG(Box::new(self))
    }

    pub fn eu(self, other: Self) -> Self {
        Formula::EU(Box::new(self), Box::new(other))
    }

    pub fn au(self, other: Self) -> Self {
        Formula::AU(Box::new(self), Box::new(other))
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::True => write!(f, "true"),
            Formula::False => write!(f, "false"),
            Formula::Prop(p) => write!(f, "{}", p),
            Formula::Mode(m) => write!(f, "mode == {}", m),
            Formula::Not(phi) => write!(f, "!{}", phi),
            Formula::And(phi, psi) => write!(f, "({} && {})", phi, psi),
            Formula::Or(phi, psi) => write!(f, "({} || {})", phi, psi),
            Formula::EX(phi) => write!(f, "EX {}", phi),
            Formula::AX(phi) => write!(f, "AX {}", phi),
            Formula::EF(phi) => write!(f, "EF {}", phi),
            Formula::AF(phi) => write!(f, "AF {}", phi),
            Formula::EG(phi) => write!(f, "EG {}", phi),
            Formula::AG(phi) => write!(f, "AG {}", phi),
            Formula::EU(phi, psi) => write!(f, "E[{} U {}]", phi, psi),
            Formula::AU(phi, psi) => write!(f, "A[{} U {}]", phi, psi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let f = Formula::prop(0, 1, true).ef();
        assert_eq!(f, Formula::EF(Box::new(Formula::Prop(Proposition::new(0, 1, true)))));
    }

    #[test]
    fn test_display() {
        let f = Formula::prop(0, 2, true).and(Formula::mode("on")).eu(Formula::True.not());
        assert_eq!(f.to_string(), "E[(x0 >= t2 && mode == on) U !true]");
    }

    #[test]
    fn test_structural_identity() {
        use std::collections::HashMap;
        let a = Formula::prop(1, 3, false).ef();
        let b = Formula::prop(1, 3, false).ef();
        assert_eq!(a, b);
        let mut memo = HashMap::new();
        memo.insert(a, 1);
        assert_eq!(memo.get(&b), Some(&1));
    }
}
