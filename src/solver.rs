//! Parameter-set algebra.
//!
//! The [`Solver`] trait is the contract the model checker is generic over:
//! any symbolic representation of parameter subsets that supports union,
//! intersection, complement and the emptiness/subset/equality tests can be
//! plugged in. [`RectSolver`] is the canonical implementation over
//! [`ParamSet`]s, finite unions of axis-aligned rectangles.
//!
//! All operations are pure and return new values. Operands must agree on the
//! parameter-space dimension; a mismatch fails with
//! [`CheckError::DimensionMismatch`].

use std::fmt;

use log::trace;

use crate::error::{CheckError, Result};
use crate::rect::Rectangle;

/// The algebra the model checker computes in.
///
/// Implementations carry the problem's universe (the full parameter box), so
/// the checker never has to thread bounds around.
pub trait Solver {
    /// Symbolic representation of a parameter subset.
    type Set: Clone + fmt::Debug;

    /// The shared parameter-space dimension D.
    fn dimension(&self) -> usize;

    /// The empty set.
    fn empty(&self) -> Self::Set;

    /// The full parameter space.
    fn universe(&self) -> Self::Set;

    fn union(&self, a: &Self::Set, b: &Self::Set) -> Result<Self::Set>;

    fn intersect(&self, a: &Self::Set, b: &Self::Set) -> Result<Self::Set>;

    /// Complement of `set` within `universe`.
    fn complement(&self, set: &Self::Set, universe: &Self::Set) -> Result<Self::Set>;

    fn is_empty(&self, set: &Self::Set) -> bool;

    /// `a ⊆ b`, decided as `a \ b = ∅`.
    fn is_subset(&self, a: &Self::Set, b: &Self::Set) -> Result<bool>;

    /// Set equality (mutual inclusion).
    fn equals(&self, a: &Self::Set, b: &Self::Set) -> Result<bool>;
}

/// A finite union of rectangles over a fixed dimension, kept canonical:
/// components are pairwise disjoint, non-empty, and no two components are
/// mergeable into one rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSet {
    dimension: usize,
    rects: Vec<Rectangle>,
}

impl ParamSet {
    /// The empty set of the given dimension.
    pub fn empty(dimension: usize) -> Self {
        ParamSet {
            dimension,
            rects: Vec::new(),
        }
    }

    /// Builds a canonical set from an arbitrary (possibly overlapping) list
    /// of rectangles.
    pub fn from_rectangles(dimension: usize, rects: impl IntoIterator<Item = Rectangle>) -> Result<Self> {
        let mut result = ParamSet::empty(dimension);
        for rect in rects {
            if rect.dimension() != dimension {
                return Err(CheckError::DimensionMismatch {
                    expected: dimension,
                    found: rect.dimension(),
                });
            }
            result.add_disjoint(rect);
        }
        result.merge_components();
        Ok(result)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The disjoint components of the canonical representation.
    pub fn rectangles(&self) -> &[Rectangle] {
        &self.rects
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Inserts the parts of `rect` not already covered, keeping components disjoint.
    fn add_disjoint(&mut self, rect: Rectangle) {
        if rect.is_empty() {
            return;
        }
        let mut pieces = vec![rect];
        for existing in &self.rects {
            pieces = pieces.iter().flat_map(|p| p.subtract(existing)).collect();
            if pieces.is_empty() {
                return;
            }
        }
        self.rects.extend(pieces);
    }

    /// Greedily merges pairs of components that form a single rectangle,
    /// until no pair merges. Keeps `equals`-relevant structure (component
    /// counts) canonical for simple sets.
    fn merge_components(&mut self) {
        let mut merged_any = true;
        while merged_any {
            merged_any = false;
            'outer: for i in 0..self.rects.len() {
                for j in (i + 1)..self.rects.len() {
                    if let Some(merged) = self.rects[i].try_merge(&self.rects[j]) {
                        self.rects.swap_remove(j);
                        self.rects[i] = merged;
                        merged_any = true;
                        break 'outer;
                    }
                }
            }
        }
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rects.is_empty() {
            return write!(f, "{{}}");
        }
        for (i, rect) in self.rects.iter().enumerate() {
            if i > 0 {
                write!(f, " u ")?;
            }
            write!(f, "{}", rect)?;
        }
        Ok(())
    }
}

/// Solver over unions of rectangles within a fixed universe box.
#[derive(Debug, Clone)]
pub struct RectSolver {
    universe: Rectangle,
}

impl RectSolver {
    /// Creates a solver whose universe is the given parameter box.
    ///
    /// # Panics
    ///
    /// Panics if the universe box is empty.
    pub fn new(universe: Rectangle) -> Self {
        assert!(!universe.is_empty(), "Universe must be non-empty");
        RectSolver { universe }
    }

    /// The universe as a plain rectangle.
    pub fn universe_rect(&self) -> &Rectangle {
        &self.universe
    }

    fn check_dimension(&self, set: &ParamSet) -> Result<()> {
        if set.dimension() != self.dimension() {
            return Err(CheckError::DimensionMismatch {
                expected: self.dimension(),
                found: set.dimension(),
            });
        }
        Ok(())
    }

    /// `a \ b` on raw rectangle lists, without canonicalization.
    fn difference_rects(a: &[Rectangle], b: &[Rectangle]) -> Vec<Rectangle> {
        let mut pieces: Vec<Rectangle> = a.to_vec();
        for rect in b {
            pieces = pieces.iter().flat_map(|p| p.subtract(rect)).collect();
            if pieces.is_empty() {
                break;
            }
        }
        pieces
    }
}

impl Solver for RectSolver {
    type Set = ParamSet;

    fn dimension(&self) -> usize {
        self.universe.dimension()
    }

    fn empty(&self) -> ParamSet {
        ParamSet::empty(self.dimension())
    }

    fn universe(&self) -> ParamSet {
        ParamSet {
            dimension: self.dimension(),
            rects: vec![self.universe.clone()],
        }
    }

    fn union(&self, a: &ParamSet, b: &ParamSet) -> Result<ParamSet> {
        self.check_dimension(a)?;
        self.check_dimension(b)?;
        trace!("union({}, {})", a, b);
        let mut result = a.clone();
        for rect in b.rectangles() {
            result.add_disjoint(rect.clone());
        }
        result.merge_components();
        Ok(result)
    }

    fn intersect(&self, a: &ParamSet, b: &ParamSet) -> Result<ParamSet> {
        self.check_dimension(a)?;
        self.check_dimension(b)?;
        trace!("intersect({}, {})", a, b);
        // pairwise intersections of two disjoint families are disjoint
        let mut result = ParamSet::empty(self.dimension());
        for ra in a.rectangles() {
            for rb in b.rectangles() {
                if let Some(overlap) = ra.intersect(rb) {
                    result.rects.push(overlap);
                }
            }
        }
        result.merge_components();
        Ok(result)
    }

    fn complement(&self, set: &ParamSet, universe: &ParamSet) -> Result<ParamSet> {
        self.check_dimension(set)?;
        self.check_dimension(universe)?;
        trace!("complement({}, {})", set, universe);
        let pieces = Self::difference_rects(universe.rectangles(), set.rectangles());
        ParamSet::from_rectangles(self.dimension(), pieces)
    }

    fn is_empty(&self, set: &ParamSet) -> bool {
        set.is_empty()
    }

    fn is_subset(&self, a: &ParamSet, b: &ParamSet) -> Result<bool> {
        self.check_dimension(a)?;
        self.check_dimension(b)?;
        Ok(Self::difference_rects(a.rectangles(), b.rectangles()).is_empty())
    }

    fn equals(&self, a: &ParamSet, b: &ParamSet) -> Result<bool> {
        Ok(self.is_subset(a, b)? && self.is_subset(b, a)?)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn solver1(lo: f64, hi: f64) -> RectSolver {
        RectSolver::new(Rectangle::new(vec![lo], vec![hi]))
    }

    fn set1(solver: &RectSolver, lo: f64, hi: f64) -> ParamSet {
        ParamSet::from_rectangles(solver.dimension(), [Rectangle::new(vec![lo], vec![hi])]).unwrap()
    }

    #[test]
    fn test_union_commutative() {
        let s = solver1(-1.0, 3.0);
        let a = set1(&s, -1.0, 1.0);
        let b = set1(&s, 0.0, 2.0);
        let ab = s.union(&a, &b).unwrap();
        let ba = s.union(&b, &a).unwrap();
        assert!(s.equals(&ab, &ba).unwrap());
        assert!(s.equals(&ab, &set1(&s, -1.0, 2.0)).unwrap());
    }

    #[test]
    fn test_union_associative() {
        let s = solver1(0.0, 10.0);
        let a = set1(&s, 0.0, 2.0);
        let b = set1(&s, 5.0, 6.0);
        let c = set1(&s, 1.0, 5.5);
        let left = s.union(&s.union(&a, &b).unwrap(), &c).unwrap();
        let right = s.union(&a, &s.union(&b, &c).unwrap()).unwrap();
        assert!(s.equals(&left, &right).unwrap());
    }

    #[test]
    fn test_union_disjoint_components() {
        let s = solver1(-1.0, 3.0);
        let a = set1(&s, -1.0, 1.0);
        let b = set1(&s, 2.0, 3.0);
        let u = s.union(&a, &b).unwrap();
        assert_eq!(u.rectangles().len(), 2);
    }

    #[test]
    fn test_union_adjacent_merges() {
        let s = solver1(-1.0, 1.0);
        let a = set1(&s, -1.0, 0.0);
        let b = set1(&s, 0.0, 1.0);
        let u = s.union(&a, &b).unwrap();
        assert_eq!(u.rectangles().len(), 1);
        assert!(s.equals(&u, &s.universe()).unwrap());
    }

    #[test]
    fn test_intersect_commutative() {
        let s = solver1(-1.0, 3.0);
        let a = set1(&s, -1.0, 1.0);
        let b = set1(&s, 0.0, 2.0);
        let ab = s.intersect(&a, &b).unwrap();
        let ba = s.intersect(&b, &a).unwrap();
        assert!(s.equals(&ab, &ba).unwrap());
        assert!(s.equals(&ab, &set1(&s, 0.0, 1.0)).unwrap());
    }

    #[test]
    fn test_intersect_self() {
        let s = solver1(-1.0, 3.0);
        let a = s
            .union(&set1(&s, -1.0, 0.0), &set1(&s, 1.0, 2.0))
            .unwrap();
        let aa = s.intersect(&a, &a).unwrap();
        assert!(s.equals(&a, &aa).unwrap());
    }

    #[test]
    fn test_complement_law() {
        let s = solver1(-1.0, 1.0);
        let a = set1(&s, 0.0, 0.5);
        let co = s.complement(&a, &s.universe()).unwrap();
        let both = s.intersect(&a, &co).unwrap();
        assert!(s.is_empty(&both));
        let all = s.union(&a, &co).unwrap();
        assert!(s.equals(&all, &s.universe()).unwrap());
    }

    #[test]
    fn test_complement_of_empty() {
        let s = solver1(-1.0, 1.0);
        let co = s.complement(&s.empty(), &s.universe()).unwrap();
        assert!(s.equals(&co, &s.universe()).unwrap());
        let co2 = s.complement(&s.universe(), &s.universe()).unwrap();
        assert!(s.is_empty(&co2));
    }

    #[test]
    fn test_subset() {
        let s = solver1(-1.0, 3.0);
        let a = set1(&s, 0.0, 1.0);
        let b = set1(&s, -1.0, 2.0);
        assert!(s.is_subset(&a, &b).unwrap());
        assert!(!s.is_subset(&b, &a).unwrap());
        assert!(s.is_subset(&s.empty(), &a).unwrap());
        assert!(s.is_subset(&a, &a).unwrap());
    }

    #[test]
    fn test_degenerate_is_empty() {
        let s = solver1(-1.0, 1.0);
        let degenerate =
            ParamSet::from_rectangles(1, [Rectangle::new(vec![0.5], vec![0.5])]).unwrap();
        assert!(s.is_empty(&degenerate));
        assert!(s.is_empty(&s.empty()));
    }

    #[test]
    fn test_dimension_mismatch() {
        let s = solver1(-1.0, 1.0);
        let bad = ParamSet::from_rectangles(2, [Rectangle::new(vec![0.0, 0.0], vec![1.0, 1.0])])
            .unwrap();
        let err = s.union(&s.empty(), &bad).unwrap_err();
        assert!(matches!(err, CheckError::DimensionMismatch { expected: 1, found: 2 }));
    }

    #[test]
    fn test_2d_algebra() {
        let s = RectSolver::new(Rectangle::new(vec![0.0, 0.0], vec![4.0, 4.0]));
        let a = ParamSet::from_rectangles(2, [Rectangle::new(vec![0.0, 0.0], vec![2.0, 2.0])])
            .unwrap();
        let b = ParamSet::from_rectangles(2, [Rectangle::new(vec![1.0, 1.0], vec![3.0, 3.0])])
            .unwrap();
        let u = s.union(&a, &b).unwrap();
        let i = s.intersect(&a, &b).unwrap();
        // |A u B| + |A n B| = |A| + |B| is hard to check without measure;
        // instead check inclusion chains
        assert!(s.is_subset(&a, &u).unwrap());
        assert!(s.is_subset(&b, &u).unwrap());
        assert!(s.is_subset(&i, &a).unwrap());
        assert!(s.is_subset(&i, &b).unwrap());
        let co_u = s.complement(&u, &s.universe()).unwrap();
        assert!(s.is_empty(&s.intersect(&co_u, &u).unwrap()));
    }
}
