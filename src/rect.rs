//! Axis-aligned parameter-space hyperrectangles.
//!
//! A [`Rectangle`] is the atomic building block of the symbolic parameter
//! representation: a pair of bound vectors `(low, high)` of a fixed dimension
//! shared across one problem instance. Rectangles are immutable values; all
//! algebra produces new rectangles.
//!
//! A rectangle is considered *empty* as soon as `low[d] >= high[d]` in any
//! dimension: intersections that collapse to a face carry no parameter mass.

use std::fmt;

/// An axis-aligned hyperrectangle `[low_0, high_0) x ... x [low_{D-1}, high_{D-1})`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    low: Vec<f64>,
    high: Vec<f64>,
}

impl Rectangle {
    /// Creates a rectangle from bound vectors.
    ///
    /// # Panics
    ///
    /// Panics if `low` and `high` have different lengths.
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> Self {
        assert_eq!(low.len(), high.len(), "Bound vectors must have equal length");
        Rectangle { low, high }
    }

    /// Creates a rectangle from interleaved `[lo_0, hi_0, lo_1, hi_1, ...]` bounds.
    pub fn from_interleaved(bounds: &[f64]) -> Self {
        assert_eq!(bounds.len() % 2, 0, "Interleaved bounds must come in pairs");
        let dim = bounds.len() / 2;
        let mut low = Vec::with_capacity(dim);
        let mut high = Vec::with_capacity(dim);
        for d in 0..dim {
            low.push(bounds[2 * d]);
            high.push(bounds[2 * d + 1]);
        }
        Rectangle { low, high }
    }

    /// The dimension D of this rectangle.
    pub fn dimension(&self) -> usize {
        self.low.len()
    }

    pub fn low(&self, d: usize) -> f64 {
        self.low[d]
    }

    pub fn high(&self, d: usize) -> f64 {
        self.high[d]
    }

    /// True iff the rectangle contains no parameter point.
    pub fn is_empty(&self) -> bool {
        self.low.iter().zip(&self.high).any(|(lo, hi)| lo >= hi)
    }

    /// Intersection with another rectangle, or `None` if it is empty.
    pub fn intersect(&self, other: &Rectangle) -> Option<Rectangle> {
        debug_assert_eq!(self.dimension(), other.dimension());
        let low: Vec<f64> = self.low.iter().zip(&other.low).map(|(a, b)| a.max(*b)).collect();
        let high: Vec<f64> = self.high.iter().zip(&other.high).map(|(a, b)| a.min(*b)).collect();
        let result = Rectangle { low, high };
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    /// True iff `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rectangle) -> bool {
        debug_assert_eq!(self.dimension(), other.dimension());
        self.low
            .iter()
            .zip(&self.high)
            .zip(other.low.iter().zip(&other.high))
            .all(|((lo, hi), (olo, ohi))| lo <= olo && ohi <= hi)
    }

    /// Set difference `self \ other` as a disjoint list of rectangles.
    ///
    /// Carves at most two slabs per dimension: everything strictly below and
    /// strictly above the overlap, then narrows the remainder and moves to the
    /// next dimension. Returns `[self]` when the rectangles do not overlap.
    pub fn subtract(&self, other: &Rectangle) -> Vec<Rectangle> {
        debug_assert_eq!(self.dimension(), other.dimension());
        let Some(overlap) = self.intersect(other) else {
            return vec![self.clone()];
        };

        let mut pieces = Vec::new();
        let mut rest = self.clone();
        for d in 0..self.dimension() {
            if rest.low[d] < overlap.low[d] {
                let mut below = rest.clone();
                below.high[d] = overlap.low[d];
                pieces.push(below);
                rest.low[d] = overlap.low[d];
            }
            if rest.high[d] > overlap.high[d] {
                let mut above = rest.clone();
                above.low[d] = overlap.high[d];
                pieces.push(above);
                rest.high[d] = overlap.high[d];
            }
        }
        pieces
    }

    /// Merges with a neighbor that matches in every dimension but one, where
    /// the two intervals touch or overlap. Returns `None` otherwise.
    pub fn try_merge(&self, other: &Rectangle) -> Option<Rectangle> {
        debug_assert_eq!(self.dimension(), other.dimension());
        let mut split_dim = None;
        for d in 0..self.dimension() {
            if self.low[d] == other.low[d] && self.high[d] == other.high[d] {
                continue;
            }
            if split_dim.is_some() {
                return None; // differs in more than one dimension
            }
            split_dim = Some(d);
        }
        let Some(d) = split_dim else {
            return Some(self.clone()); // identical
        };
        // intervals must form a single contiguous interval
        if self.high[d] < other.low[d] || other.high[d] < self.low[d] {
            return None;
        }
        let mut merged = self.clone();
        merged.low[d] = self.low[d].min(other.low[d]);
        merged.high[d] = self.high[d].max(other.high[d]);
        Some(merged)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for d in 0..self.dimension() {
            if d > 0 {
                write!(f, " x ")?;
            }
            write!(f, "({}, {})", self.low[d], self.high[d])?;
        }
        write!(f, "]")
    }
}
