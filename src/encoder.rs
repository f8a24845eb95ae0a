//! Dense encoding of discretized grid coordinates into state identifiers.
//!
//! The encoder is a pure bijection between coordinate vectors of a
//! rectangular grid and the integer range `[0, state_count)`. It also answers
//! facet adjacency queries (the neighbor across one facet of a cell), which
//! is all a grid transition model needs.

use crate::error::{CheckError, Result};
use crate::types::{Direction, State};

/// Mixed-radix encoder for a grid with per-dimension cell counts `(n_1..n_D)`.
///
/// `encode` and `decode` are mutual inverses over the full Cartesian product;
/// `state_count = Π n_i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridEncoder {
    counts: Vec<usize>,
    multipliers: Vec<usize>,
    state_count: usize,
}

impl GridEncoder {
    /// Creates an encoder for the given per-dimension cell counts.
    ///
    /// # Panics
    ///
    /// Panics if `counts` is empty or any dimension has zero cells.
    pub fn new(counts: Vec<usize>) -> Self {
        assert!(!counts.is_empty(), "Grid must have at least one dimension");
        assert!(counts.iter().all(|&n| n > 0), "Each dimension must have at least one cell");

        let mut multipliers = Vec::with_capacity(counts.len());
        let mut product = 1;
        for &n in &counts {
            multipliers.push(product);
            product *= n;
        }
        GridEncoder {
            counts,
            multipliers,
            state_count: product,
        }
    }

    /// The number of grid dimensions.
    pub fn dimensions(&self) -> usize {
        self.counts.len()
    }

    /// The number of cells in the given dimension.
    pub fn count(&self, dimension: usize) -> usize {
        self.counts[dimension]
    }

    /// The total number of states.
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    fn check_state(&self, state: State) -> Result<()> {
        if state >= self.state_count {
            return Err(CheckError::InvalidStateIndex {
                state,
                state_count: self.state_count,
            });
        }
        Ok(())
    }

    /// Encodes a coordinate vector into a state id.
    pub fn encode(&self, coords: &[usize]) -> Result<State> {
        if coords.len() != self.counts.len() {
            return Err(CheckError::DimensionMismatch {
                expected: self.counts.len(),
                found: coords.len(),
            });
        }
        let mut state = 0;
        for (d, (&c, &n)) in coords.iter().zip(&self.counts).enumerate() {
            if c >= n {
                return Err(CheckError::InvalidCoordinate {
                    dimension: d,
                    coordinate: c,
                    size: n,
                });
            }
            state += c * self.multipliers[d];
        }
        Ok(state)
    }

    /// Decodes a state id into its coordinate vector.
    pub fn decode(&self, state: State) -> Result<Vec<usize>> {
        self.check_state(state)?;
        Ok((0..self.counts.len())
            .map(|d| (state / self.multipliers[d]) % self.counts[d])
            .collect())
    }

    /// The coordinate of a state in one dimension.
    pub fn coordinate(&self, state: State, dimension: usize) -> Result<usize> {
        self.check_state(state)?;
        if dimension >= self.counts.len() {
            return Err(CheckError::DimensionMismatch {
                expected: self.counts.len(),
                found: dimension,
            });
        }
        Ok((state / self.multipliers[dimension]) % self.counts[dimension])
    }

    /// The adjacent state across one facet, or `None` at a grid boundary.
    pub fn neighbor(&self, state: State, dimension: usize, direction: Direction) -> Result<Option<State>> {
        let coordinate = self.coordinate(state, dimension)?;
        Ok(match direction {
            Direction::Positive => {
                if coordinate == self.counts[dimension] - 1 {
                    None
                } else {
                    Some(state + self.multipliers[dimension])
                }
            }
            Direction::Negative => {
                if coordinate == 0 {
                    None
                } else {
                    Some(state - self.multipliers[dimension])
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bijection() {
        let enc = GridEncoder::new(vec![3, 4, 2]);
        assert_eq!(enc.state_count(), 24);
        for state in 0..enc.state_count() {
            let coords = enc.decode(state).unwrap();
            assert_eq!(enc.encode(&coords).unwrap(), state);
        }
        for a in 0..3 {
            for b in 0..4 {
                for c in 0..2 {
                    let state = enc.encode(&[a, b, c]).unwrap();
                    assert_eq!(enc.decode(state).unwrap(), vec![a, b, c]);
                }
            }
        }
    }

    #[test]
    fn test_coordinate() {
        let enc = GridEncoder::new(vec![3, 4]);
        let state = enc.encode(&[2, 3]).unwrap();
        assert_eq!(enc.coordinate(state, 0).unwrap(), 2);
        assert_eq!(enc.coordinate(state, 1).unwrap(), 3);
    }

    #[test]
    fn test_neighbor() {
        let enc = GridEncoder::new(vec![3, 2]);
        let state = enc.encode(&[1, 0]).unwrap();

        let up = enc.neighbor(state, 0, Direction::Positive).unwrap().unwrap();
        assert_eq!(enc.decode(up).unwrap(), vec![2, 0]);

        let down = enc.neighbor(state, 0, Direction::Negative).unwrap().unwrap();
        assert_eq!(enc.decode(down).unwrap(), vec![0, 0]);

        let side = enc.neighbor(state, 1, Direction::Positive).unwrap().unwrap();
        assert_eq!(enc.decode(side).unwrap(), vec![1, 1]);

        // boundaries
        assert_eq!(enc.neighbor(state, 1, Direction::Negative).unwrap(), None);
        let corner = enc.encode(&[2, 1]).unwrap();
        assert_eq!(enc.neighbor(corner, 0, Direction::Positive).unwrap(), None);
        assert_eq!(enc.neighbor(corner, 1, Direction::Positive).unwrap(), None);
    }

    #[test]
    fn test_out_of_range() {
        let enc = GridEncoder::new(vec![3, 2]);
        assert!(matches!(
            enc.encode(&[3, 0]).unwrap_err(),
            CheckError::InvalidCoordinate { dimension: 0, coordinate: 3, size: 3 }
        ));
        assert!(matches!(
            enc.encode(&[0, 0, 0]).unwrap_err(),
            CheckError::DimensionMismatch { .. }
        ));
        assert!(matches!(
            enc.decode(6).unwrap_err(),
            CheckError::InvalidStateIndex { state: 6, state_count: 6 }
        ));
        assert!(enc.neighbor(100, 0, Direction::Positive).is_err());
    }

    #[test]
    fn test_single_dimension() {
        let enc = GridEncoder::new(vec![5]);
        assert_eq!(enc.state_count(), 5);
        assert_eq!(enc.encode(&[4]).unwrap(), 4);
        assert_eq!(enc.neighbor(4, 0, Direction::Positive).unwrap(), None);
        assert_eq!(enc.neighbor(4, 0, Direction::Negative).unwrap(), Some(3));
    }
}
