//! Total state-to-parameter-set mappings.
//!
//! A [`StateMap`] is the working and result structure of the checker: it is
//! defined (possibly to the empty set) for *every* state in
//! `[0, state_count)`. Least-fixed-point computations seed it with empty
//! sets, greatest-fixed-point computations with the universe.

use crate::error::Result;
use crate::solver::Solver;
use crate::types::State;

/// A total mapping `State -> parameter set`.
#[derive(Debug, Clone)]
pub struct StateMap<P> {
    values: Vec<P>,
}

impl<P: Clone> StateMap<P> {
    /// Creates a map assigning `default` to every state.
    pub fn new(state_count: usize, default: P) -> Self {
        StateMap {
            values: vec![default; state_count],
        }
    }

    pub fn state_count(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, state: State) -> &P {
        &self.values[state]
    }

    pub fn set(&mut self, state: State, value: P) {
        self.values[state] = value;
    }

    /// Iterates over `(state, set)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (State, &P)> {
        self.values.iter().enumerate()
    }

    /// Unions `value` into the state's set.
    ///
    /// Returns `true` iff the stored set actually grew; adding an empty set
    /// or a subset of the current value is a no-op.
    pub fn union_with<S>(&mut self, solver: &S, state: State, value: &P) -> Result<bool>
    where
        S: Solver<Set = P>,
    {
        if solver.is_empty(value) {
            return Ok(false);
        }
        if solver.is_subset(value, &self.values[state])? {
            return Ok(false);
        }
        self.values[state] = solver.union(&self.values[state], value)?;
        Ok(true)
    }

    /// Per-state equality via the solver.
    pub fn equals<S>(&self, solver: &S, other: &StateMap<P>) -> Result<bool>
    where
        S: Solver<Set = P>,
    {
        if self.values.len() != other.values.len() {
            return Ok(false);
        }
        for (a, b) in self.values.iter().zip(&other.values) {
            if !solver.equals(a, b)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
